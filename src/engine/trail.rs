//! Bounded history of accepted positions

use std::collections::VecDeque;

use geo::geometry::Point;

/// Ordered trail, oldest first
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    points: VecDeque<Point>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity < 1 { 1 } else { capacity };

        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a position unless it repeats the last one. Evicts the oldest
    /// entry when full.
    pub fn append(&mut self, point: Point) -> bool {
        if self.points.back() == Some(&point) {
            return false;
        }

        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);

        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Polyline in buffer order
    pub fn path(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}
