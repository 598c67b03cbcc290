//! Region the map is asked to frame

use geo::geometry::{Coord, Point, Rect};

use crate::surface::RenderingSurface;

/// Grows with every included position until reseeded
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    bounds: Option<Rect>,
}

impl Viewport {
    pub fn new() -> Self {
        Self { bounds: None }
    }

    pub fn extend(&mut self, point: Point) {
        let c: Coord = point.into();

        self.bounds = Some(match self.bounds {
            Some(b) => Rect::new(
                Coord {
                    x: b.min().x.min(c.x),
                    y: b.min().y.min(c.y),
                },
                Coord {
                    x: b.max().x.max(c.x),
                    y: b.max().y.max(c.y),
                },
            ),
            None => Rect::new(c, c),
        });
    }

    /// Forget everything but `point`
    pub fn reseed(&mut self, point: Point) {
        self.bounds = None;
        self.extend(point);
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Ask the surface to frame the region. False when there is none yet.
    pub fn request_fit<S: RenderingSurface>(&self, surface: &mut S) -> bool {
        match self.bounds {
            Some(b) => {
                surface.fit_bounds(b);
                true
            }
            None => false,
        }
    }
}
