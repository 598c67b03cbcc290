pub mod motion;
pub mod options;
pub mod presenter;
pub mod report;
pub mod trail;
pub mod tracker;
pub mod viewport;
