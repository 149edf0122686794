//! Scheduling value objects

mod duration;

pub use duration::*;
