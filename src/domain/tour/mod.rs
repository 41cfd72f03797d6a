// Tour domain module
// Contains the tour aggregate root and its value objects

#![allow(clippy::module_inception)]

pub mod tour;
pub mod value_objects;

// Re-export main types for convenience
pub use tour::{NewTour, Tour, TourChanges};
pub use value_objects::{Difficulty, Location};
