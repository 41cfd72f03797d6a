// Booking domain module
// Contains the booking aggregate root and its domain events

#![allow(clippy::module_inception)]

pub mod booking;
pub mod events;

pub use booking::Booking;
pub use events::BookingEvent;
