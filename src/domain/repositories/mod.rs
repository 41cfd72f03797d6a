// Repository traits (ports)
// Implemented by the infrastructure layer

pub mod booking_repository;
pub mod review_repository;
pub mod tour_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository;
pub use review_repository::ReviewRepository;
pub use tour_repository::{TourQuery, TourRepository, TourSort};
pub use user_repository::{User, UserRepository};
