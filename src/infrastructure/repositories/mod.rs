// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_booking_repository;
pub mod postgres_review_repository;
pub mod postgres_tour_repository;
pub mod postgres_user_repository;

pub use postgres_booking_repository::PostgresBookingRepository;
pub use postgres_review_repository::PostgresReviewRepository;
pub use postgres_tour_repository::PostgresTourRepository;
pub use postgres_user_repository::PostgresUserRepository;
