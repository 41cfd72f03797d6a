// User domain module
// Value objects shared by the account and auth flows

pub mod value_objects;

pub use value_objects::{Email, UserRole};
