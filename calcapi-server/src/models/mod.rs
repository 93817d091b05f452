//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod calculation;
pub mod user;

pub use validation::ValidationError;
pub use calculation::Calculation;
pub use user::{Email, NewUser, UserName};
