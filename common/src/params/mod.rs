//! Input parameters for the various functions within roster.

mod user;
pub use user::*;
