mod create_user;
pub use create_user::*;

mod seed;
pub use seed::*;
