//! Users and the directory listing them.
//!
//! - [`User`]: Owns its subscribers and fans alert changes out to them
//! - [`UserDirectory`]: Supplies the users to notify on every cycle
//! - [`UserRepository`]: In-memory [`UserDirectory`]

mod user;
mod user_directory;

pub use crate::users::user::User;
pub use crate::users::user_directory::{UserDirectory, UserRepository};
