//! Request types for HTTP handlers.

mod authentications;
mod invites;
mod members;
mod paths;
mod projects;

pub use authentications::*;
pub use invites::*;
pub use members::*;
pub use paths::*;
pub use projects::*;
