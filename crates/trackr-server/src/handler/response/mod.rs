//! Response types for HTTP handlers.

mod accounts;
mod authentications;
mod errors;
mod invites;
mod members;
mod monitors;
mod projects;

pub use accounts::*;
pub use authentications::*;
pub use errors::*;
pub use invites::*;
pub use members::*;
pub use monitors::*;
pub use projects::*;
