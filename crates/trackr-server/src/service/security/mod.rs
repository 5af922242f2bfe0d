//! Token issuance, identity resolution, password hashing and authorization.

mod authorization_engine;
mod error;
mod identity_resolver;
mod password_hasher;
mod token_codec;
mod token_keys;

pub use self::authorization_engine::{Action, AuthorizationEngine};
pub use self::error::{AuthError, AuthResult};
pub use self::identity_resolver::{IdentityResolver, Principal, Rejection};
pub use self::password_hasher::PasswordHasher;
pub use self::token_codec::{ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL, SignedToken, TokenCodec};
pub use self::token_keys::{TokenKeys, TokenKeysConfig};
