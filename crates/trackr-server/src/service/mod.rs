//! Application state and dependency injection.

mod config;
pub mod flow;
pub mod notify;
pub mod security;
pub mod store;

use std::sync::Arc;

use trackr_postgres::PgClient;

pub use crate::service::config::ServiceConfig;
use crate::service::flow::{AccountFlow, InvitationFlow, PasswordResetFlow};
use crate::service::notify::{EmailSender, LogEmailSender};
use crate::service::security::{
    AuthorizationEngine, IdentityResolver, PasswordHasher, TokenCodec, TokenKeys,
};
use crate::service::store::Stores;
use crate::utility::tracing_targets::SERVICE as TRACING_TARGET;
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: Option<PgClient>,
    pub stores: Stores,
    pub email_sender: Arc<dyn EmailSender>,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub token_codec: TokenCodec,
    pub identity_resolver: IdentityResolver,
    pub authorization: AuthorizationEngine,
    pub account_flow: AccountFlow,
    pub invitation_flow: InvitationFlow,
    pub password_reset_flow: PasswordResetFlow,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres, applies migrations and loads the signing keys.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let token_keys = config.load_token_keys().await?;
        let pg_client = config.connect_postgres().await?;
        let stores = Stores::postgres(pg_client.clone());

        let mut state = Self::from_parts(config, token_keys, stores, Arc::new(LogEmailSender));
        state.postgres = Some(pg_client);

        tracing::info!(target: TRACING_TARGET, "service state initialized");
        Ok(state)
    }

    /// Assembles state from already constructed collaborators.
    ///
    /// No connection is opened; `postgres` is left unset.
    pub fn from_parts(
        config: &ServiceConfig,
        token_keys: TokenKeys,
        stores: Stores,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        let password_hasher = PasswordHasher::new();
        let token_codec = TokenCodec::new(token_keys);
        let base_url: Arc<str> = Arc::from(config.base_url());

        Self {
            postgres: None,
            identity_resolver: IdentityResolver::new(token_codec.clone()),
            authorization: AuthorizationEngine::new(stores.roles.clone()),
            account_flow: AccountFlow::new(
                stores.users.clone(),
                password_hasher.clone(),
                token_codec.clone(),
            ),
            invitation_flow: InvitationFlow::new(
                stores.invitations.clone(),
                email_sender.clone(),
                base_url.clone(),
                config.invite_ttl(),
            ),
            password_reset_flow: PasswordResetFlow::new(
                stores.users.clone(),
                stores.reset_tokens.clone(),
                email_sender.clone(),
                password_hasher.clone(),
                base_url,
            ),
            stores,
            email_sender,
            password_hasher,
            token_codec,
        }
    }

    /// Assembles state over fresh in-memory stores.
    pub fn in_memory(
        config: &ServiceConfig,
        token_keys: TokenKeys,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self::from_parts(config, token_keys, Stores::in_memory(), email_sender)
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("postgres", &self.postgres)
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(stores: Stores);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(token_codec: TokenCodec);
impl_di!(identity_resolver: IdentityResolver);
impl_di!(authorization: AuthorizationEngine);
impl_di!(account_flow: AccountFlow);
impl_di!(invitation_flow: InvitationFlow);
impl_di!(password_reset_flow: PasswordResetFlow);
