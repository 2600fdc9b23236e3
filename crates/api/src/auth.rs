//! Bearer-token verification boundary.
//!
//! Token issuance and verification belong to the identity provider, not this
//! engine. The trait is the seam; the dev verifier behind it is deliberately
//! trivial so the rest of the stack can be exercised without one.

use thiserror::Error;

use devforum_core::AccountId;

#[derive(Debug, Error)]
#[error("token rejected")]
pub struct TokenRejected;

pub trait TokenVerifier: Send + Sync {
    /// Resolve a bearer token to the calling account.
    fn verify(&self, token: &str) -> Result<AccountId, TokenRejected>;
}

/// Development-only verifier: the token IS the account UUID.
///
/// Accepts any well-formed account id without proof of ownership. Never use
/// outside local development.
#[derive(Debug, Default)]
pub struct DevTokenVerifier;

impl DevTokenVerifier {
    pub fn new() -> Self {
        tracing::warn!("using insecure dev token verifier; tokens are raw account ids");
        Self
    }
}

impl TokenVerifier for DevTokenVerifier {
    fn verify(&self, token: &str) -> Result<AccountId, TokenRejected> {
        token.parse::<AccountId>().map_err(|_| TokenRejected)
    }
}
