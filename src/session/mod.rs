//! Session Manager — owns authentication state for the running client.
//!
//! ARCHITECTURE
//! ============
//! One `SessionManager` per application context. It is built over an
//! [`IdentityProvider`] and a [`KeyValueStore`] and initialised by calling
//! [`SessionManager::check_auth`] at startup. Whoever needs the session gets
//! a reference to the manager; there is no global.
//!
//! STATE
//! =====
//! Two states only: unauthenticated and authenticated. `login` (with a token
//! in the reply) and `check_auth` (with a stored token) move to
//! authenticated; `logout` is the only way back. Token expiry is not tracked.
//!
//! ERROR HANDLING
//! ==============
//! A reply without a token is a normal `LoginOutcome::Rejected`, not an
//! error. Transport failures, undecodable tokens and storage failures are
//! `SessionError`s, and none of them change the in-memory session.

pub mod token;

use serde_json::Value;

use crate::identity::{Credentials, IdentityError, IdentityProvider};
use crate::store::{KeyValueStore, StoreError, TOKEN_KEY};
pub use token::{Claims, TokenError, decode_claims};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("token decode failed: {0}")]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory authentication state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub is_authenticated: bool,
    /// Decoded, unverified claims of the current token. Display data only.
    pub user: Option<Claims>,
}

/// Result of a login attempt that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// A token was issued, persisted and decoded.
    Authenticated(Claims),
    /// The provider answered without a token. Session and storage untouched.
    Rejected { status: u16, body: Value },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

pub struct SessionManager<P, S> {
    provider: P,
    store: S,
    session: Session,
}

impl<P, S> SessionManager<P, S>
where
    P: IdentityProvider,
    S: KeyValueStore,
{
    /// Create an unauthenticated manager. Call [`Self::check_auth`] next to
    /// pick up a token persisted by an earlier run.
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store, session: Session::default() }
    }

    /// Exchange `credentials` for a token with the Identity Provider.
    ///
    /// The token is decoded before anything is persisted, so a reply carrying
    /// a malformed token leaves both storage and session as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or replies with
    /// something other than JSON, if the issued token cannot be decoded, or
    /// if the token cannot be persisted.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome, SessionError> {
        let reply = self.provider.authenticate(credentials).await?;

        let Some(token) = reply.token().map(str::to_owned) else {
            tracing::warn!(status = reply.status, "login rejected: no token in provider reply");
            return Ok(LoginOutcome::Rejected { status: reply.status, body: reply.body });
        };

        let claims = decode_claims(&token)?;
        self.store.set(TOKEN_KEY, &token)?;
        self.session = Session { is_authenticated: true, user: Some(claims.clone()) };

        tracing::info!(subject = ?claims.subject(), "login succeeded");
        Ok(LoginOutcome::Authenticated(claims))
    }

    /// Drop the persisted token and clear the session. No network call.
    ///
    /// The in-memory session is cleared even if the store fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be removed from storage.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let was_authenticated = self.session.is_authenticated;
        self.session = Session::default();
        self.store.remove(TOKEN_KEY)?;
        tracing::info!(was_authenticated, "logged out");
        Ok(())
    }

    /// Restore the session from a persisted token, if there is one.
    ///
    /// With no stored token the session is left exactly as it was; this is a
    /// startup check, not a reset.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the stored token cannot
    /// be decoded. The session is unchanged in both cases.
    pub fn check_auth(&mut self) -> Result<(), SessionError> {
        // An empty value counts as no token.
        let Some(token) = self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) else {
            tracing::debug!("no stored token");
            return Ok(());
        };

        let claims = decode_claims(&token)?;
        tracing::debug!(subject = ?claims.subject(), "restored session from stored token");
        self.session = Session { is_authenticated: true, user: Some(claims) };
        Ok(())
    }

    /// Raw persisted token, for use as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    #[must_use]
    pub fn user(&self) -> Option<&Claims> {
        self.session.user.as_ref()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
