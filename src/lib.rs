//! # orderdesk
//!
//! Client-side session handling for the orders application: log in against
//! an Identity Provider, keep the issued bearer token in persistent storage,
//! decode its claims for display, and gate the order views on the
//! authenticated flag.
//!
//! The pieces are wired together by [`session::SessionManager`], which is
//! generic over the [`identity::IdentityProvider`] and
//! [`store::KeyValueStore`] it talks to.

pub mod config;
pub mod identity;
pub mod routes;
pub mod session;
pub mod store;

pub use identity::{Credentials, HttpIdentityProvider, IdentityProvider};
pub use session::{Claims, LoginOutcome, Session, SessionError, SessionManager};
pub use store::{FileStore, KeyValueStore, MemoryStore, TOKEN_KEY};
