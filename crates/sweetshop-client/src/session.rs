//! # Session Holder
//!
//! Holds the authenticated identity for the lifetime of the process and
//! hands it to every view.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Lifecycle                               │
//! │                                                                         │
//! │   restore (config)   ┌───────────┐   login(session)                    │
//! │   ─────────────────► │   Empty   │ ◄──────────────────┐                │
//! │                      └─────┬─────┘                    │                │
//! │                            │ login                    │ logout /       │
//! │                            ▼                          │ JWT exp passed │
//! │                      ┌───────────┐                    │                │
//! │                      │  Present  │ ───────────────────┘                │
//! │                      └───────────┘                                     │
//! │                                                                         │
//! │  The holder is cloned into each view; all clones share one slot.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Expiry
//! Tokens that decode as a JWT with an `exp` claim are checked on every
//! read. Opaque tokens never expire client-side. The signature is not
//! verified here; the API does that on every request.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use sweetshop_core::{NavState, Session};

/// Shared, cloneable handle to the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionHolder {
    session: Arc<RwLock<Option<Session>>>,
}

impl SessionHolder {
    /// Creates an empty holder (nobody signed in).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holder seeded with an existing session.
    pub fn with_session(session: Session) -> Self {
        SessionHolder {
            session: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Stores a new session, replacing any previous one.
    pub async fn login(&self, session: Session) {
        info!(email = %session.email, role = %session.role, "Session started");
        *self.session.write().await = Some(session);
    }

    /// Returns the session if present and not expired.
    ///
    /// An expired JWT clears the slot so every clone sees the logout.
    pub async fn current(&self) -> Option<Session> {
        {
            let guard = self.session.read().await;
            match guard.as_ref() {
                None => return None,
                Some(session) if !token_expired(&session.token) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        let mut guard = self.session.write().await;
        // Another clone may have replaced the session meanwhile
        if guard.as_ref().is_some_and(|s| token_expired(&s.token)) {
            info!("Session token expired, clearing session");
            *guard = None;
        }
        (*guard).clone()
    }

    /// Clears the session. Idempotent.
    pub async fn logout(&self) {
        let previous = self.session.write().await.take();
        if let Some(session) = previous {
            info!(email = %session.email, "Logged out");
        }
    }

    /// Bearer token for the next request, if any.
    pub async fn token(&self) -> Option<String> {
        self.current().await.map(|s| s.token)
    }

    /// Navigation state for the current session.
    pub async fn nav_state(&self) -> NavState {
        NavState::from_session(self.current().await.as_ref())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current().await.is_some_and(|s| s.is_authenticated())
    }
}

// =============================================================================
// JWT Expiry
// =============================================================================

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Reads the `exp` claim without verifying the signature.
fn token_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims.exp,
        Err(e) => {
            debug!(error = %e, "Session token is not a JWT, treating as non-expiring");
            None
        }
    }
}

fn token_expired(token: &str) -> bool {
    token_expiry(token).is_some_and(|exp| exp <= Utc::now().timestamp())
}
