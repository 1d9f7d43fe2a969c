//! The client session: who is logged in and with what credential.
//!
//! [SessionStore] is the single source of truth for the session. It is
//! cloned into every component that needs it (the gateway, the views) and its
//! methods are the only way to change the session.

mod credential;
mod storage;

use std::sync::{Arc, Mutex, MutexGuard};

pub use credential::CredentialToken;
pub use storage::{
    AUTH_HEADER_KEY, MemorySessionStorage, SQLiteSessionStorage, SessionStorage, USERNAME_KEY,
};

use crate::Error;

/// The state of the client session.
///
/// A session is authenticated exactly when it has both an identity and a
/// credential token, which the enum enforces by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A principal is logged in.
    Authenticated {
        /// The principal's name.
        identity: String,
        /// The credential presented on each request.
        token: CredentialToken,
    },
}

impl Session {
    /// Whether a principal is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// The logged in principal's name.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            Session::Anonymous => None,
        }
    }

    /// The credential token for the logged in principal.
    pub fn credential_token(&self) -> Option<&CredentialToken> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }
}

/// A snapshot of the session taken when a request is issued.
///
/// Every log in and log out starts a new generation. A response whose ticket
/// is from an older generation belongs to a session that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    /// The token to attach to the request, if anyone is logged in.
    pub token: Option<CredentialToken>,
    /// The session generation the request was issued under.
    pub generation: u64,
}

#[derive(Debug)]
struct SessionState {
    session: Session,
    generation: u64,
    storage: Box<dyn SessionStorage>,
}

impl SessionState {
    fn clear(&mut self) -> Result<(), Error> {
        if self.session.is_authenticated() {
            self.session = Session::Anonymous;
            self.generation += 1;
        }

        self.storage.remove(AUTH_HEADER_KEY)?;
        self.storage.remove(USERNAME_KEY)
    }
}

/// Owns the session and keeps it in sync with durable storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
}

impl SessionStore {
    /// Rebuild the session from `storage`, e.g. on process start.
    ///
    /// The session is authenticated only if both the username and the token
    /// are in storage, otherwise it starts anonymous. Nothing is written to
    /// storage. The raw secret is never stored, so it is never restored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage could not be read.
    pub fn restore(storage: impl SessionStorage + 'static) -> Result<Self, Error> {
        let identity = storage.get(USERNAME_KEY)?;
        let token = storage.get(AUTH_HEADER_KEY)?;

        let session = match (identity, token) {
            (Some(identity), Some(token)) => {
                tracing::debug!("Restored session for {identity}.");
                Session::Authenticated {
                    identity,
                    token: CredentialToken::new_unchecked(&token),
                }
            }
            (None, None) => Session::Anonymous,
            _ => {
                tracing::warn!("Found a partial session in storage, starting logged out.");
                Session::Anonymous
            }
        };

        Ok(Self {
            state: Arc::new(Mutex::new(SessionState {
                session,
                generation: 0,
                storage: Box::new(storage),
            })),
        })
    }

    /// Log in as `principal`, replacing any current session.
    ///
    /// The credential token is derived locally from `principal` and `secret`
    /// and persisted along with the principal's name. The secret itself is
    /// dropped after derivation. No request is made, so bad credentials are
    /// only discovered when the backend rejects a later request. To change
    /// the secret, log in again.
    ///
    /// # Errors
    ///
    /// Returns an error if the session could not be persisted, in which case
    /// the previous session is kept both in memory and in storage.
    pub fn log_in(&self, principal: &str, secret: &str) -> Result<Session, Error> {
        let token = CredentialToken::derive(principal, secret);
        let mut state = self.lock()?;

        state
            .storage
            .set_all(&[(AUTH_HEADER_KEY, token.as_str()), (USERNAME_KEY, principal)])?;

        state.session = Session::Authenticated {
            identity: principal.to_owned(),
            token,
        };
        state.generation += 1;
        tracing::info!("Logged in as {principal}.");

        Ok(state.session.clone())
    }

    /// Clear the session in memory and in storage.
    ///
    /// Logging out when nobody is logged in is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if storage could not be cleared. The in-memory session
    /// is cleared regardless.
    pub fn log_out(&self) -> Result<(), Error> {
        let mut state = self.lock()?;

        if let Some(identity) = state.session.identity() {
            tracing::info!("Logging out {identity}.");
        }

        state.clear()
    }

    /// A copy of the current session.
    pub fn session(&self) -> Result<Session, Error> {
        Ok(self.lock()?.session.clone())
    }

    /// The token to present on requests, if anyone is logged in.
    pub fn current_token(&self) -> Result<Option<CredentialToken>, Error> {
        Ok(self.lock()?.session.credential_token().cloned())
    }

    /// Snapshot the token and generation for a request about to be issued.
    pub fn ticket(&self) -> Result<SessionTicket, Error> {
        let state = self.lock()?;

        Ok(SessionTicket {
            token: state.session.credential_token().cloned(),
            generation: state.generation,
        })
    }

    /// Whether a request issued under `ticket` still belongs to the current session.
    pub fn is_current(&self, ticket: &SessionTicket) -> Result<bool, Error> {
        Ok(self.lock()?.generation == ticket.generation)
    }

    /// React to the backend rejecting a request issued under `ticket`.
    ///
    /// If the ticket is from the current generation, the session is cleared as
    /// in [SessionStore::log_out] and `true` is returned. A ticket from an
    /// older generation leaves the session untouched and returns `false`, so
    /// a late rejection can never log out a newer session.
    pub fn invalidate(&self, ticket: &SessionTicket) -> Result<bool, Error> {
        let mut state = self.lock()?;

        if state.generation != ticket.generation {
            return Ok(false);
        }

        if let Some(identity) = state.session.identity() {
            tracing::warn!("The server rejected the credentials for {identity}, logging out.");
        }

        state.clear()?;

        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, Error> {
        self.state.lock().map_err(|_| Error::SessionLockError)
    }
}
