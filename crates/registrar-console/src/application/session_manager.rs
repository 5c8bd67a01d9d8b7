//! EPP session state and the single in-flight login handshake.
//!
//! # Authentication states (for beginners)
//!
//! ```text
//! ANONYMOUS ──► TRANSPORT_AUTH ──► PROTOCOL_AUTH
//!                     ▲                  │
//!                     └──── reset ───────┘  (server says the session ended)
//! ```
//!
//! - **Transport auth** means the web front end has already identified the
//!   registrar: the console has a client id and an anti-forgery token.
//! - **Protocol auth** means an EPP `<login>` has succeeded on top of that.
//!
//! An anonymous session has no client id to log in with, so
//! [`SessionManager::ensure_logged_in`] refuses it without sending anything.
//!
//! # Login coalescing
//!
//! Several navigations can ask for a login at the same moment (e.g. the
//! first page load racing a quick second click).  Only one `<login>` may go
//! out.  The first caller creates the login future and stores a *shared*
//! handle to it; every later caller clones that handle and awaits the same
//! outcome.  The future clears the handle and records the new state itself
//! when it finishes, so whoever polls it first completes the handshake for
//! everyone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use registrar_core::protocol::{Command, ResultCode};
use tracing::{info, warn};

use crate::application::epp_client::EppClient;
use crate::domain::error::ConsoleError;

/// How far the session has authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuthState {
    Anonymous,
    TransportAuth,
    ProtocolAuth,
}

type LoginFuture = Shared<BoxFuture<'static, Result<(), ConsoleError>>>;

struct SessionState {
    auth: AuthState,
    pending_login: Option<LoginFuture>,
}

/// Owns the session's authentication state.
pub struct SessionManager {
    client: Arc<EppClient>,
    password: Option<String>,
    state: Arc<Mutex<SessionState>>,
}

impl SessionManager {
    pub fn new(client: Arc<EppClient>, password: Option<String>, initial: AuthState) -> Self {
        Self {
            client,
            password,
            state: Arc::new(Mutex::new(SessionState {
                auth: initial,
                pending_login: None,
            })),
        }
    }

    pub fn auth_state(&self) -> AuthState {
        lock(&self.state).auth
    }

    pub fn client_id(&self) -> &str {
        self.client.client_id()
    }

    /// Makes sure an EPP login has succeeded.
    ///
    /// Returns at once when already logged in.  Otherwise sends one
    /// `<login>`, or joins the one already in flight.  Result codes 1000 and
    /// 2002 ("already logged in") both count as success.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::NoWebSession`] when the session is anonymous,
    /// [`ConsoleError::AuthenticationFailed`] for any other result code, or
    /// the transport/markup error of the login round trip.  The state is
    /// left as it was.
    pub async fn ensure_logged_in(&self) -> Result<(), ConsoleError> {
        let login = {
            let mut state = lock(&self.state);
            match state.auth {
                AuthState::ProtocolAuth => return Ok(()),
                AuthState::Anonymous => {
                    warn!("login refused: no registrar web session");
                    return Err(ConsoleError::NoWebSession);
                }
                AuthState::TransportAuth => {}
            }
            match &state.pending_login {
                Some(pending) => pending.clone(),
                None => {
                    let login = self.login_future();
                    state.pending_login = Some(login.clone());
                    login
                }
            }
        };
        login.await
    }

    /// Drops back to transport auth after the server ended the EPP session.
    pub fn reset_protocol_auth(&self) {
        let mut state = lock(&self.state);
        if state.auth == AuthState::ProtocolAuth {
            warn!(client_id = self.client.client_id(), "EPP session ended by server");
            state.auth = AuthState::TransportAuth;
        }
    }

    fn login_future(&self) -> LoginFuture {
        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let password = self.password.clone();
        async move {
            info!(client_id = client.client_id(), "logging in");
            let command = Command::login(client.client_id(), password.as_deref(), client.next_cl_trid());
            let outcome = match client.execute(&command).await {
                Ok(response)
                    if response.code == ResultCode::SUCCESS
                        || response.code == ResultCode::COMMAND_USE_ERROR =>
                {
                    Ok(())
                }
                Ok(response) => Err(ConsoleError::AuthenticationFailed {
                    code: response.code.0,
                    message: response.message,
                }),
                Err(err) => Err(err),
            };

            let mut guard = lock(&state);
            guard.pending_login = None;
            match &outcome {
                Ok(()) => {
                    guard.auth = AuthState::ProtocolAuth;
                    info!(client_id = client.client_id(), "logged in");
                }
                Err(err) => warn!(client_id = client.client_id(), error = %err, "login failed"),
            }
            outcome
        }
        .boxed()
        .shared()
    }
}

/// Locks the session state, ignoring poisoning: the state is two plain
/// fields that are always left consistent.
fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
