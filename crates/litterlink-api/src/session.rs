// Session state shared by both vendor clients.
//
// The token is written only by the owning client's login / re-login path
// and read by every outgoing request.

use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;
use tracing::trace;
use url::Url;

/// Lifecycle of a vendor session.
///
/// `Unauthenticated -> Authenticating -> Authenticated`, then on a 401
/// `Reauthenticating -> Authenticated | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Reauthenticating,
    Failed,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Live authenticated context for one backend instance. Never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer / session token sent on every request.
    pub token: SecretString,
    /// Secondary token (Cognito access token), if the vendor issues one.
    pub secondary_token: Option<SecretString>,
    /// Base endpoint resolved during login (PetKit regional gateway).
    pub base_url: Option<Url>,
    /// Subject identifier derived from the token (Whisker `mid`).
    pub subject: Option<String>,
}

impl Session {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            secondary_token: None,
            base_url: None,
            subject: None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    state: SessionState,
    session: Option<Session>,
}

/// Interior-mutable holder for the current [`Session`].
#[derive(Debug)]
pub struct SessionCell {
    slot: RwLock<Slot>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot {
                state: SessionState::Unauthenticated,
                session: None,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.read(|slot| slot.state)
    }

    /// Clone of the current session, if one is established.
    pub fn current(&self) -> Option<Session> {
        self.read(|slot| slot.session.clone())
    }

    /// Mark the start of a login attempt.
    ///
    /// A login issued while a session exists (or right after one was
    /// invalidated) is a re-authentication.
    pub(crate) fn begin_login(&self) {
        self.write(|slot| {
            slot.state = match slot.state {
                SessionState::Authenticated | SessionState::Reauthenticating => {
                    SessionState::Reauthenticating
                }
                _ => SessionState::Authenticating,
            };
        });
    }

    pub(crate) fn establish(&self, session: Session) {
        self.write(|slot| {
            slot.state = SessionState::Authenticated;
            slot.session = Some(session);
        });
    }

    /// Drop the token after the server rejected it; the next login is a
    /// re-authentication.
    pub(crate) fn invalidate(&self) {
        self.write(|slot| {
            slot.session = None;
            slot.state = SessionState::Reauthenticating;
        });
    }

    /// Login failed: clear everything.
    pub(crate) fn fail(&self) {
        self.write(|slot| {
            slot.session = None;
            slot.state = SessionState::Failed;
        });
    }

    fn read<R>(&self, f: impl FnOnce(&Slot) -> R) -> R {
        let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut Slot)) {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        trace!(state = ?guard.state, "session state updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(SecretString::from("tok"))
    }

    #[test]
    fn fresh_cell_is_unauthenticated() {
        let cell = SessionCell::new();
        assert_eq!(cell.state(), SessionState::Unauthenticated);
        assert!(cell.current().is_none());
    }

    #[test]
    fn first_login_then_reauth() {
        let cell = SessionCell::new();
        cell.begin_login();
        assert_eq!(cell.state(), SessionState::Authenticating);
        cell.establish(session());
        assert!(cell.state().is_authenticated());

        cell.invalidate();
        assert!(cell.current().is_none());
        cell.begin_login();
        assert_eq!(cell.state(), SessionState::Reauthenticating);
        cell.establish(session());
        assert_eq!(cell.state(), SessionState::Authenticated);
    }

    #[test]
    fn failure_clears_session() {
        let cell = SessionCell::new();
        cell.establish(session());
        cell.fail();
        assert_eq!(cell.state(), SessionState::Failed);
        assert!(cell.current().is_none());
    }
}
