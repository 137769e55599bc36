//! Client-side session state shared by the API client and the console.

use super::persistence::{MemoryTokenStore, TokenStore};
use crate::domain::StoreError;
use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, Sender};

pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The server rejected the token; the UI should show `notice` and go to `redirect_to`.
    Expired { notice: String, redirect_to: String },
}

/// Owns the token slot for one client session.
///
/// Shared through `Rc`; all access happens on the UI thread.
#[derive(Debug)]
pub struct SessionContext {
    store: RefCell<Box<dyn TokenStore>>,
    login_path: String,
    subscribers: RefCell<Vec<Sender<SessionEvent>>>,
}

impl SessionContext {
    pub fn new(store: impl TokenStore + 'static, login_path: impl Into<String>) -> Self {
        Self {
            store: RefCell::new(Box::new(store)),
            login_path: login_path.into(),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new(), DEFAULT_LOGIN_PATH)
    }

    pub fn token(&self) -> Option<String> {
        self.store.borrow().load()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) -> Result<(), StoreError> {
        self.store.borrow_mut().save(token)?;
        tracing::info!("session token stored");
        self.publish(SessionEvent::SignedIn);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.borrow_mut().clear()?;
        tracing::info!("signed out");
        self.publish(SessionEvent::SignedOut);
        Ok(())
    }

    /// Drops the token after the server answered 401 and tells subscribers.
    pub fn invalidate(&self) {
        if let Err(e) = self.store.borrow_mut().clear() {
            tracing::error!(error = %e, "failed to clear session token");
        }
        tracing::warn!(redirect_to = %self.login_path, "session expired");
        self.publish(SessionEvent::Expired {
            notice: SESSION_EXPIRED_NOTICE.to_string(),
            redirect_to: self.login_path.clone(),
        });
    }

    /// Returns a receiver for every event published from now on.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.borrow_mut().push(tx);
        rx
    }

    fn publish(&self, event: SessionEvent) {
        // Receivers that were dropped are pruned here.
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionContext::in_memory();
        let events = session.subscribe();
        assert!(!session.is_signed_in());

        session.sign_in("abc").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));

        session.sign_out().unwrap();
        assert!(session.token().is_none());

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received, vec![SessionEvent::SignedIn, SessionEvent::SignedOut]);
    }

    #[test]
    fn test_invalidate_clears_token_and_publishes_once() {
        let session = SessionContext::new(MemoryTokenStore::with_token("stale"), "/auth/login");
        let events = session.subscribe();

        session.invalidate();

        assert!(session.token().is_none());
        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![SessionEvent::Expired {
                notice: SESSION_EXPIRED_NOTICE.to_string(),
                redirect_to: "/auth/login".to_string(),
            }]
        );
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let session = SessionContext::in_memory();
        let kept = session.subscribe();
        drop(session.subscribe());

        session.invalidate();

        assert_eq!(session.subscribers.borrow().len(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }
}
