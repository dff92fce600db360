//! Headless navigator that records every action it is asked to perform.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{NavigationAction, NavigationError, Navigator, RouteEntry};
use crate::link::Params;

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    ready: AtomicBool,
    reject_screens: Mutex<Vec<String>>,
    actions: Mutex<Vec<NavigationAction>>,
}

impl RecordingNavigator {
    /// A navigator that reports ready immediately.
    pub fn ready() -> Self {
        let navigator = Self::default();
        navigator.set_ready(true);
        navigator
    }

    /// A navigator that is not mounted yet.
    pub fn not_ready() -> Self {
        Self::default()
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Make `navigate` fail for the given screen.
    pub fn reject_screen(&self, screen: impl Into<String>) {
        if let Ok(mut screens) = self.reject_screens.lock() {
            screens.push(screen.into());
        }
    }

    /// Snapshot of the recorded actions.
    pub fn actions(&self) -> Vec<NavigationAction> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Drain the recorded actions.
    pub fn take_actions(&self) -> Vec<NavigationAction> {
        self.actions
            .lock()
            .map(|mut a| std::mem::take(&mut *a))
            .unwrap_or_default()
    }

    fn push(&self, action: NavigationAction) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn navigate(&self, screen: &str, params: &Params) -> Result<(), NavigationError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(NavigationError::NotReady);
        }
        let rejected = self
            .reject_screens
            .lock()
            .map(|s| s.iter().any(|r| r == screen))
            .unwrap_or(false);
        if rejected {
            return Err(NavigationError::Rejected(screen.to_string()));
        }

        self.push(NavigationAction::Navigate {
            screen: screen.to_string(),
            params: params.clone(),
        });
        Ok(())
    }

    fn reset_to(&self, routes: &[RouteEntry]) -> Result<(), NavigationError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(NavigationError::NotReady);
        }
        self.push(NavigationAction::Reset {
            routes: routes.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let nav = RecordingNavigator::ready();
        assert!(nav.is_ready().await);

        nav.navigate("Login", &Params::new()).unwrap();
        nav.reset_to(&[RouteEntry::new("Home", Params::new())]).unwrap();

        let actions = nav.take_actions();
        assert_eq!(actions.len(), 2);
        assert!(matches!(&actions[0], NavigationAction::Navigate { screen, .. } if screen == "Login"));
        assert!(matches!(&actions[1], NavigationAction::Reset { routes } if routes[0].name == "Home"));
        assert!(nav.actions().is_empty());
    }

    #[tokio::test]
    async fn test_not_ready_and_rejection() {
        let nav = RecordingNavigator::not_ready();
        assert!(!nav.is_ready().await);
        assert_eq!(nav.navigate("Home", &Params::new()), Err(NavigationError::NotReady));

        nav.set_ready(true);
        nav.reject_screen("Broken");
        assert!(matches!(
            nav.navigate("Broken", &Params::new()),
            Err(NavigationError::Rejected(_))
        ));
        assert!(nav.actions().is_empty());
    }

    #[test]
    fn test_action_serializes_with_tag() {
        let action = NavigationAction::Navigate {
            screen: "Help".to_string(),
            params: Params::new(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "navigate");
        assert_eq!(json["screen"], "Help");
    }
}
