use safari_core::confirmation::CONFIRMATION_PATH;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, warn};

use crate::cart::Cart;

// ============================================================================
// Session storage
// ============================================================================

/// Tab-scoped key/value storage that survives client-side navigation.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Browser location, as far as the checkout needs it.
pub trait Navigator: Send + Sync {
    /// Current pathname, without query string.
    fn current_path(&self) -> String;

    /// Client-side navigation replacing the current history entry. May
    /// silently fail to land.
    fn replace(&self, url: &str);

    /// Full page load.
    fn assign(&self, url: &str);
}

/// Records navigations. `replace` only lands when `client_routing` is on,
/// which lets tests reproduce a router that drops the navigation.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavigatorState>,
}

#[derive(Debug, Default)]
struct NavigatorState {
    path: String,
    client_routing: bool,
    replaced: Vec<String>,
    assigned: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(path: &str, client_routing: bool) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                path: path.to_string(),
                client_routing,
                ..Default::default()
            }),
        }
    }

    pub fn replaced(&self) -> Vec<String> {
        self.state.lock().map(|s| s.replaced.clone()).unwrap_or_default()
    }

    pub fn assigned(&self) -> Vec<String> {
        self.state.lock().map(|s| s.assigned.clone()).unwrap_or_default()
    }

    /// Moves the location without recording a navigation, e.g. a slow router
    /// finally rendering the page.
    pub fn land(&self, url: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.path = path_of(url).to_string();
        }
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.state.lock().map(|s| s.path.clone()).unwrap_or_default()
    }

    fn replace(&self, url: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.replaced.push(url.to_string());
            if state.client_routing {
                state.path = path_of(url).to_string();
            }
        }
    }

    fn assign(&self, url: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.assigned.push(url.to_string());
            state.path = path_of(url).to_string();
        }
    }
}

fn path_of(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

fn on_confirmation(path: &str) -> bool {
    path.trim_end_matches('/') == CONFIRMATION_PATH
}

// ============================================================================
// Redirect scheduling
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectTimings {
    /// Delay before the cart is cleared and the client-side navigation fires
    pub navigate_after: Duration,
    /// Measured from scheduling; forces a full load if still off the confirmation page
    pub fallback_after: Duration,
}

impl Default for RedirectTimings {
    fn default() -> Self {
        Self {
            navigate_after: Duration::from_secs(1),
            fallback_after: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Client-side navigation landed; fallback cancelled.
    Navigated,
    /// Confirmation page acknowledged the hand-off before the fallback fired.
    Acknowledged,
    /// Fallback fired a full page load.
    ForcedReload,
    /// The redirect task was aborted or panicked.
    Aborted,
}

#[derive(Debug)]
pub struct RedirectHandle {
    cancel_fallback: Option<oneshot::Sender<()>>,
    task: JoinHandle<RedirectOutcome>,
}

impl RedirectHandle {
    /// Called by the confirmation page once rendered; cancels the fallback.
    pub fn acknowledge(&mut self) {
        if let Some(tx) = self.cancel_fallback.take() {
            let _ = tx.send(());
        }
    }

    /// Stops both timers.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub async fn finished(self) -> RedirectOutcome {
        self.task.await.unwrap_or(RedirectOutcome::Aborted)
    }
}

/// After `navigate_after`: clear the cart and replace-navigate to `target`.
/// At `fallback_after`: if the location still isn't the confirmation route,
/// do a full load of `target`. The fallback is skipped when the first
/// navigation is seen to land or the handle is acknowledged.
pub fn schedule_redirect(
    cart: Arc<dyn Cart>,
    navigator: Arc<dyn Navigator>,
    target: String,
    timings: RedirectTimings,
) -> RedirectHandle {
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let fallback_deadline = Instant::now() + timings.fallback_after;

    let task = tokio::spawn(async move {
        sleep(timings.navigate_after).await;
        cart.clear();
        navigator.replace(&target);

        if on_confirmation(&navigator.current_path()) {
            debug!("Confirmation route reached via client navigation");
            return RedirectOutcome::Navigated;
        }

        tokio::select! {
            Ok(()) = &mut cancel_rx => RedirectOutcome::Acknowledged,
            _ = sleep_until(fallback_deadline) => {
                if on_confirmation(&navigator.current_path()) {
                    RedirectOutcome::Navigated
                } else {
                    warn!("Client navigation did not land, forcing full load of {}", target);
                    navigator.assign(&target);
                    RedirectOutcome::ForcedReload
                }
            }
        }
    });

    RedirectHandle {
        cancel_fallback: Some(cancel_tx),
        task,
    }
}
