//! Navigation between storefront views.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{Mutex, PoisonError},
};

use mockall::automock;
use tracing::debug;

/// A storefront view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page.
    Home,

    /// Product listing.
    Shop,

    /// Cart contents.
    Cart,

    /// Delivery details and payment.
    Checkout,

    /// Post-order confirmation.
    ThankYou,
}

impl Route {
    /// URL path of the view.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Shop => "/shop",
            Self::Cart => "/cart",
            Self::Checkout => "/checkout",
            Self::ThankYou => "/thank-you",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.path())
    }
}

/// Moves the shopper to another view.
#[automock]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: Route);
}

/// Navigator for headless sessions: remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    /// Create a navigator with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent route, if any navigation happened.
    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// Every route navigated to, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "navigating");

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
