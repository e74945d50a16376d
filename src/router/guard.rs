//! Navigation guard that requires a verified session for every view but login

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use super::{History, Location, NavigationIntent, Navigator, Route};
use crate::auth::{AuthData, SessionStore};
use crate::error::Error;
use crate::loading::GlobalLoading;

/// Outcome of a guarded navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Not settled yet
    Pending,
    Allowed,
    Redirected(Location),
}

/// One navigation attempt. Settles at most once.
#[derive(Debug)]
pub struct Navigation {
    intent: NavigationIntent,
    state: Mutex<GuardState>,
}

impl Navigation {
    pub fn new(intent: NavigationIntent) -> Self {
        Self {
            intent,
            state: Mutex::new(GuardState::Pending),
        }
    }

    pub fn intent(&self) -> &NavigationIntent {
        &self.intent
    }

    pub fn state(&self) -> GuardState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Continue to the requested target
    pub fn allow(&self) -> bool {
        self.settle(GuardState::Allowed)
    }

    /// Go somewhere else instead
    pub fn redirect(&self, location: Location) -> bool {
        self.settle(GuardState::Redirected(location))
    }

    fn settle(&self, outcome: GuardState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != GuardState::Pending {
            log::warn!(
                "navigation to {} already settled as {:?}, ignoring {:?}",
                self.intent.to.href(),
                *state,
                outcome
            );
            return false;
        }
        *state = outcome;
        true
    }
}

/// Confirms with the server that the current session is still valid
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// The user behind the session, `None` when there is none
    async fn resolve(&self) -> Result<Option<AuthData>, Error>;
}

/// Runs before every navigation
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
    resolver: Arc<dyn SessionResolver>,
    loading: GlobalLoading,
}

impl RouteGuard {
    pub fn new(
        session: Arc<SessionStore>,
        resolver: Arc<dyn SessionResolver>,
        loading: GlobalLoading,
    ) -> Self {
        Self {
            session,
            resolver,
            loading,
        }
    }

    /// Settle `navigation`.
    ///
    /// The loading flag is raised only while the session is being resolved and
    /// is cleared again however resolution ends.
    pub async fn before_each(&self, navigation: &Navigation) {
        if navigation.intent().is_exempt() {
            navigation.allow();
            return;
        }

        if self.session.login_verified() {
            navigation.allow();
            return;
        }

        let _loading = self.loading.hold();
        match self.resolver.resolve().await {
            Ok(Some(user)) => {
                log::debug!("session resolved for {}", user.username);
                navigation.allow();
            }
            Ok(None) => {
                log::info!("no session, redirecting to login");
                navigation.redirect(Location::login());
            }
            Err(err) => {
                log::warn!("session resolution failed: {}", err);
                navigation.redirect(Location::login());
            }
        }
    }
}

/// History behind the route guard
#[derive(Clone)]
pub struct Router {
    history: Arc<History>,
    guard: RouteGuard,
}

impl Router {
    pub fn new(history: Arc<History>, guard: RouteGuard) -> Self {
        Self { history, guard }
    }

    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    pub fn current(&self) -> Option<Location> {
        self.history.current()
    }

    /// Guarded push
    pub async fn push(&self, to: impl Into<Location>) -> GuardState {
        let (state, location) = self.guard_navigation(to.into()).await;
        if let Some(location) = location {
            self.history.push(location);
        }
        state
    }

    /// Guarded replace
    pub async fn replace(&self, to: impl Into<Location>) -> GuardState {
        let (state, location) = self.guard_navigation(to.into()).await;
        if let Some(location) = location {
            self.history.replace(location);
        }
        state
    }

    async fn guard_navigation(&self, to: Location) -> (GuardState, Option<Location>) {
        let navigation = Navigation::new(NavigationIntent::new(to, self.history.current()));
        self.guard.before_each(&navigation).await;

        let state = navigation.state();
        let location = match &state {
            GuardState::Allowed => Some(navigation.intent().to.clone()),
            GuardState::Redirected(location) => Some(location.clone()),
            GuardState::Pending => {
                log::warn!("navigation to {} never settled", navigation.intent().to.href());
                None
            }
        };
        (state, location)
    }
}

/// Shortcuts to the detail views
#[derive(Clone)]
pub struct AppRouter {
    router: Router,
}

impl AppRouter {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn go_to_customer(&self, code: &str) -> GuardState {
        self.router
            .push(Route::CustomerDetail {
                customer_code: code.to_string(),
            })
            .await
    }

    pub async fn go_to_warehouse_order_in(&self, code: &str) -> GuardState {
        self.router
            .push(Route::WarehouseInboundOrderDetail {
                code: code.to_string(),
            })
            .await
    }

    pub async fn go_to_order_in(&self, code: &str) -> GuardState {
        self.router
            .push(Route::IncomingOrderDetail {
                code: code.to_string(),
            })
            .await
    }

    pub async fn go_to_product(&self, code: &str) -> GuardState {
        self.router
            .push(Route::ProductDetail {
                product_code: code.to_string(),
            })
            .await
    }

    pub async fn go_to_credit_note(&self, code: &str) -> GuardState {
        self.router
            .push(Route::CreditNoteToSupplier {
                code: code.to_string(),
            })
            .await
    }
}
