//! Routes of the application, navigation history and the authentication guard

mod guard;

use std::sync::{Mutex, PoisonError};

use crate::query::Query;

pub use guard::*;

/// Views of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Warehouse,
    WarehouseInboundOrderDetail { code: String },
    Products,
    ProductDetail { product_code: String },
    Customers,
    CustomerDetail { customer_code: String },
    IncomingOrders,
    IncomingOrderDetail { code: String },
    CreditNoteToSupplier { code: String },
}

impl Route {
    /// Stable route name
    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Home => "home",
            Route::Warehouse => "warehouse",
            Route::WarehouseInboundOrderDetail { .. } => "warehouseInboundOrderDetail",
            Route::Products => "products",
            Route::ProductDetail { .. } => "productDetail",
            Route::Customers => "customers",
            Route::CustomerDetail { .. } => "customerDetail",
            Route::IncomingOrders => "incomingOrders",
            Route::IncomingOrderDetail { .. } => "incomingOrderDetail",
            Route::CreditNoteToSupplier { .. } => "creditNoteToSupplier",
        }
    }

    /// Path with parameters filled in
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/".to_string(),
            Route::Warehouse => "/warehouse".to_string(),
            Route::WarehouseInboundOrderDetail { code } => {
                format!("/warehouse/inbound-orders/{}", urlencoding::encode(code))
            }
            Route::Products => "/products".to_string(),
            Route::ProductDetail { product_code } => {
                format!("/products/{}", urlencoding::encode(product_code))
            }
            Route::Customers => "/customers".to_string(),
            Route::CustomerDetail { customer_code } => {
                format!("/customers/{}", urlencoding::encode(customer_code))
            }
            Route::IncomingOrders => "/incoming-orders".to_string(),
            Route::IncomingOrderDetail { code } => {
                format!("/incoming-orders/{}", urlencoding::encode(code))
            }
            Route::CreditNoteToSupplier { code } => {
                format!("/credit-notes/{}", urlencoding::encode(code))
            }
        }
    }

    /// Routes reachable without a verified session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }
}

/// A navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub query: Query,
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            query: Query::new(),
        }
    }

    pub fn login() -> Self {
        Self::new(Route::Login)
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Path and query string
    pub fn href(&self) -> String {
        let path = self.route.path();
        if self.query.is_empty() {
            return path;
        }

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            serializer.append_pair(key, &value.as_joined());
        }
        format!("{}?{}", path, serializer.finish())
    }
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        Location::new(route)
    }
}

/// Where a view wants to go, and where it comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub to: Location,
    pub from: Option<Location>,
}

impl NavigationIntent {
    pub fn new(to: Location, from: Option<Location>) -> Self {
        Self { to, from }
    }

    /// Whether the target skips the session check
    pub fn is_exempt(&self) -> bool {
        self.to.route.is_public()
    }
}

/// Something that can move the visible view
pub trait Navigator: Send + Sync {
    fn push(&self, location: Location);
    fn replace(&self, location: Location);
    fn current(&self) -> Option<Location>;
}

/// In-memory navigation history
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<Location>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every committed location, oldest first
    pub fn entries(&self) -> Vec<Location> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for History {
    fn push(&self, location: Location) {
        log::debug!("navigate to {}", location.href());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(location);
    }

    fn replace(&self, location: Location) {
        log::debug!("replace with {}", location.href());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.pop();
        entries.push(location);
    }

    fn current(&self) -> Option<Location> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}
