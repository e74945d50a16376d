//! Datakura warehouse client
//!
//! Client-side core of the Datakura warehouse system: the session context,
//! the authentication gateway, classification of API responses, the
//! navigation guard and the helpers the views use to present stock and orders.

pub mod auth;
pub mod config;
pub mod csrf;
pub mod error;
pub mod fetch;
pub mod loading;
pub mod notify;
pub mod query;
pub mod response;
pub mod router;
pub mod storage;
pub mod util;
pub mod warehouse;

use reqwest::cookie::Jar;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{Auth, SessionStore};
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::loading::GlobalLoading;
use crate::notify::{LogNotifier, Notifier};
use crate::response::{ErrorCodes, ResponseInterpreter};
use crate::router::{AppRouter, History, RouteGuard, Router};
use crate::storage::{KeyValueStore, MemoryStore};

/// The main entry point: one per application instance
pub struct Datakura {
    /// Client options
    options: ClientOptions,
    /// HTTP client used for requests
    http_client: Client,
    /// The session context
    session: Arc<SessionStore>,
    /// Response classification and notifications
    interpreter: ResponseInterpreter,
    /// Authentication gateway
    auth: Arc<Auth>,
    /// Guarded navigation
    router: Router,
    /// Application-wide loading flag
    loading: GlobalLoading,
}

impl Datakura {
    /// Create a client for the server at `base_url` with in-memory storage
    ///
    /// # Example
    ///
    /// ```
    /// use datakura_client::Datakura;
    ///
    /// let datakura = Datakura::new("http://localhost:8000").unwrap();
    /// assert!(!datakura.session().login_verified());
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(ClientOptions::new(base_url)).build()
    }

    /// Start configuring a client
    pub fn builder(options: ClientOptions) -> DatakuraBuilder {
        DatakuraBuilder {
            options,
            storage: None,
            notifier: None,
            codes: ErrorCodes::default(),
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The authentication gateway
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The session context
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Guarded navigation
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Shortcuts to detail views
    pub fn app_router(&self) -> AppRouter {
        AppRouter::new(self.router.clone())
    }

    pub fn loading(&self) -> &GlobalLoading {
        &self.loading
    }

    pub fn interpreter(&self) -> &ResponseInterpreter {
        &self.interpreter
    }

    /// GET an API resource and decode the `data` member of its envelope.
    ///
    /// Failures raise a notification and yield `None`.
    pub async fn fetch_data<T: DeserializeOwned>(
        &self,
        path: &str,
        params: HashMap<String, String>,
    ) -> Option<T> {
        let url = self.options.endpoint(path);
        let mut request = Fetch::get(&self.http_client, &url).query(params);
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(&token);
        }
        self.interpreter.data(request.send().await)
    }
}

/// Builder for [`Datakura`]
pub struct DatakuraBuilder {
    options: ClientOptions,
    storage: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    codes: ErrorCodes,
}

impl DatakuraBuilder {
    /// Durable storage for the persisted session fields
    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Where notifications go
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replace the error code table
    pub fn with_error_codes(mut self, codes: ErrorCodes) -> Self {
        self.codes = codes;
        self
    }

    pub fn build(self) -> Result<Datakura> {
        let options = self.options;
        url::Url::parse(&options.base_url)?;

        let cookies = Arc::new(Jar::default());
        let mut http_client = Client::builder().cookie_provider(cookies.clone());
        if let Some(timeout) = options.request_timeout {
            http_client = http_client.timeout(timeout);
        }
        let http_client = http_client.build().map_err(Error::from)?;

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));

        let session = Arc::new(SessionStore::with_keys(
            storage,
            &options.user_storage_key,
            &options.refresh_token_storage_key,
        ));
        let interpreter = ResponseInterpreter::new(notifier, self.codes);
        let history = Arc::new(History::new());
        let loading = GlobalLoading::new();

        let auth = Arc::new(Auth::new(
            options.clone(),
            http_client.clone(),
            session.clone(),
            interpreter.clone(),
            history.clone(),
            cookies,
        ));
        let guard = RouteGuard::new(session.clone(), auth.clone(), loading.clone());
        let router = Router::new(history, guard);

        log::debug!("client ready for {}", options.base_url);
        Ok(Datakura {
            options,
            http_client,
            session,
            interpreter,
            auth,
            router,
            loading,
        })
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthData, SessionSnapshot};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::router::{GuardState, Location, Route};
    pub use crate::Datakura;
}
