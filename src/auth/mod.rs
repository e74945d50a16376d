//! Authentication gateway: sign-in, session resolution, site switching and sign-out
//!
//! The gateway is the only writer of the [`SessionStore`]. None of its
//! operations return errors: failures end as `false`/`None` plus a
//! notification raised by the [`ResponseInterpreter`].

mod session;
mod types;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ClientOptions;
use crate::csrf;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::response::{ApiOutcome, Exchange, ResponseInterpreter};
use crate::router::{Location, Navigator, SessionResolver};

pub use session::*;
pub use types::*;

/// Sent when a header value is unknown
const NOT_SET: &str = "not-set";

/// Client for the authentication endpoints
pub struct Auth {
    /// Client options
    options: ClientOptions,

    /// HTTP client used for requests
    client: Client,

    /// The session context
    session: Arc<SessionStore>,

    /// Classifies responses and raises notifications
    interpreter: ResponseInterpreter,

    /// Target of the post-logout redirect
    navigator: Arc<dyn Navigator>,

    /// Cookies shared with `client`
    cookies: Arc<Jar>,

    /// Anti-forgery token used when the cookie jar has none
    csrf_token: RwLock<Option<String>>,

    /// Ticket of the latest sign-in
    latest_sign_in: AtomicU64,

    /// Ticket of the latest session resolution. Sign-in bumps it too.
    latest_resolution: AtomicU64,
}

impl Auth {
    /// Create a new Auth gateway
    pub fn new(
        options: ClientOptions,
        client: Client,
        session: Arc<SessionStore>,
        interpreter: ResponseInterpreter,
        navigator: Arc<dyn Navigator>,
        cookies: Arc<Jar>,
    ) -> Self {
        Self {
            options,
            client,
            session,
            interpreter,
            navigator,
            cookies,
            csrf_token: RwLock::new(None),
            latest_sign_in: AtomicU64::new(0),
            latest_resolution: AtomicU64::new(0),
        }
    }

    /// The session this gateway writes to
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Set the anti-forgery token used when the server has not set its cookie
    pub fn set_csrf_token(&self, token: Option<String>) {
        *self
            .csrf_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// The anti-forgery token for requests to the server root
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token_for(&self.options.base_url)
    }

    /// The token from the cookie the server set for `url`, else the one set by hand
    fn csrf_token_for(&self, url: &str) -> Option<String> {
        let cookie_name = self.options.csrf_cookie.as_str();
        let from_cookie = Url::parse(url)
            .ok()
            .and_then(|url| self.cookies.cookies(&url))
            .and_then(|header| {
                let header = header.to_str().ok()?;
                csrf::token_from_cookie(header, Some(cookie_name))
            });

        from_cookie.or_else(|| {
            self.csrf_token
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    /// Sign in with username and password.
    ///
    /// The session is reset before the attempt. A 401 is a plain rejection and
    /// raises no notification. When sign-ins overlap only the latest one counts.
    pub async fn sign_in(&self, username: &str, password: &str) -> bool {
        let ticket = next_ticket(&self.latest_sign_in);
        next_ticket(&self.latest_resolution);
        self.session.reset();
        log::info!("signing in as {}", username);

        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let url = self.options.endpoint("auth/login");
        let result = match self.post(&url).json(&form) {
            Ok(request) => request.send().await,
            Err(err) => Err(err),
        };

        if is_stale(&self.latest_sign_in, ticket) {
            log::debug!("discarding stale sign-in response for {}", username);
            return false;
        }
        // Resolutions still in flight predate this sign-in.
        next_ticket(&self.latest_resolution);

        let exchange = match result {
            Ok(exchange) => exchange,
            Err(err) => {
                self.interpreter.on_result(Err(err));
                return false;
            }
        };

        if exchange.status == 401 {
            log::info!("credentials rejected for {}", username);
            self.session.reset();
            return false;
        }

        let status = exchange.status;
        match ApiOutcome::from_exchange(exchange) {
            ApiOutcome::Success(payload) => {
                match serde_json::from_value::<Envelope<AuthData>>(payload) {
                    Ok(Envelope {
                        data: Some(user),
                        access_token,
                        refresh_token,
                        ..
                    }) if !user.username.is_empty() => {
                        log::info!("signed in as {}", user.username);
                        self.session.establish(user, access_token, refresh_token)
                    }
                    _ => {
                        self.interpreter.on_outcome(ApiOutcome::TransportError {
                            status,
                            status_text: "sign-in response without user".to_string(),
                        });
                        false
                    }
                }
            }
            outcome => {
                self.interpreter.on_outcome(outcome);
                false
            }
        }
    }

    /// Confirm the current session with the server.
    ///
    /// Any failure resets the session. An answer overtaken by a newer resolution
    /// or a sign-in is returned to the caller but leaves the session alone.
    pub async fn who_am_i(&self) -> Option<AuthData> {
        let ticket = next_ticket(&self.latest_resolution);
        let url = self.options.endpoint("auth/whoami");
        let result = self.get(&url).send().await;

        let user = self
            .interpreter
            .data::<AuthData>(result)
            .filter(|user| !user.username.is_empty());

        if is_stale(&self.latest_resolution, ticket) {
            log::debug!("session resolution overtaken, not updating the session");
            return user;
        }

        match user {
            Some(user) => {
                log::debug!("session belongs to {}", user.username);
                self.session.establish(user.clone(), None, None);
                Some(user)
            }
            None => {
                self.session.reset();
                None
            }
        }
    }

    /// Change the active site. `None` clears it.
    ///
    /// On success the cached user is replaced by the server's copy.
    pub async fn switch_site(&self, site_code: Option<&str>) -> Option<AuthData> {
        log::info!("switching site to {}", site_code.unwrap_or("-"));
        let body = SwitchSiteBody {
            site_code: site_code.map(str::to_string),
        };
        let url = self.options.endpoint("auth/switch-site");
        let result = match self.post(&url).json(&body) {
            Ok(request) => request.send().await,
            Err(err) => Err(err),
        };

        match self.interpreter.data::<AuthData>(result) {
            Some(user) if !user.username.is_empty() => {
                self.session.replace_user(user.clone());
                Some(user)
            }
            Some(_) => {
                log::warn!("switch-site response without user, keeping current session");
                None
            }
            None => None,
        }
    }

    /// Sign out.
    ///
    /// The logout call is best effort. The local session is reset and the view
    /// sent to login however that call ends, including when this future is
    /// dropped before completion.
    pub async fn sign_out(&self) {
        let _cleanup = SignOutCleanup {
            session: &self.session,
            navigator: self.navigator.as_ref(),
        };

        let token = self.session.access_token();
        let url = self.options.endpoint("auth/logout");
        let csrf = self.csrf_token_for(&url);

        let result: Result<Exchange, Error> = Fetch::post(&self.client, &url)
            .bearer_auth(token.as_deref().unwrap_or(NOT_SET))
            .header(&self.options.csrf_header, csrf.as_deref().unwrap_or(NOT_SET))
            .timeout(self.options.logout_timeout)
            .send()
            .await;

        match result {
            Ok(exchange) => log::info!("logged out ({})", exchange.status),
            Err(err) => log::warn!("logout request failed: {}", err),
        }
    }

    fn get<'a>(&'a self, url: &str) -> FetchBuilder<'a> {
        self.authorize(Fetch::get(&self.client, url))
    }

    fn post<'a>(&'a self, url: &str) -> FetchBuilder<'a> {
        let request = self.authorize(Fetch::post(&self.client, url));
        match self.csrf_token_for(url) {
            Some(csrf) => request.header(&self.options.csrf_header, &csrf),
            None => request,
        }
    }

    fn authorize<'a>(&self, request: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.session.access_token() {
            Some(token) => request.bearer_auth(&token),
            None => request,
        }
    }
}

fn next_ticket(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

fn is_stale(counter: &AtomicU64, ticket: u64) -> bool {
    counter.load(Ordering::SeqCst) != ticket
}

#[async_trait]
impl SessionResolver for Auth {
    async fn resolve(&self) -> Result<Option<AuthData>, Error> {
        Ok(self.who_am_i().await)
    }
}

/// Resets the session and redirects to login when dropped
struct SignOutCleanup<'a> {
    session: &'a SessionStore,
    navigator: &'a dyn Navigator,
}

impl Drop for SignOutCleanup<'_> {
    fn drop(&mut self) {
        self.session.reset();
        self.navigator.push(Location::login());
    }
}
