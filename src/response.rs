//! Classification of completed HTTP exchanges
//!
//! Every API call ends in exactly one [`ApiOutcome`]. The [`ResponseInterpreter`]
//! turns the two failure variants into a notification and hands back only the
//! payload of a success.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::notify::{Notification, Notifier};

/// Shown for anything that is not a recognized domain error
pub const GENERIC_ERROR_MESSAGE: &str = "Neočekávaná chyba, kontaktujte administrátora";

/// A completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub status: u16,
    pub status_text: String,
    /// Parsed JSON body, `None` when empty or not JSON
    pub body: Option<Value>,
}

impl Exchange {
    pub fn new(status: u16, status_text: &str, body: Option<Value>) -> Self {
        Self {
            status,
            status_text: status_text.to_string(),
            body,
        }
    }

    /// 2xx
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Backend error payload carried by handled exceptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInformation {
    pub error_code: String,
    pub message: String,
    pub exception: String,
}

impl ErrorInformation {
    /// Look for the error payload directly on `value`, then one level down under `error`.
    pub fn find(value: &Value) -> Option<Self> {
        Self::direct(value).or_else(|| value.get("error").and_then(Self::direct))
    }

    fn direct(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Tagged result of a remote call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// 2xx and the payload does not report `success: false`
    Success(Value),

    /// The backend reported a handled failure
    DomainError {
        status: u16,
        status_text: String,
        error: Option<ErrorInformation>,
        message: Option<String>,
    },

    /// Network failure or an unrecognized response
    TransportError { status: u16, status_text: String },
}

impl ApiOutcome {
    pub fn from_exchange(exchange: Exchange) -> Self {
        let ok = exchange.is_ok();
        let Exchange {
            status,
            status_text,
            body,
        } = exchange;

        match body {
            Some(body) if ok => {
                if body.get("success").and_then(Value::as_bool) == Some(false) {
                    ApiOutcome::DomainError {
                        status,
                        status_text,
                        error: ErrorInformation::find(&body),
                        message: body
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    }
                } else {
                    ApiOutcome::Success(body)
                }
            }
            None if ok => ApiOutcome::Success(Value::Null),
            Some(body) => match ErrorInformation::find(&body) {
                Some(error) => ApiOutcome::DomainError {
                    status,
                    status_text,
                    message: Some(error.message.clone()),
                    error: Some(error),
                },
                None => ApiOutcome::TransportError {
                    status,
                    status_text,
                },
            },
            None => ApiOutcome::TransportError {
                status,
                status_text,
            },
        }
    }

    /// A failed request that never produced a response
    pub fn from_error(error: &Error) -> Self {
        ApiOutcome::TransportError {
            status: 0,
            status_text: error.to_string(),
        }
    }

    pub fn from_result(result: Result<Exchange, Error>) -> Self {
        match result {
            Ok(exchange) => Self::from_exchange(exchange),
            Err(error) => Self::from_error(&error),
        }
    }
}

/// Localized title and caption of a backend error code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorText {
    pub title: String,
    pub caption: String,
}

/// Immutable mapping from backend error codes to user-facing text
#[derive(Debug, Clone)]
pub struct ErrorCodes {
    codes: HashMap<String, ErrorText>,
}

impl Default for ErrorCodes {
    fn default() -> Self {
        Self::empty()
            .with(
                "PACKAGING_0001",
                "Chybné balení",
                "Položka nelze rozdělit do požadovaného balení beze zbytku!",
            )
            .with(
                "PACKAGING_0002",
                "Chybná skladová položka",
                "Požadavek na skladovou položku je neplatný.",
            )
            .with(
                "NOT_FOUND_0001",
                "Nenalezeno",
                "Požadovaný záznam neexistuje.",
            )
            .with("GEN_0000", "Neznámá chyba", "Server vrátil neznámou chybu.")
    }
}

impl ErrorCodes {
    /// A table without any entries
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn with(mut self, code: &str, title: &str, caption: &str) -> Self {
        self.codes.insert(
            code.to_string(),
            ErrorText {
                title: title.to_string(),
                caption: caption.to_string(),
            },
        );
        self
    }

    pub fn get(&self, code: &str) -> Option<&ErrorText> {
        self.codes.get(code)
    }
}

/// Turns outcomes into payloads or notifications
#[derive(Clone)]
pub struct ResponseInterpreter {
    notifier: Arc<dyn Notifier>,
    codes: Arc<ErrorCodes>,
}

impl ResponseInterpreter {
    pub fn new(notifier: Arc<dyn Notifier>, codes: ErrorCodes) -> Self {
        Self {
            notifier,
            codes: Arc::new(codes),
        }
    }

    /// Payload of a successful exchange. Failures notify and yield `None`.
    pub fn on_response(&self, exchange: Exchange) -> Option<Value> {
        self.on_outcome(ApiOutcome::from_exchange(exchange))
    }

    /// Like [`on_response`](Self::on_response) but also covers transport errors
    pub fn on_result(&self, result: Result<Exchange, Error>) -> Option<Value> {
        self.on_outcome(ApiOutcome::from_result(result))
    }

    pub fn on_outcome(&self, outcome: ApiOutcome) -> Option<Value> {
        match outcome {
            ApiOutcome::Success(payload) => Some(payload),
            ApiOutcome::DomainError {
                status,
                status_text,
                error,
                message,
            } => {
                let (title, caption) = match error {
                    Some(error) => match self.codes.get(&error.error_code) {
                        Some(text) => (text.title.clone(), text.caption.clone()),
                        None => (error.error_code, error.exception),
                    },
                    None => (
                        GENERIC_ERROR_MESSAGE.to_string(),
                        message.unwrap_or(status_text),
                    ),
                };
                log::warn!("request failed with {}: {} ({})", status, title, caption);
                self.notifier
                    .notify(Notification::negative(title, format!("{}: {}", status, caption)));
                None
            }
            ApiOutcome::TransportError {
                status,
                status_text,
            } => {
                log::warn!("unexpected response {}: {}", status, status_text);
                self.notifier.notify(Notification::negative(
                    GENERIC_ERROR_MESSAGE,
                    format!("{}: {}", status, status_text),
                ));
                None
            }
        }
    }

    /// Decode the `data` member of a successful envelope.
    ///
    /// A payload that does not decode is reported like an unrecognized response.
    pub fn data<T: DeserializeOwned>(&self, result: Result<Exchange, Error>) -> Option<T> {
        let payload = self.on_result(result)?;
        let data = payload.get("data").cloned().unwrap_or(Value::Null);
        match serde_json::from_value(data) {
            Ok(data) => Some(data),
            Err(err) => {
                self.on_outcome(ApiOutcome::TransportError {
                    status: 200,
                    status_text: err.to_string(),
                });
                None
            }
        }
    }
}
