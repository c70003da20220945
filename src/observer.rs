//! Passive capture of credentials and the week list from the host page's own
//! traffic.
//!
//! The [`Observer`] never issues requests. Whatever can see outgoing requests
//! (a browser hook, a HAR replay) drives it through the [`NetworkTap`] trait.
//! Its state lives as long as the `Observer` does; a page reload is modelled
//! by dropping it and building a new one.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::{debug, info, warn};
use serde::Deserialize;

/// Header carrying the API key issued to the host page.
pub const API_KEY_HEADER: &str = "apikey";
/// Header carrying the bearer token issued to the host page.
pub const AUTH_TOKEN_HEADER: &str = "authorization";

const WEEK_LIST_ENDPOINT: &str = "/WeekSchedule";

/// One academic week, as listed by the week-list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WeekDescriptor {
    #[serde(rename = "HocKy")]
    pub term_id: i64,
    #[serde(rename = "NamHoc")]
    pub year_of_study: i64,
    #[serde(rename = "Tuan")]
    pub week_number: i64,
}

impl WeekDescriptor {
    pub fn term(&self) -> (i64, i64) {
        (self.term_id, self.year_of_study)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub auth_token: String,
}

/// An outgoing request as seen by the tap, between `open` and `dispatch`.
#[derive(Debug, Default)]
pub struct PendingRequest {
    url: Option<String>,
}

impl PendingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// The narrow capability a request-interception mechanism needs to offer.
///
/// Implementations must only read; the host's own request handling is never
/// affected by what a tap does.
pub trait NetworkTap {
    fn on_open(&self, request: &mut PendingRequest, url: &str);
    fn on_header_set(&self, request: &mut PendingRequest, name: &str, value: &str);
    /// Returns a handle when the request's response is of interest.
    fn on_dispatch(&self, request: &PendingRequest) -> Option<CompletionHandle>;
}

#[derive(Debug, Clone)]
struct WeekCapture {
    weeks: Arc<Vec<WeekDescriptor>>,
    api_base: String,
}

#[derive(Debug, Default)]
struct ObserverState {
    api_key: OnceLock<String>,
    auth_token: OnceLock<String>,
    // Swapped whole on every capture so readers never see a partial list.
    week_capture: RwLock<Option<WeekCapture>>,
}

/// Page-lifetime store for what the tap has captured so far.
#[derive(Debug, Clone, Default)]
pub struct Observer {
    state: Arc<ObserverState>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both secrets, or `None` while either is still missing.
    pub fn credentials(&self) -> Option<Credentials> {
        let api_key = self.state.api_key.get()?;
        let auth_token = self.state.auth_token.get()?;
        Some(Credentials {
            api_key: api_key.clone(),
            auth_token: auth_token.clone(),
        })
    }

    pub fn week_list(&self) -> Option<Arc<Vec<WeekDescriptor>>> {
        self.read_capture().map(|capture| capture.weeks)
    }

    /// Base URL of the API, taken from the last captured week-list request.
    pub fn api_base(&self) -> Option<String> {
        self.read_capture().map(|capture| capture.api_base)
    }

    fn read_capture(&self) -> Option<WeekCapture> {
        self.state
            .week_capture
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_week_list(&self, weeks: Vec<WeekDescriptor>, api_base: String) {
        let capture = WeekCapture {
            weeks: Arc::new(weeks),
            api_base,
        };
        *self
            .state
            .week_capture
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(capture);
    }

    fn capture_secret(&self, name: &str, value: &str) {
        let slot = match name.to_lowercase().as_str() {
            API_KEY_HEADER => &self.state.api_key,
            AUTH_TOKEN_HEADER => &self.state.auth_token,
            _ => return,
        };
        // First value wins; later rotations are ignored.
        if slot.set(value.to_string()).is_ok() {
            info!("Captured {} header", name.to_lowercase());
        }
    }
}

impl NetworkTap for Observer {
    fn on_open(&self, request: &mut PendingRequest, url: &str) {
        request.url = Some(url.to_string());
    }

    fn on_header_set(&self, _request: &mut PendingRequest, name: &str, value: &str) {
        self.capture_secret(name, value);
    }

    fn on_dispatch(&self, request: &PendingRequest) -> Option<CompletionHandle> {
        let url = request.url()?;
        let api_base = week_list_api_base(url)?;
        debug!("Watching week list response from {}", url);
        Some(CompletionHandle {
            observer: self.clone(),
            api_base: api_base.to_string(),
        })
    }
}

/// Pending observation of one week-list response.
#[derive(Debug)]
pub struct CompletionHandle {
    observer: Observer,
    api_base: String,
}

impl CompletionHandle {
    pub fn on_complete(self, status: u16, body: &str) {
        if !(200..300).contains(&status) {
            debug!("Ignoring week list response with status {}", status);
            return;
        }
        match serde_json::from_str::<Vec<WeekDescriptor>>(body) {
            Ok(weeks) => {
                info!("Captured week list with {} weeks", weeks.len());
                self.observer.store_week_list(weeks, self.api_base);
            }
            Err(e) => warn!("Could not parse week list response: {e}"),
        }
    }
}

/// Returns the API base when `url` targets the week-list endpoint.
fn week_list_api_base(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.strip_suffix(WEEK_LIST_ENDPOINT)
}
