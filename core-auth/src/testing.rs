//! Hand-written mocks shared by the unit tests in this crate.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::interact::UserInteraction;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// HTTP client returning canned JSON bodies matched by URL substring.
///
/// Requests with no matching canned response fail at the transport level,
/// which doubles as a network-failure simulation.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_to(&self, url_fragment: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push((url_fragment.to_string(), body.to_string()));
    }

    /// URLs of every request executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose URL contains `fragment`.
    pub fn call_count(&self, fragment: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.calls.lock().unwrap().push(request.url.clone());

        let responses = self.responses.lock().unwrap();
        for (fragment, body) in responses.iter() {
            if request.url.contains(fragment) {
                return Ok(HttpResponse {
                    status: 200,
                    headers: HashMap::new(),
                    body: body.clone().into(),
                });
            }
        }

        Err(BridgeError::OperationFailed(format!(
            "No canned response for {}",
            request.url
        )))
    }
}

/// User interaction fed from a queue of pre-recorded code entries.
///
/// `None` entries simulate a cancelled prompt; an exhausted queue also
/// cancels. Opened URLs are recorded for inspection.
#[derive(Default)]
pub struct MockInteraction {
    codes: Mutex<VecDeque<Option<String>>>,
    opened: Mutex<Vec<String>>,
}

impl MockInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes(codes: &[&str]) -> Self {
        let interaction = Self::default();
        for code in codes {
            interaction
                .codes
                .lock()
                .unwrap()
                .push_back(Some(code.to_string()));
        }
        interaction
    }

    pub fn push_cancelled(&self) {
        self.codes.lock().unwrap().push_back(None);
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserInteraction for MockInteraction {
    fn open_url(&self, url: &str) -> BridgeResult<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn prompt_code(&self, _message: &str) -> BridgeResult<Option<String>> {
        Ok(self.codes.lock().unwrap().pop_front().flatten())
    }
}
