//! Test helpers for integration tests against a mocked control plane.

use icontrol_core::Session;
use icontrol_core::dispatch::COORDINATION_HEADER;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "s3cret";
pub const TEST_TRANSACTION_ID: u64 = 1389812351;
pub const TRANSACTION_ENDPOINT: &str = "/mgmt/tm/transaction";

/// Session pointed at the mock server.
pub fn session_for(server: &MockServer) -> Session {
    Session::builder()
        .with_endpoint(server.uri())
        .with_credentials(TEST_USERNAME, TEST_PASSWORD)
        .build()
        .expect("Failed to build session for mock server")
}

/// Mount the transaction-creation endpoint, answering with `TEST_TRANSACTION_ID`.
pub async fn mount_begin(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TRANSACTION_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transId": TEST_TRANSACTION_ID,
            "state": "STARTED",
            "timeoutSeconds": 120,
            "kind": "tm:transactionstate"
        })))
        .mount(server)
        .await;
}

/// Value of the coordination header on a recorded request, if any.
pub fn coordination_id(request: &Request) -> Option<String> {
    request
        .headers
        .get(COORDINATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Every request the server saw, in arrival order.
pub async fn recorded(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled by default")
}

/// `METHOD /path?query`.
pub fn request_line(request: &Request) -> String {
    match request.url.query() {
        Some(query) => format!("{} {}?{query}", request.method, request.url.path()),
        None => format!("{} {}", request.method, request.url.path()),
    }
}
