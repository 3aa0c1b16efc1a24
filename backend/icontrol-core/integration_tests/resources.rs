use crate::helpers::{TEST_TRANSACTION_ID, coordination_id, mount_begin, recorded, request_line, session_for};

use serde_json::json;
use wiremock::matchers::{any, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn ok_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    server
}

/// **VALUE**: Verifies the resource wrappers hit the documented paths and verbs.
///
/// **BUG THIS CATCHES**: Would catch a typo in a URI template or a wrong verb.
#[tokio::test]
async fn given_resource_calls_when_dispatched_then_paths_and_verbs_match() {
    // GIVEN: A server that accepts everything
    let server = ok_server().await;
    let session = session_for(&server);

    // WHEN: Calling a spread of wrappers
    session.list_pools(true).await.unwrap();
    session.get_pool("~Common~p1").await.unwrap();
    session.update_pool("p1", json!({"monitor": "http"})).await.unwrap();
    session.list_pool_members("p1").await.unwrap();
    session.add_pool_member("p1", json!({"name": "10.0.0.5:80"})).await.unwrap();
    session.list_virtuals(false).await.unwrap();
    session.create_virtual(json!({"name": "v1"})).await.unwrap();
    session.update_virtual("v1", json!({"pool": "p1"})).await.unwrap();
    session.list_virtual_addresses().await.unwrap();
    session.list_monitors("http").await.unwrap();
    session.create_monitor("http", json!({"name": "m1"})).await.unwrap();
    session.get_monitor("http", "m1").await.unwrap();
    session.update_monitor("http", "m1", json!({"interval": 10})).await.unwrap();
    session.list_policies(true).await.unwrap();
    session.create_policy(json!({"name": "pol"})).await.unwrap();
    session.list_policy_rules("pol").await.unwrap();
    session.list_wideips("a").await.unwrap();
    session.create_wideip("a", json!({"name": "www.example.com"})).await.unwrap();
    session.list_gtm_pools("a").await.unwrap();
    session.create_gtm_pool("a", json!({"name": "gp1"})).await.unwrap();

    // THEN: Each went where it should
    let lines: Vec<String> = recorded(&server).await.iter().map(request_line).collect();
    assert_eq!(
        lines,
        vec![
            "GET /mgmt/tm/ltm/pool?expandSubcollections=true",
            "GET /mgmt/tm/ltm/pool/~Common~p1",
            "PATCH /mgmt/tm/ltm/pool/p1",
            "GET /mgmt/tm/ltm/pool/p1/members",
            "POST /mgmt/tm/ltm/pool/p1/members",
            "GET /mgmt/tm/ltm/virtual?expandSubcollections=false",
            "POST /mgmt/tm/ltm/virtual",
            "PATCH /mgmt/tm/ltm/virtual/v1",
            "GET /mgmt/tm/ltm/virtual-address",
            "GET /mgmt/tm/ltm/monitor/http",
            "POST /mgmt/tm/ltm/monitor/http",
            "GET /mgmt/tm/ltm/monitor/http/m1",
            "PATCH /mgmt/tm/ltm/monitor/http/m1",
            "GET /mgmt/tm/ltm/policy?expandSubcollections=true",
            "POST /mgmt/tm/ltm/policy",
            "GET /mgmt/tm/ltm/policy/pol/rules",
            "GET /mgmt/tm/gtm/wideip/a",
            "POST /mgmt/tm/gtm/wideip/a",
            "GET /mgmt/tm/gtm/pool/a",
            "POST /mgmt/tm/gtm/pool/a",
        ]
    );
}

/// **VALUE**: Verifies wrappers are scoped into an active transaction like any dispatch.
#[tokio::test]
async fn given_active_transaction_when_calling_wrapper_then_header_present() {
    let server = MockServer::start().await;
    mount_begin(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let mut session = session_for(&server);
    session.begin_transaction().await.unwrap();

    session.create_wideip("a", json!({"name": "www.example.com"})).await.unwrap();

    let requests = recorded(&server).await;
    let last = requests.last().unwrap();
    assert_eq!(request_line(last), "POST /mgmt/tm/gtm/wideip/a");
    assert_eq!(coordination_id(last), Some(TEST_TRANSACTION_ID.to_string()));
}
