use crate::TM_BASE_PATH;
use crate::dispatch::RequestDescriptor;
use crate::error::IControlError;
use crate::resources::collection_path;
use crate::response::ResponseEnvelope;
use crate::session::Session;

use const_format::concatcp;
use serde_json::Value;

pub const LTM_PATH: &str = concatcp!(TM_BASE_PATH, "/ltm");
pub const POOL_PATH: &str = concatcp!(LTM_PATH, "/pool");
pub const VIRTUAL_PATH: &str = concatcp!(LTM_PATH, "/virtual");
pub const VIRTUAL_ADDRESS_PATH: &str = concatcp!(LTM_PATH, "/virtual-address");
pub const MONITOR_PATH: &str = concatcp!(LTM_PATH, "/monitor");
pub const POLICY_PATH: &str = concatcp!(LTM_PATH, "/policy");

impl Session {
    // ----------------------------------------------------------------------
    // Pools
    // ----------------------------------------------------------------------

    pub async fn list_pools(
        &self,
        expand_subcollections: bool,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(collection_path(
            POOL_PATH,
            expand_subcollections,
        )))
        .await
    }

    pub async fn get_pool(&self, name: &str) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{POOL_PATH}/{name}")))
            .await
    }

    pub async fn create_pool(&self, body: Value) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::post(POOL_PATH).with_body(body))
            .await
    }

    /// Partial update (PATCH).
    pub async fn update_pool(
        &self,
        name: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::patch(format!("{POOL_PATH}/{name}")).with_body(body))
            .await
    }

    pub async fn list_pool_members(&self, pool: &str) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{POOL_PATH}/{pool}/members")))
            .await
    }

    pub async fn add_pool_member(
        &self,
        pool: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(
            RequestDescriptor::post(format!("{POOL_PATH}/{pool}/members")).with_body(body),
        )
        .await
    }

    // ----------------------------------------------------------------------
    // Virtual servers and addresses
    // ----------------------------------------------------------------------

    pub async fn list_virtuals(
        &self,
        expand_subcollections: bool,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(collection_path(
            VIRTUAL_PATH,
            expand_subcollections,
        )))
        .await
    }

    pub async fn get_virtual(&self, name: &str) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{VIRTUAL_PATH}/{name}")))
            .await
    }

    pub async fn create_virtual(&self, body: Value) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::post(VIRTUAL_PATH).with_body(body))
            .await
    }

    pub async fn update_virtual(
        &self,
        name: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::patch(format!("{VIRTUAL_PATH}/{name}")).with_body(body))
            .await
    }

    pub async fn list_virtual_addresses(&self) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(VIRTUAL_ADDRESS_PATH))
            .await
    }

    // ----------------------------------------------------------------------
    // Monitors
    // ----------------------------------------------------------------------

    /// `monitor_type` is the monitor kind, e.g. `http` or `tcp`.
    pub async fn list_monitors(
        &self,
        monitor_type: &str,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{MONITOR_PATH}/{monitor_type}")))
            .await
    }

    pub async fn create_monitor(
        &self,
        monitor_type: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(
            RequestDescriptor::post(format!("{MONITOR_PATH}/{monitor_type}")).with_body(body),
        )
        .await
    }

    pub async fn get_monitor(
        &self,
        parent_type: &str,
        name: &str,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!(
            "{MONITOR_PATH}/{parent_type}/{name}"
        )))
        .await
    }

    pub async fn update_monitor(
        &self,
        parent_type: &str,
        name: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(
            RequestDescriptor::patch(format!("{MONITOR_PATH}/{parent_type}/{name}"))
                .with_body(body),
        )
        .await
    }

    // ----------------------------------------------------------------------
    // Policies
    // ----------------------------------------------------------------------

    pub async fn list_policies(
        &self,
        expand_subcollections: bool,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(collection_path(
            POLICY_PATH,
            expand_subcollections,
        )))
        .await
    }

    pub async fn create_policy(&self, body: Value) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::post(POLICY_PATH).with_body(body))
            .await
    }

    pub async fn list_policy_rules(&self, policy: &str) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{POLICY_PATH}/{policy}/rules")))
            .await
    }
}
