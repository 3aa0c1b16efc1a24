use crate::TM_BASE_PATH;
use crate::dispatch::RequestDescriptor;
use crate::error::IControlError;
use crate::response::ResponseEnvelope;
use crate::session::Session;

use const_format::concatcp;
use serde_json::Value;

pub const GTM_PATH: &str = concatcp!(TM_BASE_PATH, "/gtm");
pub const WIDEIP_PATH: &str = concatcp!(GTM_PATH, "/wideip");
pub const GTM_POOL_PATH: &str = concatcp!(GTM_PATH, "/pool");

// GTM collections are keyed by DNS record type (`a`, `aaaa`, `cname`, ...).
impl Session {
    pub async fn list_wideips(&self, record_type: &str) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{WIDEIP_PATH}/{record_type}")))
            .await
    }

    pub async fn create_wideip(
        &self,
        record_type: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(
            RequestDescriptor::post(format!("{WIDEIP_PATH}/{record_type}")).with_body(body),
        )
        .await
    }

    pub async fn list_gtm_pools(
        &self,
        record_type: &str,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(RequestDescriptor::get(format!("{GTM_POOL_PATH}/{record_type}")))
            .await
    }

    pub async fn create_gtm_pool(
        &self,
        record_type: &str,
        body: Value,
    ) -> Result<ResponseEnvelope, IControlError> {
        self.dispatch(
            RequestDescriptor::post(format!("{GTM_POOL_PATH}/{record_type}")).with_body(body),
        )
        .await
    }
}
