use crate::dispatch::Connection;
use crate::error::IControlError;
use crate::reference::expand_references;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::sync::Weak;

use reqwest::header::HeaderMap;
use serde_json::Value;

/// A successful (status 200) response.
///
/// Holds a weak handle to the connection that produced it, used only to issue
/// the auxiliary fetches of [`ResponseEnvelope::expand`].
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    status: HttpStatusCode,
    headers: HeaderMap,
    payload: Value,
    connection: Weak<Connection>,
}

impl ResponseEnvelope {
    pub(crate) fn new(
        status: HttpStatusCode,
        headers: HeaderMap,
        payload: Value,
        connection: Weak<Connection>,
    ) -> Self {
        Self {
            status,
            headers,
            payload,
            connection,
        }
    }

    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Value {
        &mut self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Resolves top-level `*Reference` fields of the payload in place.
    ///
    /// Fails with `SessionDropped` if the issuing session is gone, or with the
    /// first auxiliary fetch failure. A non-object payload is left as is.
    pub async fn expand(&mut self) -> Result<&mut Self, IControlError> {
        let connection = self
            .connection
            .upgrade()
            .ok_or_else(|| IControlError::SessionDropped {
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Value::Object(fields) = &mut self.payload {
            expand_references(&connection, fields).await?;
        }

        Ok(self)
    }
}
