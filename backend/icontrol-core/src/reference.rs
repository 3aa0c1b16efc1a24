//! Link-only `*Reference` fields and their expansion.
//!
//! The API summarises related resources as
//! `"poolReference": {"link": "https://host/mgmt/tm/ltm/pool/p1?ver=1"}`.
//! Expansion fetches the link and stores the body under the field name with
//! the suffix removed (`pool`), leaving the reference itself in place.

use crate::dispatch::{Connection, RequestDescriptor, dispatch};
use crate::error::IControlError;

use std::sync::Arc;

use log::trace;
use serde_json::{Map, Value};
use url::Url;

pub const REFERENCE_SUFFIX: &str = "Reference";

const LINK_FIELD: &str = "link";

pub fn is_reference_field(name: &str) -> bool {
    name.ends_with(REFERENCE_SUFFIX)
}

/// The `link` of a reference field, if `name`/`value` have the reference shape.
pub fn reference_link<'a>(name: &str, value: &'a Value) -> Option<&'a str> {
    if !is_reference_field(name) {
        return None;
    }

    value.as_object()?.get(LINK_FIELD)?.as_str()
}

/// `poolReference` -> `pool`.
pub fn expanded_field_name(name: &str) -> &str {
    name.strip_suffix(REFERENCE_SUFFIX).unwrap_or(name)
}

/// Path and query of an absolute link, ready to append to the base URL.
#[track_caller]
pub fn relative_path(link: &str) -> Result<String, IControlError> {
    let url = Url::parse(link)?;

    Ok(match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    })
}

/// Expands every top-level reference field of `payload`, one fetch at a time,
/// in field order. Auxiliary fetches never carry the coordination header.
pub(crate) async fn expand_references(
    connection: &Arc<Connection>,
    payload: &mut Map<String, Value>,
) -> Result<(), IControlError> {
    let pending: Vec<(String, String)> = payload
        .iter()
        .filter_map(|(name, value)| {
            reference_link(name, value)
                .map(|link| (expanded_field_name(name).to_string(), link.to_string()))
        })
        .collect();

    for (target, link) in pending {
        let path = relative_path(&link)?;
        trace!("Expanding reference {target} from {path}");

        let fetched = dispatch(
            connection,
            RequestDescriptor::get(path).ignoring_transaction(),
            None,
        )
        .await?;

        payload.insert(target, fetched.into_payload());
    }

    Ok(())
}
