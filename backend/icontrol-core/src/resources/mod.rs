//! Resource wrappers: URI templates over [`Session::dispatch`](crate::Session::dispatch).
//!
//! They add nothing beyond a path and a verb, so they pick up the
//! coordination header like any other call while a transaction is active.
//! Names are passed through verbatim; partitioned names use the API's
//! `~Partition~name` form.

pub mod gtm;
pub mod ltm;

const EXPAND_SUBCOLLECTIONS_PARAM: &str = "expandSubcollections";

/// `path?expandSubcollections=true|false`.
pub(crate) fn collection_path(path: &str, expand_subcollections: bool) -> String {
    format!("{path}?{EXPAND_SUBCOLLECTIONS_PARAM}={expand_subcollections}")
}
