// Unit tests for reference-field recognition

use crate::reference::{expanded_field_name, is_reference_field, reference_link, relative_path};

use serde_json::json;

#[test]
fn given_field_names_when_checked_then_only_suffix_matches() {
    assert!(is_reference_field("poolReference"));
    assert!(is_reference_field("membersReference"));
    assert!(!is_reference_field("pool"));
    assert!(!is_reference_field("referenceCount"));
    assert!(!is_reference_field("poolreference"));
}

/// **VALUE**: Verifies the reference shape requires an object with a string `link`.
///
/// **WHY THIS MATTERS**: Payload keys are vendor-defined; a `*Reference` field holding
/// a plain string or a list must be left alone, not fetched.
///
/// **BUG THIS CATCHES**: Would catch expansion of fields that merely share the suffix.
#[test]
fn given_reference_values_when_extracting_link_then_only_link_objects_match() {
    let link = json!({"link": "https://localhost/mgmt/tm/ltm/pool/p1"});

    assert_eq!(
        reference_link("poolReference", &link),
        Some("https://localhost/mgmt/tm/ltm/pool/p1")
    );
    assert_eq!(reference_link("pool", &link), None);
    assert_eq!(reference_link("poolReference", &json!("https://x/y")), None);
    assert_eq!(reference_link("poolReference", &json!({"link": 7})), None);
    assert_eq!(reference_link("poolReference", &json!({"name": "p1"})), None);
}

#[test]
fn given_reference_name_when_stripped_then_suffix_removed() {
    assert_eq!(expanded_field_name("poolReference"), "pool");
    assert_eq!(expanded_field_name("rulesReference"), "rules");
    assert_eq!(expanded_field_name("pool"), "pool");
}

/// **VALUE**: Verifies the link's host is dropped but path and query are kept.
///
/// **WHY THIS MATTERS**: Links usually say `https://localhost/...`; fetching them as-is
/// would miss the appliance. The `ver` query pins the schema version.
///
/// **BUG THIS CATCHES**: Would catch a dropped query string.
#[test]
fn given_absolute_link_when_relative_path_then_path_and_query_kept() {
    assert_eq!(
        relative_path("https://host/mgmt/tm/ltm/pool/p1?ver=1").unwrap(),
        "/mgmt/tm/ltm/pool/p1?ver=1"
    );
    assert_eq!(
        relative_path("https://localhost/mgmt/tm/ltm/pool/~Common~p1").unwrap(),
        "/mgmt/tm/ltm/pool/~Common~p1"
    );
    assert!(relative_path("not a link").is_err());
}
