// Unit tests for CLI error conversions

use crate::error::CliError;

use icontrol_core::IControlError;
use icontrol_core::error::CoreError;

/// **VALUE**: Verifies core errors keep their variant through the CLI wrapper.
///
/// **BUG THIS CATCHES**: Would catch a conversion that flattens everything into a
/// string and loses the status code or error kind.
#[test]
fn given_operation_error_when_converted_then_core_variant_kept() {
    let error: CliError = IControlError::operation("not in transaction mode").into();

    match error {
        CliError::Core(CoreError::IControl(IControlError::Operation { message, .. })) => {
            assert_eq!(message, "not in transaction mode");
        }
        other => panic!("Expected wrapped Operation error, got {other:?}"),
    }
}

#[test]
fn given_cli_error_when_displayed_then_contains_message_and_location() {
    let error = CliError::cli("bad file");

    let text = error.to_string();

    assert!(text.contains("bad file"));
    assert!(text.contains("error.rs"), "Location should point at this test: {text}");
}
