use arena_core::GenericResponse;

/// Shown when a failed response carries nothing more specific.
pub const GENERIC_FAILURE: &str = "Something went wrong while executing your code. Please try again.";

/// The text itself when it is not blank. Surrounding whitespace is kept.
fn non_empty(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

/// Pick the message for a response whose harness did not succeed.
///
/// In order: the failing case's own error, the syntax error, the envelope
/// error, then [`GENERIC_FAILURE`]. Never empty.
pub fn failure_message(response: &GenericResponse) -> String {
    let raw = response.raw_output();

    if let Some(error) = raw
        .and_then(|r| r.failed_test_case.as_ref())
        .and_then(|d| d.error.as_deref())
        .and_then(non_empty)
    {
        return error.to_string();
    }

    if let Some(syntax) = raw.and_then(|r| r.syntax_error.as_deref()).and_then(non_empty) {
        return format!("Syntax Error: {}", syntax);
    }

    if let Some(error) = &response.error {
        match (non_empty(&error.error_type), non_empty(&error.message)) {
            (Some(kind), Some(message)) => return format!("{}: {}", kind, message),
            (Some(only), None) | (None, Some(only)) => return only.to_string(),
            (None, None) => {}
        }
    }

    GENERIC_FAILURE.to_string()
}
