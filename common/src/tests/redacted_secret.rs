use crate::RedactedSecret;

/// **VALUE**: Verifies that Debug and Display never print the secret.
///
/// **WHY THIS MATTERS**: Sessions and credentials are logged with `{:?}` in a few
/// places. A derived Debug would print the token in plain text.
#[test]
fn given_secret_when_formatted_then_value_is_hidden() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("super-secret-token");

    // WHEN: Formatting it both ways
    let debug = format!("{:?}", secret);
    let display = format!("{}", secret);

    // THEN: Neither contains the value
    assert!(!debug.contains("super-secret-token"));
    assert!(!display.contains("super-secret-token"));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies serde serialization is refused.
///
/// **BUG THIS CATCHES**: Would catch someone deriving Serialize, which would let a
/// password slip into a JSON log line.
#[test]
fn given_secret_when_serialized_then_fails() {
    let secret = RedactedSecret::new("password");

    let result = serde_json::to_string(&secret);

    assert!(result.is_err(), "Serialization must be refused");
}

#[test]
fn given_secret_when_char_count_requested_then_counts_chars_not_bytes() {
    let secret = RedactedSecret::new("pässwörd");

    assert_eq!(secret.char_count(), 8);
    assert_eq!(secret.as_str(), "pässwörd");
    assert!(!secret.is_empty());
}
