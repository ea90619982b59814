use crate::error::ValidationError;
use crate::validation::{
    Credentials, is_valid_password, is_valid_username, validate_credentials, validate_new_account,
};

/// **VALUE**: Verifies the allowed username alphabet.
#[test]
fn given_usernames_with_allowed_characters_when_checked_then_accepted() {
    for username in ["alex", "shnoo", "Alex_99", "a-b_c", "-", "_", "0"] {
        assert!(is_valid_username(username), "{username} should be accepted");
    }
}

/// **VALUE**: Verifies that any character outside `[A-Za-z0-9_-]` is rejected.
///
/// **BUG THIS CATCHES**: Would catch an unanchored regex that only checks for one
/// valid character somewhere in the string.
#[test]
fn given_usernames_with_special_characters_when_checked_then_rejected() {
    for username in ["alex**", "al ex", "alex.", "ålex", "alex\n", "a/b", "🙂"] {
        assert!(!is_valid_username(username), "{username:?} should be rejected");
    }
}

#[test]
fn given_empty_username_when_checked_then_rejected() {
    assert!(!is_valid_username(""));
}

#[test]
fn given_passwords_when_checked_then_minimum_is_five_characters() {
    assert!(!is_valid_password(""));
    assert!(!is_valid_password("1234"));
    assert!(is_valid_password("12345"));
    assert!(!is_valid_password("äöü"), "counts characters, not bytes");
    assert!(is_valid_password("äöüßé"));
}

/// **VALUE**: Verifies rule precedence: username before password.
#[test]
fn given_bad_username_and_short_password_when_validated_then_username_error_wins() {
    let credentials = Credentials::new("alex**", "123");

    assert_eq!(
        validate_credentials(&credentials),
        Err(ValidationError::InvalidUsername)
    );
}

/// **VALUE**: Verifies rule precedence: field rules before confirmation.
#[test]
fn given_short_password_and_mismatched_confirmation_when_validated_then_length_error_wins() {
    let credentials = Credentials::new("alex", "123");

    assert_eq!(
        validate_new_account(&credentials, "456"),
        Err(ValidationError::PasswordTooShort)
    );
}

#[test]
fn given_mismatched_confirmation_when_validated_then_passwords_do_not_match() {
    let credentials = Credentials::new("shnoo", "password");

    assert_eq!(
        validate_new_account(&credentials, "doesNotMatch"),
        Err(ValidationError::PasswordMismatch)
    );
}

#[test]
fn given_valid_new_account_when_validated_then_ok() {
    let credentials = Credentials::new("shnoo", "thisisveryunsafe");

    assert_eq!(validate_new_account(&credentials, "thisisveryunsafe"), Ok(()));
}

/// **VALUE**: Verifies the user-visible literals exactly.
#[test]
fn given_validation_errors_when_displayed_then_match_user_text() {
    assert_eq!(
        ValidationError::InvalidUsername.to_string(),
        "Username should not contain any special characters other than '-' and '_'"
    );
    assert_eq!(
        ValidationError::PasswordTooShort.to_string(),
        "Password should have minimum five characters"
    );
    assert_eq!(
        ValidationError::PasswordMismatch.to_string(),
        "Passwords do not match"
    );
}

/// **VALUE**: Validation is a pure function of its input.
#[test]
fn given_same_input_when_validated_twice_then_same_outcome() {
    let credentials = Credentials::new("alex", "password");

    let first = validate_new_account(&credentials, "password");
    let second = validate_new_account(&credentials, "password");

    assert_eq!(first, second);
}
