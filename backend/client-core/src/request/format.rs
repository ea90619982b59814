//! User-facing text for request failures.

use crate::error::RequestError;

pub const ACTION_CREATING_ACCOUNT: &str = "creating the account";
pub const ACTION_LOGGING_IN: &str = "logging in";
pub const ACTION_LOGGING_OUT: &str = "logging out";
pub const ACTION_DELETING_ACCOUNT: &str = "deleting the account";

/// Map a request failure to the sentence shown to the user.
///
/// A server rejection shows the server's own text. Every other failure means no
/// usable response came back and gets the generic template. `action` is free-form
/// text such as `"logging in"`; it is inserted as-is.
pub fn format_request_error(err: &RequestError, action: &str) -> String {
    match err {
        RequestError::ServerRejected { message, .. } => message.clone(),
        RequestError::Transport { .. }
        | RequestError::Decode { .. }
        | RequestError::UrlParse { .. } => {
            format!("An error has occurred while {action}, unable to connect to server")
        }
    }
}
