pub mod account;
pub mod config;
pub mod error;
pub mod flow;
pub mod request;
pub mod session;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::{CoreError, FlowError, RequestError, SessionError, ValidationError};
pub use flow::{AuthFlow, FlowState};
pub use request::{RequestClient, RequestDescriptor, format_request_error};
pub use session::{Session, SessionContext, SessionStore};
pub use validation::Credentials;

pub const MEIKI_SERVER_HOSTNAME: &str = "localhost";
pub const MEIKI_SERVER_PORT: u16 = 8080;
pub const DEFAULT_SERVER_URL: &str =
    const_format::concatcp!("http://", MEIKI_SERVER_HOSTNAME, ":", MEIKI_SERVER_PORT);
