pub mod config;
pub mod flow;
pub mod request;
pub mod session;
pub mod validation;

pub use config::ConfigError;
pub use flow::FlowError;
pub use request::RequestError;
pub use session::SessionError;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
