// Unit tests for crate-private helpers.
// Public behaviour against a live HTTP server is covered in integration_tests/.

mod config;
mod request;
mod session;
mod validation;
