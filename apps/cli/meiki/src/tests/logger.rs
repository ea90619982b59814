// Unit tests for logger module initialization logic
// Tests focus on thread-safety, error handling and level selection

use crate::logger::{initialize, initialize_internal, levels};

use std::path::PathBuf;

use log::LevelFilter;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: The binary and tests can both reach initialization. If the
/// second call errors, fern would refuse to set a global logger twice and abort startup.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = tempfile::TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path(), false);
    let result2 = initialize(temp_dir.path(), true);

    // THEN: Both should return Ok (second one logs warning but doesn't error)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies that an unwritable log directory is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch if `fern::log_file()` were unwrapped.
#[test]
fn given_invalid_log_dir_when_initializing_then_returns_meiki_error() {
    // GIVEN: A path that cannot hold a file
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Building the dispatch (fails before any global logger is set)
    let result = initialize_internal(&invalid_dir, false);

    // THEN: Should return the app error variant
    let err = result.unwrap_err();
    let err_string = format!("{:?}", err);
    assert!(
        err_string.contains("Meiki"),
        "Error should be MeikiError::Meiki variant"
    );
    assert!(err.user_message().contains("Failed to create log file"));
}

#[test]
fn given_verbose_when_selecting_levels_then_both_outputs_debug() {
    assert_eq!(levels(true), (LevelFilter::Debug, LevelFilter::Debug));
}

/// **VALUE**: Verifies quiet mode keeps stderr to errors so command output stays readable.
#[test]
fn given_not_verbose_when_selecting_levels_then_stderr_errors_only() {
    let (file_level, stderr_level) = levels(false);

    assert_eq!(stderr_level, LevelFilter::Error);
    assert!(file_level >= LevelFilter::Info);
}
