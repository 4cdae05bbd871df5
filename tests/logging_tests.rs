//! Unit tests for the logging helpers in the `mbus-telegram` crate.

use mbus_telegram::logging::{
    init_logger, init_logger_with_level, log_debug, log_error, log_frame_hex, log_info, log_warn,
};

/// Tests that the logging helpers do not panic, with or without a backend.
#[test]
fn test_logging() {
    log_error("This is an error message");
    log_warn("This is a warning message");
    log_info("This is an info message");
    log_debug("This is a debug message");
    log_frame_hex("RX", &[0x68, 0x04, 0x04, 0x68, 0x08, 0x01, 0x70, 0x08, 0x81, 0x16]);
}

/// Tests that the logger can be initialized more than once.
#[test]
fn test_init_logger() {
    init_logger_with_level("debug");
    init_logger();
    log_frame_hex("RX", &[0xE5; 200]);
}
