// tests/args_tests.rs

use assert_matches::assert_matches;
use clap::{CommandFactory, Parser};
use dohrelay::{AppError, Args};
use std::path::PathBuf;

#[test]
fn test_default_arguments() {
    let args = Args::try_parse_from(["dohrelay"]).unwrap();

    assert_eq!(args.config, PathBuf::from("./config.yaml"));
    assert!(!args.test_config);
    assert!(!args.debug);
    assert_eq!(args.shutdown_timeout, 30);
    assert!(args.validation().is_ok());
}

#[test]
fn test_short_flags() {
    let args =
        Args::try_parse_from(["dohrelay", "-c", "/etc/dohrelay.yaml", "-t", "-d"]).unwrap();

    assert_eq!(args.config, PathBuf::from("/etc/dohrelay.yaml"));
    assert!(args.test_config);
    assert!(args.debug);
}

#[test]
fn test_shutdown_timeout_range() {
    let args = Args::try_parse_from(["dohrelay", "--shutdown-timeout", "0"]).unwrap();
    assert_matches!(args.validation(), Err(AppError::InvalidShutdownTimeout));

    let args = Args::try_parse_from(["dohrelay", "--shutdown-timeout", "121"]).unwrap();
    assert_matches!(args.validation(), Err(AppError::InvalidShutdownTimeout));

    let args = Args::try_parse_from(["dohrelay", "--shutdown-timeout", "120"]).unwrap();
    assert!(args.validation().is_ok());
}

#[test]
fn test_help_describes_relay() {
    let help = Args::command().render_long_help().to_string();

    assert!(help.contains("Relay DNS-over-HTTPS requests"));
    assert!(help.contains("--shutdown-timeout <SECS>"));
    assert!(help.contains("--config <PATH>"));
}
