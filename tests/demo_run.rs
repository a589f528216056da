/// Integration tests for the `demo run` command.
use std::path::Path;
use wt3::commands::handle_demo_run_command;

/// An integration test for the `demo run` command.
#[test]
fn test_handle_demo_run_command() {
    unsafe { std::env::set_var("WT3_LOG_LEVEL", "off") };
    handle_demo_run_command("brackish", Path::new("data")).unwrap();
}

/// An unknown demo name is an error.
#[test]
fn test_handle_demo_run_command_unknown() {
    unsafe { std::env::set_var("WT3_LOG_LEVEL", "off") };
    assert!(handle_demo_run_command("no_such_demo", Path::new("data")).is_err());
}
