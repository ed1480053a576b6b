use std::path::Path;
use std::process::{Command, Output};

pub const ACCOUNT: &str = "2vxsx-fae";

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli_with_env(args: &[&str], home: &Path, service_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ledgerpage"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("LEDGERPAGE_SERVICE", service_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, service_url: &str) -> String {
    let output = run_cli_with_env(args, home, service_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI with a custom HOME and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], home: &Path, service_url: &str) -> String {
    let output = run_cli_with_env(args, home, service_url);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Log in against `service_url` inside `home`.
pub fn login(home: &Path, service_url: &str) {
    run_cli_with_env_success(&["login", "--account", ACCOUNT], home, service_url);
}
