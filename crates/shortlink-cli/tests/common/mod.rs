use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI with an isolated HOME so the token file never leaks between tests.
pub fn run_cli_with_env(args: &[&str], home: &Path, backend: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shortlink"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("SHORTLINK_BACKEND_URL", backend);
    cmd.env("NO_COLOR", "1");
    cmd.env("CLICOLOR", "0");
    cmd.env_remove("CLICOLOR_FORCE");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime so the mock server keeps serving.
pub async fn run(args: &[&str], home: &Path, backend: &str) -> Output {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let home = home.to_path_buf();
    let backend = backend.to_string();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli_with_env(&args, &home, &backend)
    })
    .await
    .expect("CLI task panicked")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_success(args: &[&str], home: &Path, backend: &str) -> String {
    let output = run(args, home, backend).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_failure(args: &[&str], home: &Path, backend: &str) -> String {
    let output = run(args, home, backend).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}
