use std::fs;
use std::process::Command;

#[test]
fn cli_returns_nonzero_on_config_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[limits]\ngrid_min_levels = 60\ngrid_max_levels = 50\n")
        .expect("write temp config");

    let output = Command::new(env!("CARGO_BIN_EXE_strata"))
        .args(["config", "show", "--config"])
        .arg(&path)
        .output()
        .expect("run strata");

    assert!(
        !output.status.success(),
        "expected non-zero exit for invalid config"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("limits.grid_min_levels"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn cli_loads_valid_config_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[exchange]\nenvironment = \"production\"\n\n[limits]\ntwap_max_orders = 12\n",
    )
    .expect("write temp config");

    let output = Command::new(env!("CARGO_BIN_EXE_strata"))
        .args(["config", "show", "--config"])
        .arg(&path)
        .env_remove("BINANCE_TESTNET")
        .output()
        .expect("run strata");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://fapi.binance.com"), "unexpected stdout: {stdout}");
    assert!(stdout.contains("twap_max_orders = 12"), "unexpected stdout: {stdout}");
}

#[test]
fn cli_twap_limit_comes_from_config() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[limits]\ntwap_max_orders = 4\n").expect("write temp config");

    let output = Command::new(env!("CARGO_BIN_EXE_strata"))
        .args(["twap", "BTCUSDT", "BUY", "0.1", "5", "10", "--config"])
        .arg(&path)
        .output()
        .expect("run strata");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds maximum 4"), "unexpected stderr: {stderr}");
}
