/// End-to-end tests for config file discovery, loading and validation.
///
/// These tests exercise the flow from a config file on disk through CLI
/// invocation, using `assert_cmd` and `tempfile` for isolated environments.
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG_FILENAME: &str = "dtrack-dojo-sync.config.yml";

// ============================================================================
// Helper Functions
// ============================================================================

fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// Command in `dir` with only the secrets set; URLs must come from the config file
fn cmd_with_secrets(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dtrack-dojo-sync");
    cmd.current_dir(dir)
        .env_remove("DT_URL")
        .env_remove("DD_URL")
        .env_remove("DT_USERNAME")
        .env_remove("RUST_LOG")
        .env("DT_PASSWORD", "pw")
        .env("DD_TOKEN", "tok");
    cmd
}

const VALID_CONFIG: &str = r#"
source_url: http://127.0.0.1:9
source_username: admin
target_url: http://127.0.0.1:9
page_size: 25
"#;

// ============================================================================
// Auto-discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_supplies_urls() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join(CONFIG_FILENAME), VALID_CONFIG);

        let output = cmd_with_secrets(dir.path()).output().unwrap();

        // Config resolved, so the run reaches the (failing) login
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Logging in to Dependency-Track"));
        assert!(!stderr.contains("Invalid configuration"));
    }

    #[test]
    fn test_no_config_file_requires_env() {
        let dir = TempDir::new().unwrap();

        let output = cmd_with_secrets(dir.path()).output().unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("DT_URL is not set"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_config_rejected() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.yml");
        write_config(&real, VALID_CONFIG);
        std::os::unix::fs::symlink(&real, dir.path().join(CONFIG_FILENAME)).unwrap();

        let output = cmd_with_secrets(dir.path()).output().unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("symbolic link"));
    }
}

// ============================================================================
// Explicit Config Tests
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_explicit_config_path_loads_successfully() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("custom.yml");
        write_config(&config_path, VALID_CONFIG);

        let output = cmd_with_secrets(dir.path())
            .args(["--config", config_path.to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Logging in to Dependency-Track"));
    }

    #[test]
    fn test_env_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(CONFIG_FILENAME),
            "source_url: http://127.0.0.1:9\nsource_username: admin\ntarget_url: http://127.0.0.1:9\n",
        );

        let output = cmd_with_secrets(dir.path())
            .env("DD_URL", "not-a-url")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("DD_URL is not a valid URL"));
    }
}

// ============================================================================
// Error Case Tests
// ============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_invalid_yaml_syntax_error() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join(CONFIG_FILENAME), "invalid: yaml: [[[broken");

        let output = cmd_with_secrets(dir.path()).output().unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_config_not_found_error() {
        let dir = TempDir::new().unwrap();
        let missing_config = dir.path().join("does-not-exist.yml");

        let output = cmd_with_secrets(dir.path())
            .args(["-c", missing_config.to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Failed to read config file"));
    }

    #[test]
    fn test_zero_page_size_in_config_error() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(CONFIG_FILENAME),
            "source_url: http://127.0.0.1:9\nsource_username: admin\ntarget_url: http://127.0.0.1:9\npage_size: 0\n",
        );

        let output = cmd_with_secrets(dir.path()).output().unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("page_size must be at least 1"));
    }

    #[test]
    fn test_cli_page_size_overrides_invalid_config_value() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(CONFIG_FILENAME),
            "source_url: http://127.0.0.1:9\nsource_username: admin\ntarget_url: http://127.0.0.1:9\npage_size: 0\n",
        );

        let output = cmd_with_secrets(dir.path())
            .args(["--page-size", "5"])
            .output()
            .unwrap();

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("page_size must be at least 1"));
        assert!(stderr.contains("Logging in to Dependency-Track"));
    }
}
