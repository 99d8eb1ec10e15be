//! End-to-end CLI tests for xmd.
//!
//! These tests run the actual xmd binary and verify:
//! - Command-line interface behavior
//! - The files an export leaves on disk
//! - Error handling and exit codes
//!
//! # Test Organization
//!
//! Tests are organized by command:
//! - `test_export_*` - Export command tests
//! - `test_config_*` - Config command tests
//! - `test_cli_*` - General CLI tests (flags, help, version)
//!
//! # Logging
//!
//! All tests use detailed logging for debugging:
//! - Test start/end timestamps
//! - Timing information

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

/// Log a test event with timestamp
macro_rules! test_log {
    ($($arg:tt)*) => {
        let timestamp = chrono::Utc::now().format("%H:%M:%S%.3f");
        eprintln!("[TEST {}] {}", timestamp, format!($($arg)*));
    };
}

/// Create a test archive whose tweets file holds `tweets`
fn create_test_archive(tweets: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).expect("Failed to create data directory");
    fs::write(data_dir.join("tweets.js"), tweets).expect("Failed to write tweets.js");

    let archive_path = temp_dir.path().to_path_buf();
    (temp_dir, archive_path)
}

/// Get the xmd command ready for testing.
///
/// Runs inside `workdir` with the user config directory pointed there too,
/// so no local or user config file leaks into the test.
fn xmd_cmd(workdir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("xmd");
    cmd.current_dir(workdir.path())
        .env("XDG_CONFIG_HOME", workdir.path())
        .env("HOME", workdir.path())
        .env("NO_COLOR", "1")
        .env_remove("XMD_CONFIG")
        .env_remove("XMD_ARCHIVE")
        .env_remove("XMD_OUTPUT_DIR")
        .env_remove("XMD_USERS_DIR")
        .env_remove("XMD_INCLUDE_RETWEETS")
        .env_remove("XMD_CREATE_USER_FILES")
        .env_remove("XMD_DETECT_DUPLICATES")
        .env_remove("XMD_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Sample Test Data
// =============================================================================

const SAMPLE_TWEETS: &str = r#"window.YTD.tweets.part0 = [
    {
        "tweet": {
            "id": "1",
            "full_text": "hello",
            "created_at": "Mon Jan 01 10:00:00 +0000 2024",
            "favorite_count": "5",
            "retweet_count": "2",
            "source": "<a href=\"https://x.com\">Web</a>",
            "entities": {"user_mentions": []}
        }
    },
    {
        "tweet": {
            "id": "1234567890123456789",
            "full_text": "@bob agreed",
            "created_at": "Wed Jan 08 12:00:00 +0000 2025",
            "in_reply_to_user_id": "99",
            "in_reply_to_screen_name": "bob",
            "source": "<a href=\"https://x.com\">X Web App</a>",
            "entities": {"user_mentions": [{"screen_name": "bob"}]}
        }
    },
    {
        "tweet": {
            "id": "1234567890123456790",
            "full_text": "RT @carol: worth sharing",
            "created_at": "Thu Jan 09 14:30:00 +0000 2025",
            "retweeted": true
        }
    }
]"#;

const BROKEN_RECORD_TWEETS: &str = r#"window.YTD.tweets.part0 = [
    {"tweet": {"id": "10", "full_text": "undated"}},
    {"tweet": {"id": "11", "full_text": "fine", "created_at": "Tue Jan 02 09:00:00 +0000 2024"}}
]"#;

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_cli_help() {
    test_log!("Starting test_cli_help");
    let start = Instant::now();
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xmd"))
        .stdout(predicate::str::contains("Usage"));

    test_log!("test_cli_help completed in {:?}", start.elapsed());
}

#[test]
fn test_cli_version() {
    test_log!("Starting test_cli_version");
    let start = Instant::now();
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xmd"));

    test_log!("test_cli_version completed in {:?}", start.elapsed());
}

#[test]
fn test_cli_invalid_command() {
    test_log!("Starting test_cli_invalid_command");
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("publish"));
}

// =============================================================================
// Export Command Tests
// =============================================================================

#[test]
fn test_export_valid_archive() {
    test_log!("Starting test_export_valid_archive");
    let start = Instant::now();

    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");
    let output = workdir.path().join("vault");

    test_log!("Archive path: {:?}", archive_path);
    test_log!("Output path: {:?}", output);

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tweets written"))
        .stdout(predicate::str::contains("1 retweets omitted"));

    let first = fs::read_to_string(output.join("2024/01/01/1.md")).expect("tweet 1 written");
    assert!(first.starts_with("---\ndate: \"2024-01-01 10:00:00\"\n"));
    assert!(first.contains("daily note: \"[2024-01-01](/Dailies/2024-01-01.md)\"\n"));
    assert!(first.contains("source: Web\n"));
    assert!(first.ends_with("---\n> hello\n"));

    let reply = fs::read_to_string(output.join("2025/01/08/1234567890123456789.md"))
        .expect("reply written");
    assert!(reply.contains("replying to: \"[[bob]]\"\n"));
    assert!(reply.contains("users mentioned: \"[[bob]]\"\n"));

    assert!(!output.join("2025/01/09").exists(), "retweet should be omitted");
    assert!(!workdir.path().join("users").exists(), "user files are opt-in");

    test_log!(
        "test_export_valid_archive completed in {:?}",
        start.elapsed()
    );
}

#[test]
fn test_export_with_user_files() {
    test_log!("Starting test_export_with_user_files");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(archive_path.join("data/tweets.js"))
        .args(["-o", "out", "--users-dir", "people", "--user-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 user backlinks"));

    let bob = fs::read_to_string(workdir.path().join("people/bob.md")).expect("bob.md written");
    assert_eq!(bob, "- [[2025/01/08/1234567890123456789.md]]\n");
}

#[test]
fn test_export_include_retweets() {
    test_log!("Starting test_export_include_retweets");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .args(["-o", "out", "--include-retweets", "--quiet"])
        .assert()
        .success();

    let retweet = fs::read_to_string(workdir.path().join("out/2025/01/09/1234567890123456790.md"))
        .expect("retweet written");
    assert!(retweet.starts_with("---\nretweeted: true\n"));
}

#[test]
fn test_export_dry_run_writes_nothing() {
    test_log!("Starting test_export_dry_run_writes_nothing");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .args(["-o", "out", "--user-files", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024/01/01/1.md"))
        .stdout(predicate::str::contains("2 tweets would be written"));

    assert!(!workdir.path().join("out").exists());
    assert!(!workdir.path().join("users").exists());
}

#[test]
fn test_export_nonexistent_path() {
    test_log!("Starting test_export_nonexistent_path");
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg("/nonexistent/path/to/archive")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive not found"));
}

#[test]
fn test_export_without_archive_setting() {
    test_log!("Starting test_export_without_archive_setting");
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("archive"));
}

#[test]
fn test_export_bad_prefix() {
    test_log!("Starting test_export_bad_prefix");
    let (_archive_dir, archive_path) = create_test_archive("window.YTD.like.part0 = []");
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid archive"));

    assert!(!workdir.path().join("tweets").exists());
}

#[test]
fn test_export_stops_on_broken_record() {
    test_log!("Starting test_export_stops_on_broken_record");
    let (_archive_dir, archive_path) = create_test_archive(BROKEN_RECORD_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .args(["-o", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("10"))
        .stderr(predicate::str::contains("created_at"));

    assert!(!workdir.path().join("out/2024/01/02/11.md").exists());
}

#[test]
fn test_export_keep_going() {
    test_log!("Starting test_export_keep_going");
    let (_archive_dir, archive_path) = create_test_archive(BROKEN_RECORD_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .args(["-o", "out", "--keep-going"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 tweets failed"));

    assert!(workdir.path().join("out/2024/01/02/11.md").is_file());
}

#[test]
fn test_export_reads_local_config() {
    test_log!("Starting test_export_reads_local_config");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    let config = format!(
        "archive = {:?}\noutput_dir = \"notes\"\n\n[properties]\ninclude_retweets = true\n",
        archive_path.display().to_string()
    );
    fs::write(workdir.path().join("xmd.toml"), config).expect("Failed to write config");

    xmd_cmd(&workdir)
        .args(["export", "--quiet"])
        .assert()
        .success();

    assert!(
        workdir
            .path()
            .join("notes/2025/01/09/1234567890123456790.md")
            .is_file()
    );
}

#[test]
fn test_export_no_flag_overrides_config() {
    test_log!("Starting test_export_no_flag_overrides_config");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");
    fs::write(
        workdir.path().join("xmd.toml"),
        "[properties]\ninclude_retweets = true\ncreate_user_files = true\n",
    )
    .expect("Failed to write config");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .args(["--no-include-retweets", "--no-user-files", "--quiet"])
        .assert()
        .success();

    assert!(workdir.path().join("tweets/2024/01/01/1.md").is_file());
    assert!(!workdir.path().join("tweets/2025/01/09").exists());
    assert!(!workdir.path().join("users").exists());
}

#[test]
fn test_export_env_overrides_config() {
    test_log!("Starting test_export_env_overrides_config");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .env("XMD_ARCHIVE", &archive_path)
        .env("XMD_OUTPUT_DIR", "from-env")
        .args(["export", "--quiet"])
        .assert()
        .success();

    assert!(workdir.path().join("from-env/2024/01/01/1.md").is_file());
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_init() {
    test_log!("Starting test_config_init");
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output_dir"))
        .stdout(predicate::str::contains("create_user_files"));
}

#[test]
fn test_config_lists_lookup_locations() {
    test_log!("Starting test_config_lists_lookup_locations");
    let workdir = TempDir::new().expect("Failed to create workdir");
    fs::write(workdir.path().join("xmd.toml"), "output_dir = \"notes\"\n")
        .expect("Failed to write config");

    xmd_cmd(&workdir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("xmd.toml (found)"))
        .stdout(predicate::str::contains("output_dir").not());
}

#[test]
fn test_config_show_prints_effective_settings() {
    test_log!("Starting test_config_show_prints_effective_settings");
    let workdir = TempDir::new().expect("Failed to create workdir");
    fs::write(workdir.path().join("xmd.toml"), "output_dir = \"notes\"\n")
        .expect("Failed to write config");

    xmd_cmd(&workdir)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output_dir = \"notes\""));
}

#[test]
fn test_config_show_reports_invalid_file() {
    test_log!("Starting test_config_show_reports_invalid_file");
    let workdir = TempDir::new().expect("Failed to create workdir");
    let config_path = workdir.path().join("broken.toml");
    fs::write(&config_path, "output_dir = [").expect("Failed to write config");

    xmd_cmd(&workdir)
        .arg("--config")
        .arg(&config_path)
        .args(["config", "--show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.toml"));
}

// =============================================================================
// Quiet/Verbose Mode Tests
// =============================================================================

#[test]
fn test_quiet_mode() {
    test_log!("Starting test_quiet_mode");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(workdir.path().join("tweets/2024/01/01/1.md").is_file());
}

#[test]
fn test_log_level_flag() {
    test_log!("Starting test_log_level_flag");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .args(["--quiet", "--log-level", "info"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Exporting tweets"));

    xmd_cmd(&workdir)
        .args(["--log-level", "loud", "config"])
        .assert()
        .failure();
}

#[test]
fn test_verbose_mode() {
    test_log!("Starting test_verbose_mode");
    let (_archive_dir, archive_path) = create_test_archive(SAMPLE_TWEETS);
    let workdir = TempDir::new().expect("Failed to create workdir");

    xmd_cmd(&workdir)
        .arg("export")
        .arg(&archive_path)
        .arg("--verbose")
        .assert()
        .success();
}
