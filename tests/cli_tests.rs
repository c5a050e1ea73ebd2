//! CLI 命令集成测试
//!
//! Commands print to stdout; these tests check their side effects and
//! error mapping.

use clap::Parser;

use privacy_tracker::cli::Cli;
use privacy_tracker::config::{DatasetConfig, StaticConfig};
use privacy_tracker::interfaces::cli::{CliError, run_cli_command};

fn config_in(dir: &std::path::Path) -> StaticConfig {
    let mut config = StaticConfig {
        dataset: DatasetConfig {
            size: 30,
            seed: Some(5),
            window_days: 30,
        },
        ..Default::default()
    };
    config.export.output_dir = dir.to_string_lossy().into_owned();
    config
}

fn run(args: &[&str], config: &StaticConfig) -> Result<(), CliError> {
    let mut argv = vec!["privacy-tracker"];
    argv.extend_from_slice(args);
    run_cli_command(Cli::parse_from(argv).command, config)
}

#[test]
fn test_query_commands_succeed() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_in(dir.path());

    run(&["summary"], &config).unwrap();
    run(&["summary", "--range", "all", "--json"], &config).unwrap();
    run(&["breakdown", "source", "--range", "30d"], &config).unwrap();
    run(&["values", "country", "--json"], &config).unwrap();
    run(&["trend", "--range", "90d"], &config).unwrap();
    run(&["list", "--search", "google", "--page", "2"], &config).unwrap();
}

#[test]
fn test_export_writes_file_to_configured_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_in(dir.path());

    run(&["export", "--range", "all"], &config).unwrap();

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("tracking_data_"));
}

#[test]
fn test_bad_arguments_map_to_parse_errors() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_in(dir.path());

    assert!(matches!(
        run(&["breakdown", "browser"], &config),
        Err(CliError::ParseError(_))
    ));
    assert!(matches!(
        run(&["values", "favorite_color"], &config),
        Err(CliError::ParseError(_))
    ));
    assert!(matches!(
        run(&["trend", "--range", "1y"], &config),
        Err(CliError::ParseError(_))
    ));
}

#[test]
fn test_bad_display_offset_is_a_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.display.utc_offset = "later".to_string();

    assert!(matches!(
        run(&["summary"], &config),
        Err(CliError::ConfigError(_))
    ));
}

#[test]
fn test_script_and_config_generate_write_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_in(dir.path());

    let snippet = dir.path().join("snippet.html");
    let snippet_arg = snippet.to_string_lossy().into_owned();
    run(&["script", "--debug", "--output", &snippet_arg], &config).unwrap();
    assert!(std::fs::read_to_string(&snippet).unwrap().contains("debug: true"));

    let sample = dir.path().join("config.toml");
    let sample_arg = sample.to_string_lossy().into_owned();
    run(&["config", "generate", &sample_arg, "--force"], &config).unwrap();
    let loaded = StaticConfig::try_load(Some(&sample_arg)).unwrap();
    assert_eq!(loaded.dataset.size, 150);
}

#[test]
fn test_capture_validates_country() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = config_in(dir.path());

    run(
        &["capture", "--url", "https://example.com/?utm_source=google", "--country", "us"],
        &config,
    )
    .unwrap();
    assert!(matches!(
        run(&["capture", "--url", "https://example.com/", "--country", "USA"], &config),
        Err(CliError::CommandError(_))
    ));
}
