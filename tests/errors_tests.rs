//! 错误类型测试

use privacy_tracker::errors::TrackerError;
use privacy_tracker::interfaces::cli::CliError;

#[test]
fn test_error_codes_and_types() {
    let cases = [
        (TrackerError::invalid_argument("x"), "E001", "Invalid Argument"),
        (TrackerError::validation("x"), "E002", "Validation Error"),
        (TrackerError::file_operation("x"), "E003", "File Operation Error"),
        (TrackerError::serialization("x"), "E004", "Serialization Error"),
        (TrackerError::config("x"), "E005", "Configuration Error"),
    ];
    for (err, code, kind) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.error_type(), kind);
        assert_eq!(err.message(), "x");
        assert_eq!(err.to_string(), format!("{}: x", kind));
    }
}

#[test]
fn test_from_conversions() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(TrackerError::from(io), TrackerError::FileOperation(_)));

    let json = serde_json::from_str::<u32>("nope").unwrap_err();
    assert!(matches!(TrackerError::from(json), TrackerError::Serialization(_)));

    let url = url::Url::parse("::").unwrap_err();
    assert!(matches!(TrackerError::from(url), TrackerError::Validation(_)));
}

#[test]
fn test_cli_error_mapping() {
    assert!(matches!(
        CliError::from(TrackerError::invalid_argument("bad field")),
        CliError::ParseError(_)
    ));
    assert!(matches!(
        CliError::from(TrackerError::config("bad offset")),
        CliError::ConfigError(_)
    ));
    let err = CliError::from(TrackerError::file_operation("disk full"));
    assert_eq!(
        err.format_simple(),
        "Command error: File Operation Error: disk full"
    );
}

#[test]
fn test_colored_output_contains_code() {
    let colored = TrackerError::validation("bad country").format_colored();
    assert!(colored.contains("E002"));
    assert!(colored.contains("bad country"));
}
