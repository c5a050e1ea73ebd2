//! Client-side tracking snippet
//!
//! The snippet is a self-contained `<script>` block site owners paste into
//! their pages. It stores UTM parameters and the referrer hostname in
//! `localStorage` and attaches them to forms marked `data-privacy-track`.

use std::path::Path;

use tracing::info;
use url::Url;

use crate::errors::TrackerError;

pub const SNIPPET_VERSION: &str = "1.0.0";

const SNIPPET_TEMPLATE: &str = include_str!("../../assets/tracking-snippet.html");

/// Rendering options for the snippet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Log captured data to the browser console
    pub debug: bool,
    /// Collection URL the snippet beacons submissions to
    pub endpoint: Option<String>,
}

impl SnippetOptions {
    /// Parse the endpoint, which must be an http or https URL
    pub fn validate(&self) -> Result<Option<Url>, TrackerError> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(None);
        };

        let url = Url::parse(endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TrackerError::validation(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(Some(url))
    }
}

/// Render the snippet text
pub fn render_snippet(options: &SnippetOptions) -> Result<String, TrackerError> {
    let endpoint = match options.validate()? {
        // 序列化后的 URL 已对 < > 做百分号编码，再转义 </ 防止提前闭合 <script>
        Some(url) => serde_json::to_string(url.as_str())?.replace("</", "<\\/"),
        None => "null".to_string(),
    };

    Ok(SNIPPET_TEMPLATE
        .replace("{{VERSION}}", SNIPPET_VERSION)
        .replace("{{DEBUG}}", if options.debug { "true" } else { "false" })
        .replace("{{ENDPOINT}}", &endpoint))
}

/// Render the snippet and write it to `path`
pub fn write_snippet<P: AsRef<Path>>(
    options: &SnippetOptions,
    path: P,
) -> Result<(), TrackerError> {
    let path = path.as_ref();
    let content = render_snippet(options)?;
    std::fs::write(path, content).map_err(|e| {
        TrackerError::file_operation(format!("Failed to write {}: {}", path.display(), e))
    })?;
    info!("Tracking snippet written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let snippet = render_snippet(&SnippetOptions::default()).unwrap();
        assert!(snippet.starts_with("<!-- Privacy Tracker 1.0.0 -->"));
        assert!(snippet.contains("version: '1.0.0'"));
        assert!(snippet.contains("debug: false,"));
        assert!(snippet.contains("endpoint: null,"));
        assert!(!snippet.contains("{{"));
    }

    #[test]
    fn test_render_with_endpoint_and_debug() {
        let options = SnippetOptions {
            debug: true,
            endpoint: Some("https://collect.example.com/submit".to_string()),
        };
        let snippet = render_snippet(&options).unwrap();
        assert!(snippet.contains("debug: true,"));
        assert!(snippet.contains("endpoint: \"https://collect.example.com/submit\","));
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let options = SnippetOptions {
            debug: false,
            endpoint: Some("ftp://example.com".to_string()),
        };
        assert!(matches!(
            render_snippet(&options),
            Err(TrackerError::Validation(_))
        ));

        let options = SnippetOptions {
            debug: false,
            endpoint: Some("not a url".to_string()),
        };
        assert!(render_snippet(&options).is_err());
    }

    #[test]
    fn test_endpoint_cannot_close_script_tag() {
        let options = SnippetOptions {
            debug: false,
            endpoint: Some(
                "https://collect.example.com/x?a=</script><script>alert(1)</script>".to_string(),
            ),
        };
        let snippet = render_snippet(&options).unwrap();
        assert_eq!(snippet.matches("</script>").count(), 1);
        assert!(!snippet.contains("<script>alert"));
        assert!(snippet.contains("endpoint: \"https://collect.example.com/x?a="));
    }

    #[test]
    fn test_validate_returns_parsed_url() {
        let options = SnippetOptions {
            debug: false,
            endpoint: Some("HTTPS://Collect.Example.com/submit".to_string()),
        };
        let url = options.validate().unwrap().unwrap();
        assert_eq!(url.as_str(), "https://collect.example.com/submit");
        assert_eq!(SnippetOptions::default().validate().unwrap(), None);
    }

    #[test]
    fn test_write_snippet() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snippet.html");
        write_snippet(&SnippetOptions::default(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("window.PrivacyTracker"));
    }
}
