//! # Initial Configuration
//!
//! Resolved once from the page's query string when the editor mounts. Later
//! URL changes are not observed.
//!
//! | Parameter     | Meaning                                   | Default            |
//! |---------------|-------------------------------------------|--------------------|
//! | `content`     | URL-encoded seed document                 | empty              |
//! | `editable`    | `"false"` makes the editor read-only      | `true`             |
//! | `showToolbar` | `"false"` hides the toolbar               | `true`             |
//! | `placeholder` | URL-encoded placeholder text              | `Start writing...` |
//! | `theme`       | `"dark"` or `"light"` override            | follow the page    |
//! | `key`         | must match the build-time access key      | none               |
//! | `ack`         | `"true"` enables `COMMAND_EXECUTED`       | `false`            |

use crate::{DecodeError, EditorError, EngineOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const DEFAULT_PLACEHOLDER: &str = "Start writing...";

/// Presentation theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Parse `"dark"`/`"light"`, ignoring surrounding whitespace
    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    /// Explicit parameter, then embedding hint, then the ambient preference
    pub fn resolve(explicit: Option<Theme>, hint: Option<Theme>, prefers_dark: bool) -> Theme {
        explicit.or(hint).unwrap_or(if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        })
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Outcome of the access gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    /// No access key configured
    Open,

    /// `key` matched the configured access key
    Granted,

    /// `key` missing or different
    Denied,
}

/// Immutable snapshot of the startup configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialConfig {
    pub content: String,
    pub editable: bool,
    pub show_toolbar: bool,
    pub placeholder: String,

    /// Explicit `theme` parameter, if any
    pub theme: Option<Theme>,

    /// Value of the `key` parameter
    #[serde(skip_serializing)]
    pub access_key: Option<String>,

    pub acknowledge_commands: bool,
    pub access: Access,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            content: String::new(),
            editable: true,
            show_toolbar: true,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            theme: None,
            access_key: None,
            acknowledge_commands: false,
            access: Access::Open,
        }
    }
}

impl InitialConfig {
    /// Resolve the configuration from a query string (leading `?` optional).
    ///
    /// `secret` is the build-time access key; `None` or empty disables the gate.
    pub fn from_query(query: &str, secret: Option<&str>) -> Self {
        let params = parse_query(query);
        let mut config = InitialConfig::default();

        if let Some(raw) = params.get("content").filter(|v| !v.is_empty()) {
            match decode_component("content", raw) {
                Ok(content) => config.content = content,
                Err(e) => warn!(error = %e, "Failed to decode content parameter, starting empty"),
            }
        }

        if let Some(value) = params.get("editable") {
            config.editable = value != "false";
        }

        if let Some(value) = params.get("showToolbar") {
            config.show_toolbar = value != "false";
        }

        if let Some(raw) = params.get("placeholder").filter(|v| !v.is_empty()) {
            match decode_component("placeholder", raw) {
                Ok(placeholder) => config.placeholder = placeholder,
                Err(e) => warn!(error = %e, "Failed to decode placeholder parameter, using default"),
            }
        }

        if let Some(value) = params.get("theme") {
            config.theme = Theme::parse(value);
            if config.theme.is_none() {
                debug!(theme = %value, "Ignoring unrecognized theme parameter");
            }
        }

        config.acknowledge_commands = params.get("ack").is_some_and(|v| v == "true");
        config.access_key = params.get("key").cloned();
        config.access = match secret.filter(|s| !s.is_empty()) {
            None => Access::Open,
            Some(secret) if config.access_key.as_deref() == Some(secret) => Access::Granted,
            Some(_) => Access::Denied,
        };

        config
    }

    /// Fails with `AccessDenied` when the gate rejected the session
    pub fn authorize(&self) -> Result<(), EditorError> {
        match self.access {
            Access::Open | Access::Granted => Ok(()),
            Access::Denied => Err(EditorError::AccessDenied),
        }
    }

    /// Options handed to the engine at construction, with the theme the
    /// session resolved for the page
    pub fn engine_options(&self, theme: Theme) -> EngineOptions {
        EngineOptions {
            content: self.content.clone(),
            editable: self.editable,
            placeholder: self.placeholder.clone(),
            show_toolbar: self.show_toolbar,
            theme,
        }
    }
}

/// Form-decode the query; the first occurrence of a key wins
fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let query = query.strip_prefix('?').unwrap_or(query);

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    params
}

/// Strict percent-decoding of a parameter value.
///
/// Every `%` must introduce two hex digits and the result must be UTF-8.
fn decode_component(name: &'static str, value: &str) -> Result<String, DecodeError> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(DecodeError::Parameter { name });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::Parameter { name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InitialConfig::from_query("", None);
        assert_eq!(config, InitialConfig::default());
        assert_eq!(config.placeholder, "Start writing...");
        assert!(config.editable);
        assert!(config.show_toolbar);
        assert_eq!(config.access, Access::Open);
    }

    #[test]
    fn test_content_and_editable() {
        let config = InitialConfig::from_query("?content=%3Cp%3EHi%3C%2Fp%3E&editable=false", None);
        assert_eq!(config.content, "<p>Hi</p>");
        assert!(!config.editable);
    }

    #[test]
    fn test_double_encoded_content() {
        // The parameter itself carries an encoded document
        let config = InitialConfig::from_query("content=%253Cb%253E%2520x", None);
        assert_eq!(config.content, "<b> x");
    }

    #[test]
    fn test_malformed_content_falls_back_to_empty() {
        // `%25zz` form-decodes to `%zz`, which is not a valid escape
        let config = InitialConfig::from_query("content=%25zz&placeholder=%25E0%25A4", None);
        assert_eq!(config.content, "");
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_boolean_convention() {
        for (query, expected) in [
            ("editable=false", false),
            ("editable=true", true),
            ("editable=0", true),
            ("editable=FALSE", true),
            ("editable=", true),
        ] {
            assert_eq!(InitialConfig::from_query(query, None).editable, expected, "{query}");
        }
        assert!(!InitialConfig::from_query("showToolbar=false", None).show_toolbar);
        assert!(InitialConfig::from_query("showToolbar=no", None).show_toolbar);
    }

    #[test]
    fn test_placeholder() {
        let config = InitialConfig::from_query("placeholder=Type+here%2521", None);
        assert_eq!(config.placeholder, "Type here!");

        let config = InitialConfig::from_query("placeholder=", None);
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let config = InitialConfig::from_query("editable=false&editable=true", None);
        assert!(!config.editable);
    }

    #[test]
    fn test_theme_parameter() {
        assert_eq!(InitialConfig::from_query("theme=dark", None).theme, Some(Theme::Dark));
        assert_eq!(InitialConfig::from_query("theme=%20light%20", None).theme, Some(Theme::Light));
        assert_eq!(InitialConfig::from_query("theme=sepia", None).theme, None);
    }

    #[test]
    fn test_theme_precedence() {
        assert_eq!(Theme::resolve(Some(Theme::Light), Some(Theme::Dark), true), Theme::Light);
        assert_eq!(Theme::resolve(None, Some(Theme::Dark), false), Theme::Dark);
        assert_eq!(Theme::resolve(None, None, true), Theme::Dark);
        assert_eq!(Theme::resolve(None, None, false), Theme::Light);
    }

    #[test]
    fn test_access_gate() {
        let denied = InitialConfig::from_query("", Some("secret"));
        assert_eq!(denied.access, Access::Denied);
        assert!(matches!(denied.authorize(), Err(EditorError::AccessDenied)));

        let wrong_case = InitialConfig::from_query("key=Secret", Some("secret"));
        assert_eq!(wrong_case.access, Access::Denied);

        let granted = InitialConfig::from_query("key=secret", Some("secret"));
        assert_eq!(granted.access, Access::Granted);
        assert!(granted.authorize().is_ok());

        let inert = InitialConfig::from_query("key=whatever", Some(""));
        assert_eq!(inert.access, Access::Open);
    }

    #[test]
    fn test_acknowledgements_are_opt_in() {
        assert!(!InitialConfig::from_query("", None).acknowledge_commands);
        assert!(InitialConfig::from_query("ack=true", None).acknowledge_commands);
    }

    #[test]
    fn test_serialized_config_hides_key() {
        let config = InitialConfig::from_query("key=secret&theme=dark", Some("secret"));
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("accessKey").is_none());
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["showToolbar"], true);
        assert_eq!(value["access"], "granted");
    }
}
