//! Action inputs and endpoint settings.
//!
//! Inputs come from the runner as `INPUT_<NAME>` environment variables.
//! Settings are optional TOML, read from the file named by
//! `FINITE_STATE_SETTINGS`:
//!
//! ```toml
//! graphql_url = "https://platform.finitestate.io/api/v1/graphql"
//! chunk_size = 67108864
//! ```

use std::path::{Path, PathBuf};

use fsupload_api::{DEFAULT_GRAPHQL_URL, DEFAULT_TOKEN_URL};
use fsupload_transfer::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

/// Environment variable naming the settings file.
pub const SETTINGS_ENV: &str = "FINITE_STATE_SETTINGS";

/// Invalid or missing action input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Input required and not supplied: {0}")]
    Missing(&'static str),

    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {name} (got `{value}`)\nSupport boolean input list: `true | True | TRUE | false | False | FALSE`"
    )]
    InvalidBoolean { name: &'static str, value: String },
}

/// Inputs declared by the action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionInputs {
    pub client_id: String,
    pub client_secret: String,
    pub organization_context: String,
    pub asset_id: String,
    pub version: String,
    pub file_path: PathBuf,
    pub business_unit_id: Option<String>,
    pub created_by_user_id: Option<String>,
    pub product_id: Option<String>,
    pub artifact_description: Option<String>,
    pub quick_scan: bool,
    pub automatic_comment: bool,
    pub github_token: Option<String>,
}

impl ActionInputs {
    /// Reads inputs from the process environment.
    pub fn from_env() -> Result<Self, InputError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads inputs through `lookup`, which maps an environment variable name
    /// to its value.
    ///
    /// Each input is looked up under the runner's hyphenated name
    /// (`INPUT_ASSET-ID`) and then the underscore form (`INPUT_ASSET_ID`).
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InputError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<String> {
            let hyphenated = format!("INPUT_{}", name.to_ascii_uppercase());
            let underscored = hyphenated.replace('-', "_");
            lookup(&hyphenated)
                .or_else(|| lookup(&underscored))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(InputError::Missing(name));
        let boolean = |name: &'static str| match get(name) {
            None => Ok(false),
            Some(value) => parse_bool(&value)
                .ok_or_else(|| InputError::InvalidBoolean { name, value }),
        };

        Ok(Self {
            client_id: required("FINITE-STATE-CLIENT-ID")?,
            client_secret: required("FINITE-STATE-SECRET")?,
            organization_context: required("FINITE-STATE-ORGANIZATION-CONTEXT")?,
            asset_id: required("ASSET-ID")?,
            version: required("VERSION")?,
            file_path: PathBuf::from(required("FILE-PATH")?),
            business_unit_id: get("BUSINESS-UNIT-ID"),
            created_by_user_id: get("CREATED-BY-USER-ID"),
            product_id: get("PRODUCT-ID"),
            artifact_description: get("ARTIFACT-DESCRIPTION"),
            quick_scan: boolean("QUICK-SCAN")?,
            automatic_comment: boolean("AUTOMATIC-COMMENT")?,
            github_token: get("GITHUB-TOKEN"),
        })
    }

    /// Values that must never appear in the log.
    pub fn secrets(&self) -> [&str; 3] {
        [
            self.client_id.as_str(),
            self.client_secret.as_str(),
            self.organization_context.as_str(),
        ]
    }
}

/// YAML 1.2 core-schema booleans.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Endpoints and tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// GraphQL endpoint.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// OAuth client-credentials endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Audience requested with the token.
    #[serde(default = "default_graphql_url")]
    pub audience: String,

    /// Web app base used for result links.
    #[serde(default = "default_platform_url")]
    pub platform_url: String,

    /// GitHub REST base used for PR comments.
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Bytes per uploaded part.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_graphql_url() -> String {
    DEFAULT_GRAPHQL_URL.into()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.into()
}

fn default_platform_url() -> String {
    "https://platform.finitestate.io".into()
}

fn default_github_api_url() -> String {
    std::env::var("GITHUB_API_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "https://api.github.com".into())
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            token_url: default_token_url(),
            audience: default_graphql_url(),
            platform_url: default_platform_url(),
            github_api_url: default_github_api_url(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Settings {
    /// Loads settings from `FINITE_STATE_SETTINGS`, or defaults when unset.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) if !path.is_empty() => Self::load_from(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("INPUT_FINITE-STATE-CLIENT-ID", "cid"),
        ("INPUT_FINITE-STATE-SECRET", "secret"),
        ("INPUT_FINITE-STATE-ORGANIZATION-CONTEXT", "org"),
        ("INPUT_ASSET-ID", "a1"),
        ("INPUT_VERSION", "1.0.0"),
        ("INPUT_FILE-PATH", "build/firmware.bin"),
    ];

    #[test]
    fn reads_required_and_defaults_optional() {
        let inputs = ActionInputs::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(inputs.client_id, "cid");
        assert_eq!(inputs.asset_id, "a1");
        assert_eq!(inputs.file_path, PathBuf::from("build/firmware.bin"));
        assert!(inputs.business_unit_id.is_none());
        assert!(!inputs.quick_scan);
        assert!(!inputs.automatic_comment);
        assert_eq!(inputs.secrets(), ["cid", "secret", "org"]);
    }

    #[test]
    fn accepts_underscore_names() {
        let pairs: Vec<(String, &str)> = REQUIRED
            .iter()
            .map(|(k, v)| (k.replace('-', "_"), *v))
            .chain([("INPUT_QUICK_SCAN".to_string(), "True")])
            .collect();
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), *v)).collect();

        let inputs = ActionInputs::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(inputs.organization_context, "org");
        assert!(inputs.quick_scan);
    }

    #[test]
    fn missing_required_input_is_named() {
        let pairs: Vec<(&str, &str)> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "INPUT_VERSION")
            .collect();
        let err = ActionInputs::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, InputError::Missing("VERSION"));
    }

    #[test]
    fn empty_optional_is_absent() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("INPUT_PRODUCT-ID", ""));
        pairs.push(("INPUT_GITHUB-TOKEN", "  "));
        pairs.push(("INPUT_AUTOMATIC-COMMENT", ""));
        let inputs = ActionInputs::from_lookup(lookup(&pairs)).unwrap();
        assert!(inputs.product_id.is_none());
        assert!(inputs.github_token.is_none());
        assert!(!inputs.automatic_comment);
    }

    #[test]
    fn booleans_follow_core_schema() {
        for (raw, expected) in [("true", true), ("TRUE", true), ("False", false)] {
            assert_eq!(parse_bool(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("INPUT_AUTOMATIC-COMMENT", "yes"));
        let err = ActionInputs::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidBoolean {
                name: "AUTOMATIC-COMMENT",
                ..
            }
        ));
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(settings.audience, DEFAULT_GRAPHQL_URL);
        assert_eq!(settings.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(settings.platform_url, "https://platform.finitestate.io");
        assert_eq!(settings.chunk_size, 64 * 1024 * 1024);
    }

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "graphql_url = \"http://localhost:9000/graphql\"\nchunk_size = 1048576\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.graphql_url, "http://localhost:9000/graphql");
        assert_eq!(settings.chunk_size, 1024 * 1024);
        assert_eq!(settings.token_url, DEFAULT_TOKEN_URL);
    }

    #[test]
    fn settings_roundtrip_through_toml() {
        let settings = Settings {
            github_api_url: "https://ghe.example/api/v3".into(),
            ..Settings::default()
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
