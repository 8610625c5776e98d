//! Asset version extraction and result links.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static ASSET_VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"asset_version=(\d+)").ok());

/// Returns the digits of the first `asset_version=<digits>` in `key`.
pub fn extract_asset_version(key: &str) -> Option<String> {
    ASSET_VERSION
        .as_ref()?
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Reads `launchBinaryUploadProcessing.key` from a launch response and
/// extracts the asset version from it.
pub fn asset_version_from_response(data: &Value) -> Option<String> {
    data.get("launchBinaryUploadProcessing")?
        .get("key")?
        .as_str()
        .and_then(extract_asset_version)
}

/// Link to an asset version in the web app.
pub fn asset_version_url(platform_url: &str, asset_id: &str, version: &str) -> String {
    format!(
        "{}/artifacts/{asset_id}/versions/{version}",
        platform_url.trim_end_matches('/')
    )
}
