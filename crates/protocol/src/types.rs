use serde::{Deserialize, Deserializer, Serialize};

/// How a test's results reached the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadMethod {
    WebAppUi,
    #[default]
    Api,
    GithubIntegration,
    AzureDevopsIntegration,
}

/// Option accepted by `launchBinaryUploadProcessing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigurationOption {
    QuickScan,
}

/// One acknowledged part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartData {
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(rename = "PartNumber")]
    pub part_number: u32,
}

/// A reference to a remote entity by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    #[serde(default)]
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Tenant scoping attached to artifacts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub asset: String,
    pub business_units: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
}

/// Analysis tool recorded on a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
}

/// Context block of an asset as returned by `allAssets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetContext {
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub business_units: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<String>,
}

/// Transient view of an asset.
///
/// Only the fields the upload flow reads are kept; everything else the query
/// selects is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "_cursor", default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub created_by: Option<IdRef>,
    #[serde(default)]
    pub group: Option<IdRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ctx: AssetContext,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Asset {
    /// Business unit (group) the asset belongs to, if any.
    pub fn business_unit_id(&self) -> Option<&str> {
        self.group
            .as_ref()
            .map(|g| g.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// User who created the asset, if known.
    pub fn created_by_user_id(&self) -> Option<&str> {
        self.created_by
            .as_ref()
            .map(|u| u.id.as_str())
            .filter(|id| !id.is_empty())
    }
}
