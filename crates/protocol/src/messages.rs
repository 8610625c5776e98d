use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{ValidationError, require};
use crate::types::{ConfigurationOption, Context, IdRef, PartData, Tool, UploadMethod};

// ---------------------------------------------------------------------------
// Request variables
// ---------------------------------------------------------------------------

/// Variables for `startMultipartUploadV2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartUploadVariables {
    pub test_id: String,
}

impl StartUploadVariables {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.test_id, "Test ID")
    }
}

/// Variables for `generateUploadPartUrlV2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPartUrlVariables {
    pub part_number: u32,
    pub upload_id: String,
    pub upload_key: String,
}

impl UploadPartUrlVariables {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.part_number == 0 {
            return Err(ValidationError::Invalid(
                "part numbers start at 1".into(),
            ));
        }
        require(&self.upload_id, "Upload ID")?;
        require(&self.upload_key, "Upload key")
    }
}

/// Variables for `completeMultipartUploadV2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadVariables {
    pub part_data: Vec<PartData>,
    pub upload_id: String,
    pub upload_key: String,
}

impl CompleteUploadVariables {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.upload_id, "Upload ID")?;
        require(&self.upload_key, "Upload key")?;
        for (i, part) in self.part_data.iter().enumerate() {
            if part.part_number as usize != i + 1 {
                return Err(ValidationError::Invalid(format!(
                    "part {} is out of sequence at position {}",
                    part.part_number,
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

/// Variables for `launchBinaryUploadProcessing`.
///
/// `configuration_options` is omitted from the variable set entirely when
/// `None`; it is never sent as `null` or an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchVariables {
    pub key: String,
    pub test_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_options: Option<Vec<ConfigurationOption>>,
}

impl LaunchVariables {
    /// Builds launch variables, requesting a quick scan when `quick_scan` is set.
    pub fn new(key: impl Into<String>, test_id: impl Into<String>, quick_scan: bool) -> Self {
        Self {
            key: key.into(),
            test_id: test_id.into(),
            configuration_options: quick_scan.then(|| vec![ConfigurationOption::QuickScan]),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.key, "Upload key")?;
        require(&self.test_id, "Test ID")
    }
}

/// Variables for `createNewAssetVersionOnAsset`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetVersionVariables {
    pub asset_version_name: String,
    pub asset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<String>,
}

impl CreateAssetVersionVariables {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.asset_id, "Asset ID")?;
        require(&self.asset_version_name, "Asset version name")
    }
}

/// Input object for `createArtifact`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactInput {
    pub name: String,
    pub created_by: String,
    pub asset_version: String,
    pub ctx: Context,
}

/// Variables for `createArtifact`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateArtifactVariables {
    pub input: CreateArtifactInput,
}

impl CreateArtifactVariables {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let input = &self.input;
        require_business_unit(&input.ctx)?;
        require(&input.created_by, "Created by user ID")?;
        require(&input.asset_version, "Asset version ID")?;
        require(&input.name, "Artifact name")
    }
}

/// Input object for `createTest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestInput {
    pub name: String,
    pub created_by: String,
    pub artifact_under_test: String,
    pub test_result_file_format: String,
    pub ctx: Context,
    pub tools: Vec<Tool>,
    pub upload_method: UploadMethod,
}

/// Variables for `createTest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTestVariables {
    pub input: CreateTestInput,
}

impl CreateTestVariables {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let input = &self.input;
        require_business_unit(&input.ctx)?;
        require(&input.created_by, "Created by user ID")?;
        require(&input.ctx.asset, "Asset ID")?;
        require(&input.artifact_under_test, "Artifact ID")?;
        require(&input.name, "Test name")?;
        require(&input.test_result_file_format, "Test type")
    }
}

/// Filter for `allAssets`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<IdRef>,
}

/// Variables for `allAssets`.
///
/// `after` is always present; `null` asks for the first page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllAssetsVariables {
    pub filter: AssetFilter,
    pub after: Option<String>,
    pub first: u32,
}

impl AllAssetsVariables {
    /// Filters by asset and/or business unit, starting at the first page.
    pub fn new(asset_id: Option<&str>, business_unit_id: Option<&str>) -> Self {
        Self {
            filter: AssetFilter {
                id: asset_id.map(str::to_string),
                group: business_unit_id.map(IdRef::new),
            },
            after: None,
            first: DEFAULT_PAGE_SIZE,
        }
    }
}

fn require_business_unit(ctx: &Context) -> Result<(), ValidationError> {
    match ctx.business_units.first() {
        Some(id) => require(id, "Business unit ID"),
        None => Err(ValidationError::Missing("Business unit ID")),
    }
}

// ---------------------------------------------------------------------------
// Result payloads
// ---------------------------------------------------------------------------

/// `startMultipartUploadV2` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedUpload {
    pub upload_id: String,
    pub key: String,
}

/// `generateUploadPartUrlV2` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPartUrl {
    #[serde(default)]
    pub key: Option<String>,
    pub upload_url: String,
}

/// Result carrying only an object key: `completeMultipartUploadV2` and
/// `launchBinaryUploadProcessing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    pub key: String,
}

/// `createNewAssetVersionOnAsset` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAssetVersion {
    #[serde(default)]
    pub id: Option<String>,
    pub asset_version: IdRef,
}

/// `createArtifact` / `createTest` result; only the ID is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedEntity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
