//! Asset version creation followed by a binary upload.

use std::path::PathBuf;

use fsupload_api::{GraphQlTransport, PlatformApi, TestUploadParams};
use fsupload_protocol::constants::BINARY_ANALYSIS_TEST_TYPE;
use fsupload_protocol::{UploadMethod, ValidationError};
use serde_json::Value;
use tracing::info;

use crate::error::UploadError;
use crate::orchestrator::{UploadOptions, UploadOrchestrator};
use crate::part::PartUploader;

/// Artifact description used when none is given.
pub const DEFAULT_BINARY_DESCRIPTION: &str = "Firmware Binary";

/// Inputs for [`create_new_asset_version_and_upload_binary`].
#[derive(Debug, Clone, Default)]
pub struct BinaryUploadParams {
    pub asset_id: String,
    pub version: String,
    pub file_path: PathBuf,
    pub business_unit_id: Option<String>,
    pub created_by_user_id: Option<String>,
    pub product_id: Option<String>,
    pub artifact_description: Option<String>,
    pub upload_method: UploadMethod,
    pub options: UploadOptions,
}

/// Creates a new asset version with a binary-analysis artifact and test,
/// then uploads the file to that test.
///
/// Returns the launch response `data`.
pub async fn create_new_asset_version_and_upload_binary(
    transport: &dyn GraphQlTransport,
    uploader: &dyn PartUploader,
    params: BinaryUploadParams,
) -> Result<Value, UploadError> {
    if params.asset_id.trim().is_empty()
        || params.version.trim().is_empty()
        || params.file_path.as_os_str().is_empty()
    {
        return Err(ValidationError::Invalid(
            "Asset ID, Version, and File path are required".into(),
        )
        .into());
    }

    let description = params
        .artifact_description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_BINARY_DESCRIPTION.to_string());

    let test_id = PlatformApi::new(transport)
        .create_new_asset_version_artifact_and_test_for_upload(TestUploadParams {
            business_unit_id: params.business_unit_id,
            created_by_user_id: params.created_by_user_id,
            asset_id: params.asset_id,
            version: params.version,
            product_id: params.product_id,
            test_type: BINARY_ANALYSIS_TEST_TYPE.to_string(),
            artifact_description: Some(description),
            upload_method: params.upload_method,
        })
        .await?;
    info!(test_id = %test_id, "binary analysis test created");

    UploadOrchestrator::new(transport, uploader)
        .upload_file_for_binary_analysis(&test_id, &params.file_path, params.options)
        .await
}
