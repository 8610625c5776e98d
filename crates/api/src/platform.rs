//! Asset, artifact and test operations.
//!
//! Each call validates its parameters before anything is sent, issues one
//! fixed GraphQL document and returns the single relevant field of `data`.

use fsupload_protocol::constants::{
    BINARY_ANALYSIS_TEST_TYPE, BINARY_ANALYSIS_TOOL_DESCRIPTION, BINARY_ANALYSIS_TOOL_NAME,
};
use fsupload_protocol::messages::{
    AllAssetsVariables, CreateArtifactInput, CreateArtifactVariables,
    CreateAssetVersionVariables, CreateTestInput, CreateTestVariables, CreatedAssetVersion,
    CreatedEntity,
};
use fsupload_protocol::{Asset, Context, Operation, Tool, UploadMethod, ValidationError};
use tracing::{debug, info};

use crate::client::{GraphQlTransport, execute};
use crate::error::ApiError;
use crate::paginate::collect_all;

/// Default artifact description for binary-analysis uploads.
pub const DEFAULT_BINARY_ARTIFACT_DESCRIPTION: &str = "Binary";

/// Default artifact description for any other test type.
pub const DEFAULT_ARTIFACT_DESCRIPTION: &str = "Unspecified Artifact";

/// Parameters for [`PlatformApi::create_artifact`].
#[derive(Debug, Clone, Default)]
pub struct CreateArtifactParams {
    pub business_unit_id: String,
    pub created_by_user_id: String,
    pub asset_version_id: String,
    pub artifact_name: String,
    pub products: Option<Vec<String>>,
}

/// Parameters for [`PlatformApi::create_test`] and its specializations.
#[derive(Debug, Clone, Default)]
pub struct CreateTestParams {
    pub business_unit_id: String,
    pub created_by_user_id: String,
    pub asset_id: String,
    pub artifact_id: String,
    pub test_name: String,
    pub test_type: String,
    pub tools: Vec<Tool>,
    pub upload_method: UploadMethod,
    pub products: Option<Vec<String>>,
}

/// Parameters for [`PlatformApi::create_new_asset_version_artifact_and_test_for_upload`].
///
/// Business unit and creator fall back to the existing asset's values.
#[derive(Debug, Clone, Default)]
pub struct TestUploadParams {
    pub business_unit_id: Option<String>,
    pub created_by_user_id: Option<String>,
    pub asset_id: String,
    pub version: String,
    pub product_id: Option<String>,
    pub test_type: String,
    pub artifact_description: Option<String>,
    pub upload_method: UploadMethod,
}

/// Platform operations over a GraphQL transport.
pub struct PlatformApi<'a> {
    transport: &'a dyn GraphQlTransport,
}

impl<'a> PlatformApi<'a> {
    pub fn new(transport: &'a dyn GraphQlTransport) -> Self {
        Self { transport }
    }

    pub async fn create_asset_version_on_asset(
        &self,
        asset_id: &str,
        asset_version_name: &str,
        created_by_user_id: Option<&str>,
    ) -> Result<CreatedAssetVersion, ApiError> {
        let op = Operation::CreateAssetVersion(CreateAssetVersionVariables {
            asset_version_name: asset_version_name.to_string(),
            asset_id: asset_id.to_string(),
            created_by_user_id: created_by_user_id
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        });
        execute(self.transport, &op).await
    }

    /// Creates an artifact on an asset version.
    ///
    /// The artifact's `ctx.asset` is the asset version ID.
    pub async fn create_artifact(
        &self,
        params: CreateArtifactParams,
    ) -> Result<CreatedEntity, ApiError> {
        let op = Operation::CreateArtifact(CreateArtifactVariables {
            input: CreateArtifactInput {
                name: params.artifact_name,
                created_by: params.created_by_user_id,
                ctx: Context {
                    asset: params.asset_version_id.clone(),
                    business_units: vec![params.business_unit_id],
                    products: params.products,
                },
                asset_version: params.asset_version_id,
            },
        });
        execute(self.transport, &op).await
    }

    pub async fn create_test(&self, params: CreateTestParams) -> Result<CreatedEntity, ApiError> {
        let op = Operation::CreateTest(CreateTestVariables {
            input: CreateTestInput {
                name: params.test_name,
                created_by: params.created_by_user_id,
                artifact_under_test: params.artifact_id,
                test_result_file_format: params.test_type,
                ctx: Context {
                    asset: params.asset_id,
                    business_units: vec![params.business_unit_id],
                    products: params.products,
                },
                tools: params.tools,
                upload_method: params.upload_method,
            },
        });
        execute(self.transport, &op).await
    }

    /// Creates a Finite State binary-analysis test; test type and tool are fixed.
    pub async fn create_test_as_binary_analysis(
        &self,
        params: CreateTestParams,
    ) -> Result<CreatedEntity, ApiError> {
        self.create_test(CreateTestParams {
            test_type: BINARY_ANALYSIS_TEST_TYPE.to_string(),
            tools: vec![Tool {
                name: BINARY_ANALYSIS_TOOL_NAME.to_string(),
                description: BINARY_ANALYSIS_TOOL_DESCRIPTION.to_string(),
            }],
            ..params
        })
        .await
    }

    pub async fn create_test_as_third_party_scanner(
        &self,
        params: CreateTestParams,
    ) -> Result<CreatedEntity, ApiError> {
        self.create_test(params).await
    }

    /// Lists assets, optionally filtered by asset ID and business unit.
    pub async fn get_all_assets(
        &self,
        asset_id: Option<&str>,
        business_unit_id: Option<&str>,
    ) -> Result<Vec<Asset>, ApiError> {
        let op = Operation::AllAssets(AllAssetsVariables::new(asset_id, business_unit_id));
        let records = collect_all(
            self.transport,
            op.to_request()?,
            op.result_field(),
            None,
        )
        .await?;

        records
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(ApiError::from))
            .collect()
    }

    /// Creates an asset version, an artifact and a test for an upload, and
    /// returns the new test's ID.
    pub async fn create_new_asset_version_artifact_and_test_for_upload(
        &self,
        params: TestUploadParams,
    ) -> Result<String, ApiError> {
        if params.asset_id.trim().is_empty() || params.version.trim().is_empty() {
            return Err(ValidationError::Invalid("Asset ID and Version are required".into()).into());
        }

        let asset = self
            .get_all_assets(Some(&params.asset_id), None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Protocol(format!("asset {} not found", params.asset_id)))?;

        let mut asset_products = asset.ctx.products.clone();
        let product_id = params.product_id.filter(|id| !id.is_empty());
        if let Some(product_id) = &product_id {
            if !asset_products.contains(product_id) {
                asset_products.push(product_id.clone());
            }
        }

        let business_unit_id = params
            .business_unit_id
            .filter(|id| !id.is_empty())
            .or_else(|| asset.business_unit_id().map(str::to_string));
        let created_by_user_id = params
            .created_by_user_id
            .filter(|id| !id.is_empty())
            .or_else(|| asset.created_by_user_id().map(str::to_string));
        let (Some(business_unit_id), Some(created_by_user_id)) =
            (business_unit_id, created_by_user_id)
        else {
            return Err(ValidationError::Invalid(
                "Business Unit ID and Created By User ID are required and could not be retrieved from the existing asset".into(),
            )
            .into());
        };

        let version = self
            .create_asset_version_on_asset(
                &params.asset_id,
                &params.version,
                Some(&created_by_user_id),
            )
            .await?;
        let asset_version_id = version.asset_version.id;
        info!(asset_version_id = %asset_version_id, version = %params.version, "created asset version");

        let binary = params.test_type == BINARY_ANALYSIS_TEST_TYPE;
        let description = params
            .artifact_description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| {
                if binary {
                    DEFAULT_BINARY_ARTIFACT_DESCRIPTION.to_string()
                } else {
                    DEFAULT_ARTIFACT_DESCRIPTION.to_string()
                }
            });
        let artifact_name = format!("{} {} - {}", asset.name, params.version, description);

        let artifact_products = if binary {
            Some(asset_products.clone())
        } else {
            product_id.clone().map(|id| vec![id])
        };
        let artifact = self
            .create_artifact(CreateArtifactParams {
                business_unit_id: business_unit_id.clone(),
                created_by_user_id: created_by_user_id.clone(),
                asset_version_id,
                artifact_name,
                products: artifact_products,
            })
            .await?;
        debug!(artifact_id = %artifact.id, "created artifact");

        let test = if binary {
            self.create_test_as_binary_analysis(CreateTestParams {
                business_unit_id,
                created_by_user_id,
                asset_id: params.asset_id,
                artifact_id: artifact.id,
                test_name: format!("{} {} - Finite State Binary Analysis", asset.name, params.version),
                upload_method: params.upload_method,
                products: product_id.map(|id| vec![id]),
                ..Default::default()
            })
            .await?
        } else {
            self.create_test_as_third_party_scanner(CreateTestParams {
                business_unit_id,
                created_by_user_id,
                asset_id: params.asset_id,
                artifact_id: artifact.id,
                test_name: format!("{} {} - {}", asset.name, params.version, params.test_type),
                test_type: params.test_type,
                tools: Vec::new(),
                upload_method: params.upload_method,
                products: Some(asset_products),
            })
            .await?
        };

        info!(test_id = %test.id, "created test");
        Ok(test.id)
    }
}
