//! The closed set of GraphQL operations the client sends.
//!
//! Each variant pairs a fixed document with its typed variable shape, so a
//! request can only be built from variables that passed validation.

use crate::constants;
use crate::envelope::GraphQlRequest;
use crate::error::{RequestError, ValidationError};
use crate::messages::{
    AllAssetsVariables, CompleteUploadVariables, CreateArtifactVariables,
    CreateAssetVersionVariables, CreateTestVariables, LaunchVariables, StartUploadVariables,
    UploadPartUrlVariables,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    StartMultipartUpload(StartUploadVariables),
    GenerateUploadPartUrl(UploadPartUrlVariables),
    CompleteMultipartUpload(CompleteUploadVariables),
    LaunchBinaryUploadProcessing(LaunchVariables),
    CreateAssetVersion(CreateAssetVersionVariables),
    CreateArtifact(CreateArtifactVariables),
    CreateTest(CreateTestVariables),
    AllAssets(AllAssetsVariables),
}

impl Operation {
    /// Operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartMultipartUpload(_) => "Start",
            Self::GenerateUploadPartUrl(_) => "GenerateUploadPartUrl",
            Self::CompleteMultipartUpload(_) => "CompleteMultipartUpload",
            Self::LaunchBinaryUploadProcessing(_) => "LaunchBinaryUploadProcessing",
            Self::CreateAssetVersion(_) => "BapiCreateAssetVersion",
            Self::CreateArtifact(_) => "CreateArtifactMutation",
            Self::CreateTest(_) => "CreateTestMutation",
            Self::AllAssets(_) => "GetAllAssets",
        }
    }

    /// Key of `data` holding this operation's result.
    pub fn result_field(&self) -> &'static str {
        match self {
            Self::StartMultipartUpload(_) => "startMultipartUploadV2",
            Self::GenerateUploadPartUrl(_) => "generateUploadPartUrlV2",
            Self::CompleteMultipartUpload(_) => "completeMultipartUploadV2",
            Self::LaunchBinaryUploadProcessing(_) => "launchBinaryUploadProcessing",
            Self::CreateAssetVersion(_) => "createNewAssetVersionOnAsset",
            Self::CreateArtifact(_) => "createArtifact",
            Self::CreateTest(_) => "createTest",
            Self::AllAssets(_) => "allAssets",
        }
    }

    /// The GraphQL document for this operation.
    pub fn document(&self) -> &'static str {
        match self {
            Self::StartMultipartUpload(_) => constants::START_MULTIPART_UPLOAD,
            Self::GenerateUploadPartUrl(_) => constants::GENERATE_UPLOAD_PART_URL,
            Self::CompleteMultipartUpload(_) => constants::COMPLETE_MULTIPART_UPLOAD,
            Self::LaunchBinaryUploadProcessing(vars) => {
                if vars.configuration_options.is_some() {
                    constants::LAUNCH_BINARY_UPLOAD_PROCESSING_WITH_OPTIONS
                } else {
                    constants::LAUNCH_BINARY_UPLOAD_PROCESSING
                }
            }
            Self::CreateAssetVersion(_) => constants::CREATE_ASSET_VERSION,
            Self::CreateArtifact(_) => constants::CREATE_ARTIFACT,
            Self::CreateTest(_) => constants::CREATE_TEST,
            Self::AllAssets(_) => constants::ALL_ASSETS,
        }
    }

    /// Checks required fields without touching the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::StartMultipartUpload(v) => v.validate(),
            Self::GenerateUploadPartUrl(v) => v.validate(),
            Self::CompleteMultipartUpload(v) => v.validate(),
            Self::LaunchBinaryUploadProcessing(v) => v.validate(),
            Self::CreateAssetVersion(v) => v.validate(),
            Self::CreateArtifact(v) => v.validate(),
            Self::CreateTest(v) => v.validate(),
            Self::AllAssets(_) => Ok(()),
        }
    }

    /// Validates, then serializes into a request body.
    pub fn to_request(&self) -> Result<GraphQlRequest, RequestError> {
        self.validate()?;
        let document = self.document();
        let request = match self {
            Self::StartMultipartUpload(v) => GraphQlRequest::new(document, v),
            Self::GenerateUploadPartUrl(v) => GraphQlRequest::new(document, v),
            Self::CompleteMultipartUpload(v) => GraphQlRequest::new(document, v),
            Self::LaunchBinaryUploadProcessing(v) => GraphQlRequest::new(document, v),
            Self::CreateAssetVersion(v) => GraphQlRequest::new(document, v),
            Self::CreateArtifact(v) => GraphQlRequest::new(document, v),
            Self::CreateTest(v) => GraphQlRequest::new(document, v),
            Self::AllAssets(v) => GraphQlRequest::new(document, v),
        }?;
        Ok(request)
    }
}
