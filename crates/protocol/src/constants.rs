//! Fixed GraphQL documents and platform constants.
//!
//! The documents are sent verbatim; the server resolves each operation by the
//! root field it selects (see [`crate::Operation::result_field`]).

/// Default number of records requested per page by paginated queries.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Test type (result file format) for Finite State binary analysis.
pub const BINARY_ANALYSIS_TEST_TYPE: &str = "finite_state_binary_analysis";

/// Tool descriptor attached to binary analysis tests.
pub const BINARY_ANALYSIS_TOOL_NAME: &str = "Finite State Binary Analysis";
pub const BINARY_ANALYSIS_TOOL_DESCRIPTION: &str =
    "SBOM and Vulnerability Analysis from Finite State Binary SCA and Binary SAST.";

// ---------------------------------------------------------------------------
// Multipart upload
// ---------------------------------------------------------------------------

pub const START_MULTIPART_UPLOAD: &str = r#"
mutation Start($testId: ID!) {
    startMultipartUploadV2(testId: $testId) {
        uploadId
        key
    }
}
"#;

pub const GENERATE_UPLOAD_PART_URL: &str = r#"
mutation GenerateUploadPartUrl($partNumber: Int!, $uploadId: ID!, $uploadKey: String!) {
    generateUploadPartUrlV2(partNumber: $partNumber, uploadId: $uploadId, uploadKey: $uploadKey) {
        key
        uploadUrl
    }
}
"#;

pub const COMPLETE_MULTIPART_UPLOAD: &str = r#"
mutation CompleteMultipartUpload($partData: [PartInput!]!, $uploadId: ID!, $uploadKey: String!) {
    completeMultipartUploadV2(partData: $partData, uploadId: $uploadId, uploadKey: $uploadKey) {
        key
    }
}
"#;

pub const LAUNCH_BINARY_UPLOAD_PROCESSING: &str = r#"
mutation LaunchBinaryUploadProcessing($key: String!, $testId: ID!) {
    launchBinaryUploadProcessing(key: $key, testId: $testId) {
        key
    }
}
"#;

/// Launch variant that declares `$configurationOptions`.
///
/// The server treats an undeclared parameter differently from an explicit
/// `null`, so this document is only sent when options are present.
pub const LAUNCH_BINARY_UPLOAD_PROCESSING_WITH_OPTIONS: &str = r#"
mutation LaunchBinaryUploadProcessing($key: String!, $testId: ID!, $configurationOptions: [BinaryAnalysisConfigurationOption]) {
    launchBinaryUploadProcessing(key: $key, testId: $testId, configurationOptions: $configurationOptions) {
        key
    }
}
"#;

// ---------------------------------------------------------------------------
// Asset versions, artifacts, tests
// ---------------------------------------------------------------------------

pub const CREATE_ASSET_VERSION: &str = r#"
mutation BapiCreateAssetVersion($assetVersionName: String!, $assetId: ID!, $createdByUserId: ID) {
    createNewAssetVersionOnAsset(assetVersionName: $assetVersionName, assetId: $assetId, createdByUserId: $createdByUserId) {
        id
        assetVersion {
            id
        }
    }
}
"#;

pub const CREATE_ARTIFACT: &str = r#"
mutation CreateArtifactMutation($input: CreateArtifactInput!) {
    createArtifact(input: $input) {
        id
        name
        assetVersion {
            id
            name
            asset {
                id
                name
            }
        }
        createdBy {
            id
            email
        }
        ctx {
            asset
            products
            businessUnits
        }
    }
}
"#;

pub const CREATE_TEST: &str = r#"
mutation CreateTestMutation($input: CreateTestInput!) {
    createTest(input: $input) {
        id
        name
        artifactUnderTest {
            id
            name
            assetVersion {
                id
                name
                asset {
                    id
                    name
                    dependentProducts {
                        id
                        name
                    }
                }
            }
        }
        createdBy {
            id
            email
        }
        ctx {
            asset
            products
            businessUnits
        }
        uploadMethod
    }
}
"#;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub const ALL_ASSETS: &str = r#"
query GetAllAssets($filter: AssetFilter!, $after: String, $first: Int) {
    allAssets(filter: $filter, after: $after, first: $first) {
        _cursor
        id
        name
        createdAt
        createdBy {
            id
            email
            __typename
        }
        group {
            id
            name
        }
        ctx {
            asset
            businessUnits
            products
        }
        defaultVersion {
            id
            name
            relativeRiskScore
        }
        versions {
            id
            name
            relativeRiskScore
            testStatuses
            __typename
        }
        __typename
    }
}
"#;
