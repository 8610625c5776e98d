//! The action run: authenticate, create records, upload, report.
//!
//! `AUTH → CREATE_VERSION_ARTIFACT_TEST → UPLOAD → EXTRACT_VERSION →
//! BUILD_URL → COMMENT`. A failing stage ends the run but everything produced
//! before it stays in the report.

use fsupload_api::{ApiError, GraphQlTransport, TokenProvider};
use fsupload_protocol::UploadMethod;
use fsupload_upload::{
    BinaryUploadParams, PartUploader, UploadOptions, create_new_asset_version_and_upload_binary,
};
use serde_json::Value;
use tracing::{error, info};

use crate::config::{ActionInputs, Settings};
use crate::github::{Commenter, GitHubContext, comment_body};
use crate::outputs::OutputSink;
use crate::version::{asset_version_from_response, asset_version_url};

/// Builds a GraphQL transport once a bearer token is known.
pub type Connect = dyn Fn(&str) -> Result<Box<dyn GraphQlTransport>, ApiError> + Send + Sync;

/// External services the run talks to.
pub struct Collaborators<'a> {
    pub tokens: &'a dyn TokenProvider,
    pub connect: &'a Connect,
    pub uploader: &'a dyn PartUploader,
    pub commenter: Option<&'a dyn Commenter>,
}

/// Everything the run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowReport {
    /// Launch response, pretty-printed.
    pub response: Option<String>,
    pub asset_version: Option<String>,
    pub asset_version_url: Option<String>,
    /// Set when the run failed.
    pub error: Option<String>,
}

impl WorkflowReport {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    fn fail(mut self, message: String) -> Self {
        error!("{message}");
        self.error = Some(message);
        self
    }

    /// Writes every available output.
    pub fn write_outputs(&self, sink: &mut dyn OutputSink) -> std::io::Result<()> {
        if let Some(response) = &self.response {
            sink.set_multiline_output("response", response)?;
        }
        if let Some(url) = &self.asset_version_url {
            sink.set_output("asset-version-url", url)?;
        }
        if let Some(error) = &self.error {
            sink.set_multiline_output("error", error)?;
        }
        Ok(())
    }
}

/// Runs the action end to end.
pub async fn run(
    inputs: &ActionInputs,
    settings: &Settings,
    github: &GitHubContext,
    services: Collaborators<'_>,
) -> WorkflowReport {
    let report = WorkflowReport::default();

    if inputs.automatic_comment && inputs.github_token.is_none() {
        return report.fail(
            "The [Github Token] input is required when [Automatic comment] is enabled.".into(),
        );
    }

    // AUTH
    info!("Starting - Authentication");
    let token = match services.tokens.token().await {
        Ok(token) => token,
        Err(e) => {
            return report.fail(format!(
                "Caught an exception trying to get and auth token on Finite State: {e}"
            ));
        }
    };

    // CREATE_VERSION_ARTIFACT_TEST + UPLOAD
    info!("Starting - Create new asset version and upload binary");
    let data = match create_and_upload(inputs, settings, &token, &services).await {
        Ok(data) => data,
        Err(e) => {
            return report.fail(format!(
                "Caught an exception trying to create new asset version and upload binary: {e}"
            ));
        }
    };
    info!("File uploaded - Extracting asset version");
    run_after_upload(report, inputs, settings, github, services.commenter, data).await
}

async fn create_and_upload(
    inputs: &ActionInputs,
    settings: &Settings,
    token: &str,
    services: &Collaborators<'_>,
) -> Result<Value, fsupload_upload::UploadError> {
    let transport = (services.connect)(token)?;
    let params = BinaryUploadParams {
        asset_id: inputs.asset_id.clone(),
        version: inputs.version.clone(),
        file_path: inputs.file_path.clone(),
        business_unit_id: inputs.business_unit_id.clone(),
        created_by_user_id: inputs.created_by_user_id.clone(),
        product_id: inputs.product_id.clone(),
        artifact_description: inputs.artifact_description.clone(),
        upload_method: UploadMethod::GithubIntegration,
        options: UploadOptions {
            chunk_size: settings.chunk_size,
            quick_scan: inputs.quick_scan,
        },
    };
    create_new_asset_version_and_upload_binary(transport.as_ref(), services.uploader, params).await
}

/// EXTRACT_VERSION, BUILD_URL and COMMENT.
async fn run_after_upload(
    mut report: WorkflowReport,
    inputs: &ActionInputs,
    settings: &Settings,
    github: &GitHubContext,
    commenter: Option<&dyn Commenter>,
    data: Value,
) -> WorkflowReport {
    report.response = Some(serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string()));

    let Some(version) = asset_version_from_response(&data) else {
        return report.fail(format!("Response from Finite State API invalid: {data}"));
    };
    let url = asset_version_url(&settings.platform_url, &inputs.asset_id, &version);
    info!(url = %url, "Asset version URL");
    report.asset_version = Some(version);
    report.asset_version_url = Some(url.clone());

    if !inputs.automatic_comment {
        info!("Automatic comment disabled");
        return report;
    }
    if !github.is_pull_request() {
        info!("Automatic comment enabled. But this isn't a pull request. Skip generating comment...");
        return report;
    }
    info!("Automatic comment enabled. Generating comment...");

    let target = github
        .pull_request_number()
        .zip(github.owner())
        .zip(github.repository_name());
    let Some(((number, owner), repo)) = target else {
        return report.fail("Failed to post pull request comment: Pull request number is missing.".into());
    };
    let Some(commenter) = commenter else {
        return report.fail("Failed to post pull request comment: no GitHub client configured".into());
    };

    if let Err(e) = commenter
        .create_comment(owner, repo, number, &comment_body(&url))
        .await
    {
        return report.fail(format!("Failed to post pull request comment: {e}"));
    }
    report
}
