//! Finite State binary upload action entry point.

mod config;
mod github;
mod outputs;
mod version;
mod workflow;

use fsupload_api::{ApiError, ClientCredentials, GraphQlClient, GraphQlTransport};
use fsupload_upload::HttpPartUploader;
use tracing_subscriber::EnvFilter;

use crate::config::{ActionInputs, Settings};
use crate::github::{Commenter, GitHubContext, GithubCommenter};
use crate::outputs::{GithubOutputFile, LogOutputs, OutputSink, workflow_command};
use crate::workflow::Collaborators;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Finite State binary upload"
    );

    let mut sink: Box<dyn OutputSink> = match GithubOutputFile::from_env() {
        Some(file) => Box::new(file),
        None => Box::new(LogOutputs),
    };

    let inputs = match ActionInputs::from_env() {
        Ok(inputs) => inputs,
        Err(e) => {
            println!("{}", workflow_command("error", &e.to_string()));
            std::process::exit(1);
        }
    };
    for secret in inputs.secrets() {
        println!("{}", workflow_command("add-mask", secret));
    }

    let settings = Settings::load()?;
    let github = GitHubContext::from_env();
    tracing::debug!(graphql_url = %settings.graphql_url, "settings resolved");

    let tokens = ClientCredentials::new(
        &settings.token_url,
        &settings.audience,
        &inputs.client_id,
        &inputs.client_secret,
    );
    let graphql_url = settings.graphql_url.clone();
    let organization_context = inputs.organization_context.clone();
    let connect = move |token: &str| -> Result<Box<dyn GraphQlTransport>, ApiError> {
        Ok(Box::new(GraphQlClient::new(
            graphql_url.clone(),
            token,
            &organization_context,
        )?))
    };
    let uploader = HttpPartUploader::new();
    let commenter = match &inputs.github_token {
        Some(token) => Some(GithubCommenter::new(&settings.github_api_url, token)?),
        None => None,
    };

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(workflow::run(
        &inputs,
        &settings,
        &github,
        Collaborators {
            tokens: &tokens,
            connect: &connect,
            uploader: &uploader,
            commenter: commenter.as_ref().map(|c| c as &dyn Commenter),
        },
    ));

    report.write_outputs(sink.as_mut())?;

    if report.failed() {
        let error = report.error.as_deref().unwrap_or_default();
        println!("{}", workflow_command("error", error));
        std::process::exit(1);
    }

    tracing::info!(asset_version = ?report.asset_version, "upload finished");
    Ok(())
}
