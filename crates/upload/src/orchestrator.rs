//! Multipart upload state machine.
//!
//! `START → PARTS[1..N] → COMPLETE → LAUNCH`. Chunks are read and uploaded
//! strictly one after another; the first failure aborts the run.

use std::path::{Path, PathBuf};

use fsupload_api::{GraphQlTransport, execute, execute_data};
use fsupload_protocol::error::require;
use fsupload_protocol::messages::{
    CompleteUploadVariables, KeyResult, LaunchVariables, StartUploadVariables, StartedUpload,
    UploadPartUrl, UploadPartUrlVariables,
};
use fsupload_protocol::{Operation, ValidationError};
use fsupload_transfer::{ChunkReader, DEFAULT_CHUNK_SIZE, validate_upload_file};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::UploadError;
use crate::part::PartUploader;
use crate::session::UploadSession;

/// Tuning for one upload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Bytes per part. Zero selects [`DEFAULT_CHUNK_SIZE`].
    pub chunk_size: usize,
    /// Launch processing as a quick scan.
    pub quick_scan: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            quick_scan: false,
        }
    }
}

/// Drives a multipart upload through the GraphQL API and a part uploader.
pub struct UploadOrchestrator<'a> {
    transport: &'a dyn GraphQlTransport,
    uploader: &'a dyn PartUploader,
}

impl<'a> UploadOrchestrator<'a> {
    pub fn new(transport: &'a dyn GraphQlTransport, uploader: &'a dyn PartUploader) -> Self {
        Self {
            transport,
            uploader,
        }
    }

    /// Uploads `file_path` as the binary for `test_id` and launches analysis.
    ///
    /// Returns the `data` object of the launch response, whose
    /// `launchBinaryUploadProcessing.key` embeds the asset version.
    pub async fn upload_file_for_binary_analysis(
        &self,
        test_id: &str,
        file_path: &Path,
        options: UploadOptions,
    ) -> Result<Value, UploadError> {
        require(test_id, "Test ID")?;
        if file_path.as_os_str().is_empty() {
            return Err(ValidationError::Missing("File Path").into());
        }
        let file_size = validate_upload_file(file_path)?;

        info!(path = %file_path.display(), bytes = file_size, "uploading file");

        // START
        let started: StartedUpload = execute(
            self.transport,
            &Operation::StartMultipartUpload(StartUploadVariables {
                test_id: test_id.to_string(),
            }),
        )
        .await?;
        debug!(upload_id = %started.upload_id, "multipart upload started");
        let mut session = UploadSession::new(started.upload_id, started.key);

        // PARTS
        let digest = self
            .upload_parts(&mut session, file_path.to_path_buf(), options.chunk_size)
            .await?;
        info!(parts = session.parts().len(), sha256 = %digest, "all parts uploaded");

        // COMPLETE
        let upload_id = session.upload_id().to_string();
        let upload_key = session.upload_key().to_string();
        let completed: KeyResult = execute(
            self.transport,
            &Operation::CompleteMultipartUpload(CompleteUploadVariables {
                part_data: session.into_parts(),
                upload_id,
                upload_key,
            }),
        )
        .await?;
        debug!(key = %completed.key, "multipart upload completed");

        // LAUNCH
        let launched = execute_data(
            self.transport,
            &Operation::LaunchBinaryUploadProcessing(LaunchVariables::new(
                completed.key,
                test_id,
                options.quick_scan,
            )),
        )
        .await?;
        info!(quick_scan = options.quick_scan, "binary processing launched");

        Ok(launched)
    }

    /// Reads the file chunk by chunk, uploading each as the next part.
    ///
    /// Returns the SHA-256 of the uploaded bytes.
    async fn upload_parts(
        &self,
        session: &mut UploadSession,
        path: PathBuf,
        chunk_size: usize,
    ) -> Result<String, UploadError> {
        let mut reader = blocking(move || ChunkReader::new(&path, chunk_size)).await??;
        let total = reader.chunk_count();

        loop {
            let (returned, next) = blocking(move || {
                let chunk = reader.next_chunk();
                (reader, chunk)
            })
            .await?;
            reader = returned;

            let Some(chunk) = next? else {
                break;
            };

            let part_number = session.next_part_number();
            let target: UploadPartUrl = execute(
                self.transport,
                &Operation::GenerateUploadPartUrl(UploadPartUrlVariables {
                    part_number,
                    upload_id: session.upload_id().to_string(),
                    upload_key: session.upload_key().to_string(),
                }),
            )
            .await?;

            let size = chunk.len();
            let etag = self
                .uploader
                .put_part(&target.upload_url, part_number, chunk.data)
                .await?;
            session.record_part(etag);
            debug!(part = part_number, of = total, bytes = size, "part recorded");
        }

        Ok(reader.digest())
    }
}

/// Runs blocking file work off the async runtime.
async fn blocking<F, T>(f: F) -> Result<T, UploadError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| UploadError::Task(e.to_string()))
}
