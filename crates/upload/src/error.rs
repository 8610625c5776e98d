//! Upload error types.

use fsupload_api::ApiError;
use fsupload_protocol::ValidationError;
use fsupload_transfer::TransferError;

/// Errors produced during a multipart upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("upload of part {part_number} failed: {status} - {body}")]
    PartRejected {
        part_number: u32,
        status: u16,
        body: String,
    },

    #[error("upload of part {0} returned no ETag")]
    MissingEtag(u32),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("task join error: {0}")]
    Task(String),
}
