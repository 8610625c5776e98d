//! Multipart binary upload to the Finite State platform.
//!
//! The upload runs as a strict sequence with no branching back:
//!
//! 1. **Start**: `startMultipartUploadV2` opens an upload for a test
//! 2. **Parts**: for each chunk, request a pre-signed URL and PUT the bytes
//! 3. **Complete**: `completeMultipartUploadV2` with every `{ETag, PartNumber}`
//! 4. **Launch**: `launchBinaryUploadProcessing`, optionally as a quick scan
//!
//! Any failure aborts the remainder. Nothing is retried and partial uploads
//! are left for the server to expire.

pub mod error;
pub mod orchestrator;
pub mod part;
pub mod pipeline;
pub mod session;

// Re-export primary types for convenience.
pub use error::UploadError;
pub use orchestrator::{UploadOptions, UploadOrchestrator};
pub use part::{HttpPartUploader, PartUploader};
pub use pipeline::{
    BinaryUploadParams, DEFAULT_BINARY_DESCRIPTION, create_new_asset_version_and_upload_binary,
};
pub use session::UploadSession;
