pub mod constants;
pub mod envelope;
pub mod error;
pub mod messages;
pub mod operations;
pub mod types;

// Re-export primary types for convenience.
pub use envelope::{GraphQlRequest, GraphQlResponse};
pub use error::{RequestError, ValidationError};
pub use operations::Operation;
pub use types::{
    Asset, ConfigurationOption, Context, IdRef, PartData, Tool, UploadMethod,
};
