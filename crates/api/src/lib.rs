//! Finite State platform API client.
//!
//! Provides an async GraphQL client for the platform endpoint, a cursor
//! paginator, the asset/artifact/test operations the upload flow needs and a
//! client-credentials token provider.
//!
//! Everything above the HTTP layer talks to a [`GraphQlTransport`], so the
//! operations can be exercised against in-memory transports.

pub mod auth;
pub mod client;
pub mod error;
pub mod paginate;
pub mod platform;

pub use auth::{ClientCredentials, TokenProvider};
pub use client::{GraphQlClient, GraphQlTransport, execute, execute_data};
pub use error::ApiError;
pub use paginate::collect_all;
pub use platform::{
    CreateArtifactParams, CreateTestParams, PlatformApi, TestUploadParams,
};

/// Default GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://platform.finitestate.io/api/v1/graphql";

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://platform.finitestate.io/api/v1/auth/token";
