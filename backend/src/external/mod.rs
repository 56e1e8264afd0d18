//! External API integrations

pub mod paddy_api;

pub use paddy_api::{PaddyApiClient, RemoteError, RemoteResource, ResourceApi};
