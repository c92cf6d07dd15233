//! HTTP transport: request description and the authenticated client

mod client;
mod request;

pub use client::{ApiClient, ApiClientBuilder};
pub use request::{ApiRequest, FormPart, MultipartBody, RequestBody, RequestContext};
