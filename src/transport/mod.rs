//! HTTP transport used to reach the ingestion endpoint.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client seam used by the delivery controller ([`HttpClient`])
//! - The production client backed by reqwest ([`ReqwestClient`])
//! - Transport-level failures ([`HttpError`])

mod client;
mod error;
mod request;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
