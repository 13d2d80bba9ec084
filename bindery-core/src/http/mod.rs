//! Re-exports of the axum types bindery builds on.
//!
//! Downstream crates reach axum through this module so the whole workspace
//! agrees on one axum version.

pub mod header;

pub use axum::body::{self, Body};
pub use axum::extract::{RawPathParams, Request};
pub use axum::handler::Handler;
pub use axum::response::{IntoResponse, Response};
pub use axum::routing::{self, MethodRouter};
pub use axum::{serve, Extension, Json, Router};
pub use bytes::Bytes;

pub use self::header::{
    HeaderMap, HeaderName, HeaderValue, Method, Parts, StatusCode, Uri, CONTENT_TYPE,
};
