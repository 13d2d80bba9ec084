//! In-process test client for bindery routers.

mod app;
pub mod json_path;

pub use app::{TestApp, TestRequest, TestResponse};
