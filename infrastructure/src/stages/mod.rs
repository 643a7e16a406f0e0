//! Remote stage services

mod http_client;

pub use http_client::HttpStageClient;
