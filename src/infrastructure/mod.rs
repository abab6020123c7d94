// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod clients;
pub mod config;
pub mod http_response;
pub mod http_source;
