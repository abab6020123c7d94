// Application layer - Refresh pipeline use cases and the ports it depends on
pub mod dashboard_context;
pub mod data_client;
pub mod json_source;
pub mod panel_store;
pub mod scheduler;
pub mod view_builder;
