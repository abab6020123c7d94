// Presentation layer - HTTP surface and rendering
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod render;
