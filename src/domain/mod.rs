// Domain layer - Panels, view models and the error taxonomy
pub mod error;
pub mod panel;
pub mod panel_data;
pub mod view_model;
