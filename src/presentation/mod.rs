// Presentation layer - HTTP surface over the exploration use cases
pub mod api_error;
pub mod app_state;
pub mod handlers;
