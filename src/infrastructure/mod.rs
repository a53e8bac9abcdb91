// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod sheets_sink;
pub mod xlsx_sink;
