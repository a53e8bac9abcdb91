// Presentation layer - CLI surface
pub mod cli;
