// Domain layer - Tracker schema and instruction set
pub mod schema;
pub mod tracker_spec;
