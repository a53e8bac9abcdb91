// Application layer - Spec building and the sink capability
pub mod sink;
pub mod spec_builder;
