pub mod initialization;
pub mod tracing;
