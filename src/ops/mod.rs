pub mod application_ops;
pub mod partition;
pub mod reorder;
