//! CLI library components for `study-bulk`.

pub mod logging;
pub mod render;
