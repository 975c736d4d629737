//! Output formatting modules.

pub mod graph;
pub mod table;

pub use graph::format_graph;
pub use table::format_table;
