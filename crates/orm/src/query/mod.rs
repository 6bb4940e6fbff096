//! Query compiler module - structured query specifications to SQL text

pub mod compiler;
pub mod dml;
pub mod types;

pub use compiler::QueryCompiler;
pub use dml::Row;
pub use types::{Order, OrderDirection, QueryOptions, Select, SelectColumn};
