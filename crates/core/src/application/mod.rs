// Application Layer - Use Cases and Business Logic

pub mod assembler;
pub mod builtin_catalog;
pub mod catalog_check;
pub mod policy;

// Re-exports
pub use assembler::ReportAssembler;
pub use builtin_catalog::builtin_catalog;
pub use catalog_check::{check_catalog, CatalogViolation};
pub use policy::{render_output, RenderedOutput};
