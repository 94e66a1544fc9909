//! Output persistence
//!
//! Maps page URLs to deterministic filesystem locations and writes the
//! converted markdown with an atomic temp-file-then-rename pattern.

// Module declarations
pub mod path_mapper;
pub mod writer;

// Re-export public API from path_mapper module
pub use path_mapper::{PathPolicy, ResolvedPath, map_path};

// Re-export public API from writer module
pub use writer::write_output;
