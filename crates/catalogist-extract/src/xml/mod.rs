pub mod document;
pub mod path;

pub use document::{Document, Element};
pub use path::{Path, PathResolver};
