pub mod dialect;
pub mod field;
pub mod report;
pub mod source;
pub mod table;

pub use dialect::*;
pub use field::*;
pub use report::*;
pub use source::*;
pub use table::*;
