pub mod creator;
pub mod fallback;
pub mod text;

pub use creator::infer_collection_creator;
pub use fallback::FallbackChain;
pub use text::{clean_text, reverse_name, strip_punctuation, title_case};
