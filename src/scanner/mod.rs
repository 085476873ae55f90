pub mod span;
pub mod catalog;
pub mod document;
pub mod annotator;

pub use span::*;
pub use catalog::*;
pub use document::*;
pub use annotator::*;
