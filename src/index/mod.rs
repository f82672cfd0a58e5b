//! Secondary indexes over stored documents. Each index is independent and incrementally updateable.

pub mod keyword_index;
pub mod priority_index;

pub use keyword_index::KeywordIndex;
pub use priority_index::PriorityIndex;
