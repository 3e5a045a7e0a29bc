pub mod document;
pub mod page;
pub mod repository;

pub use document::*;
pub use page::*;
pub use repository::*;
