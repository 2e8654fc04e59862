pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{IdeaSource, MediaType, PostFormat, Tone};
pub use error::CoreError;
pub use structs::{
    AccountSnapshot, ContentStrategy, DailyJoinedRow, PostIdea, PostIdeaDraft, PostRecord,
};
