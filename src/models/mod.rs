//! Data models for the festivals server

pub mod festival;
pub mod filter;

// Re-export commonly used types
pub use festival::{Festival, FestivalSlug, MapMarker, ProgramItem};
pub use filter::{Filter, MonthId, PageQuery, SortMode};
