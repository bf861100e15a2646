//! Command implementations for the semerr CLI
//!
//! Each command has its own module with an `Args` struct and a `run` function.

pub mod catalog;
pub mod check;
pub mod dedup;
pub mod score;

pub use catalog::CatalogArgs;
pub use check::CheckArgs;
pub use dedup::DedupArgs;
pub use score::ScoreArgs;
