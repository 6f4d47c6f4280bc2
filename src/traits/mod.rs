//! Trait definitions for FOSSology operations.
//!
//! Each resource type implements the traits its endpoints support.

mod delete;
mod get;
mod list;

pub use delete::Delete;
pub use get::Get;
pub use list::List;
