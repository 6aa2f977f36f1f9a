//! Task storage for the learning tracker
//!
//! This crate provides one storage contract for the ordered list of plan
//! days and three interchangeable backends: a JSON file, SQLite, and a
//! MongoDB collection. A record's identity is its position in the list
//! written by the last full replace.

mod collection;
mod config;
mod document;
mod error;
mod file;
#[cfg(feature = "mongodb")]
mod mongo;
mod sqlite;
mod store;
mod traits;

pub use collection::*;
pub use config::*;
pub use document::*;
pub use error::*;
pub use file::*;
#[cfg(feature = "mongodb")]
pub use mongo::*;
pub use sqlite::*;
pub use store::*;
pub use traits::*;
