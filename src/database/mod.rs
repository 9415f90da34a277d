//! Tagmark database layer.
//!
//! Provides the JSON-file backed bookmark [`Database`].
//!
//! # Usage
//!
//! ```no_run
//! use tagmark::database::Database;
//!
//! // Load (or start) the database stored at a path
//! let db = Database::open("db.json").expect("failed to open database");
//!
//! // Or keep everything in memory for testing
//! let scratch = Database::new();
//!
//! // Write the full snapshot back to disk
//! db.persist().expect("failed to persist database");
//! ```

pub mod snapshot;
pub mod store;

pub use store::Database;
