//! # Favorites Storage
//!
//! Favorites are persisted as one JSON document per installation. The
//! [`FavoritesBackend`] trait covers the raw I/O (load and save the whole
//! document); [`crate::favorites::FavoritesRepository`] holds the business
//! rules (ids, replace-or-append, filtering) and calls the backend after every
//! mutation.
//!
//! ## Document Shape
//!
//! An ordered JSON array of flat objects. Bookkeeping keys are camelCase; the
//! attribute keys are the field dictionary of the record's standard:
//!
//! ```json
//! [
//!   {
//!     "favoriteId": "5b0c...",
//!     "standardVersion": "2525D",
//!     "symbolTags": "Land unit;Infantry;POINT;x;10121100",
//!     "identity": "3",
//!     "symbolset": "10",
//!     "symbolentity": "121100"
//!   }
//! ]
//! ```
//!
//! Imported and exported files use the same shape.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: a JSON file, written atomically (temp file
//!   then rename). A missing file reads as an empty list.
//! - [`mem_backend::MemBackend`]: in memory, for tests; can simulate write
//!   errors.

pub mod backend;
pub mod document;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::FavoritesBackend;
pub use document::FavoriteRecord;
