//! Tubely video record datastore.
//!
//! [`VideoRepository`] is the datastore seen by the upload pipeline. Production uses
//! [`PgVideoRepository`]; [`InMemoryVideoRepository`] backs development runs without a
//! database and the test suites.

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
