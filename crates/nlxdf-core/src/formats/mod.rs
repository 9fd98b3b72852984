//! # Formats
//!
//! On-disk inputs understood by nlxdf-core.
//!
//! - `session_dump`: JSON session dumps and the `DumpLoader` that serves them

pub mod session_dump;

pub use session_dump::{DumpLoader, DumpStream, SessionDump};
