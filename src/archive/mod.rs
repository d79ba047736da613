//! Read-only access to distribution archives.
//!
//! # Sub-modules
//!
//! - [`digest`] - SHA-256 of the archive file for reports.
//! - [`format`] - Supported formats and archive-name parsing.
//! - [`lister`] - The [`lister::ArchiveLister`] capability and its tar backend.
//! - [`manifest`] - The normalised member set used for lookups.

pub mod digest;
pub mod format;
pub mod lister;
pub mod manifest;

pub use format::{ArchiveFormat, ArchiveName};
pub use lister::{ArchiveLister, TarArchiveLister};
pub use manifest::ArchiveManifest;
