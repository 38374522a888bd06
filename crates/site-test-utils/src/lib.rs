//! Shared test utilities for the Site Manager workspace.
//!
//! This crate provides a seeded in-memory site so crate test suites do not
//! each rebuild the same repository layout. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`site`]: [`SiteFixture`] builder over a [`site_store::MemoryStore`]

pub mod site;

pub use site::{SiteFixture, sample_site};
