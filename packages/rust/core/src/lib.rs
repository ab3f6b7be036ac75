//! Content pipeline for Vitae.
//!
//! Discovered modules are loaded into typed records (`loader`), ordered and
//! grouped for display (`aggregate`), collected into one [`catalog::Catalog`],
//! and handed to the site templates as JSON (`export`).

pub mod aggregate;
pub mod catalog;
pub mod export;
pub mod loader;
pub mod records;
