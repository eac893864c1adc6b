//! Files the program produces.
//!
//! # Submodules
//!
//! - [`html`]: Serializes the browser's [`Document`](crate::dom::Document) to a standalone page
//! - [`json`]: Writes the collector's per-date news files and prunes old ones
//!
//! # Output Structure
//!
//! ```text
//! news.html                  # the browser page, rewritten after every action
//!
//! data_dir/
//! ├── 2026-01-26.json
//! └── 2026-01-27.json
//! ```

pub mod html;
pub mod json;
