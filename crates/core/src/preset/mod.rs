//! Preset catalog for transcoding operations.
//!
//! A preset is a named transcoding configuration: a closed, compile-time set
//! of argument templates for the external encoder. The catalog maps a string
//! tag to its preset; an unknown tag is a caller error surfaced at job
//! submission, never at execution time.
//!
//! # Example
//!
//! ```ignore
//! use clipforge_core::preset::PresetCatalog;
//!
//! let catalog = PresetCatalog::default();
//! let preset = catalog.resolve("Remove Audio").unwrap();
//! let args = preset.args(Path::new("/in/a.mp4"), Path::new("/out/a.mp4"));
//! assert_eq!(args[0], "-i");
//! ```

mod catalog;
mod types;

pub use catalog::PresetCatalog;
pub use types::Preset;
