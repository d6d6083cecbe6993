#![cfg_attr(docsrs, feature(doc_cfg))]
//! HMxml reconstruction parameter files: load, edit, save and split into
//! per-chunk jobs.
//!
//! ```rust,no_run
//! use hmxml::{names, Editor, ParseOptions, WriteOptions};
//!
//! # fn run() -> Result<(), hmxml::HmError> {
//! let parsed = hmxml::load("settings.xml", &ParseOptions::default())?;
//! for diagnostic in &parsed.diagnostics {
//!     eprintln!("warning: {diagnostic}");
//! }
//! let mut editor = Editor::new(parsed.document);
//! editor.on_change(|change| println!("{change}"));
//! editor.set(names::IMAGE_CENTRE, "1012.25")?;
//! editor.save("settings_used.xml", &WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ```rust,no_run
//! use hmxml::{ChunkPlan, ParseOptions, WriteOptions};
//!
//! # fn run() -> Result<(), hmxml::HmError> {
//! let template = hmxml::load("settings.xml", &ParseOptions::default())?.document;
//! let chunks = ChunkPlan::new(0, 2672, 16).log_dir("/tmp/recon").split(&template)?;
//! hmxml::write_chunks("/tmp/recon", &chunks, &WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub use hm_model as model;
pub use hm_schema as schema;
pub use hm_schema::names;
pub use hm_xml as xml;

mod chunk;
mod editor;
mod io;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use chunk::{write_chunks, Chunk, ChunkPlan, JobSettings};
pub use editor::{Change, Editor};
#[cfg(feature = "async")]
pub use io::{load_async, save_async};
pub use io::{load, load_str, save, to_string};

pub use hm_model::{
    Annotated, Diagnostic, DocumentRoot, Fbp, HmXml, Issue, Marked, ModelError, Parsed,
    ParseOptions, Strictness, Tracked,
};
pub use hm_xml::WriteOptions;

/// Error type produced by the facade.
#[derive(Debug, Error)]
pub enum HmError {
    /// Decoding, encoding or editing the document failed.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A chunk plan that cannot be split.
    #[error("chunk plan: {0}")]
    Chunk(String),
}

impl HmError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        HmError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn chunk<S: Into<String>>(msg: S) -> Self {
        HmError::Chunk(msg.into())
    }
}
