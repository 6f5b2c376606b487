//! Report assembly and document generation.
//!
//! Assembly gathers typed per-client data from the repositories. A
//! [`DocumentGenerator`] only formats what it is given and writes the file.

mod assembly;
mod render;
mod service;
mod tables;

pub use assembly::*;
pub use render::*;
pub use service::*;
pub use tables::*;

use thiserror::Error;

use crate::db::DbError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("At least one column must be selected")]
    NoColumns,

    #[error("{generator} generator cannot produce a {document}")]
    Unsupported {
        generator: &'static str,
        document: &'static str,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;
