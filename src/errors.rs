use std::io;
use std::path::PathBuf;

use snafu::Snafu;

/// # conversion errors
/// every failure a conversion can run into. only `ValidationError` is meant to be shown to the
/// user, the rest abort the request as a whole.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{reason}"))]
    ValidationError { reason: String },

    #[snafu(display("row on line {line} has {found} fields, expected 3"))]
    MalformedRowError { line: u64, found: usize },

    #[snafu(display("failed to read table: {source}"))]
    TableReadError { source: csv::Error },

    #[snafu(display("failed to create working directory: {source}"))]
    WorkspaceError { source: io::Error },

    #[snafu(display("failed to write race document {}: {source}", path.display()))]
    DocumentWriteError { path: PathBuf, source: io::Error },

    #[snafu(display("failed to walk {}: {source}", path.display()))]
    WalkError { path: PathBuf, source: walkdir::Error },

    #[snafu(display("failed to read {} into the archive: {source}", path.display()))]
    ArchiveReadError { path: PathBuf, source: io::Error },

    #[snafu(display("failed to build archive: {source}"))]
    ArchiveError { source: zip::result::ZipError },
}

pub type CustomResult<T> = Result<T, Error>;
