use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use log::{debug, info};
use snafu::ResultExt;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::errors::{ArchiveReadSnafu, ArchiveSnafu, CustomResult, WalkSnafu};
use crate::modules::document_renderer::DOCUMENT_EXTENSION;

pub const ARCHIVE_FILE_NAME: &str = "output_files.zip";

/// # pack documents
/// compress every race document found in a directory (and its sub directories) into a single
/// zip archive. entries are stored under their bare file name. other files are ignored.
///
/// ## Arguments
/// * `dir` - the directory holding the rendered documents
///
/// ## Returns
/// * `Vec<u8>` - the zip archive
pub fn pack_documents(dir: &Path) -> CustomResult<Vec<u8>> {
    // fixed timestamps, identical documents give an identical archive
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut packed = 0;

    for dir_entry in WalkDir::new(dir).sort_by_file_name() {
        let dir_entry = dir_entry.context(WalkSnafu { path: dir })?;
        if !dir_entry.file_type().is_file() || !is_document(dir_entry.path()) {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().to_string();
        let contents = fs::read(dir_entry.path()).context(ArchiveReadSnafu { path: dir_entry.path() })?;

        zip.start_file(name.as_str(), options).context(ArchiveSnafu)?;
        zip.write_all(&contents)
            .map_err(zip::result::ZipError::from)
            .context(ArchiveSnafu)?;

        debug!(target:"archive_packager:pack_documents", "added {} to archive", name);
        packed += 1;
    }

    let archive = zip.finish().context(ArchiveSnafu)?.into_inner();
    info!(target:"archive_packager:pack_documents", "packed {} documents into {} bytes", packed, archive.len());

    Ok(archive)
}

fn is_document(path: &Path) -> bool {
    path.extension().map_or(false, |extension| extension == DOCUMENT_EXTENSION)
}
