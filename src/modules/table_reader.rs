use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{Position, StringRecord};
use log::{debug, error};
use snafu::ResultExt;

use crate::errors::{CustomResult, Error, TableReadSnafu};
use crate::modules::models::race::{Entry, Heats};

/// amount of columns every data row has: heat, lane and team name
const FIELDS_PER_ROW: usize = 3;

/// # read table
/// read a comma separated table of heats, lanes and team names. the first row is the header
/// and is skipped.
///
/// ## Arguments
/// * `reader` - the table contents
///
/// ## Returns
/// * `Heats` - the lanes grouped by heat, in the order the heats first appear
///
/// ## Errors
/// * `MalformedRowError` - a row does not have exactly three fields, a blank row has none
/// * `TableReadError` - the table could not be read, or is not valid UTF-8
pub fn read_table<R: Read>(mut reader: R) -> CustomResult<Heats> {
    let mut contents = Vec::new();
    reader
        .read_to_end(&mut contents)
        .map_err(csv::Error::from)
        .context(TableReadSnafu)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_slice());
    csv_reader.headers().context(TableReadSnafu)?;

    // the csv reader drops blank rows, they are looked up in the raw contents instead
    let mut row_end = csv_reader.position().clone();

    let mut heats = Heats::new();
    let mut record = StringRecord::new();
    while csv_reader.read_record(&mut record).context(TableReadSnafu)? {
        if let Some(line) = blank_line_at(&contents, &row_end) {
            return Err(malformed_row(line, 0));
        }

        if record.len() != FIELDS_PER_ROW {
            let line = record.position().map(|position| position.line()).unwrap_or_default();
            return Err(malformed_row(line, record.len()));
        }

        heats.push(
            &record[0],
            Entry {
                lane_id: record[1].to_string(),
                team_name: record[2].to_string(),
            },
        );
        row_end = csv_reader.position().clone();
    }

    if let Some(line) = blank_line_at(&contents, &row_end) {
        return Err(malformed_row(line, 0));
    }

    debug!(target:"table_reader:read_table", "read {} heats", heats.len());
    Ok(heats)
}

fn malformed_row(line: u64, found: usize) -> Error {
    error!(target:"table_reader:read_table", "row on line {} has {} fields", line, found);
    Error::MalformedRowError { line, found }
}

/// the line number of a blank row starting right after the previous row ended
fn blank_line_at(contents: &[u8], row_end: &Position) -> Option<u64> {
    let start = row_end.byte() as usize;
    let mut line = row_end.line();
    let mut rest = contents.get(start..).unwrap_or_default();

    // the `\n` of the `\r\n` that ended the previous row
    if start > 0 && contents[start - 1] == b'\r' && rest.first() == Some(&b'\n') {
        rest = &rest[1..];
        line += 1;
    }

    match rest.first() {
        Some(b'\r') | Some(b'\n') => Some(line),
        _ => None,
    }
}

/// # read table from file
/// same as [`read_table`] but reads the table from a file on disk
pub fn read_table_from_path<P: AsRef<Path>>(path: P) -> CustomResult<Heats> {
    let file = File::open(path.as_ref())
        .map_err(csv::Error::from)
        .context(TableReadSnafu)?;

    read_table(file)
}
