use std::fmt;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};
use snafu::ResultExt;

use crate::errors::{CustomResult, WorkspaceSnafu};
use crate::modules::archive_packager::pack_documents;
use crate::modules::document_renderer::write_documents;
use crate::modules::models::race::{Heats, RaceSettings};
use crate::modules::table_reader::{read_table, read_table_from_path};

/// # convert
/// turn a table of heats into a zip archive holding one race document per heat.
///
/// the documents are rendered into a private temporary directory which is removed again when
/// this function returns, on success and on failure alike.
///
/// ## Arguments
/// * `table` - the comma separated table, header row first
/// * `settings` - the settings shared by all heats
///
/// ## Returns
/// * `Vec<u8>` - the zip archive
pub fn convert<R: Read>(table: R, settings: &RaceSettings) -> CustomResult<Vec<u8>> {
    let heats = read_table(table)?;
    convert_heats(&heats, settings)
}

/// # convert file
/// same as [`convert`] but reads the table from a file on disk
pub fn convert_file<P: AsRef<Path>>(input: P, settings: &RaceSettings) -> CustomResult<Vec<u8>> {
    let heats = read_table_from_path(input)?;
    convert_heats(&heats, settings)
}

fn convert_heats(heats: &Heats, settings: &RaceSettings) -> CustomResult<Vec<u8>> {
    let workspace = tempfile::Builder::new()
        .prefix("rac2-")
        .tempdir()
        .context(WorkspaceSnafu)?;
    debug!(target:"conversion:convert", "rendering into {}", workspace.path().display());

    write_documents(heats, workspace.path(), settings)?;
    let archive = pack_documents(workspace.path())?;

    info!(
        target:"conversion:convert",
        "converted {} heats for \"{}\" ({}, {}s)",
        heats.len(),
        settings.event_name(),
        settings.race_type(),
        settings.duration_seconds()
    );
    Ok(archive)
}

/// # conversion state
/// the steps a single conversion request moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Idle,
    Validating,
    RejectedInput,
    Converting,
    ReadyForDownload,
    Failed,
}

impl ConversionState {
    pub fn can_move_to(&self, next: ConversionState) -> bool {
        use ConversionState::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, RejectedInput)
                | (Validating, Converting)
                | (Converting, ReadyForDownload)
                | (Converting, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversionState::RejectedInput | ConversionState::ReadyForDownload | ConversionState::Failed
        )
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ConversionState::Idle => "idle",
            ConversionState::Validating => "validating",
            ConversionState::RejectedInput => "rejected input",
            ConversionState::Converting => "converting",
            ConversionState::ReadyForDownload => "ready for download",
            ConversionState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// # conversion request
/// tracks the state of one request. a request never goes back to an earlier state.
#[derive(Debug)]
pub struct ConversionRequest {
    state: ConversionState,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        ConversionRequest::new()
    }
}

impl ConversionRequest {
    pub fn new() -> ConversionRequest {
        ConversionRequest {
            state: ConversionState::Idle,
        }
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// # advance
    /// move the request to the next state
    ///
    /// ## Returns
    /// * `bool` - false when the move is not allowed, the state is left unchanged in that case
    pub fn advance(&mut self, next: ConversionState) -> bool {
        if !self.state.can_move_to(next) {
            warn!(target:"conversion:advance", "refusing to move from {} to {}", self.state, next);
            return false;
        }

        debug!(target:"conversion:advance", "{} -> {}", self.state, next);
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::modules::models::race::RaceType;
    use std::io::Cursor;
    use zip::ZipArchive;

    const REGATTA_TABLE: &str = "Heat,Lane,Team\n1,1,Team A\n1,2,Team B\n2,1,Team C\n";

    fn read_entry(archive: &[u8], name: &str) -> String {
        let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        let mut contents = String::new();
        zip.by_name(name).unwrap().read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn converts_the_regatta_example() {
        let settings = RaceSettings::new(5, "Regatta", RaceType::Boats).unwrap();
        let archive = convert(REGATTA_TABLE.as_bytes(), &settings).unwrap();

        let zip = ZipArchive::new(Cursor::new(archive.as_slice())).unwrap();
        let mut names: Vec<&str> = zip.file_names().collect();
        names.sort();
        assert_eq!(names, vec!["Heat1.rac2", "Heat2.rac2"]);

        let heat1 = read_entry(&archive, "Heat1.rac2");
        assert_eq!(heat1.matches("\"lane_number\"").count(), 2);
        assert!(heat1.find("\"name\": \"Team A\"").unwrap() < heat1.find("\"name\": \"Team B\"").unwrap());
        assert!(heat1.contains("\"lane_number\": 1,"));
        assert!(heat1.contains("\"lane_number\": 2,"));

        let heat2 = read_entry(&archive, "Heat2.rac2");
        assert_eq!(heat2.matches("\"lane_number\"").count(), 1);
        assert!(heat2.contains("\"name\": \"Team C\","));

        for document in [&heat1, &heat2] {
            assert!(document.contains("\"duration\": 300,"));
            assert!(document.contains("\"event_name\": \"Regatta\","));
            assert!(document.contains("\"boats\": ["));
        }
    }

    #[test]
    fn archive_has_one_entry_per_distinct_heat() {
        let table = "h,l,t\n4,1,A\n9,1,B\n4,2,C\n1,1,D\n9,2,E\n";
        let settings = RaceSettings::new(1, "Cup", RaceType::Bikes).unwrap();
        let archive = convert(table.as_bytes(), &settings).unwrap();

        let zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        assert_eq!(zip.len(), 3);
    }

    #[test]
    fn converting_twice_gives_identical_documents() {
        let settings = RaceSettings::new(5, "Regatta", RaceType::Boats).unwrap();
        let first = convert(REGATTA_TABLE.as_bytes(), &settings).unwrap();
        let second = convert(REGATTA_TABLE.as_bytes(), &settings).unwrap();

        for name in ["Heat1.rac2", "Heat2.rac2"] {
            assert_eq!(read_entry(&first, name), read_entry(&second, name));
        }
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_row_aborts_the_conversion() {
        let table = "h,l,t\n1,1,Team A\n2,1\n";
        let settings = RaceSettings::new(5, "Regatta", RaceType::Boats).unwrap();

        assert!(matches!(
            convert(table.as_bytes(), &settings),
            Err(Error::MalformedRowError { .. })
        ));
    }

    #[test]
    fn converts_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("heats.csv");
        std::fs::write(&input, REGATTA_TABLE).unwrap();

        let settings = RaceSettings::new(5, "Regatta", RaceType::Bikes).unwrap();
        let archive = convert_file(&input, &settings).unwrap();
        assert!(read_entry(&archive, "Heat2.rac2").contains("\"bikes\": ["));
    }

    #[test]
    fn blank_row_aborts_the_conversion() {
        let table = "h,l,t\n1,1,Team A\n\n2,1,Team C\n";
        let settings = RaceSettings::new(5, "Regatta", RaceType::Boats).unwrap();

        assert!(matches!(
            convert(table.as_bytes(), &settings),
            Err(Error::MalformedRowError { line: 3, found: 0 })
        ));
    }

    #[test]
    fn convert_file_reports_a_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RaceSettings::new(5, "Regatta", RaceType::Boats).unwrap();

        assert!(matches!(
            convert_file(dir.path().join("missing.csv"), &settings),
            Err(Error::TableReadError { .. })
        ));
    }

    #[test]
    fn request_follows_the_happy_path() {
        let mut request = ConversionRequest::new();
        assert_eq!(request.state(), ConversionState::Idle);
        assert!(request.advance(ConversionState::Validating));
        assert!(request.advance(ConversionState::Converting));
        assert!(request.advance(ConversionState::ReadyForDownload));
        assert!(request.state().is_terminal());
    }

    #[test]
    fn request_can_not_skip_or_leave_terminal_states() {
        let mut request = ConversionRequest::new();
        assert!(!request.advance(ConversionState::Converting));
        assert_eq!(request.state(), ConversionState::Idle);

        assert!(request.advance(ConversionState::Validating));
        assert!(request.advance(ConversionState::RejectedInput));
        assert!(!request.advance(ConversionState::Converting));
        assert!(!request.advance(ConversionState::Validating));
        assert_eq!(request.state(), ConversionState::RejectedInput);
    }

    #[test]
    fn request_ends_in_failed_when_the_conversion_breaks() {
        let mut request = ConversionRequest::new();
        assert!(request.advance(ConversionState::Validating));
        assert!(request.advance(ConversionState::Converting));
        assert!(request.advance(ConversionState::Failed));
        assert!(request.state().is_terminal());

        assert!(!request.advance(ConversionState::ReadyForDownload));
        assert_eq!(request.state(), ConversionState::Failed);
    }

    #[test]
    fn rejected_input_is_never_converted() {
        let mut request = ConversionRequest::new();
        assert!(request.advance(ConversionState::Validating));
        assert!(!request.advance(ConversionState::Failed));
        assert!(!request.advance(ConversionState::ReadyForDownload));
        assert!(request.advance(ConversionState::RejectedInput));
        assert!(request.state().is_terminal());
        assert!(!ConversionState::RejectedInput.can_move_to(ConversionState::Converting));
    }
}
