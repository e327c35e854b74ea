use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use snafu::ResultExt;

use crate::errors::{CustomResult, DocumentWriteSnafu};
use crate::modules::models::race::{HeatGroup, Heats, RaceSettings};

pub const DOCUMENT_EXTENSION: &str = "rac2";

/// every lane is raced by two placeholder athletes
const PARTICIPANTS: [&str; 2] = ["A1", "A2"];

/// # race document
/// the race definition of a single heat, as read by the race timing software.
///
/// the text is written exactly as the timing software expects it, including the trailing comma
/// after the last lane and after the lane list. values are not escaped, a team name containing
/// a `"` produces a broken document.
#[derive(Debug, Clone, Copy)]
pub struct RaceDocument<'a> {
    heat: &'a HeatGroup,
    settings: &'a RaceSettings,
}

impl<'a> RaceDocument<'a> {
    pub fn new(heat: &'a HeatGroup, settings: &'a RaceSettings) -> RaceDocument<'a> {
        RaceDocument { heat, settings }
    }

    /// # document file name
    /// `Heat<heat_id>.rac2`
    pub fn file_name(&self) -> String {
        file_name_for(&self.heat.heat_id)
    }
}

pub fn file_name_for(heat_id: &str) -> String {
    format!("Heat{heat_id}.{DOCUMENT_EXTENSION}")
}

impl fmt::Display for RaceDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let heat_id = &self.heat.heat_id;

        writeln!(f, "{{")?;
        writeln!(f, "    \"race_definition\": {{")?;
        writeln!(f, "        \"{}\": [", self.settings.race_type())?;
        for entry in &self.heat.entries {
            writeln!(f, "            {{")?;
            writeln!(f, "                \"class_name\": \"\",")?;
            writeln!(f, "                \"lane_number\": {},", entry.lane_id)?;
            writeln!(f, "                \"name\": \"{}\",", entry.team_name)?;
            writeln!(f, "                \"participants\": [")?;
            for (i, participant) in PARTICIPANTS.iter().enumerate() {
                writeln!(f, "                    {{")?;
                writeln!(f, "                        \"name\": \"{participant}\"")?;
                if i + 1 < PARTICIPANTS.len() {
                    writeln!(f, "                    }},")?;
                } else {
                    writeln!(f, "                    }}")?;
                }
            }
            writeln!(f, "                ]")?;
            writeln!(f, "            }},")?;
        }
        writeln!(f, "        ],")?;
        writeln!(f, "        \"c2_race_id\": \"\",")?;
        writeln!(f, "        \"duration\": {},", self.settings.duration_seconds())?;
        writeln!(f, "        \"duration_type\": \"time\",")?;
        writeln!(f, "        \"event_name\": \"{}\",", self.settings.event_name())?;
        writeln!(f, "        \"name_long\": \"Heat {heat_id}\",")?;
        writeln!(f, "        \"name_short\": \"H{heat_id}\",")?;
        writeln!(f, "        \"race_id\": \"\",")?;
        writeln!(f, "        \"race_type\": \"team calorie score\",")?;
        writeln!(f, "        \"round\": 1,")?;
        writeln!(f, "        \"split_value\": 60,")?;
        writeln!(f, "        \"team_scoring\": \"sum\",")?;
        writeln!(f, "        \"team_size\": {},", PARTICIPANTS.len())?;
        writeln!(f, "        \"time_cap\": 0")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}

/// # write documents
/// write a race document for every heat into the given directory.
/// existing documents with the same name are overwritten.
///
/// ## Arguments
/// * `heats` - the heats to write a document for
/// * `output_dir` - the directory to write to, created when missing
/// * `settings` - the settings shared by all heats
///
/// ## Returns
/// * `Vec<PathBuf>` - the paths of the written documents, in heat order
pub fn write_documents(heats: &Heats, output_dir: &Path, settings: &RaceSettings) -> CustomResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).context(DocumentWriteSnafu { path: output_dir })?;

    let mut written = Vec::with_capacity(heats.len());
    for heat in heats {
        let document = RaceDocument::new(heat, settings);
        let path = output_dir.join(document.file_name());

        fs::write(&path, document.to_string()).context(DocumentWriteSnafu { path: &path })?;
        debug!(target:"document_renderer:write_documents", "wrote {} with {} lanes", path.display(), heat.entries.len());

        written.push(path);
    }

    info!(target:"document_renderer:write_documents", "wrote {} race documents", written.len());
    Ok(written)
}
