use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rocket::FromFormField;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};

/// # race type
/// the kind of machines used in a race. it is also the key the lanes are listed under in a race
/// document.
#[derive(FromFormField, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RaceType {
    #[default]
    #[field(value = "boats")]
    Boats,
    #[field(value = "bikes")]
    Bikes,
}

impl RaceType {
    pub const ALL: [RaceType; 2] = [RaceType::Boats, RaceType::Bikes];

    pub fn as_str(&self) -> &'static str {
        match self {
            RaceType::Boats => "boats",
            RaceType::Bikes => "bikes",
        }
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RaceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boats" => Ok(RaceType::Boats),
            "bikes" => Ok(RaceType::Bikes),
            other => Err(format!("unknown race type \"{other}\", expected boats or bikes")),
        }
    }
}

/// # race settings
/// the metadata shared by every heat of one conversion
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RaceSettings {
    duration_seconds: u32,
    event_name: String,
    race_type: RaceType,
}

impl RaceSettings {
    /// # create race settings
    ///
    /// ## Arguments
    /// * `duration_minutes` - the length of every race, at least one minute
    /// * `event_name` - the name of the event, can not be empty
    /// * `race_type` - boats or bikes
    ///
    /// ## Returns
    /// * `RaceSettings` - the settings with the duration converted to seconds
    pub fn new(duration_minutes: u32, event_name: &str, race_type: RaceType) -> CustomResult<RaceSettings> {
        if duration_minutes < 1 {
            return Err(Error::ValidationError {
                reason: "duration must be at least one minute".to_string(),
            });
        }
        if event_name.is_empty() {
            return Err(Error::ValidationError {
                reason: "event name can not be empty".to_string(),
            });
        }

        let duration_seconds = duration_minutes.checked_mul(60).ok_or_else(|| Error::ValidationError {
            reason: format!("duration of {duration_minutes} minutes is too long"),
        })?;

        Ok(RaceSettings {
            duration_seconds,
            event_name: event_name.to_string(),
            race_type,
        })
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn race_type(&self) -> RaceType {
        self.race_type
    }
}

/// a single lane of a heat
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub lane_id: String,
    pub team_name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HeatGroup {
    pub heat_id: String,
    pub entries: Vec<Entry>,
}

/// # heats
/// all heats of a table in the order their id was first seen.
/// a heat only exists once a row for it was added, so no heat is ever empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heats {
    groups: Vec<HeatGroup>,
    index: HashMap<String, usize>,
}

impl Heats {
    pub fn new() -> Heats {
        Heats::default()
    }

    /// # add entry
    /// add a lane to the heat with the given id, the heat is created when it does not exist yet
    ///
    /// ## Arguments
    /// * `heat_id` - the id of the heat the lane belongs to
    /// * `entry` - the lane to add
    pub fn push(&mut self, heat_id: &str, entry: Entry) {
        let position = match self.index.get(heat_id) {
            Some(position) => *position,
            None => {
                self.groups.push(HeatGroup {
                    heat_id: heat_id.to_string(),
                    entries: Vec::new(),
                });
                self.index.insert(heat_id.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        self.groups[position].entries.push(entry);
    }

    pub fn get(&self, heat_id: &str) -> Option<&HeatGroup> {
        self.index.get(heat_id).map(|position| &self.groups[*position])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeatGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a Heats {
    type Item = &'a HeatGroup;
    type IntoIter = std::slice::Iter<'a, HeatGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(lane_id: &str, team_name: &str) -> Entry {
        Entry {
            lane_id: lane_id.to_string(),
            team_name: team_name.to_string(),
        }
    }

    #[test]
    fn settings_convert_minutes_to_seconds() {
        let settings = RaceSettings::new(5, "Regatta", RaceType::Boats).unwrap();
        assert_eq!(settings.duration_seconds(), 300);
        assert_eq!(settings.event_name(), "Regatta");
        assert_eq!(settings.race_type(), RaceType::Boats);
    }

    #[test]
    fn settings_reject_zero_minutes() {
        let error = RaceSettings::new(0, "Regatta", RaceType::Boats).unwrap_err();
        assert!(matches!(error, Error::ValidationError { .. }));
    }

    #[test]
    fn settings_reject_empty_event_name() {
        let error = RaceSettings::new(3, "", RaceType::Bikes).unwrap_err();
        assert!(matches!(error, Error::ValidationError { .. }));
    }

    #[test]
    fn settings_reject_overflowing_duration() {
        assert!(RaceSettings::new(u32::MAX, "Regatta", RaceType::Boats).is_err());
    }

    #[test]
    fn race_type_only_knows_boats_and_bikes() {
        assert_eq!("boats".parse::<RaceType>(), Ok(RaceType::Boats));
        assert_eq!("bikes".parse::<RaceType>(), Ok(RaceType::Bikes));
        assert!("Boats".parse::<RaceType>().is_err());
        assert!("rowers".parse::<RaceType>().is_err());
        assert_eq!(RaceType::default(), RaceType::Boats);
        assert_eq!(RaceType::Bikes.to_string(), "bikes");
    }

    #[test]
    fn heats_keep_first_appearance_order() {
        let mut heats = Heats::new();
        heats.push("2", entry("1", "Team C"));
        heats.push("1", entry("1", "Team A"));
        heats.push("2", entry("2", "Team D"));
        heats.push("1", entry("2", "Team B"));

        let ids: Vec<&str> = heats.iter().map(|heat| heat.heat_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);

        let heat = heats.get("1").unwrap();
        assert_eq!(heat.entries, vec![entry("1", "Team A"), entry("2", "Team B")]);
        assert!(heats.get("3").is_none());
    }
}
