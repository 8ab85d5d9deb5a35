use crate::error::LineError;
pub use crate::{log_debug, log_error};
use once_cell::sync::Lazy;
use regex::Regex;

const DISTRICT_MARKER: &str = "Senate District";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Town - Senate District N - Name (Party-County
// Town names may contain hyphens and parentheses; the last "- Senate District" splits.
static ROSTER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)\s*-\s*Senate District\s+(\d+)\s*-\s*(.+?)\s*\((.+?)-").unwrap()
});

/// One municipality's entry on the "find your senator" index page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterLine {
    pub district: String,
    pub town: String,
    pub member: String,
    pub party: String,
}

impl RosterLine {
    #[cfg(test)]
    pub fn new(district: &str, town: &str, member: &str, party: &str) -> Self {
        Self {
            district: district.to_string(),
            town: town.to_string(),
            member: member.to_string(),
            party: party.to_string(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, LineError> {
        if !text.contains(DISTRICT_MARKER) {
            return Err(LineError::NoDistrict);
        }

        let normalized = WHITESPACE.replace_all(text, " ");
        let caps = ROSTER_LINE
            .captures(&normalized)
            .ok_or(LineError::Malformed)?;

        Ok(Self {
            district: caps[2].trim().to_string(),
            town: caps[1].trim().to_string(),
            member: caps[3].trim().to_string(),
            party: caps[4].trim().to_string(),
        })
    }

    /// True when the district or the member is missing.
    pub fn is_incomplete(&self) -> bool {
        self.district.is_empty() || self.member.is_empty()
    }
}

/// Pulls (district, town, member, party) out of a paragraph, all empty when it
/// is not a roster line.
pub fn extract_senator(text: &str) -> RosterLine {
    if text.contains(DISTRICT_MARKER) {
        log_debug!("Extracting data from municipality string: {}", text.trim());
    }

    match RosterLine::parse(text) {
        Ok(line) => line,
        Err(LineError::NoDistrict) => RosterLine::default(),
        Err(err @ LineError::Malformed) => {
            log_error!("Regex match not found, can't extract senator district data: {}", err);
            RosterLine::default()
        }
    }
}
