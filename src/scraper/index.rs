use super::{element_text, extract_senator, PARAGRAPH};
use crate::roster::MunicipalityRecord;
pub use crate::{log_debug, log_info};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Reads the municipality index page: one paragraph per town.
pub struct IndexScraper<'a> {
    region: ElementRef<'a>,
}

impl<'a> IndexScraper<'a> {
    pub(crate) fn new(region: ElementRef<'a>) -> Self {
        Self { region }
    }

    pub fn municipalities(&self) -> Vec<MunicipalityRecord> {
        let records = self
            .region
            .select(&PARAGRAPH)
            .filter_map(|p| self.municipality(p))
            .collect::<Vec<_>>();

        log_info!("[index] Extracted {} municipality rows", records.len());
        records
    }

    fn municipality(&self, paragraph: ElementRef) -> Option<MunicipalityRecord> {
        let text = element_text(&paragraph);

        if !text.contains("Senate District") {
            log_debug!("Senate District not found in string: {}", text.trim());
            return None;
        }

        let line = extract_senator(&text);
        if line.is_incomplete() {
            log_debug!("district and member name not found in string: {}", text.trim());
            return None;
        }

        // Some towns link to a mistyped profile path; the roster builder reconciles them
        let profile_link = paragraph
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .to_string();

        Some(MunicipalityRecord {
            district: line.district,
            town: line.town,
            member: line.member,
            party: line.party,
            profile_link,
        })
    }
}
