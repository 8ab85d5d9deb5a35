use super::{element_text, PARAGRAPH};
use crate::roster::SenatorProfile;
pub use crate::log_warn;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static MAILTO_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="mailto:"]"#).unwrap());
static EMPHASIS: Lazy<Selector> = Lazy::new(|| Selector::parse("strong, b").unwrap());

static EMAIL_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)email").unwrap());
static HOME_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)home").unwrap());
static CELL_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cell").unwrap());
static STATE_HOUSE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)state house").unwrap());
static COMMITTEE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)committee assignments").unwrap());

static MAILTO_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^mailto:\s*").unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static LEADING_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap());

/// Reads the contact and committee sections of a senator's profile page.
///
/// The page has no stable markup for these sections, so every field is found
/// by scanning paragraphs for a text label.
pub struct ProfileScraper<'a> {
    region: ElementRef<'a>,
}

impl<'a> ProfileScraper<'a> {
    pub(crate) fn new(region: ElementRef<'a>) -> Self {
        Self { region }
    }

    fn paragraphs(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.region.select(&PARAGRAPH)
    }

    /// The site serves its "missing page" as a normal document with this heading.
    pub fn is_not_found(&self) -> bool {
        self.region
            .select(&HEADING)
            .next()
            .map(|h1| element_text(&h1).contains("Page Not Found"))
            .unwrap_or(false)
    }

    pub fn extract(&self, member: &str) -> SenatorProfile {
        let (home_phone, state_house_phone) = self.phones(member);
        SenatorProfile {
            email: self.email(member),
            home_phone,
            state_house_phone,
            committees: self.committees(),
        }
    }

    pub fn email(&self, member: &str) -> String {
        for paragraph in self.paragraphs() {
            let text = element_text(&paragraph);
            if !EMAIL_LABEL.is_match(&text) {
                continue;
            }

            if let Some(link) = paragraph.select(&MAILTO_LINK).next() {
                let link_text = element_text(&link);
                let link_text = link_text.trim();
                if LEADING_EMAIL.is_match(link_text) {
                    return link_text.to_string();
                }

                // Visible text is sometimes obfuscated ("name [at] host"); the target is not
                if let Some(href) = link.value().attr("href") {
                    let from_href = MAILTO_PREFIX.replace(href, "");
                    let from_href = from_href.trim();
                    if LEADING_EMAIL.is_match(from_href) {
                        return from_href.to_string();
                    }
                }
            }

            if let Some(found) = EMAIL.find(&text) {
                return found.as_str().trim().to_string();
            }
        }

        log_warn!("Email not found for {}", member);
        String::new()
    }

    /// Returns (home, state house). Cell numbers are appended after home numbers.
    pub fn phones(&self, member: &str) -> (String, String) {
        let home = self.labelled_phones(&HOME_LABEL);
        let cell = self.labelled_phones(&CELL_LABEL);
        let state_house = self.labelled_phones(&STATE_HOUSE_LABEL);

        let home_phone = home.into_iter().chain(cell).collect::<Vec<_>>().join(", ");
        let state_house_phone = state_house.join(", ");

        if home_phone.is_empty() && state_house_phone.is_empty() {
            log_warn!("Phone not found for {}", member);
        }

        (home_phone, state_house_phone)
    }

    fn labelled_phones(&self, label: &Regex) -> Vec<String> {
        self.paragraphs()
            .map(|p| element_text(&p))
            .filter(|text| label.is_match(text))
            .flat_map(|text| {
                PHONE
                    .find_iter(&text)
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Paragraphs after the "Committee Assignments" label, up to the next labelled section.
    pub fn committees(&self) -> String {
        let mut paragraphs = self
            .paragraphs()
            .skip_while(|p| !COMMITTEE_LABEL.is_match(&element_text(p)));

        if paragraphs.next().is_none() {
            return String::new();
        }

        paragraphs
            .map_while(|p| {
                let text = element_text(&p);
                let entry = text.trim();
                if entry.is_empty() || p.select(&EMPHASIS).next().is_some() {
                    None
                } else {
                    Some(entry.to_string())
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::{content_selector, Scraper};

    fn with_profile<T>(body: &str, f: impl FnOnce(&ProfileScraper) -> T) -> T {
        let scraper = Scraper::new(&format!(r#"<div id="content">{}</div>"#, body));
        let content = content_selector("div#content").unwrap();
        let profile = scraper.profile(&content).unwrap();
        f(&profile)
    }

    fn email(body: &str) -> String {
        with_profile(body, |p| p.email("Test Senator"))
    }

    fn phones(body: &str) -> (String, String) {
        with_profile(body, |p| p.phones("Test Senator"))
    }

    fn committees(body: &str) -> String {
        with_profile(body, |p| p.committees())
    }

    #[test]
    fn email_from_mailto_link() {
        assert_eq!(
            email(r#"<p><strong>Email</strong>: <a href="mailto:Chip.Curry@legislature.maine.gov">Chip.Curry@legislature.maine.gov</a></p>"#),
            "Chip.Curry@legislature.maine.gov"
        );
    }

    #[test]
    fn email_mailto_with_surrounding_spaces() {
        assert_eq!(
            email(r#"<p><strong>Email</strong>: <a href="mailto: senator@legislature.maine.gov">senator@legislature.maine.gov</a></p>"#),
            "senator@legislature.maine.gov"
        );
        assert_eq!(
            email(r#"<p><strong>Email</strong>: <a href="mailto:senator@legislature.maine.gov ">senator@legislature.maine.gov</a></p>"#),
            "senator@legislature.maine.gov"
        );
    }

    #[test]
    fn email_falls_back_to_mailto_target() {
        assert_eq!(
            email(r#"<p><strong>Email</strong>: <a href="mailto:senator@legislature.maine.gov ">senator [at] legislature.maine.gov</a></p>"#),
            "senator@legislature.maine.gov"
        );
    }

    #[test]
    fn email_from_plain_text() {
        assert_eq!(
            email("<p><strong>Email</strong>: test.senator@legislature.maine.gov</p>"),
            "test.senator@legislature.maine.gov"
        );
    }

    #[test]
    fn obfuscated_plain_text_email_is_rejected() {
        assert_eq!(
            email("<p><strong>Email</strong>: test.senator [at] legislature.maine.gov</p>"),
            ""
        );
    }

    #[test]
    fn email_label_is_case_insensitive() {
        assert_eq!(
            email(r#"<p><strong>EMAIL</strong>: <a href="mailto:senator@legislature.maine.gov">senator@legislature.maine.gov</a></p>"#),
            "senator@legislature.maine.gov"
        );
    }

    #[test]
    fn no_email_paragraph() {
        assert_eq!(email("<p><strong>Phone</strong>: (207) 123-4567</p>"), "");
    }

    #[test]
    fn home_and_state_house_phones() {
        assert_eq!(
            phones("<p><b>Home</b>: (207) 323-9976</p><p><strong>State House</strong>: (207) 287-1515</p>"),
            ("(207) 323-9976".to_string(), "(207) 287-1515".to_string())
        );
    }

    #[test]
    fn cell_grouped_with_home() {
        assert_eq!(
            phones("<p><b>Home</b>: (207) 323-9976</p><p><b>Cell</b>: (207) 555-1234</p><p><strong>State House</strong>: (207) 287-1515</p>"),
            (
                "(207) 323-9976, (207) 555-1234".to_string(),
                "(207) 287-1515".to_string()
            )
        );
    }

    #[test]
    fn cell_follows_home_regardless_of_document_order() {
        assert_eq!(
            phones("<p><b>Cell</b>: (207) 555-1234</p><p><b>Home</b>: (207) 323-9976</p>"),
            ("(207) 323-9976, (207) 555-1234".to_string(), String::new())
        );
    }

    #[test]
    fn several_numbers_in_one_paragraph() {
        assert_eq!(
            phones("<p><b>Home</b>: 207-323-9976 or 207-587-9347</p><p><strong>State House</strong>: 207.287.1515</p>"),
            (
                "207-323-9976, 207-587-9347".to_string(),
                "207.287.1515".to_string()
            )
        );
    }

    #[test]
    fn no_phone_paragraphs() {
        assert_eq!(
            phones("<p><strong>Email</strong>: senator@legislature.maine.gov</p>"),
            (String::new(), String::new())
        );
    }

    #[test]
    fn committees_until_end_of_region() {
        assert_eq!(
            committees(
                r#"
                <p><strong>Committee Assignments</strong>:</p>
                <p>Housing and Economic Development (Chair)</p>
                <p>Criminal Justice and Public Safety</p>
                <p>Engrossed Bills</p>
                <p>Senatorial Vote</p>
                "#
            ),
            "Housing and Economic Development (Chair); Criminal Justice and Public Safety; Engrossed Bills; Senatorial Vote"
        );
    }

    #[test]
    fn committees_stop_at_next_section() {
        assert_eq!(
            committees(
                r#"
                <p><strong>Committee Assignments</strong>:</p>
                <p>Labor and Housing (Chair)</p>
                <p>Appropriations and Financial Affairs</p>
                <p><strong>Legislative Service</strong>: House 126-128</p>
                <p>Should not be collected</p>
                "#
            ),
            "Labor and Housing (Chair); Appropriations and Financial Affairs"
        );
    }

    #[test]
    fn committees_stop_at_empty_paragraph() {
        assert_eq!(
            committees(
                r#"
                <p><strong>Committee Assignments</strong>:</p>
                <p>Taxation</p>
                <p>   </p>
                <p>Biography text</p>
                "#
            ),
            "Taxation"
        );
    }

    #[test]
    fn committee_label_is_case_insensitive() {
        assert_eq!(
            committees("<p><strong>COMMITTEE ASSIGNMENTS</strong>:</p><p>Test Committee</p>"),
            "Test Committee"
        );
    }

    #[test]
    fn no_committee_section() {
        assert_eq!(
            committees("<p><strong>Email</strong>: senator@legislature.maine.gov</p><p>Taxation</p>"),
            ""
        );
    }

    #[test]
    fn detects_not_found_heading() {
        assert!(with_profile(
            "<h1>Page Not Found</h1><p>The page you are looking for does not exist.</p>",
            |p| p.is_not_found()
        ));
        assert!(!with_profile("<h1>Sen. Chip Curry (D-Waldo)</h1>", |p| p.is_not_found()));
    }
}
