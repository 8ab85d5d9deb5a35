mod index;
mod line;
mod profile;

pub use index::IndexScraper;
pub use line::extract_senator;
pub use profile::ProfileScraper;

use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub(crate) static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Compiles the CSS selector that locates a page's content region.
pub fn content_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::SelectorError(format!("{}: {}", css, e)).into())
}

pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    fn content_region(&self, content: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(content).next()
    }

    pub fn index(&self, content: &Selector) -> Option<IndexScraper<'_>> {
        self.content_region(content).map(IndexScraper::new)
    }

    pub fn profile(&self, content: &Selector) -> Option<ProfileScraper<'_>> {
        self.content_region(content).map(ProfileScraper::new)
    }
}
