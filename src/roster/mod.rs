//! Builds the senate roster: one output row per municipality, joined with the
//! contact details scraped from its senator's profile page.

mod district;
mod municipality;

pub use district::DistrictRoster;
pub use municipality::MunicipalityRoster;

use crate::client::PageSource;
use crate::config::{Config, RosterMode};
use crate::error::Result;
use crate::scraper::{content_selector, Scraper};
pub use crate::{log_debug, log_info, log_warn};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Selector;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRecord {
    pub district: String,
    pub town: String,
    pub member: String,
    pub party: String,
    /// First link in the town's paragraph, empty when there is none.
    pub profile_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenatorProfile {
    pub email: String,
    /// Home numbers, then cell numbers, comma separated.
    pub home_phone: String,
    pub state_house_phone: String,
    /// Semicolon separated.
    pub committees: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub district: String,
    pub town: String,
    pub member: String,
    pub party: String,
    pub email: String,
    pub home_phone: String,
    pub state_house_phone: String,
    pub committees: String,
}

impl OutputRow {
    pub fn join(record: &MunicipalityRecord, profile: &SenatorProfile) -> Self {
        Self {
            district: record.district.clone(),
            town: record.town.clone(),
            member: record.member.clone(),
            party: record.party.clone(),
            email: profile.email.clone(),
            home_phone: profile.home_phone.clone(),
            state_house_phone: profile.state_house_phone.clone(),
            committees: profile.committees.clone(),
        }
    }
}

/// Site layout and pacing shared by both roster strategies.
#[derive(Debug, Clone)]
pub struct RosterContext {
    pub index_path: String,
    pub content: Selector,
    /// Slept before every profile request, never before the index request.
    pub request_delay: Duration,
    pub show_progress: bool,
}

impl RosterContext {
    pub fn new(index_path: &str, content_css: &str, request_delay: Duration) -> Result<Self> {
        Ok(Self {
            index_path: index_path.to_string(),
            content: content_selector(content_css)?,
            request_delay,
            show_progress: false,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut context = Self::new(
            &config.municipality_list_path,
            &config.content_selector,
            Duration::from_secs(config.request_delay),
        )?;
        context.show_progress = config.show_progress;
        Ok(context)
    }

    fn progress(&self, len: usize, unit: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        let template = format!("[{{elapsed_precise}}] {{bar:40}} {{pos}}/{{len}} {} {{msg}}", unit);
        if let Ok(style) = ProgressStyle::default_bar().template(&template) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

/// A way of turning the index page into output rows.
pub trait RosterStrategy {
    async fn build<S: PageSource>(&self, source: &S, ctx: &RosterContext) -> Result<Vec<OutputRow>>;
}

pub async fn build_roster<S: PageSource>(
    mode: RosterMode,
    source: &S,
    ctx: &RosterContext,
) -> Result<Vec<OutputRow>> {
    match mode {
        RosterMode::Municipality => MunicipalityRoster.build(source, ctx).await,
        RosterMode::District => DistrictRoster.build(source, ctx).await,
    }
}

pub async fn fetch_index<S: PageSource>(
    source: &S,
    ctx: &RosterContext,
) -> Result<Vec<MunicipalityRecord>> {
    log_info!("[roster] Scraping Senate municipality data from {}", ctx.index_path);
    let response = source.fetch(&ctx.index_path).await?;
    if !response.is_success() {
        log_warn!(
            "[roster] Index page {} answered with status {}",
            ctx.index_path,
            response.status
        );
    }

    Ok(parse_index(&response.content, &ctx.content))
}

pub fn parse_index(html: &str, content: &Selector) -> Vec<MunicipalityRecord> {
    let scraper = Scraper::new(html);
    match scraper.index(content) {
        Some(index) => index.municipalities(),
        None => {
            log_warn!("[roster] Content region not found on the municipality index page");
            Vec::new()
        }
    }
}

/// Sleeps the courtesy delay, then scrapes one senator's profile page.
///
/// A page without a content region, or the site's "Page Not Found" page, yields an
/// empty profile. Network failures that survive the client's retries are returned.
pub async fn fetch_profile<S: PageSource>(
    source: &S,
    ctx: &RosterContext,
    path: &str,
    member: &str,
) -> Result<SenatorProfile> {
    if !ctx.request_delay.is_zero() {
        tokio::time::sleep(ctx.request_delay).await;
    }

    log_debug!("[roster] Getting senator data for {} from {}", member, path);
    let response = source.fetch(path).await?;
    Ok(parse_profile(&response.content, &ctx.content, path, member))
}

pub fn parse_profile(html: &str, content: &Selector, path: &str, member: &str) -> SenatorProfile {
    let scraper = Scraper::new(html);
    let Some(profile) = scraper.profile(content) else {
        log_warn!("[roster] Content region not found for {} at {}", member, path);
        return SenatorProfile::default();
    };

    if profile.is_not_found() {
        log_warn!("404 Page Not Found encountered for {} at {}", member, path);
        return SenatorProfile::default();
    }

    profile.extract(member)
}
