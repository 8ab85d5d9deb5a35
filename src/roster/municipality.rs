use super::{
    fetch_index, fetch_profile, MunicipalityRecord, OutputRow, RosterContext, RosterStrategy,
    SenatorProfile,
};
use crate::client::PageSource;
use crate::error::{Result, RosterError};
pub use crate::{log_info, log_warn};
use std::collections::HashMap;

/// A senator and the profile path chosen for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueSenator {
    pub member: String,
    pub profile_link: String,
}

/// Deduplicates senators before fetching, so each profile page is requested once.
pub struct MunicipalityRoster;

impl RosterStrategy for MunicipalityRoster {
    async fn build<S: PageSource>(&self, source: &S, ctx: &RosterContext) -> Result<Vec<OutputRow>> {
        let municipalities = fetch_index(source, ctx).await?;
        let senators = unique_senators(&municipalities);

        if senators.is_empty() {
            return Err(RosterError::NoSenatorsFound.into());
        }

        log_info!(
            "[roster] Found {} unique senators across {} municipalities",
            senators.len(),
            municipalities.len()
        );
        log_info!("[roster] Scraping {} unique senator profiles...", senators.len());

        let progress = ctx.progress(senators.len(), "senators");
        let mut profiles: HashMap<&str, SenatorProfile> = HashMap::with_capacity(senators.len());

        for senator in &senators {
            progress.set_message(senator.member.clone());

            let profile = if senator.profile_link.is_empty() {
                log_warn!("No profile link for {}", senator.member);
                SenatorProfile::default()
            } else {
                fetch_profile(source, ctx, &senator.profile_link, &senator.member).await?
            };

            profiles.insert(&senator.member, profile);
            progress.inc(1);
        }
        progress.finish_and_clear();

        let missing = SenatorProfile::default();
        Ok(municipalities
            .iter()
            .map(|record| {
                let profile = profiles.get(record.member.as_str()).unwrap_or(&missing);
                OutputRow::join(record, profile)
            })
            .collect())
    }
}

/// Groups municipalities by senator, in first-seen order, and picks each senator's
/// most frequent non-empty profile link. Per-town links occasionally carry typos.
pub fn unique_senators(municipalities: &[MunicipalityRecord]) -> Vec<UniqueSenator> {
    let mut order: Vec<&str> = Vec::new();
    let mut links: HashMap<&str, Vec<&str>> = HashMap::new();

    for record in municipalities {
        let entry = links.entry(record.member.as_str()).or_insert_with(|| {
            order.push(record.member.as_str());
            Vec::new()
        });
        if !record.profile_link.is_empty() {
            entry.push(record.profile_link.as_str());
        }
    }

    order
        .into_iter()
        .map(|member| UniqueSenator {
            member: member.to_string(),
            profile_link: most_common(&links[member]).unwrap_or_default().to_string(),
        })
        .collect()
}

/// Ties go to the link seen first.
fn most_common<'a>(links: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &link in links {
        *counts.entry(link).or_default() += 1;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for &link in links {
        let count = counts[link];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((link, count));
        }
    }
    best.map(|(link, _)| link)
}
