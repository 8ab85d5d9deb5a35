use super::{fetch_index, fetch_profile, OutputRow, RosterContext, RosterStrategy, SenatorProfile};
use crate::client::PageSource;
use crate::error::Result;
pub use crate::{log_info, log_warn};

/// Fetches the senator's profile for every municipality row, in document order.
/// A senator representing nine towns is fetched nine times.
pub struct DistrictRoster;

impl RosterStrategy for DistrictRoster {
    async fn build<S: PageSource>(&self, source: &S, ctx: &RosterContext) -> Result<Vec<OutputRow>> {
        let municipalities = fetch_index(source, ctx).await?;
        log_info!(
            "[roster] Scraping profiles for {} municipalities...",
            municipalities.len()
        );

        let progress = ctx.progress(municipalities.len(), "municipalities");
        let mut rows = Vec::with_capacity(municipalities.len());

        for record in &municipalities {
            progress.set_message(record.town.clone());

            let profile = if record.profile_link.is_empty() {
                log_warn!("No profile link for {} ({})", record.member, record.town);
                SenatorProfile::default()
            } else {
                fetch_profile(source, ctx, &record.profile_link, &record.member).await?
            };

            rows.push(OutputRow::join(record, &profile));
            progress.inc(1);
        }
        progress.finish_and_clear();

        if rows.is_empty() {
            log_warn!("[roster] 0 results found on the municipality index page");
        }

        Ok(rows)
    }
}
