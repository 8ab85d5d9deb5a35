use crate::config::RetryConfig;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Longest single pause between attempts, whatever the backoff factor says.
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Statuses whose `Retry-After` header is honoured.
const RETRY_AFTER_STATUSES: [u16; 3] = [413, 429, 503];

/// Bounded retry with exponential backoff for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub total: u32,
    pub backoff_factor: f64,
    pub status_forcelist: Vec<u16>,
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            total: config.total,
            backoff_factor: config.backoff_factor,
            status_forcelist: config.status_forcelist.clone(),
            respect_retry_after: config.respect_retry_after,
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    pub fn honours_retry_after(status: u16) -> bool {
        RETRY_AFTER_STATUSES.contains(&status)
    }

    /// A forcelisted status is always retried. A 413/429/503 carrying `Retry-After`
    /// is retried too when the header is respected.
    pub fn should_retry(&self, status: u16, has_retry_after: bool) -> bool {
        if self.is_retryable_status(status) {
            return true;
        }
        self.total > 0
            && self.respect_retry_after
            && has_retry_after
            && Self::honours_retry_after(status)
    }

    /// Pause before retry number `retry` (1-based). The first retry is immediate,
    /// later ones wait `factor * 2^(retry - 1)`, capped.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = retry.saturating_sub(1).min(31) as i32;
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        Duration::try_from_secs_f64(seconds)
            .map(|d| d.min(BACKOFF_MAX))
            .unwrap_or(BACKOFF_MAX)
    }

    /// Chooses the wait before retry `retry`, preferring a server-supplied `Retry-After`.
    pub fn wait_before(&self, retry: u32, retry_after: Option<&str>) -> Duration {
        if self.respect_retry_after {
            if let Some(wait) = retry_after.and_then(|v| parse_retry_after(v, Utc::now())) {
                return wait;
            }
        }
        self.backoff(retry)
    }
}

/// Parses a `Retry-After` value: either delta-seconds or an HTTP-date.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<u64>().ok().map(Duration::from_secs);
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    // A date in the past means retry immediately
    Some((date - now).to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn first_retry_is_immediate_then_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy {
            backoff_factor: 10.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(10), BACKOFF_MAX);
    }

    #[test]
    fn zero_factor_never_waits() {
        let policy = RetryPolicy {
            backoff_factor: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(3), Duration::ZERO);
    }

    #[test]
    fn forcelist_matches_transient_statuses_only() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_retryable_status(status));
        }
        assert!(!policy.is_retryable_status(404));
        assert!(!policy.is_retryable_status(200));
    }

    #[test]
    fn retry_after_extends_retries_to_413_only_with_the_header() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(413, true));
        assert!(!policy.should_retry(413, false));
        assert!(!policy.should_retry(404, true));
        assert!(policy.should_retry(500, false));

        let ignoring = RetryPolicy {
            respect_retry_after: false,
            ..RetryPolicy::default()
        };
        assert!(!ignoring.should_retry(413, true));
    }

    #[test]
    fn retry_after_seconds() {
        let now = Utc::now();
        assert_eq!(parse_retry_after("7", now), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after(" 0 ", now), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("soon", now), None);
        assert_eq!(parse_retry_after("", now), None);
    }

    #[test]
    fn retry_after_http_date() {
        let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 27, 30).unwrap();
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", now),
            Some(Duration::from_secs(30))
        );
        let later = Utc.with_ymd_and_hms(2015, 10, 21, 8, 0, 0).unwrap();
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", later),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn retry_after_ignored_when_not_respected() {
        let policy = RetryPolicy {
            respect_retry_after: false,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.wait_before(2, Some("30")), Duration::from_secs(2));

        let policy = RetryPolicy::default();
        assert_eq!(policy.wait_before(2, Some("30")), Duration::from_secs(30));
        assert_eq!(policy.wait_before(2, Some("garbage")), Duration::from_secs(2));
    }
}
