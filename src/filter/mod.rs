//! Which ideas the dashboard shows for the current search/status/date filters.
//!
//! Remote queries are tried first so the backend's full-text index is used; if any of them
//! fails, the same filters are evaluated in memory over the last full listing.

use crate::backend::IdeaStore;
use crate::models::{Idea, IdeaStatus};
use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Quiet period after the last filter change before the list is recomputed.
pub(crate) const FILTER_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum StatusFilter {
    #[default]
    All,
    Only(IdeaStatus),
}

impl StatusFilter {
    /// Value used by the `<select>`: `all` or the status wire string.
    pub fn as_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(IdeaStatus::InProgress) => "in-progress",
            StatusFilter::Only(IdeaStatus::Completed) => "Completed",
            StatusFilter::Only(IdeaStatus::OnHold) => "on-hold",
        }
    }

    pub fn from_value(value: &str) -> Self {
        IdeaStatus::from_str(value)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }

    pub fn status(&self) -> Option<IdeaStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(s) => Some(*s),
        }
    }

    pub fn matches(&self, idea: &Idea) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => idea.status == *s,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, IntoStaticStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Year,
}

impl DateRange {
    pub fn label(self) -> &'static str {
        match self {
            DateRange::All => "All Time",
            DateRange::Today => "Today",
            DateRange::Week => "This Week",
            DateRange::Month => "This Month",
            DateRange::Year => "This Year",
        }
    }

    /// Earliest creation time still inside the range, or `None` when nothing is excluded.
    ///
    /// `today` starts at local midnight of `now`'s timezone; the other ranges reach back
    /// from `now` (months and years are calendar-aware).
    pub fn cutoff<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let cutoff = match self {
            DateRange::All => return None,
            DateRange::Today => {
                let midnight = now.date_naive().and_hms_opt(0, 0, 0)?;
                let tz = now.timezone();
                let local = tz.from_local_datetime(&midnight);
                match local.earliest() {
                    Some(start) => start.with_timezone(&Utc),
                    None => Utc.from_utc_datetime(&midnight),
                }
            }
            DateRange::Week => now.with_timezone(&Utc) - Duration::days(7),
            DateRange::Month => now.clone().checked_sub_months(Months::new(1))?.with_timezone(&Utc),
            DateRange::Year => now.clone().checked_sub_months(Months::new(12))?.with_timezone(&Utc),
        };
        Some(cutoff)
    }
}

/// Ephemeral dashboard filters. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FilterState {
    pub term: String,
    pub status: StatusFilter,
    pub date_range: DateRange,
}

impl FilterState {
    /// Whitespace-only search input counts as no search.
    pub fn search_term(&self) -> Option<&str> {
        let t = self.term.trim();
        if t.is_empty() {
            None
        } else {
            Some(t)
        }
    }

    pub fn is_active(&self) -> bool {
        self.search_term().is_some()
            || self.status != StatusFilter::All
            || self.date_range != DateRange::All
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Keep ideas created at or after the range's cutoff.
pub(crate) fn apply_date_range<Tz: TimeZone>(
    ideas: Vec<Idea>,
    range: DateRange,
    now: &DateTime<Tz>,
) -> Vec<Idea> {
    match range.cutoff(now) {
        Some(cutoff) => ideas.into_iter().filter(|i| i.created_at >= cutoff).collect(),
        None => ideas,
    }
}

/// Evaluate every filter in memory: case-insensitive term match on title or description,
/// status equality, then the date range.
pub(crate) fn apply_local_filters<Tz: TimeZone>(
    ideas: &[Idea],
    filter: &FilterState,
    now: &DateTime<Tz>,
) -> Vec<Idea> {
    let needle = filter.search_term().map(|t| t.to_lowercase());
    let matched = ideas
        .iter()
        .filter(|i| needle.as_deref().map_or(true, |n| i.matches_term(n)))
        .filter(|i| filter.status.matches(i))
        .cloned()
        .collect();
    apply_date_range(matched, filter.date_range, now)
}

/// Compute the visible list for `filter`.
///
/// A search term takes precedence over the status filter for the remote call; when both
/// are set the status is applied locally to the search results. Remote failures are logged
/// and answered from `all_ideas`, so this never fails.
pub(crate) async fn resolve_visible_ideas<S: IdeaStore, Tz: TimeZone>(
    store: &S,
    all_ideas: &[Idea],
    filter: &FilterState,
    now: &DateTime<Tz>,
) -> Vec<Idea> {
    let remote = match (filter.search_term(), filter.status.status()) {
        (Some(term), _) => store.search_ideas(term).await.map(|found| {
            found
                .into_iter()
                .filter(|i| filter.status.matches(i))
                .collect::<Vec<_>>()
        }),
        (None, Some(status)) => store.ideas_by_status(status).await,
        (None, None) => Ok(all_ideas.to_vec()),
    };

    match remote {
        Ok(ideas) => apply_date_range(ideas, filter.date_range, now),
        Err(e) => {
            log::warn!("remote filtering failed, filtering locally: {e}");
            apply_local_filters(all_ideas, filter, now)
        }
    }
}
