use crate::models::{Idea, IdeaStatus, Priority};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

pub(crate) const UNCATEGORIZED: &str = "uncategorized";

/// Counts shown on the dashboard tiles.
///
/// Built from the same snapshot the idea list renders, so the numbers and the list never
/// disagree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IdeaStats {
    pub total: usize,
    /// Every status is present, possibly with 0.
    pub by_status: BTreeMap<IdeaStatus, usize>,
    /// Every priority is present; ideas without one are counted in `no_priority`.
    pub by_priority: BTreeMap<Priority, usize>,
    pub no_priority: usize,
    /// Missing categories are counted under [`UNCATEGORIZED`].
    pub by_category: BTreeMap<String, usize>,
}

impl IdeaStats {
    pub fn from_ideas(ideas: &[Idea]) -> Self {
        let mut stats = Self {
            total: ideas.len(),
            by_status: IdeaStatus::iter().map(|s| (s, 0)).collect(),
            by_priority: Priority::iter().map(|p| (p, 0)).collect(),
            ..Default::default()
        };

        for idea in ideas {
            *stats.by_status.entry(idea.status).or_default() += 1;

            match idea.priority {
                Some(p) => *stats.by_priority.entry(p).or_default() += 1,
                None => stats.no_priority += 1,
            }

            let category = idea.category.as_deref().unwrap_or(UNCATEGORIZED);
            *stats.by_category.entry(category.to_string()).or_default() += 1;
        }

        stats
    }

    pub fn status_count(&self, status: IdeaStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}
