use std::collections::HashMap;

use super::snapshot::MetricGroup;

/// Busy/error state for the refresh machinery.
///
/// Owned by the scheduler; views receive clones and never mutate.
/// One busy flag per metric group, one global `is_refreshing` flag for
/// the all-groups refresh, and one global error slot.
#[derive(Debug, Clone, Default)]
pub struct LoadingState {
    groups: HashMap<MetricGroup, bool>,
    pub is_refreshing: bool,
    /// The most recent refresh failure, cleared on the next attempt.
    pub error: Option<String>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a specific group has a refresh in flight.
    #[must_use]
    pub fn is_busy(&self, group: MetricGroup) -> bool {
        self.groups.get(&group).copied().unwrap_or(false)
    }

    /// Whether any group has a refresh in flight.
    #[must_use]
    pub fn any_busy(&self) -> bool {
        self.groups.values().any(|busy| *busy)
    }

    pub fn set_busy(&mut self, group: MetricGroup, busy: bool) {
        self.groups.insert(group, busy);
    }

    pub fn set_all_busy(&mut self, busy: bool) {
        for group in MetricGroup::ALL {
            self.groups.insert(group, busy);
        }
    }
}
