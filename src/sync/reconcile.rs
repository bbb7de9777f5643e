//! Reconciliation Decider.
//!
//! Decides per cohort whether an archive must be (re-)downloaded. The rule
//! compares counts only: a day is skipped when the ledger holds a nonzero
//! number of identifiers equal to the cohort's item count. A remote change
//! that swaps items while keeping the count is not detected.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::Cohort;

/// Outcome of reconciling one cohort against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Fetch,
    Skip,
}

impl Decision {
    #[must_use]
    pub const fn needs_fetch(self) -> bool {
        matches!(self, Self::Fetch)
    }
}

/// Count-based decision rule.
#[must_use]
pub const fn decide_counts(recorded: usize, listed: usize) -> Decision {
    if recorded != 0 && recorded == listed {
        Decision::Skip
    } else {
        Decision::Fetch
    }
}

/// Reconcile a cohort against the identifiers recorded for its day.
#[must_use]
pub fn decide(cohort: &Cohort, recorded: &BTreeSet<String>) -> Decision {
    decide_counts(recorded.len(), cohort.len())
}
