//! Human-readable summaries of purge outcomes

use crate::models::PurgeOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Render a summary: the success count, then one line per failure
///
/// ```
/// use cdn_purge::{report::summarize, PurgeOutcome};
///
/// let text = summarize(&[PurgeOutcome::success(""), PurgeOutcome::failure("API error")]);
/// assert_eq!(text, "There were 1 successes.\nFailed for reason: API error.\n");
/// ```
pub fn summarize(outcomes: &[PurgeOutcome]) -> String {
    PurgeSummary::from_outcomes(outcomes).to_string()
}

/// Aggregated view of a batch of outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failure_messages: Vec<String>,
}

impl PurgeSummary {
    pub fn from_outcomes(outcomes: &[PurgeOutcome]) -> Self {
        let failure_messages: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| o.message.clone())
            .collect();

        PurgeSummary {
            succeeded: outcomes.len() - failure_messages.len(),
            failed: failure_messages.len(),
            failure_messages,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for PurgeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "There were {} successes.", self.succeeded)?;
        for message in &self.failure_messages {
            writeln!(f, "Failed for reason: {}.", message)?;
        }
        Ok(())
    }
}
