//! Watchlist Selector: ranks agents needing intervention.

use crate::core::{AgentSnapshot, ErrorItem, WatchEntry};
use im::Vector;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Top `k` agents by overall error rate descending. Ties break by agent id
/// ascending so the ranking is deterministic. The trend is the delta
/// against the prior period's rate, 0 when the agent has no prior data.
pub fn build_watchlist(
    current: &[AgentSnapshot],
    prior: &[AgentSnapshot],
    k: usize,
) -> Vector<WatchEntry> {
    let prior_rates: HashMap<&str, f64> = prior
        .iter()
        .map(|s| (s.agent_id.as_str(), s.overall_error_rate))
        .collect();

    let mut ranked: Vec<&AgentSnapshot> = current.iter().collect();
    ranked.sort_by(|a, b| {
        b.overall_error_rate
            .partial_cmp(&a.overall_error_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    });

    ranked
        .into_iter()
        .take(k)
        .map(|snapshot| WatchEntry {
            agent_id: snapshot.agent_id.clone(),
            error_rate: snapshot.overall_error_rate,
            trend: snapshot.overall_error_rate
                - prior_rates
                    .get(snapshot.agent_id.as_str())
                    .copied()
                    .unwrap_or(snapshot.overall_error_rate),
            main_issue: main_issue(snapshot),
        })
        .collect()
}

/// The agent's dominant error cause: highest per-item count, ties going to
/// the lowest item id. `None` when the agent flagged no errors at all.
fn main_issue(snapshot: &AgentSnapshot) -> Option<ErrorItem> {
    snapshot
        .per_item_error_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        // BTreeMap iterates in id order, so strict > keeps the lowest id on ties.
        .fold(None, |best: Option<(ErrorItem, u32)>, (item, count)| {
            match best {
                Some((_, best_count)) if *count <= best_count => best,
                _ => Some((*item, *count)),
            }
        })
        .map(|(item, _)| item)
}
