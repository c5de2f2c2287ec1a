//! Vocabulary selection for an exercise batch.
//!
//! Picks `target` items at random, steering away from the items used in the
//! most recent batches while the vocabulary is large enough to allow it.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

/// Number of trailing history entries treated as "recently used".
pub const RECENT_WINDOW: usize = 5;

/// Maximum number of ids kept in a session's history.
pub const HISTORY_LIMIT: usize = 10;

/// Anything selectable by a stable numeric id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Select up to `target` items from `pool`.
///
/// `history` is the session's used-id list (most recent last); only its last
/// [`RECENT_WINDOW`] entries are considered. Recent items are skipped only
/// while the pool is larger than the (clamped) target, and any shortfall is
/// filled from the skipped items in shuffled order.
pub fn select<T, R>(pool: Vec<T>, target: usize, history: &[i64], rng: &mut R) -> Vec<T>
where
    T: Identified,
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return Vec::new();
    }

    let target = target.clamp(1, pool.len());
    let recent: HashSet<i64> = recent_window(history).iter().copied().collect();
    let exclude_recent = pool.len() > target;

    let mut shuffled = pool;
    shuffled.shuffle(rng);

    let mut selected = Vec::with_capacity(target);
    let mut skipped = Vec::new();
    for item in shuffled {
        if selected.len() >= target {
            break;
        }
        if exclude_recent && recent.contains(&item.id()) {
            skipped.push(item);
            continue;
        }
        selected.push(item);
    }

    if selected.len() < target {
        let missing = target - selected.len();
        selected.extend(skipped.into_iter().take(missing));
    }

    selected
}

/// The trailing slice of `history` that counts as recently used.
pub fn recent_window(history: &[i64]) -> &[i64] {
    &history[history.len().saturating_sub(RECENT_WINDOW)..]
}

/// Append `selected` ids to `history`, keeping the last [`HISTORY_LIMIT`].
pub fn record_selection(history: &[i64], selected: &[i64]) -> Vec<i64> {
    let mut updated: Vec<i64> = history.iter().chain(selected).copied().collect();
    let overflow = updated.len().saturating_sub(HISTORY_LIMIT);
    updated.drain(..overflow);
    updated
}
