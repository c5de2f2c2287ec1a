//! Streak and accuracy arithmetic over practice history.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive days ending at `today` on which the user practiced.
///
/// Returns 0 when there was no practice today.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(today);

    while let Some(day) = cursor.filter(|d| dates.contains(d)) {
        streak += 1;
        cursor = day.pred_opt();
    }

    streak
}

/// Longest run of consecutive calendar days in `dates`.
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(date);
    }

    best
}

/// Share of correct attempts, 0.0 when there are none.
pub fn accuracy(correct: u64, attempts: u64) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    correct as f64 / attempts as f64
}

/// Day-based summary of a practice history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub days_practiced: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_practice_date: Option<NaiveDate>,
}

impl StreakSummary {
    /// Summarize practice dates in any order; duplicates are ignored.
    pub fn from_dates<I>(dates: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            days_practiced: dates.len(),
            current_streak: current_streak(&dates, today),
            longest_streak: longest_streak(&dates),
            last_practice_date: dates.last().copied(),
        }
    }
}
