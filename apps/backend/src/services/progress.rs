//! Progress report for one learner

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use trainer_core::{accuracy, StreakSummary};

use crate::db::PracticeStore;
use crate::error::Result;
use crate::models::ProgressResponse;

/// Totals, accuracy and streaks; practice days are local calendar dates of
/// session timestamps.
pub async fn compute_progress(
    store: &dyn PracticeStore,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<ProgressResponse> {
    let words_total = store.count_words(user_id).await?;
    let stats = store.exercise_stats(user_id).await?;
    let session_dates = store.session_dates(user_id).await?;

    let sessions_total = session_dates.len() as i64;
    let streaks = StreakSummary::from_dates(
        session_dates
            .iter()
            .map(|date| date.with_timezone(&Local).date_naive()),
        today,
    );

    let ratio = accuracy(stats.correct as u64, stats.attempted as u64);

    Ok(ProgressResponse {
        words_total,
        exercises_total: stats.total,
        attempts_total: stats.attempted,
        correct_total: stats.correct,
        accuracy: (ratio * 10_000.0).round() / 10_000.0,
        sessions_total,
        days_practiced: streaks.days_practiced,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        last_practice_date: streaks.last_practice_date,
    })
}
