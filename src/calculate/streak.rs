//! Recent form and the current streak.

use crate::models::{Game, GameResult, Streak, StreakKind};

use super::RECENT_RESULTS_LIMIT;

/// My last results, newest first. Games played at the same instant keep
/// their log order.
pub fn calculate_recent_form(my_games: &[&Game]) -> Vec<GameResult> {
    let mut newest_first = my_games.to_vec();
    newest_first.sort_by(|a, b| b.played_at.cmp(&a.played_at));

    newest_first
        .into_iter()
        .take(RECENT_RESULTS_LIMIT)
        .map(|g| GameResult::from_win(g.is_my_win()))
        .collect()
}

/// The run of identical results at the head of `recent_form`.
pub fn calculate_current_streak(recent_form: &[GameResult]) -> Option<Streak> {
    let first = *recent_form.first()?;
    let length = recent_form.iter().take_while(|&&r| r == first).count() as u32;
    let kind = match first {
        GameResult::W => StreakKind::Win,
        GameResult::L => StreakKind::Loss,
    };
    Some(Streak { kind, length })
}
