//! Top win conditions across my wins.

use crate::models::{Game, WinConditionCount};

use super::{tally_tags, TOP_WIN_CONDITIONS_LIMIT};

/// Rank win-condition tags over the games I won.
pub fn calculate_top_win_conditions(my_games: &[&Game]) -> Vec<WinConditionCount> {
    let won = my_games
        .iter()
        .filter(|g| g.is_my_win())
        .map(|g| g.win_conditions.as_slice());

    tally_tags(won, TOP_WIN_CONDITIONS_LIMIT)
        .into_iter()
        .map(|(condition, count)| WinConditionCount { condition, count })
        .collect()
}
