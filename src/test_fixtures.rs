//! Shared builders for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Game, Player};

/// Midnight UTC on the given day of January 2025.
pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
}

/// The tracked player in seat 1.
pub fn me(id: &str, commander: &str) -> Player {
    Player::new(id, commander, 1).as_me()
}

/// An opponent in seat 2.
pub fn opp(id: &str, commander: &str) -> Player {
    Player::new(id, commander, 2)
}

/// A game on 2025-06-01.
pub fn game(id: &str, players: Vec<Player>, winner: &str, win_turn: u32) -> Game {
    let played_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    Game::new(id, played_at, players, winner, win_turn)
}

/// I play `commander` against Korvold and win on `win_turn`.
pub fn won_with(id: &str, commander: &str, win_turn: u32) -> Game {
    let me_id = format!("{}-me", id);
    let players = vec![me(&me_id, commander), opp(&format!("{}-opp", id), "Korvold")];
    game(id, players, &me_id, win_turn)
}

/// I play `commander` against Korvold and Korvold wins on `win_turn`.
pub fn lost_with(id: &str, commander: &str, win_turn: u32) -> Game {
    let opp_id = format!("{}-opp", id);
    let players = vec![me(&format!("{}-me", id), commander), opp(&opp_id, "Korvold")];
    game(id, players, &opp_id, win_turn)
}
