//! Derived statistics models.
//!
//! Everything here is recomputed from the match log on demand and never
//! stored. Nullable fields serialize as `null` when there is no
//! qualifying data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MtgColor;

/// Wins over games with a precomputed rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WinRateStat {
    pub wins: u32,
    pub games: u32,
    /// Win rate (0.0 to 1.0), 0.0 when no games
    pub rate: f64,
}

impl WinRateStat {
    pub fn new(wins: u32, games: u32) -> Self {
        let rate = if games == 0 {
            0.0
        } else {
            wins as f64 / games as f64
        };
        Self { wins, games, rate }
    }
}

/// Win rates for the six seat positions. All six are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatStats {
    pub seat1: WinRateStat,
    pub seat2: WinRateStat,
    pub seat3: WinRateStat,
    pub seat4: WinRateStat,
    pub seat5: WinRateStat,
    pub seat6: WinRateStat,
}

impl SeatStats {
    /// Number of seat buckets.
    pub const SEATS: u8 = 6;

    /// Build from per-seat stats ordered seat 1 first.
    pub fn from_buckets(buckets: [WinRateStat; 6]) -> Self {
        let [seat1, seat2, seat3, seat4, seat5, seat6] = buckets;
        Self {
            seat1,
            seat2,
            seat3,
            seat4,
            seat5,
            seat6,
        }
    }

    /// Stats for a 1-based seat position.
    pub fn get(&self, seat: u8) -> Option<&WinRateStat> {
        match seat {
            1 => Some(&self.seat1),
            2 => Some(&self.seat2),
            3 => Some(&self.seat3),
            4 => Some(&self.seat4),
            5 => Some(&self.seat5),
            6 => Some(&self.seat6),
            _ => None,
        }
    }

    /// Iterate `(seat, stat)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &WinRateStat)> {
        [
            &self.seat1,
            &self.seat2,
            &self.seat3,
            &self.seat4,
            &self.seat5,
            &self.seat6,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, stat)| (i as u8 + 1, stat))
    }
}

/// Outcome of one game from the tracked player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    W,
    L,
}

impl GameResult {
    pub fn from_win(won: bool) -> Self {
        if won {
            GameResult::W
        } else {
            GameResult::L
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::W => write!(f, "W"),
            GameResult::L => write!(f, "L"),
        }
    }
}

/// One entry in a commander's recent history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResult {
    pub result: GameResult,
    pub date: DateTime<Utc>,
    pub win_turn: u32,
    /// Commander of whoever won; `None` if the winner doesn't resolve
    pub winning_commander: Option<String>,
}

/// How often a card was tagged as a key wincon piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCardCount {
    pub name: String,
    pub count: u32,
}

/// Per-commander statistics for the tracked player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommanderStat {
    /// Commander name
    pub name: String,

    /// Display metadata, passed through from the first game seen
    pub mana_cost: Option<String>,
    pub image_uri: Option<String>,

    pub wins: u32,
    pub games: u32,

    /// Win rate (0.0 to 1.0)
    pub rate: f64,

    /// Mean winning turn, `None` without wins
    pub average_win_turn: Option<f64>,

    pub with_fast_mana: WinRateStat,
    pub against_fast_mana: WinRateStat,

    /// Newest first, at most ten
    pub recent_results: Vec<RecentResult>,

    /// Most-tagged key cards, at most five
    pub key_cards: Vec<KeyCardCount>,
}

/// Per color-identity statistics for the tracked player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommanderColorIdentityStat {
    /// WUBRG-ordered letters, or "C" for colorless
    pub key: String,
    pub colors: Vec<MtgColor>,
    /// Distinct commander names played under this identity
    pub unique_commanders: u32,
    pub wins: u32,
    pub games: u32,
    pub win_rate: f64,
    pub loss_rate: f64,
}

/// A win-condition tag and how many of my wins it was cited in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinConditionCount {
    pub condition: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    Win,
    Loss,
}

/// A run of identical results ending at the most recent game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub length: u32,
}

impl std::fmt::Display for Streak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match (self.kind, self.length) {
            (StreakKind::Win, 1) => "win",
            (StreakKind::Win, _) => "wins",
            (StreakKind::Loss, 1) => "loss",
            (StreakKind::Loss, _) => "losses",
        };
        write!(f, "{} {}", self.length, label)
    }
}

/// The full analytics report for a match log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStats {
    pub overall: WinRateStat,
    pub with_fast_mana: WinRateStat,
    pub against_fast_mana: WinRateStat,
    pub by_seat: SeatStats,

    /// Sorted by rate desc, then games desc
    pub by_commander: Vec<CommanderStat>,

    /// Sorted by games desc, then unique commanders desc, then key asc
    pub by_commander_color_identity: Vec<CommanderColorIdentityStat>,

    pub most_played_commander_color_identity: Option<CommanderColorIdentityStat>,
    pub most_successful_commander_color_identity: Option<CommanderColorIdentityStat>,
    pub archnemesis_commander_color_identity: Option<CommanderColorIdentityStat>,

    pub average_win_turn: Option<f64>,
    pub games_played: u32,
    pub top_win_conditions: Vec<WinConditionCount>,

    /// My last ten results, newest first
    pub recent_form: Vec<GameResult>,
    pub current_streak: Option<Streak>,
}

impl ComputedStats {
    /// Get commander by name. An exact match wins over a case-insensitive one.
    pub fn get_commander(&self, name: &str) -> Option<&CommanderStat> {
        self.by_commander
            .iter()
            .find(|c| c.name == name)
            .or_else(|| {
                self.by_commander
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(name))
            })
    }

    /// Get color identity bucket by key (e.g. "UB", "C").
    pub fn get_color_identity(&self, key: &str) -> Option<&CommanderColorIdentityStat> {
        self.by_commander_color_identity
            .iter()
            .find(|c| c.key == key)
    }
}
