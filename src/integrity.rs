//! Data-integrity checks for the match log.
//!
//! The statistics engine tolerates malformed-but-well-typed games by
//! excluding them from the relevant aggregates. These checks make those
//! silent exclusions visible so the log can be fixed at the source.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Game, GameId, PlayerId};

/// Something wrong with a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// No seat is marked as the tracked player; the game is ignored
    NoTrackedPlayer,
    /// More than one seat is marked as the tracked player
    MultipleTrackedPlayers { count: usize },
    /// The winner id matches no seat; nobody is credited with the win
    UnresolvedWinner { winner_id: PlayerId },
    /// Two seats share an id
    DuplicatePlayerId { player_id: PlayerId },
    /// Seat position outside 1 through 6
    SeatOutOfRange { player_id: PlayerId, seat: u8 },
    /// The win turn is zero
    InvalidWinTurn,
    /// Every loser was knocked out before the win turn
    InvalidKnockoutTiming { win_turn: u32 },
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::NoTrackedPlayer => write!(f, "no player is marked as me"),
            IssueKind::MultipleTrackedPlayers { count } => {
                write!(f, "{} players are marked as me", count)
            }
            IssueKind::UnresolvedWinner { winner_id } => {
                write!(f, "winner {} is not one of the players", winner_id)
            }
            IssueKind::DuplicatePlayerId { player_id } => {
                write!(f, "player id {} appears more than once", player_id)
            }
            IssueKind::SeatOutOfRange { player_id, seat } => {
                write!(f, "player {} has seat {} (expected 1-6)", player_id, seat)
            }
            IssueKind::InvalidWinTurn => write!(f, "win turn must be at least 1"),
            IssueKind::InvalidKnockoutTiming { win_turn } => write!(
                f,
                "every loser was knocked out before the win on turn {}",
                win_turn
            ),
        }
    }
}

/// An issue tied to the game it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub game_id: GameId,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game {}: {}", self.game_id, self.kind)
    }
}

/// Whether the recorded knockouts contradict the win turn.
///
/// If every loser was knocked out strictly before the winning turn, the
/// game would have ended earlier. Losers without a knockout turn make the
/// timing unverifiable, so they never trigger this.
pub fn has_invalid_knockout_timing(game: &Game) -> bool {
    if game.winner().is_none() || game.win_turn < 1 {
        return false;
    }

    let mut losers = game
        .players
        .iter()
        .filter(|p| p.id != game.winner_id)
        .peekable();
    if losers.peek().is_none() {
        return false;
    }

    losers.all(|p| p.knockout_turn.is_some_and(|ko| ko < game.win_turn))
}

/// All issues in one game.
pub fn check_game(game: &Game) -> Vec<IssueKind> {
    let mut issues = Vec::new();

    match game.players.iter().filter(|p| p.is_me).count() {
        0 => issues.push(IssueKind::NoTrackedPlayer),
        1 => {}
        count => issues.push(IssueKind::MultipleTrackedPlayers { count }),
    }

    if game.winner().is_none() {
        issues.push(IssueKind::UnresolvedWinner {
            winner_id: game.winner_id.clone(),
        });
    }

    let mut seen = HashSet::new();
    for player in &game.players {
        if !seen.insert(&player.id) {
            issues.push(IssueKind::DuplicatePlayerId {
                player_id: player.id.clone(),
            });
        }
        if !(1..=6).contains(&player.seat_position) {
            issues.push(IssueKind::SeatOutOfRange {
                player_id: player.id.clone(),
                seat: player.seat_position,
            });
        }
    }

    if game.win_turn == 0 {
        issues.push(IssueKind::InvalidWinTurn);
    }

    if has_invalid_knockout_timing(game) {
        issues.push(IssueKind::InvalidKnockoutTiming {
            win_turn: game.win_turn,
        });
    }

    issues
}

/// All issues across the log, in log order.
pub fn check_games(games: &[Game]) -> Vec<IntegrityIssue> {
    games
        .iter()
        .flat_map(|game| {
            check_game(game).into_iter().map(|kind| IntegrityIssue {
                game_id: game.id.clone(),
                kind,
            })
        })
        .collect()
}

/// Run the checks and log every issue found. Returns the issue count.
pub fn warn_on_issues(games: &[Game]) -> usize {
    let issues = check_games(games);
    for issue in &issues {
        warn!("Integrity issue: {}", issue);
    }
    issues.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Player;
    use crate::test_fixtures::{game, lost_with, me, opp, won_with};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_games_have_no_issues() {
        let games = vec![won_with("g1", "Atraxa", 7), lost_with("g2", "Atraxa", 5)];
        assert!(check_games(&games).is_empty());
    }

    #[test]
    fn test_no_tracked_player() {
        let g = game("g1", vec![opp("a", "Korvold"), opp("b", "Atraxa")], "a", 7);
        assert_eq!(check_game(&g), vec![IssueKind::NoTrackedPlayer]);
    }

    #[test]
    fn test_multiple_tracked_players() {
        let g = game("g1", vec![me("a", "Korvold"), me("b", "Atraxa")], "a", 7);
        assert_eq!(
            check_game(&g),
            vec![IssueKind::MultipleTrackedPlayers { count: 2 }]
        );
    }

    #[test]
    fn test_unresolved_winner() {
        let g = game("g1", vec![me("a", "Korvold"), opp("b", "Atraxa")], "zzz", 7);
        assert_eq!(
            check_game(&g),
            vec![IssueKind::UnresolvedWinner {
                winner_id: "zzz".into()
            }]
        );
    }

    #[test]
    fn test_duplicate_id_and_bad_seat() {
        let g = game(
            "g1",
            vec![
                me("a", "Korvold"),
                Player::new("a", "Atraxa", 7),
            ],
            "a",
            7,
        );
        assert_eq!(
            check_game(&g),
            vec![
                IssueKind::DuplicatePlayerId {
                    player_id: "a".into()
                },
                IssueKind::SeatOutOfRange {
                    player_id: "a".into(),
                    seat: 7
                },
            ]
        );
    }

    #[test]
    fn test_zero_win_turn() {
        assert_eq!(
            check_game(&won_with("g1", "Atraxa", 0)),
            vec![IssueKind::InvalidWinTurn]
        );
    }

    #[test]
    fn test_knockout_timing() {
        let all_out_early = game(
            "g1",
            vec![
                me("m", "Atraxa"),
                opp("o1", "Korvold").with_knockout_turn(5),
                opp("o2", "Tymna").with_knockout_turn(6),
            ],
            "m",
            8,
        );
        assert!(has_invalid_knockout_timing(&all_out_early));
        assert_eq!(
            check_game(&all_out_early),
            vec![IssueKind::InvalidKnockoutTiming { win_turn: 8 }]
        );

        let last_out_on_win_turn = game(
            "g2",
            vec![
                me("m", "Atraxa"),
                opp("o1", "Korvold").with_knockout_turn(5),
                opp("o2", "Tymna").with_knockout_turn(8),
            ],
            "m",
            8,
        );
        assert!(!has_invalid_knockout_timing(&last_out_on_win_turn));

        let unknown_timing = game(
            "g3",
            vec![
                me("m", "Atraxa"),
                opp("o1", "Korvold").with_knockout_turn(5),
                opp("o2", "Tymna"),
            ],
            "m",
            8,
        );
        assert!(!has_invalid_knockout_timing(&unknown_timing));
    }

    #[test]
    fn test_knockout_timing_needs_losers_and_a_winner() {
        let solo = game("g1", vec![me("m", "Atraxa")], "m", 8);
        assert!(!has_invalid_knockout_timing(&solo));

        let ghost_winner = game(
            "g2",
            vec![me("m", "Atraxa").with_knockout_turn(2)],
            "ghost",
            8,
        );
        assert!(!has_invalid_knockout_timing(&ghost_winner));
    }

    #[test]
    fn test_check_games_tags_game_ids() {
        let games = vec![
            won_with("ok", "Atraxa", 7),
            game("bad", vec![opp("a", "Korvold")], "a", 7),
        ];
        let issues = check_games(&games);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].game_id.as_str(), "bad");
        assert_eq!(issues[0].to_string(), "game bad: no player is marked as me");
        assert_eq!(warn_on_issues(&games), 1);
    }

    #[test]
    fn test_issue_serialization() {
        let issue = IntegrityIssue {
            game_id: "g1".into(),
            kind: IssueKind::SeatOutOfRange {
                player_id: "p1".into(),
                seat: 9,
            },
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["game_id"], "g1");
        assert_eq!(json["kind"], "seat_out_of_range");
        assert_eq!(json["seat"], 9);
    }
}
