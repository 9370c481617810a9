//! Statistics calculation engine.
//!
//! Folds the full match log into a [`ComputedStats`] report:
//! - Overall, fast-mana and per-seat win rates
//! - Per-commander breakdowns with recent history and key cards
//! - Color identity buckets and their superlatives
//! - Top win conditions and the current streak
//!
//! Everything here is a pure function of its input. Games without a
//! tracked player are ignored, and a winner id that resolves to nobody
//! simply never counts as a win.

pub mod color_identity;
pub mod commander;
pub mod streak;
pub mod win_conditions;

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::models::{ComputedStats, Game, SeatStats, WinRateStat};

pub use color_identity::{
    archnemesis, calculate_color_identity_stats, color_identity_key, most_played,
    most_successful, normalize_color_identity, COLORLESS_KEY,
};
pub use commander::calculate_commander_stats;
pub use streak::{calculate_current_streak, calculate_recent_form};
pub use win_conditions::calculate_top_win_conditions;

/// Recent results kept per commander, and games considered for the streak.
pub const RECENT_RESULTS_LIMIT: usize = 10;

/// Key cards kept per commander.
pub const KEY_CARDS_LIMIT: usize = 5;

/// Win conditions kept in the report.
pub const TOP_WIN_CONDITIONS_LIMIT: usize = 5;

/// Calculate win rate from wins/games.
pub fn calculate_win_rate(wins: u32, games: u32) -> WinRateStat {
    WinRateStat::new(wins, games)
}

/// Win rate over a set of my games.
pub fn calculate_win_rate_over<'a, I>(games: I) -> WinRateStat
where
    I: IntoIterator<Item = &'a Game>,
{
    let (wins, total) = games.into_iter().fold((0, 0), |(wins, total), game| {
        (wins + u32::from(game.is_my_win()), total + 1)
    });
    calculate_win_rate(wins, total)
}

/// Restrict the log to games the tracked player took part in.
pub fn my_games(games: &[Game]) -> Vec<&Game> {
    games.iter().filter(|g| g.me().is_some()).collect()
}

/// Win rate for each of the six seats.
pub fn calculate_seat_stats(my_games: &[&Game]) -> SeatStats {
    let mut buckets = [(0u32, 0u32); 6];

    for game in my_games {
        let Some(me) = game.me() else { continue };
        if !(1..=SeatStats::SEATS).contains(&me.seat_position) {
            continue;
        }
        let bucket = &mut buckets[(me.seat_position - 1) as usize];
        bucket.1 += 1;
        if game.is_my_win() {
            bucket.0 += 1;
        }
    }

    SeatStats::from_buckets(buckets.map(|(wins, games)| calculate_win_rate(wins, games)))
}

/// Mean winning turn over my wins, `None` without wins.
pub fn calculate_average_win_turn(my_games: &[&Game]) -> Option<f64> {
    let win_turns: Vec<u32> = my_games
        .iter()
        .filter(|g| g.is_my_win())
        .map(|g| g.win_turn)
        .collect();

    average(&win_turns)
}

fn average(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    Some(sum as f64 / values.len() as f64)
}

/// Count tags across lists, ranked by count desc then tag asc.
///
/// Tags are trimmed and blank tags are dropped. A tag listed twice in the
/// same list counts once for that list.
pub(crate) fn tally_tags<'a, I>(lists: I, limit: usize) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();

    for list in lists {
        let distinct: BTreeSet<&str> = list
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .collect();
        for tag in distinct {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Compute the full report for a match log.
pub fn compute_stats(games: &[Game]) -> ComputedStats {
    let mine = my_games(games);
    debug!(
        "Computing stats over {} of {} games",
        mine.len(),
        games.len()
    );

    let overall = calculate_win_rate_over(mine.iter().copied());
    let with_fast_mana =
        calculate_win_rate_over(mine.iter().copied().filter(|g| g.i_had_fast_mana()));
    let against_fast_mana =
        calculate_win_rate_over(mine.iter().copied().filter(|g| g.opponent_had_fast_mana()));

    let by_seat = calculate_seat_stats(&mine);
    let by_commander = calculate_commander_stats(&mine);
    let by_commander_color_identity = calculate_color_identity_stats(&mine);
    let recent_form = calculate_recent_form(&mine);
    let current_streak = calculate_current_streak(&recent_form);

    debug!(
        "Grouped into {} commanders and {} color identities",
        by_commander.len(),
        by_commander_color_identity.len()
    );

    ComputedStats {
        overall,
        with_fast_mana,
        against_fast_mana,
        by_seat,
        most_played_commander_color_identity: most_played(&by_commander_color_identity),
        most_successful_commander_color_identity: most_successful(&by_commander_color_identity),
        archnemesis_commander_color_identity: archnemesis(&by_commander_color_identity),
        by_commander,
        by_commander_color_identity,
        average_win_turn: calculate_average_win_turn(&mine),
        games_played: mine.len() as u32,
        top_win_conditions: calculate_top_win_conditions(&mine),
        recent_form,
        current_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MtgColor, Player};
    use crate::test_fixtures::{day, game, lost_with, me, opp, won_with};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_calculate_win_rate() {
        assert!((calculate_win_rate(5, 6).rate - 0.833).abs() < 0.01);
        assert_eq!(calculate_win_rate(0, 0).rate, 0.0);
        assert_eq!(calculate_win_rate(3, 6).rate, 0.5);
    }

    #[test]
    fn test_empty_log() {
        let stats = compute_stats(&[]);

        assert_eq!(stats.overall, WinRateStat::new(0, 0));
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.average_win_turn, None);
        assert!(stats.by_commander.is_empty());
        assert!(stats.by_commander_color_identity.is_empty());
        assert!(stats.most_played_commander_color_identity.is_none());
        assert!(stats.most_successful_commander_color_identity.is_none());
        assert!(stats.archnemesis_commander_color_identity.is_none());
        assert!(stats.top_win_conditions.is_empty());
        assert!(stats.current_streak.is_none());
        for (_, seat) in stats.by_seat.iter() {
            assert_eq!(*seat, WinRateStat::new(0, 0));
        }
    }

    #[test]
    fn test_overall_mixed_results() {
        let games = vec![
            won_with("g1", "Atraxa", 7),
            won_with("g2", "Atraxa", 9),
            lost_with("g3", "Atraxa", 6),
        ];

        let stats = compute_stats(&games);
        assert_eq!(stats.overall.wins, 2);
        assert_eq!(stats.overall.games, 3);
        assert!((stats.overall.rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.games_played, 3);
    }

    #[test]
    fn test_games_without_me_are_excluded() {
        let games = vec![
            game(
                "g1",
                vec![opp("p1", "Korvold"), opp("p2", "Atraxa")],
                "p1",
                8,
            ),
            won_with("g2", "Atraxa", 7),
        ];

        let stats = compute_stats(&games);
        assert_eq!(stats.games_played, my_games(&games).len() as u32);
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.overall, WinRateStat::new(1, 1));
    }

    #[test]
    fn test_unresolved_winner_counts_as_played_not_won() {
        let games = vec![game(
            "g1",
            vec![me("m", "Atraxa"), opp("o", "Korvold")],
            "nobody",
            8,
        )];

        let stats = compute_stats(&games);
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.overall, WinRateStat::new(0, 1));
        assert_eq!(stats.average_win_turn, None);

        let atraxa = stats.get_commander("Atraxa").unwrap();
        assert_eq!(atraxa.recent_results[0].winning_commander, None);
    }

    #[test]
    fn test_with_fast_mana_counts_only_my_fast_mana() {
        let games = vec![
            game(
                "g1",
                vec![
                    me("m1", "Atraxa").with_fast_mana(&["Sol Ring"]),
                    opp("o1", "Korvold"),
                ],
                "m1",
                5,
            ),
            game(
                "g2",
                vec![me("m2", "Atraxa"), opp("o2", "Korvold")],
                "o2",
                10,
            ),
        ];

        let stats = compute_stats(&games);
        assert_eq!(stats.with_fast_mana, WinRateStat::new(1, 1));
        assert_eq!(stats.with_fast_mana.rate, 1.0);
    }

    #[test]
    fn test_against_fast_mana_counts_opponent_fast_mana() {
        let games = vec![
            game(
                "g1",
                vec![
                    me("m1", "Atraxa"),
                    opp("o1", "Korvold").with_fast_mana(&["Mana Crypt"]),
                ],
                "m1",
                8,
            ),
            game(
                "g2",
                vec![me("m2", "Atraxa"), opp("o2", "Korvold")],
                "m2",
                10,
            ),
        ];

        let stats = compute_stats(&games);
        assert_eq!(stats.against_fast_mana, WinRateStat::new(1, 1));
        assert_eq!(stats.with_fast_mana, WinRateStat::new(0, 0));
    }

    #[test]
    fn test_seat_buckets() {
        let games = vec![
            game(
                "g1",
                vec![Player::new("m1", "Atraxa", 1).as_me(), opp("o1", "Korvold")],
                "m1",
                7,
            ),
            game(
                "g2",
                vec![Player::new("m2", "Atraxa", 3).as_me(), opp("o2", "Korvold")],
                "o2",
                6,
            ),
            game(
                "g3",
                vec![Player::new("m3", "Atraxa", 9).as_me(), opp("o3", "Korvold")],
                "m3",
                6,
            ),
        ];

        let stats = compute_stats(&games);
        assert_eq!(stats.by_seat.seat1, WinRateStat::new(1, 1));
        assert_eq!(stats.by_seat.seat3, WinRateStat::new(0, 1));
        assert_eq!(stats.by_seat.seat2, WinRateStat::new(0, 0));
        assert_eq!(stats.by_seat.iter().count(), 6);

        // The out-of-range seat is still a played game and a win.
        assert_eq!(stats.overall, WinRateStat::new(2, 3));
    }

    #[test]
    fn test_average_win_turn() {
        let games = vec![won_with("g1", "A", 6), won_with("g2", "B", 10)];
        assert_eq!(compute_stats(&games).average_win_turn, Some(8.0));

        let games = vec![lost_with("g1", "A", 5)];
        assert_eq!(compute_stats(&games).average_win_turn, None);
    }

    #[test]
    fn test_tally_tags_dedupes_within_a_list() {
        let lists = [
            vec!["Combo".to_string(), "Combo".to_string(), " ".to_string()],
            vec![" Combo ".to_string(), "Combat".to_string()],
        ];

        let ranked = tally_tags(lists.iter().map(|l| l.as_slice()), 5);
        assert_eq!(
            ranked,
            vec![("Combo".to_string(), 2), ("Combat".to_string(), 1)]
        );
    }

    /// A varied log touching every aggregation path.
    fn varied_log() -> Vec<Game> {
        let commanders = ["Atraxa", "Kinnan", "Tymna", "Kozilek", "Yuriko"];
        let identities = [
            Some(vec![MtgColor::G, MtgColor::W, MtgColor::U, MtgColor::B]),
            Some(vec![MtgColor::U, MtgColor::G]),
            Some(vec![MtgColor::W, MtgColor::B]),
            None,
            Some(vec![MtgColor::U, MtgColor::B]),
        ];
        let tags = ["Combo", "Combat", "Alt Win", "Mill", "Drain", "Poison", "Control"];

        (0..40u32)
            .map(|i| {
                let idx = (i as usize * 7) % commanders.len();
                let mut mine = Player::new(format!("m{}", i), commanders[idx], (i % 7) as u8 + 1)
                    .as_me();
                if let Some(colors) = &identities[idx] {
                    mine = mine.with_color_identity(colors.clone());
                }
                if i % 3 == 0 {
                    mine = mine.with_fast_mana(&["Sol Ring"]);
                }
                let mut other = opp(&format!("o{}", i), "Korvold");
                if i % 4 == 0 {
                    other = other.with_fast_mana(&["Mana Vault"]);
                }
                let winner = match i % 5 {
                    0 | 2 => format!("m{}", i),
                    4 => "ghost".to_string(),
                    _ => format!("o{}", i),
                };
                let players = if i % 11 == 10 {
                    vec![other]
                } else {
                    vec![mine, other]
                };
                Game::new(
                    format!("g{}", i),
                    day(i % 28 + 1),
                    players,
                    winner,
                    4 + i % 9,
                )
                .with_win_conditions(&[tags[i as usize % tags.len()], tags[(i as usize + 3) % tags.len()]])
                .with_key_cards(&["Thassa's Oracle", tags[i as usize % 3]])
            })
            .collect()
    }

    #[test]
    fn test_rates_are_bounded() {
        let stats = compute_stats(&varied_log());

        let mut rates = vec![
            stats.overall.rate,
            stats.with_fast_mana.rate,
            stats.against_fast_mana.rate,
        ];
        rates.extend(stats.by_seat.iter().map(|(_, s)| s.rate));
        for c in &stats.by_commander {
            rates.extend([c.rate, c.with_fast_mana.rate, c.against_fast_mana.rate]);
        }
        for c in &stats.by_commander_color_identity {
            rates.extend([c.win_rate, c.loss_rate]);
        }

        for rate in rates {
            assert!(rate.is_finite());
            assert!((0.0..=1.0).contains(&rate), "rate out of range: {}", rate);
        }
    }

    #[test]
    fn test_by_commander_ordering_property() {
        let stats = compute_stats(&varied_log());

        for pair in stats.by_commander.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.rate > b.rate || (a.rate == b.rate && a.games >= b.games));
        }
    }

    #[test]
    fn test_commander_bucket_properties() {
        let games = varied_log();
        let stats = compute_stats(&games);

        for commander in &stats.by_commander {
            let bucket: Vec<&Game> = my_games(&games)
                .into_iter()
                .filter(|g| g.me().unwrap().commander_name == commander.name)
                .collect();

            assert_eq!(commander.games as usize, bucket.len());
            assert_eq!(
                commander.recent_results.len(),
                bucket.len().min(RECENT_RESULTS_LIMIT)
            );
            for pair in commander.recent_results.windows(2) {
                assert!(pair[0].date >= pair[1].date);
            }

            assert!(commander.key_cards.len() <= KEY_CARDS_LIMIT);
            for pair in commander.key_cards.windows(2) {
                assert!(
                    pair[0].count > pair[1].count
                        || (pair[0].count == pair[1].count && pair[0].name < pair[1].name)
                );
            }
            for card in &commander.key_cards {
                let listed = bucket
                    .iter()
                    .filter(|g| g.key_wincon_cards.contains(&card.name))
                    .count();
                assert!(card.count as usize <= listed);
            }

            let win_turns: Vec<u32> = bucket
                .iter()
                .filter(|g| g.is_my_win())
                .map(|g| g.win_turn)
                .collect();
            assert_eq!(commander.average_win_turn, average(&win_turns));
        }
    }

    #[test]
    fn test_compute_stats_is_idempotent() {
        let games = varied_log();
        assert_eq!(compute_stats(&games), compute_stats(&games));
        assert_eq!(
            serde_json::to_string(&compute_stats(&games)).unwrap(),
            serde_json::to_string(&compute_stats(&games)).unwrap()
        );
    }
}
