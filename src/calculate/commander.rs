//! Per-commander aggregation.

use std::collections::BTreeMap;

use crate::models::{CommanderStat, Game, GameResult, KeyCardCount, RecentResult};

use super::{calculate_win_rate, tally_tags, KEY_CARDS_LIMIT, RECENT_RESULTS_LIMIT};

/// Running totals for one of my commanders.
#[derive(Default)]
struct CommanderBucket<'a> {
    mana_cost: Option<String>,
    image_uri: Option<String>,
    wins: u32,
    games: u32,
    win_turn_sum: u64,
    with_fast_mana: (u32, u32),
    against_fast_mana: (u32, u32),
    history: Vec<&'a Game>,
}

impl<'a> CommanderBucket<'a> {
    fn record(&mut self, game: &'a Game) {
        let won = game.is_my_win();

        self.games += 1;
        if won {
            self.wins += 1;
            self.win_turn_sum += u64::from(game.win_turn);
        }
        if game.i_had_fast_mana() {
            self.with_fast_mana.1 += 1;
            self.with_fast_mana.0 += u32::from(won);
        }
        if game.opponent_had_fast_mana() {
            self.against_fast_mana.1 += 1;
            self.against_fast_mana.0 += u32::from(won);
        }
        self.history.push(game);
    }

    fn into_stat(self, name: String) -> CommanderStat {
        let average_win_turn = if self.wins == 0 {
            None
        } else {
            Some(self.win_turn_sum as f64 / self.wins as f64)
        };

        CommanderStat {
            name,
            mana_cost: self.mana_cost,
            image_uri: self.image_uri,
            wins: self.wins,
            games: self.games,
            rate: calculate_win_rate(self.wins, self.games).rate,
            average_win_turn,
            with_fast_mana: calculate_win_rate(self.with_fast_mana.0, self.with_fast_mana.1),
            against_fast_mana: calculate_win_rate(
                self.against_fast_mana.0,
                self.against_fast_mana.1,
            ),
            recent_results: recent_results(&self.history),
            key_cards: rank_key_cards(&self.history),
        }
    }
}

/// Group my games by my commander, ranked by rate desc then games desc.
pub fn calculate_commander_stats(my_games: &[&Game]) -> Vec<CommanderStat> {
    let mut buckets: BTreeMap<&str, CommanderBucket> = BTreeMap::new();

    for &game in my_games {
        let Some(me) = game.me() else { continue };
        let bucket = buckets
            .entry(me.commander_name.as_str())
            .or_insert_with(|| CommanderBucket {
                mana_cost: me.commander_mana_cost.clone(),
                image_uri: me.commander_image_uri.clone(),
                ..Default::default()
            });
        bucket.record(game);
    }

    let mut ranked: Vec<CommanderStat> = buckets
        .into_iter()
        .map(|(name, bucket)| bucket.into_stat(name.to_string()))
        .collect();
    ranked.sort_by(|a, b| {
        b.rate
            .total_cmp(&a.rate)
            .then_with(|| b.games.cmp(&a.games))
    });
    ranked
}

/// Newest games first, each labelled with the winner's commander.
fn recent_results(history: &[&Game]) -> Vec<RecentResult> {
    let mut newest_first = history.to_vec();
    newest_first.sort_by(|a, b| b.played_at.cmp(&a.played_at));

    newest_first
        .into_iter()
        .take(RECENT_RESULTS_LIMIT)
        .map(|game| RecentResult {
            result: GameResult::from_win(game.is_my_win()),
            date: game.played_at,
            win_turn: game.win_turn,
            winning_commander: game.winner().map(|w| w.commander_name.clone()),
        })
        .collect()
}

fn rank_key_cards(history: &[&Game]) -> Vec<KeyCardCount> {
    tally_tags(
        history.iter().map(|g| g.key_wincon_cards.as_slice()),
        KEY_CARDS_LIMIT,
    )
    .into_iter()
    .map(|(name, count)| KeyCardCount { name, count })
    .collect()
}
