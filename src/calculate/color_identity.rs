//! Color identity buckets and superlatives.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CommanderColorIdentityStat, Game, MtgColor};

use super::calculate_win_rate;

/// Key used when a commander has no colors (or none were recorded).
pub const COLORLESS_KEY: &str = "C";

/// Deduplicate and sort colors into WUBRG order. Missing means colorless.
pub fn normalize_color_identity(colors: Option<&[MtgColor]>) -> Vec<MtgColor> {
    colors
        .unwrap_or_default()
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Grouping key for normalized colors, e.g. "UB" or "C".
pub fn color_identity_key(colors: &[MtgColor]) -> String {
    if colors.is_empty() {
        COLORLESS_KEY.to_string()
    } else {
        colors.iter().map(|c| c.symbol()).collect()
    }
}

struct ColorBucket<'a> {
    colors: Vec<MtgColor>,
    commanders: BTreeSet<&'a str>,
    wins: u32,
    games: u32,
}

/// Group my games by my commander's color identity, most played first.
pub fn calculate_color_identity_stats(my_games: &[&Game]) -> Vec<CommanderColorIdentityStat> {
    let mut buckets: BTreeMap<String, ColorBucket> = BTreeMap::new();

    for &game in my_games {
        let Some(me) = game.me() else { continue };
        let colors = normalize_color_identity(me.commander_color_identity.as_deref());
        let bucket = buckets
            .entry(color_identity_key(&colors))
            .or_insert_with(|| ColorBucket {
                colors,
                commanders: BTreeSet::new(),
                wins: 0,
                games: 0,
            });

        bucket.games += 1;
        bucket.wins += u32::from(game.is_my_win());
        bucket.commanders.insert(me.commander_name.as_str());
    }

    let mut ranked: Vec<CommanderColorIdentityStat> = buckets
        .into_iter()
        .map(|(key, bucket)| {
            let win_rate = calculate_win_rate(bucket.wins, bucket.games).rate;
            CommanderColorIdentityStat {
                key,
                colors: bucket.colors,
                unique_commanders: bucket.commanders.len() as u32,
                wins: bucket.wins,
                games: bucket.games,
                win_rate,
                loss_rate: 1.0 - win_rate,
            }
        })
        .collect();
    ranked.sort_by(by_popularity);
    ranked
}

/// Games desc, then unique commanders desc, then key asc.
fn by_popularity(a: &CommanderColorIdentityStat, b: &CommanderColorIdentityStat) -> Ordering {
    b.games
        .cmp(&a.games)
        .then_with(|| b.unique_commanders.cmp(&a.unique_commanders))
        .then_with(|| a.key.cmp(&b.key))
}

fn by_win_rate(a: &CommanderColorIdentityStat, b: &CommanderColorIdentityStat) -> Ordering {
    b.win_rate
        .total_cmp(&a.win_rate)
        .then_with(|| by_popularity(a, b))
}

fn by_loss_rate(a: &CommanderColorIdentityStat, b: &CommanderColorIdentityStat) -> Ordering {
    b.loss_rate
        .total_cmp(&a.loss_rate)
        .then_with(|| by_popularity(a, b))
}

fn first_by<F>(stats: &[CommanderColorIdentityStat], cmp: F) -> Option<CommanderColorIdentityStat>
where
    F: Fn(&CommanderColorIdentityStat, &CommanderColorIdentityStat) -> Ordering,
{
    stats.iter().min_by(|a, b| cmp(a, b)).cloned()
}

/// The identity I play most.
pub fn most_played(stats: &[CommanderColorIdentityStat]) -> Option<CommanderColorIdentityStat> {
    first_by(stats, by_popularity)
}

/// The identity with my best win rate.
pub fn most_successful(
    stats: &[CommanderColorIdentityStat],
) -> Option<CommanderColorIdentityStat> {
    first_by(stats, by_win_rate)
}

/// The identity with my worst win rate.
pub fn archnemesis(stats: &[CommanderColorIdentityStat]) -> Option<CommanderColorIdentityStat> {
    first_by(stats, by_loss_rate)
}
