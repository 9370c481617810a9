//! Plain-text rendering of a report for the terminal.

use std::fmt;

use crate::models::{CommanderColorIdentityStat, CommanderStat, ComputedStats, WinRateStat};

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn win_rate_line(stat: &WinRateStat) -> String {
    format!("{}/{} ({})", stat.wins, stat.games, percent(stat.rate))
}

fn turn(average: Option<f64>) -> String {
    average.map_or_else(|| "-".to_string(), |t| format!("{:.1}", t))
}

fn identity_line(stat: Option<&CommanderColorIdentityStat>) -> String {
    match stat {
        Some(s) => format!("{} ({} games, {} wins)", s.key, s.games, percent(s.win_rate)),
        None => "-".to_string(),
    }
}

/// Terminal view of the whole report.
pub struct TextReport<'a>(pub &'a ComputedStats);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;

        if stats.games_played == 0 {
            return writeln!(f, "No games logged yet.");
        }

        writeln!(f, "Games played:      {}", stats.games_played)?;
        writeln!(f, "Overall:           {}", win_rate_line(&stats.overall))?;
        writeln!(f, "With fast mana:    {}", win_rate_line(&stats.with_fast_mana))?;
        writeln!(f, "Against fast mana: {}", win_rate_line(&stats.against_fast_mana))?;
        writeln!(f, "Average win turn:  {}", turn(stats.average_win_turn))?;
        if let Some(streak) = &stats.current_streak {
            let form: String = stats.recent_form.iter().map(|r| r.to_string()).collect();
            writeln!(f, "Current streak:    {} ({})", streak, form)?;
        }

        writeln!(f, "\nBy seat")?;
        for (seat, stat) in stats.by_seat.iter() {
            writeln!(f, "  Seat {}: {}", seat, win_rate_line(stat))?;
        }

        writeln!(f, "\nBy commander")?;
        for commander in &stats.by_commander {
            writeln!(
                f,
                "  {:<32} {:>3}/{:<3} {:>6}  avg turn {}",
                commander.name,
                commander.wins,
                commander.games,
                percent(commander.rate),
                turn(commander.average_win_turn)
            )?;
        }

        writeln!(f, "\nBy color identity")?;
        for identity in &stats.by_commander_color_identity {
            writeln!(
                f,
                "  {:<6} {:>3} games  {:>2} commanders  {:>6}",
                identity.key,
                identity.games,
                identity.unique_commanders,
                percent(identity.win_rate)
            )?;
        }
        writeln!(
            f,
            "  Most played:     {}",
            identity_line(stats.most_played_commander_color_identity.as_ref())
        )?;
        writeln!(
            f,
            "  Most successful: {}",
            identity_line(stats.most_successful_commander_color_identity.as_ref())
        )?;
        writeln!(
            f,
            "  Archnemesis:     {}",
            identity_line(stats.archnemesis_commander_color_identity.as_ref())
        )?;

        if !stats.top_win_conditions.is_empty() {
            writeln!(f, "\nTop ways to win")?;
            for wc in &stats.top_win_conditions {
                writeln!(f, "  {} x{}", wc.condition, wc.count)?;
            }
        }

        Ok(())
    }
}

/// Terminal view of one commander.
pub struct CommanderReport<'a>(pub &'a CommanderStat);

impl fmt::Display for CommanderReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stat = self.0;

        writeln!(f, "{}", stat.name)?;
        if let Some(cost) = &stat.mana_cost {
            writeln!(f, "  Mana cost:         {}", cost)?;
        }
        writeln!(
            f,
            "  Record:            {}",
            win_rate_line(&WinRateStat::new(stat.wins, stat.games))
        )?;
        writeln!(f, "  Average win turn:  {}", turn(stat.average_win_turn))?;
        writeln!(f, "  With fast mana:    {}", win_rate_line(&stat.with_fast_mana))?;
        writeln!(f, "  Against fast mana: {}", win_rate_line(&stat.against_fast_mana))?;

        if !stat.recent_results.is_empty() {
            writeln!(f, "  Recent results")?;
            for recent in &stat.recent_results {
                writeln!(
                    f,
                    "    {} {} turn {:>2}  won by {}",
                    recent.result,
                    recent.date.format("%Y-%m-%d"),
                    recent.win_turn,
                    recent.winning_commander.as_deref().unwrap_or("unknown")
                )?;
            }
        }

        if !stat.key_cards.is_empty() {
            writeln!(f, "  Key cards")?;
            for card in &stat.key_cards {
                writeln!(f, "    {} x{}", card.name, card.count)?;
            }
        }

        Ok(())
    }
}

/// Render the whole report.
pub fn render_text(stats: &ComputedStats) -> String {
    TextReport(stats).to_string()
}

/// Render one commander's detail.
pub fn render_commander(stat: &CommanderStat) -> String {
    CommanderReport(stat).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::compute_stats;
    use crate::test_fixtures::{lost_with, won_with};

    #[test]
    fn test_empty_report() {
        assert_eq!(render_text(&compute_stats(&[])), "No games logged yet.\n");
    }

    #[test]
    fn test_report_sections() {
        let games = vec![
            won_with("g1", "Atraxa", 6).with_win_conditions(&["Combo"]),
            lost_with("g2", "Atraxa", 5),
        ];
        let text = render_text(&compute_stats(&games));

        assert!(text.contains("Games played:      2"));
        assert!(text.contains("Overall:           1/2 (50.0%)"));
        assert!(text.contains("Seat 6: 0/0 (0.0%)"));
        assert!(text.contains("Atraxa"));
        assert!(text.contains("Most played:     C (2 games, 50.0% wins)"));
        assert!(text.contains("Combo x1"));
    }

    #[test]
    fn test_report_formats_inline() {
        let games = vec![won_with("g1", "Atraxa", 6)];
        let stats = compute_stats(&games);

        let text = format!("{}", TextReport(&stats));
        assert_eq!(text, render_text(&stats));
        assert!(text.contains("Current streak:    1 win (W)"));
    }

    #[test]
    fn test_commander_detail() {
        let games = vec![
            won_with("g1", "Atraxa", 6).with_key_cards(&["Thoracle"]),
            lost_with("g2", "Atraxa", 5),
        ];
        let stats = compute_stats(&games);
        let text = render_commander(stats.get_commander("Atraxa").unwrap());

        assert!(text.starts_with("Atraxa\n"));
        assert!(text.contains("Average win turn:  6.0"));
        assert!(text.contains("won by Korvold"));
        assert!(text.contains("Thoracle x1"));
    }
}
