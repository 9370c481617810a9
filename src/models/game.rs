//! Match log models: games and the players seated in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GameId, PlayerId};

/// A mana color. Variant order is the canonical WUBRG order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MtgColor {
    W,
    U,
    B,
    R,
    G,
}

impl MtgColor {
    /// All colors in WUBRG order.
    pub const ALL: [MtgColor; 5] = [
        MtgColor::W,
        MtgColor::U,
        MtgColor::B,
        MtgColor::R,
        MtgColor::G,
    ];

    pub fn symbol(&self) -> char {
        match self {
            MtgColor::W => 'W',
            MtgColor::U => 'U',
            MtgColor::B => 'B',
            MtgColor::R => 'R',
            MtgColor::G => 'G',
        }
    }
}

impl std::fmt::Display for MtgColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Deserialize a tag list where `null` means no tags.
fn deserialize_nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let maybe: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(maybe.unwrap_or_default())
}

/// Fast mana seen for one player in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastManaInfo {
    pub has_fast_mana: bool,

    #[serde(default, deserialize_with = "deserialize_nullable_list")]
    pub cards: Vec<String>,
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique within the owning game
    pub id: PlayerId,

    /// Whether this seat is the tracked player
    #[serde(default)]
    pub is_me: bool,

    pub commander_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander_image_uri: Option<String>,

    /// Color identity as recorded; may be unsorted or contain duplicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander_color_identity: Option<Vec<MtgColor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander_mana_cost: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander_type_line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_image_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_mana_cost: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_type_line: Option<String>,

    /// Turn this player was knocked out on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockout_turn: Option<u32>,

    /// Turn order, 1 through 6
    pub seat_position: u8,

    #[serde(default)]
    pub fast_mana: FastManaInfo,
}

impl Player {
    /// Create an opponent seat with no optional data.
    pub fn new(id: impl Into<PlayerId>, commander_name: impl Into<String>, seat_position: u8) -> Self {
        Self {
            id: id.into(),
            is_me: false,
            commander_name: commander_name.into(),
            commander_image_uri: None,
            commander_color_identity: None,
            commander_mana_cost: None,
            commander_type_line: None,
            partner_name: None,
            partner_image_uri: None,
            partner_mana_cost: None,
            partner_type_line: None,
            knockout_turn: None,
            seat_position,
            fast_mana: FastManaInfo::default(),
        }
    }

    /// Builder method to mark this seat as the tracked player.
    pub fn as_me(mut self) -> Self {
        self.is_me = true;
        self
    }

    /// Builder method to set the commander color identity.
    pub fn with_color_identity(mut self, colors: Vec<MtgColor>) -> Self {
        self.commander_color_identity = Some(colors);
        self
    }

    /// Builder method to set the commander mana cost.
    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>) -> Self {
        self.commander_mana_cost = Some(mana_cost.into());
        self
    }

    /// Builder method to set the commander image.
    pub fn with_image_uri(mut self, uri: impl Into<String>) -> Self {
        self.commander_image_uri = Some(uri.into());
        self
    }

    /// Builder method to set a partner commander.
    pub fn with_partner(mut self, partner_name: impl Into<String>) -> Self {
        self.partner_name = Some(partner_name.into());
        self
    }

    /// Builder method to record fast mana.
    pub fn with_fast_mana(mut self, cards: &[&str]) -> Self {
        self.fast_mana = FastManaInfo {
            has_fast_mana: true,
            cards: cards.iter().map(|c| c.to_string()).collect(),
        };
        self
    }

    /// Builder method to set the knockout turn.
    pub fn with_knockout_turn(mut self, turn: u32) -> Self {
        self.knockout_turn = Some(turn);
        self
    }
}

/// One played match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,

    pub played_at: DateTime<Utc>,

    pub players: Vec<Player>,

    /// Should reference one of `players`; tolerated when it doesn't
    pub winner_id: PlayerId,

    /// Turn the match ended on
    pub win_turn: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_nullable_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub win_conditions: Vec<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_nullable_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub key_wincon_cards: Vec<String>,

    /// Self-reported power level, 1 through 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket: Option<u8>,
}

impl Game {
    pub fn new(
        id: impl Into<GameId>,
        played_at: DateTime<Utc>,
        players: Vec<Player>,
        winner_id: impl Into<PlayerId>,
        win_turn: u32,
    ) -> Self {
        Self {
            id: id.into(),
            played_at,
            players,
            winner_id: winner_id.into(),
            win_turn,
            notes: None,
            win_conditions: Vec::new(),
            key_wincon_cards: Vec::new(),
            bracket: None,
        }
    }

    /// Builder method to set win-condition tags.
    pub fn with_win_conditions(mut self, conditions: &[&str]) -> Self {
        self.win_conditions = conditions.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builder method to set key wincon cards.
    pub fn with_key_cards(mut self, cards: &[&str]) -> Self {
        self.key_wincon_cards = cards.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builder method to set notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method to set the bracket.
    pub fn with_bracket(mut self, bracket: u8) -> Self {
        self.bracket = Some(bracket);
        self
    }

    /// The tracked player's seat, if they played in this game.
    pub fn me(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_me)
    }

    /// The winning seat, if `winner_id` resolves.
    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.id == self.winner_id)
    }

    /// Whether the tracked player won. False when they did not play or
    /// when the winner does not resolve.
    pub fn is_my_win(&self) -> bool {
        self.me().is_some_and(|me| me.id == self.winner_id)
    }

    /// Whether the tracked player had fast mana.
    pub fn i_had_fast_mana(&self) -> bool {
        self.me().is_some_and(|me| me.fast_mana.has_fast_mana)
    }

    /// Whether any opponent had fast mana.
    pub fn opponent_had_fast_mana(&self) -> bool {
        self.players
            .iter()
            .any(|p| !p.is_me && p.fast_mana.has_fast_mana)
    }
}
