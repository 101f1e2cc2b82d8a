use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PanelError, PanelResult};

/// An online-go game the stored account is playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// The online-go game id.
    pub id: u64,

    /// Username of the other player.
    #[serde(default)]
    pub opponent: String,

    /// Board width.
    pub width: u8,

    /// Board height.
    pub height: u8,
}

impl GameSummary {
    /// Label used in the game picker, e.g. `cadeo111 (9x9)`.
    pub fn label(&self) -> String {
        format!("{} ({}x{})", self.opponent, self.width, self.height)
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// LED color used to show a player's stones on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoneColor {
    Blue,
    Green,
    Red,
}

impl StoneColor {
    pub const ALL: [StoneColor; 3] = [StoneColor::Blue, StoneColor::Green, StoneColor::Red];
}

impl fmt::Display for StoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoneColor::Blue => write!(f, "Blue"),
            StoneColor::Green => write!(f, "Green"),
            StoneColor::Red => write!(f, "Red"),
        }
    }
}

impl std::str::FromStr for StoneColor {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(StoneColor::Blue),
            "green" => Ok(StoneColor::Green),
            "red" => Ok(StoneColor::Red),
            other => Err(PanelError::InvalidInput(format!("Unknown color: {other}"))),
        }
    }
}

/// Game selection and stone colors chosen in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    pub game_id: u64,
    pub player_color: StoneColor,
    pub opponent_color: StoneColor,
}

impl GameSetup {
    pub fn builder() -> GameSetupBuilder {
        GameSetupBuilder::default()
    }
}

/// Builder for [`GameSetup`].
#[derive(Debug, Default)]
pub struct GameSetupBuilder {
    game_id: Option<u64>,
    player_color: Option<StoneColor>,
    opponent_color: Option<StoneColor>,
}

impl GameSetupBuilder {
    pub fn game(mut self, game: &GameSummary) -> Self {
        self.game_id = Some(game.id);
        self
    }

    pub fn game_id(mut self, game_id: u64) -> Self {
        self.game_id = Some(game_id);
        self
    }

    pub fn player_color(mut self, color: StoneColor) -> Self {
        self.player_color = Some(color);
        self
    }

    pub fn opponent_color(mut self, color: StoneColor) -> Self {
        self.opponent_color = Some(color);
        self
    }

    pub fn build(self) -> PanelResult<GameSetup> {
        let game_id = self
            .game_id
            .ok_or_else(|| PanelError::InvalidInput("A game must be selected".into()))?;
        let player_color = self
            .player_color
            .ok_or_else(|| PanelError::InvalidInput("Player color is required".into()))?;
        let opponent_color = self
            .opponent_color
            .ok_or_else(|| PanelError::InvalidInput("Opponent color is required".into()))?;

        // Both players share one LED strip.
        if player_color == opponent_color {
            return Err(PanelError::InvalidInput(format!(
                "Both players cannot use {player_color}"
            )));
        }

        Ok(GameSetup {
            game_id,
            player_color,
            opponent_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn game() -> GameSummary {
        GameSummary {
            id: 5012,
            opponent: "cadeo111".into(),
            width: 9,
            height: 9,
        }
    }

    #[test]
    fn label_shows_opponent_and_size() {
        assert_eq!(game().label(), "cadeo111 (9x9)");
    }

    #[test]
    fn setup_requires_distinct_colors() {
        let err = GameSetup::builder()
            .game(&game())
            .player_color(StoneColor::Red)
            .opponent_color(StoneColor::Red)
            .build()
            .unwrap_err();
        assert!(matches!(err, PanelError::InvalidInput(msg) if msg == "Both players cannot use Red"));
    }

    #[test]
    fn setup_requires_game() {
        let err = GameSetup::builder()
            .player_color(StoneColor::Blue)
            .opponent_color(StoneColor::Green)
            .build()
            .unwrap_err();
        assert!(matches!(err, PanelError::InvalidInput(_)));
    }

    #[test]
    fn setup_builds() {
        let setup = GameSetup::builder()
            .game(&game())
            .player_color("blue".parse().unwrap())
            .opponent_color(StoneColor::Green)
            .build()
            .unwrap();
        assert_eq!(
            setup,
            GameSetup {
                game_id: 5012,
                player_color: StoneColor::Blue,
                opponent_color: StoneColor::Green,
            }
        );
    }
}
