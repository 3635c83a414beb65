//! In-memory roster model shared by the scoreboard engine and the services.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{PlayerEntity, RosterEntity};

/// The fixed set of mini-games every player is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    /// Bean bag toss.
    Toss,
    /// Plinko board drop.
    Plinko,
    /// Marshmallow fluff challenge.
    Fluff,
}

impl Game {
    /// All games in display order.
    pub const ALL: [Game; 3] = [Game::Toss, Game::Plinko, Game::Fluff];

    /// Human readable column header.
    pub fn label(self) -> &'static str {
        match self {
            Game::Toss => "Toss",
            Game::Plinko => "Plinko",
            Game::Fluff => "Fluff",
        }
    }
}

/// One competitor and their raw per-game scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier, kept across edits.
    pub id: Uuid,
    /// Display name; never blank for persisted players.
    pub name: String,
    /// Toss score.
    pub toss: u32,
    /// Plinko score.
    pub plinko: u32,
    /// Fluff score.
    pub fluff: u32,
}

impl Player {
    /// Create a player with a fresh identifier and all scores at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            toss: 0,
            plinko: 0,
            fluff: 0,
        }
    }

    /// Score recorded for `game`.
    pub fn score(&self, game: Game) -> u32 {
        match game {
            Game::Toss => self.toss,
            Game::Plinko => self.plinko,
            Game::Fluff => self.fluff,
        }
    }

    /// Sum of the three game scores. Widened so saturated inputs cannot overflow.
    pub fn total(&self) -> u64 {
        Game::ALL
            .iter()
            .map(|game| u64::from(self.score(*game)))
            .sum()
    }
}

/// Ordered list of players; position is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Wrap players in their current order.
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Players in roster order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Append `player` at the end.
    pub fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Remove the most recently added player.
    pub fn pop(&mut self) -> Option<Player> {
        self.players.pop()
    }

    /// Remove the player carrying `id`, keeping the order of the others.
    pub fn remove_by_id(&mut self, id: Uuid) -> Option<Player> {
        let position = self.players.iter().position(|player| player.id == id)?;
        Some(self.players.remove(position))
    }

    /// Take the players out in roster order.
    pub fn into_players(self) -> Vec<Player> {
        self.players
    }

    /// Convert into the persisted document shape, stamped with `updated_at`.
    pub fn into_entity(self, updated_at: SystemTime) -> RosterEntity {
        RosterEntity {
            players: self.players.into_iter().map(Into::into).collect(),
            updated_at,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            toss: value.toss,
            plinko: value.plinko,
            fluff: value.fluff,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            toss: value.toss,
            plinko: value.plinko,
            fluff: value.fluff,
        }
    }
}

impl From<RosterEntity> for Roster {
    fn from(value: RosterEntity) -> Self {
        Self {
            players: value.players.into_iter().map(Into::into).collect(),
        }
    }
}
