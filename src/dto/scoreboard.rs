use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_system_time,
    state::{
        roster::Game,
        scoreboard::{GameLeader, RankedEntry, Scoreboard},
    },
};

/// Message shown instead of an empty table.
pub const EMPTY_SCOREBOARD_MESSAGE: &str = "No scores have been entered yet.";

/// One ranked line of the leaderboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankedEntryDto {
    /// 1-based position.
    pub rank: usize,
    /// Player identifier.
    pub id: Uuid,
    /// Player name.
    pub name: String,
    /// Toss score.
    pub toss: u32,
    /// Plinko score.
    pub plinko: u32,
    /// Fluff score.
    pub fluff: u32,
    /// Sum of the three scores.
    pub total: u64,
}

impl From<RankedEntry> for RankedEntryDto {
    fn from(entry: RankedEntry) -> Self {
        Self {
            rank: entry.rank,
            id: entry.id,
            name: entry.name,
            toss: entry.toss,
            plinko: entry.plinko,
            fluff: entry.fluff,
            total: entry.total,
        }
    }
}

/// Best player of a single game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameLeaderDto {
    /// Game the leader was picked for.
    pub game: Game,
    /// Column header for the game.
    pub label: String,
    /// Identifier of the leading player.
    pub player_id: Uuid,
    /// Name of the leading player.
    pub name: String,
    /// Their score in this game.
    pub score: u32,
}

impl From<GameLeader> for GameLeaderDto {
    fn from(leader: GameLeader) -> Self {
        Self {
            game: leader.game,
            label: leader.game.label().to_string(),
            player_id: leader.player_id,
            name: leader.name,
            score: leader.score,
        }
    }
}

/// Ranked leaderboard, or a placeholder when nobody has been entered.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreboardResponse {
    /// Nobody has been entered yet.
    Empty {
        /// Placeholder text for the display.
        message: String,
        /// False when the roster could not be loaded.
        storage_available: bool,
    },
    /// At least one player is on the roster.
    Ranked {
        /// Entries by descending total.
        entries: Vec<RankedEntryDto>,
        /// Best player per game.
        leaders: Vec<GameLeaderDto>,
        /// RFC 3339 time of the last roster write.
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_at: Option<String>,
        /// False when the roster could not be loaded.
        storage_available: bool,
    },
}

impl ScoreboardResponse {
    /// Assemble the response from a ranking and its leaders.
    pub fn build(
        scoreboard: Scoreboard,
        leaders: Vec<GameLeader>,
        updated_at: Option<SystemTime>,
        storage_available: bool,
    ) -> Self {
        match scoreboard {
            Scoreboard::Empty => ScoreboardResponse::Empty {
                message: EMPTY_SCOREBOARD_MESSAGE.to_string(),
                storage_available,
            },
            Scoreboard::Ranked(entries) => ScoreboardResponse::Ranked {
                entries: entries.into_iter().map(Into::into).collect(),
                leaders: leaders.into_iter().map(Into::into).collect(),
                updated_at: updated_at.map(format_system_time),
                storage_available,
            },
        }
    }
}
