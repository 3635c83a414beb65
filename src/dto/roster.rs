//! DTO definitions for the roster editing endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::state::{
    roster::{Player, Roster},
    scoreboard::{EditableRow, RawRow},
};

/// Upper bound on rows accepted in a single save.
pub const MAX_SUBMITTED_ROWS: u64 = 1_000;

/// Persisted player as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable player identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Toss score.
    pub toss: u32,
    /// Plinko score.
    pub plinko: u32,
    /// Fluff score.
    pub fluff: u32,
}

impl From<Player> for PlayerSummary {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            toss: player.toss,
            plinko: player.plinko,
            fluff: player.fluff,
        }
    }
}

/// One row of the editing form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditableRowDto {
    /// Position in the form.
    pub index: usize,
    /// Absent for placeholder rows that were never saved.
    pub id: Option<Uuid>,
    /// Player name, or `Player N` for placeholders.
    pub name: String,
    /// `null` means no value has been entered yet.
    pub toss: Option<u32>,
    /// Plinko score, `null` when never entered.
    pub plinko: Option<u32>,
    /// Fluff score, `null` when never entered.
    pub fluff: Option<u32>,
}

impl From<EditableRow> for EditableRowDto {
    fn from(row: EditableRow) -> Self {
        Self {
            index: row.index,
            id: row.id,
            name: row.name,
            toss: row.toss,
            plinko: row.plinko,
            fluff: row.fluff,
        }
    }
}

/// Rows handed to the editing form.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditingRosterResponse {
    /// False when the roster could not be loaded and only placeholders are shown.
    pub storage_available: bool,
    /// At least the configured number of rows.
    pub rows: Vec<EditableRowDto>,
}

/// A score cell exactly as typed; parsed leniently on save.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RawScore {
    /// Whole JSON number.
    Integer(i64),
    /// Fractional JSON number.
    Float(f64),
    /// Cell text as typed.
    Text(String),
    /// Booleans, arrays and objects; saved as if the cell were blank.
    Other(serde_json::Value),
}

impl RawScore {
    fn into_text(self) -> String {
        match self {
            RawScore::Integer(value) => value.to_string(),
            RawScore::Float(value) => value.to_string(),
            RawScore::Text(value) => value,
            RawScore::Other(_) => String::new(),
        }
    }
}

/// Raw row submitted by the editing form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RawRowInput {
    /// Row position in the form; rows are applied in ascending order.
    pub index: usize,
    /// Identifier of the player shown in this row, when it was loaded from storage.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// `null` behaves like a blank name and drops the row.
    #[serde(default)]
    pub name: Option<String>,
    /// Toss cell.
    #[serde(default)]
    pub toss: Option<RawScore>,
    /// Plinko cell.
    #[serde(default)]
    pub plinko: Option<RawScore>,
    /// Fluff cell.
    #[serde(default)]
    pub fluff: Option<RawScore>,
}

impl From<RawRowInput> for RawRow {
    fn from(input: RawRowInput) -> Self {
        let text = |score: Option<RawScore>| score.map(RawScore::into_text).unwrap_or_default();
        Self {
            id: input.id,
            name: input.name.unwrap_or_default(),
            toss: text(input.toss),
            plinko: text(input.plinko),
            fluff: text(input.fluff),
        }
    }
}

/// Payload of a save: every row of the editing form.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveEditsRequest {
    /// Submitted rows in any order.
    #[validate(length(max = MAX_SUBMITTED_ROWS))]
    pub rows: Vec<RawRowInput>,
}

impl SaveEditsRequest {
    /// Key rows by index. When an index repeats, the last row wins.
    pub fn into_edits(self) -> BTreeMap<usize, RawRow> {
        self.rows
            .into_iter()
            .map(|row| (row.index, RawRow::from(row)))
            .collect()
    }
}

/// Roster persisted by a save.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveEditsResponse {
    /// Always true; failures are reported as errors.
    pub success: bool,
    /// Roster as persisted.
    pub players: Vec<PlayerSummary>,
}

impl From<Roster> for SaveEditsResponse {
    fn from(roster: Roster) -> Self {
        Self {
            success: true,
            players: roster.into_players().into_iter().map(Into::into).collect(),
        }
    }
}

/// Player appended by an add.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddPlayerResponse {
    /// Always true; failures are reported as errors.
    pub success: bool,
    /// Generated `Player N` name.
    pub added_name: String,
    /// The appended player.
    pub player: PlayerSummary,
}

/// How a removal request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RemoveOutcome {
    /// A player was removed and the roster written.
    Removed,
    /// The roster was empty; nothing was written.
    NothingToRemove,
}

/// Result of removing a player.
#[derive(Debug, Serialize, ToSchema)]
pub struct RemovePlayerResponse {
    /// True only when a player was actually removed.
    pub success: bool,
    /// What happened.
    pub outcome: RemoveOutcome,
    /// Name of the removed player.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_name: Option<String>,
}

impl RemovePlayerResponse {
    /// Response for a removed `player`.
    pub fn removed(player: Player) -> Self {
        Self {
            success: true,
            outcome: RemoveOutcome::Removed,
            removed_name: Some(player.name),
        }
    }

    /// Response for a remove on an empty roster.
    pub fn nothing_to_remove() -> Self {
        Self {
            success: false,
            outcome: RemoveOutcome::NothingToRemove,
            removed_name: None,
        }
    }
}

/// Acknowledgement of a roster reset.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetRosterResponse {
    /// Always true; failures are reported as errors.
    pub success: bool,
}
