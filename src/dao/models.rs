use serde::{Deserialize, Serialize};
use std::{fmt, time::SystemTime};
use uuid::Uuid;

/// Representation of a player stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier assigned when the player was created.
    pub id: Uuid,
    /// Display name, never blank once persisted.
    pub name: String,
    /// Raw score for the toss mini-game.
    pub toss: u32,
    /// Raw score for the plinko mini-game.
    pub plinko: u32,
    /// Raw score for the fluff mini-game.
    pub fluff: u32,
}

/// The single shared roster document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntity {
    /// Players in insertion order.
    pub players: Vec<PlayerEntity>,
    /// Last time the document was written.
    pub updated_at: SystemTime,
}

/// Opaque token identifying one persisted version of the roster document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Wrap a backend-provided revision token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Mint a fresh random revision for backends that do not track one natively.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster document together with the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRoster {
    /// Revision the document was read at.
    pub revision: Revision,
    /// Document contents.
    pub roster: RosterEntity,
}
