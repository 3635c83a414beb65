use mongodb::{
    bson::{DateTime, Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
};
use serde::{Deserialize, Serialize};

use crate::dao::models::{PlayerEntity, Revision, RosterEntity, StoredRoster};

/// Collection holding the roster document.
pub const ROSTER_COLLECTION_NAME: &str = "rosters";
/// `_id` of the single roster document.
pub const ROSTER_DOCUMENT_ID: &str = "scoreboard";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Roster document as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRosterDocument {
    #[serde(rename = "_id")]
    id: String,
    revision: String,
    updated_at: DateTime,
    #[serde(default)]
    players: Vec<PlayerEntity>,
}

impl MongoRosterDocument {
    /// Document for `roster` written under `revision`.
    pub fn new(roster: RosterEntity, revision: &Revision) -> Self {
        Self {
            id: ROSTER_DOCUMENT_ID.to_owned(),
            revision: revision.as_str().to_owned(),
            updated_at: DateTime::from_system_time(roster.updated_at),
            players: roster.players,
        }
    }
}

impl From<MongoRosterDocument> for StoredRoster {
    fn from(value: MongoRosterDocument) -> Self {
        Self {
            revision: Revision::new(value.revision),
            roster: RosterEntity {
                players: value.players,
                updated_at: value.updated_at.to_system_time(),
            },
        }
    }
}

/// Matches the roster document at any revision.
pub fn roster_filter() -> Document {
    doc! {"_id": ROSTER_DOCUMENT_ID}
}

/// Matches the roster document only at `revision`.
pub fn revision_filter(revision: &Revision) -> Document {
    doc! {"_id": ROSTER_DOCUMENT_ID, "revision": revision.as_str()}
}

/// Whether an insert lost the race against another writer creating the document.
pub fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use uuid::Uuid;

    use super::*;

    #[test]
    fn document_round_trips_into_stored_roster() {
        // BSON dates keep millisecond precision.
        let roster = RosterEntity {
            players: vec![PlayerEntity {
                id: Uuid::nil(),
                name: "Ann".into(),
                toss: 3,
                plinko: 1,
                fluff: 4,
            }],
            updated_at: UNIX_EPOCH + Duration::from_millis(1_700_000_000_123),
        };
        let revision = Revision::new("r1");

        let document = MongoRosterDocument::new(roster.clone(), &revision);
        assert_eq!(document.id, ROSTER_DOCUMENT_ID);

        let stored = StoredRoster::from(document);
        assert_eq!(stored.revision, revision);
        assert_eq!(stored.roster, roster);
    }

    #[test]
    fn revision_filter_pins_document_and_revision() {
        let filter = revision_filter(&Revision::new("r7"));
        assert_eq!(filter.get_str("_id").unwrap(), ROSTER_DOCUMENT_ID);
        assert_eq!(filter.get_str("revision").unwrap(), "r7");
        assert!(roster_filter().get("revision").is_none());
    }
}
