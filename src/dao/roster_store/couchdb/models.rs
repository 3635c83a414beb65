use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::dao::models::{PlayerEntity, Revision, RosterEntity, StoredRoster};

/// Identifier of the single roster document.
pub const ROSTER_DOC_ID: &str = "roster::scoreboard";

/// Roster document as stored in CouchDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchRosterDocument {
    #[serde(rename = "_id")]
    pub id: String,
    /// Current revision; left out on the first write.
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub roster: RosterBody,
}

/// Document fields besides `_id` and `_rev`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterBody {
    #[serde(default)]
    pub players: Vec<PlayerEntity>,
    pub updated_at: SystemTime,
}

/// Acknowledgement returned by CouchDB after a successful document write.
#[derive(Debug, Deserialize)]
pub struct PutResponse {
    pub rev: String,
}

impl From<(RosterEntity, Option<Revision>)> for CouchRosterDocument {
    fn from((roster, rev): (RosterEntity, Option<Revision>)) -> Self {
        Self {
            id: ROSTER_DOC_ID.to_owned(),
            rev: rev.map(|rev| rev.as_str().to_owned()),
            roster: RosterBody {
                players: roster.players,
                updated_at: roster.updated_at,
            },
        }
    }
}

impl CouchRosterDocument {
    /// Split the document into its revision and roster. Documents read back from
    /// CouchDB always carry a `_rev`; a missing one is treated as an empty token.
    pub fn into_stored(self) -> StoredRoster {
        StoredRoster {
            revision: Revision::new(self.rev.unwrap_or_default()),
            roster: RosterEntity {
                players: self.roster.players,
                updated_at: self.roster.updated_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use uuid::Uuid;

    use super::*;

    fn roster() -> RosterEntity {
        RosterEntity {
            players: vec![PlayerEntity {
                id: Uuid::nil(),
                name: "Ann".into(),
                toss: 3,
                plinko: 1,
                fluff: 4,
            }],
            updated_at: UNIX_EPOCH + Duration::from_millis(1_700_000_000_123),
        }
    }

    #[test]
    fn first_write_omits_rev() {
        let document = CouchRosterDocument::from((roster(), None));
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["_id"], ROSTER_DOC_ID);
        assert!(json.get("_rev").is_none());
        assert_eq!(json["players"][0]["name"], "Ann");
    }

    #[test]
    fn conditional_write_carries_rev() {
        let document = CouchRosterDocument::from((roster(), Some(Revision::new("2-abc"))));
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["_rev"], "2-abc");
    }

    #[test]
    fn read_back_document_splits_revision_and_roster() {
        let json = serde_json::to_string(&CouchRosterDocument::from((
            roster(),
            Some(Revision::new("3-def")),
        )))
        .unwrap();
        let document: CouchRosterDocument = serde_json::from_str(&json).unwrap();

        let stored = document.into_stored();
        assert_eq!(stored.revision, Revision::new("3-def"));
        assert_eq!(stored.roster, roster());
    }
}
