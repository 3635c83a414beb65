//! Pure scoreboard computations: ranking, editing rows and roster mutations.
//!
//! Nothing here touches storage. Services feed these functions the roster they
//! loaded and persist whatever comes back.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::state::roster::{Game, Player, Roster};

/// Number of rows the editing form shows when the roster is shorter.
pub const DEFAULT_EDITING_ROWS: usize = 30;

/// Namespace for identifiers derived from submitted rows that carry none.
const ROW_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_4c1e_8a0b_4f3e_9c57_2b7e_15a4_d0c9);

/// One line of the ranked view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    /// 1-based position; ties still get distinct ranks.
    pub rank: usize,
    /// Identifier of the ranked player.
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

/// Result of ranking a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scoreboard {
    /// Nobody has been entered yet; callers show a placeholder message.
    Empty,
    /// Entries ordered by descending total.
    Ranked(Vec<RankedEntry>),
}

/// Best score recorded in a single game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLeader {
    /// Game the leader was picked for.
    pub game: Game,
    /// Identifier of the leading player.
    pub player_id: Uuid,
    /// Name of the leading player.
    pub name: String,
    /// Their score in `game`.
    pub score: u32,
}

/// Row of the editing form. Scores are `None` for placeholders that were never saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableRow {
    /// Position in the form.
    pub index: usize,
    /// Identifier of the stored player, absent for placeholders.
    pub id: Option<Uuid>,
    /// Player name, or `Player N` for placeholders.
    pub name: String,
    /// Toss score.
    pub toss: Option<u32>,
    /// Plinko score.
    pub plinko: Option<u32>,
    /// Fluff score.
    pub fluff: Option<u32>,
}

/// Unparsed row as submitted by the editing form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Identifier the form loaded the row with, if any.
    pub id: Option<Uuid>,
    /// Name as typed; trimmed on save.
    pub name: String,
    /// Toss cell text.
    pub toss: String,
    /// Plinko cell text.
    pub plinko: String,
    /// Fluff cell text.
    pub fluff: String,
}

/// Rank players by total, highest first.
///
/// Equal totals keep their roster order (the sort is stable) and still receive
/// distinct consecutive ranks.
pub fn rank(roster: &Roster) -> Scoreboard {
    if roster.is_empty() {
        return Scoreboard::Empty;
    }

    let mut players: Vec<&Player> = roster.players().iter().collect();
    players.sort_by(|a, b| b.total().cmp(&a.total()));

    let entries = players
        .into_iter()
        .enumerate()
        .map(|(position, player)| RankedEntry {
            rank: position + 1,
            id: player.id,
            name: player.name.clone(),
            toss: player.toss,
            plinko: player.plinko,
            fluff: player.fluff,
            total: player.total(),
        })
        .collect();

    Scoreboard::Ranked(entries)
}

/// Highest scorer of each game; the earliest player wins a tie.
pub fn leaders(roster: &Roster) -> Vec<GameLeader> {
    Game::ALL
        .iter()
        .filter_map(|game| {
            roster
                .players()
                .iter()
                .fold(None::<&Player>, |best, player| match best {
                    Some(current) if current.score(*game) >= player.score(*game) => Some(current),
                    _ => Some(player),
                })
                .map(|player| GameLeader {
                    game: *game,
                    player_id: player.id,
                    name: player.name.clone(),
                    score: player.score(*game),
                })
        })
        .collect()
}

/// Default display name of the row at zero-based `index`.
pub fn placeholder_name(index: usize) -> String {
    format!("Player {}", index + 1)
}

/// Rows for the editing form: every persisted player, then blank placeholders
/// until at least `min_rows` rows exist.
pub fn editing_rows(roster: &Roster, min_rows: usize) -> Vec<EditableRow> {
    let persisted = roster
        .players()
        .iter()
        .enumerate()
        .map(|(index, player)| EditableRow {
            index,
            id: Some(player.id),
            name: player.name.clone(),
            toss: Some(player.toss),
            plinko: Some(player.plinko),
            fluff: Some(player.fluff),
        });

    let placeholders = (roster.len()..min_rows).map(|index| EditableRow {
        index,
        id: None,
        name: placeholder_name(index),
        toss: None,
        plinko: None,
        fluff: None,
    });

    persisted.chain(placeholders).collect()
}

/// Lenient integer parsing for score inputs.
///
/// Leading whitespace and an optional `+` are skipped and the leading run of
/// digits is used (`"12abc"` gives 12). Blank, non-numeric and negative inputs
/// give 0; oversized values saturate.
pub fn parse_score(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}

/// Build the roster described by a submitted form.
///
/// Rows are taken in ascending index order; rows whose trimmed name is empty are
/// dropped. Rows without an identifier get one derived from their index and
/// name, so the same submission always yields the same roster.
pub fn apply_edits(edits: &BTreeMap<usize, RawRow>) -> Roster {
    let mut used = HashSet::new();
    let players = edits
        .iter()
        .filter_map(|(index, row)| {
            let name = row.name.trim();
            if name.is_empty() {
                return None;
            }

            let id = match row.id {
                Some(id) if used.insert(id) => id,
                _ => derive_row_id(*index, name, &mut used),
            };

            Some(Player {
                id,
                name: name.to_owned(),
                toss: parse_score(&row.toss),
                plinko: parse_score(&row.plinko),
                fluff: parse_score(&row.fluff),
            })
        })
        .collect();

    Roster::new(players)
}

fn derive_row_id(index: usize, name: &str, used: &mut HashSet<Uuid>) -> Uuid {
    let mut salt = 0u32;
    loop {
        let seed = if salt == 0 {
            format!("{index}:{name}")
        } else {
            format!("{index}:{name}#{salt}")
        };
        let candidate = Uuid::new_v5(&ROW_ID_NAMESPACE, seed.as_bytes());
        if used.insert(candidate) {
            return candidate;
        }
        salt += 1;
    }
}

/// Append a zero-scored player named after the next free position.
pub fn add_player(roster: &mut Roster) -> Player {
    let player = Player::new(placeholder_name(roster.len()));
    roster.push(player.clone());
    player
}

/// Drop the last player, if any.
pub fn remove_last(roster: &mut Roster) -> Option<Player> {
    roster.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, toss: u32, plinko: u32, fluff: u32) -> Player {
        Player {
            toss,
            plinko,
            fluff,
            ..Player::new(name)
        }
    }

    fn raw(name: &str, toss: &str, plinko: &str, fluff: &str) -> RawRow {
        RawRow {
            id: None,
            name: name.into(),
            toss: toss.into(),
            plinko: plinko.into(),
            fluff: fluff.into(),
        }
    }

    fn ranked(scoreboard: Scoreboard) -> Vec<RankedEntry> {
        match scoreboard {
            Scoreboard::Ranked(entries) => entries,
            Scoreboard::Empty => panic!("expected ranked entries"),
        }
    }

    #[test]
    fn rank_breaks_ties_by_roster_order() {
        let roster = Roster::new(vec![
            player("A", 10, 5, 0),
            player("B", 10, 5, 0),
            player("C", 1, 1, 1),
        ]);

        let entries = ranked(rank(&roster));
        let summary: Vec<_> = entries
            .iter()
            .map(|entry| (entry.rank, entry.name.as_str(), entry.total))
            .collect();
        assert_eq!(summary, vec![(1, "A", 15), (2, "B", 15), (3, "C", 3)]);
    }

    #[test]
    fn rank_sorts_descending_with_dense_ranks() {
        let roster = Roster::new(vec![
            player("Low", 0, 0, 1),
            player("High", 9, 9, 9),
            player("Mid", 5, 0, 0),
            player("Tied", 5, 0, 0),
        ]);

        let entries = ranked(rank(&roster));
        let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Tied", "Low"]);
        assert_eq!(
            entries.iter().map(|entry| entry.rank).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        for entry in &entries {
            assert_eq!(
                entry.total,
                u64::from(entry.toss) + u64::from(entry.plinko) + u64::from(entry.fluff)
            );
        }
    }

    #[test]
    fn rank_of_empty_roster_is_placeholder() {
        assert_eq!(rank(&Roster::default()), Scoreboard::Empty);
    }

    #[test]
    fn leaders_pick_first_best_per_game() {
        let roster = Roster::new(vec![
            player("A", 3, 7, 0),
            player("B", 3, 2, 0),
            player("C", 1, 7, 0),
        ]);

        let leaders = leaders(&roster);
        let summary: Vec<_> = leaders
            .iter()
            .map(|leader| (leader.game, leader.name.as_str(), leader.score))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Game::Toss, "A", 3),
                (Game::Plinko, "A", 7),
                (Game::Fluff, "A", 0),
            ]
        );
        assert!(super::leaders(&Roster::default()).is_empty());
    }

    #[test]
    fn editing_rows_pad_empty_roster_with_placeholders() {
        let rows = editing_rows(&Roster::default(), DEFAULT_EDITING_ROWS);
        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0].name, "Player 1");
        assert_eq!(rows[29].name, "Player 30");
        assert!(rows.iter().all(|row| row.id.is_none()
            && row.toss.is_none()
            && row.plinko.is_none()
            && row.fluff.is_none()));
    }

    #[test]
    fn editing_rows_keep_players_then_pad() {
        let roster = Roster::new(vec![player("Ann", 0, 4, 2), player("Bob", 1, 1, 1)]);
        let rows = editing_rows(&roster, 5);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "Ann");
        assert_eq!(rows[0].toss, Some(0));
        assert_eq!(rows[1].id, Some(roster.players()[1].id));
        assert_eq!(rows[2].name, "Player 3");
        assert_eq!(rows[2].toss, None);
        assert_eq!(
            rows.iter().map(|row| row.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn editing_rows_never_truncate_long_rosters() {
        let roster = Roster::new((0..3).map(|i| player(&format!("P{i}"), 0, 0, 0)).collect());
        assert_eq!(editing_rows(&roster, 2).len(), 3);
    }

    #[test]
    fn parse_score_is_lenient() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score("  7 "), 7);
        assert_eq!(parse_score("+3"), 3);
        assert_eq!(parse_score("12abc"), 12);
        assert_eq!(parse_score("3.5"), 3);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("x"), 0);
        assert_eq!(parse_score("-5"), 0);
        assert_eq!(parse_score("99999999999999"), u32::MAX);
    }

    #[test]
    fn apply_edits_drops_blank_names_and_coerces_scores() {
        let edits = BTreeMap::from([
            (0, raw("  ", "3", "4", "5")),
            (1, raw("Bob", "x", "2", "")),
        ]);

        let roster = apply_edits(&edits);
        assert_eq!(roster.len(), 1);
        let bob = &roster.players()[0];
        assert_eq!(bob.name, "Bob");
        assert_eq!((bob.toss, bob.plinko, bob.fluff), (0, 2, 0));
    }

    #[test]
    fn apply_edits_orders_sparse_indices_ascending() {
        let mut edits = BTreeMap::new();
        edits.insert(7, raw("Seventh", "1", "1", "1"));
        edits.insert(2, raw(" Second ", "2", "2", "2"));
        edits.insert(4, raw("", "9", "9", "9"));

        let roster = apply_edits(&edits);
        let names: Vec<_> = roster.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "Seventh"]);
    }

    #[test]
    fn apply_edits_is_idempotent() {
        let edits = BTreeMap::from([
            (0, raw("Ann", "1", "2", "3")),
            (3, raw("Cid", "4", "", "z")),
        ]);
        assert_eq!(apply_edits(&edits), apply_edits(&edits));
    }

    #[test]
    fn apply_edits_keeps_known_ids_and_resolves_duplicates() {
        let existing = Uuid::new_v4();
        let edits = BTreeMap::from([
            (
                0,
                RawRow {
                    id: Some(existing),
                    ..raw("Ann", "1", "1", "1")
                },
            ),
            (
                1,
                RawRow {
                    id: Some(existing),
                    ..raw("Copy", "1", "1", "1")
                },
            ),
        ]);

        let roster = apply_edits(&edits);
        assert_eq!(roster.players()[0].id, existing);
        assert_ne!(roster.players()[1].id, existing);
    }

    #[test]
    fn add_then_remove_restores_roster() {
        let original = Roster::new(vec![player("A", 1, 2, 3), player("B", 4, 5, 6)]);
        let mut roster = original.clone();

        let added = add_player(&mut roster);
        assert_eq!(added.name, "Player 3");
        assert_eq!(added.total(), 0);
        assert_eq!(roster.len(), 3);

        let removed = remove_last(&mut roster).unwrap();
        assert_eq!(removed.id, added.id);
        assert_eq!(roster, original);
    }

    #[test]
    fn remove_last_on_empty_roster_is_none() {
        assert!(remove_last(&mut Roster::default()).is_none());
    }
}
