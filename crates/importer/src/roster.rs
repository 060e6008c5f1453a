use std::collections::BTreeMap;
use std::path::Path;

use storage::models::Participant;

use crate::columns::{ColumnMap, RosterColumn};
use crate::error::{ImporterError, Result};

/// Outcome of merging parsed candidates into an existing participant set.
#[derive(Debug)]
pub struct RosterImport {
    /// The merged set, ordered by participant identifier.
    pub participants: Vec<Participant>,
    /// Number of candidate rows processed, not the number of net-new records.
    pub imported: usize,
}

/// Reads a CSV file into raw rows of string cells, empty lines skipped.
pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        if row.iter().any(|cell| !cell.trim().is_empty()) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Builds participant candidates from raw roster rows.
///
/// The header row is the first row carrying the identifier column and a
/// display-name column; everything above it (export preamble, title rows)
/// is skipped. Only whitelisted columns transfer. Rows without an
/// identifier are dropped.
pub fn parse_rows(rows: &[Vec<String>]) -> Result<Vec<Participant>> {
    let (header_index, map) = rows
        .iter()
        .enumerate()
        .find_map(|(i, row)| ColumnMap::resolve(row).map(|map| (i, map)))
        .ok_or(ImporterError::HeaderNotFound)?;

    let mut candidates = Vec::new();

    for row in &rows[header_index + 1..] {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let participant_id = map.cell(row, RosterColumn::Id).to_string();
        if participant_id.is_empty() {
            continue;
        }

        let gamer_tag = map.cell(row, RosterColumn::GamerTag);
        let short_tag = map.cell(row, RosterColumn::ShortGamerTag);
        let player_name = [gamer_tag, short_tag, &participant_id]
            .into_iter()
            .find(|name| !name.is_empty())
            .unwrap_or(&participant_id)
            .to_string();

        let admin_notes = map.cell(row, RosterColumn::AdminNotes);

        let mut candidate = Participant::new(participant_id);
        candidate.player_name = player_name;
        candidate.admin_notes = (!admin_notes.is_empty()).then(|| admin_notes.to_string());
        candidate.checked_in = is_truthy(map.cell(row, RosterColumn::CheckedIn));
        candidate.payment.total_owed = parse_amount(map.cell(row, RosterColumn::TotalOwed));
        candidate.payment.total_paid = parse_amount(map.cell(row, RosterColumn::TotalPaid));
        candidate.payment.total_transaction =
            parse_amount(map.cell(row, RosterColumn::TotalTransaction));

        candidates.push(candidate);
    }

    if candidates.is_empty() {
        return Err(ImporterError::EmptyImport);
    }

    Ok(candidates)
}

/// Merges candidates into an existing set keyed by participant identifier.
///
/// Candidate fields overwrite stored ones, with two exceptions: the
/// checked-in flag is a one-way latch (`existing || candidate`, with the
/// original timestamp and operator kept when already set), and a stored
/// audit log survives a candidate that carries none.
pub fn merge_into(existing: Vec<Participant>, candidates: Vec<Participant>) -> RosterImport {
    let imported = candidates.len();

    let mut merged: BTreeMap<String, Participant> = existing
        .into_iter()
        .map(|p| (p.participant_id.clone(), p))
        .collect();

    for mut candidate in candidates {
        match merged.get(&candidate.participant_id) {
            Some(current) => {
                if current.checked_in {
                    candidate.checked_in = true;
                    candidate.checked_in_at = current.checked_in_at;
                    candidate.checked_in_by = current.checked_in_by.clone();
                }
                if candidate.edit_notes.is_empty() {
                    candidate.edit_notes = current.edit_notes.clone();
                }
                merged.insert(candidate.participant_id.clone(), candidate);
            }
            None => {
                merged.insert(candidate.participant_id.clone(), candidate);
            }
        }
    }

    RosterImport {
        participants: merged.into_values().collect(),
        imported,
    }
}

/// Tolerant truthy parsing for the checked-in flag column.
fn is_truthy(cell: &str) -> bool {
    matches!(
        cell.to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

/// Missing or malformed amounts coerce to zero; separators are tolerated.
fn parse_amount(cell: &str) -> i64 {
    cell.replace(',', "").trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn roster() -> Vec<Vec<String>> {
        rows(&[
            &["start.gg attendee export"],
            &["", "", ""],
            &[
                "Id",
                "GamerTag",
                "Short GamerTag",
                "Admin Notes",
                "Checked In",
                "Total Owed",
                "Total Paid",
                "Total Transaction",
                "Email",
            ],
            &["101", "Skyline", "", "A-01", "false", "0", "4000", "4,000", "sky@example.com"],
            &["102", "Luna", "", "B-02", "FALSE", "4000", "0", "0", "luna@example.com"],
            &["103", "", "Comet", "", "yes", "3000", "0", "0", ""],
            &["", "ghost", "", "", "", "", "", "", ""],
        ])
    }

    #[test]
    fn parses_rows_below_a_detected_header() {
        let candidates = parse_rows(&roster()).unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].participant_id, "101");
        assert_eq!(candidates[0].player_name, "Skyline");
        assert_eq!(candidates[0].admin_notes.as_deref(), Some("A-01"));
        assert_eq!(candidates[0].payment.total_transaction, 4000);
        assert!(!candidates[0].checked_in);
    }

    #[test]
    fn player_name_falls_back_to_short_tag_then_id() {
        let candidates = parse_rows(&roster()).unwrap();
        assert_eq!(candidates[2].player_name, "Comet");

        let bare = rows(&[&["Id", "GamerTag"], &["204", ""]]);
        let candidates = parse_rows(&bare).unwrap();
        assert_eq!(candidates[0].player_name, "204");
    }

    #[test]
    fn truthy_flag_parsing_is_tolerant() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("Yes"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("no"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("checked"));
    }

    #[test]
    fn rows_without_identifier_are_dropped() {
        let candidates = parse_rows(&roster()).unwrap();
        assert!(candidates.iter().all(|c| !c.participant_id.is_empty()));
    }

    #[test]
    fn missing_header_row_fails() {
        let no_header = rows(&[
            &["Email", "Phone"],
            &["a@example.com", "000-0000"],
        ]);

        assert!(matches!(
            parse_rows(&no_header),
            Err(ImporterError::HeaderNotFound)
        ));
    }

    #[test]
    fn header_without_data_rows_fails_as_empty() {
        let header_only = rows(&[&["Id", "GamerTag"]]);

        assert!(matches!(
            parse_rows(&header_only),
            Err(ImporterError::EmptyImport)
        ));
    }

    #[test]
    fn merge_keeps_the_checked_in_latch() {
        let checked_in_at = Utc.with_ymd_and_hms(2024, 6, 1, 1, 15, 0).unwrap();

        let mut stored = Participant::new("103");
        stored.checked_in = true;
        stored.checked_in_at = Some(checked_in_at);
        stored.checked_in_by = Some("operator-1".to_string());
        stored.edit_notes = "2024-06-01 10:15 JST | 変更なし | +0円".to_string();

        let mut incoming = Participant::new("103");
        incoming.player_name = "Comet".to_string();
        incoming.checked_in = false;

        let result = merge_into(vec![stored], vec![incoming]);
        let merged = &result.participants[0];

        assert!(merged.checked_in);
        assert_eq!(merged.checked_in_at, Some(checked_in_at));
        assert_eq!(merged.checked_in_by.as_deref(), Some("operator-1"));
        assert_eq!(merged.player_name, "Comet");
        assert!(merged.edit_notes.contains("変更なし"));
    }

    #[test]
    fn merge_counts_candidates_not_net_new_records() {
        let stored = vec![Participant::new("101")];
        let candidates = vec![Participant::new("101"), Participant::new("102")];

        let result = merge_into(stored, candidates);

        assert_eq!(result.imported, 2);
        assert_eq!(result.participants.len(), 2);
    }

    #[test]
    fn merge_output_is_ordered_by_identifier() {
        let result = merge_into(
            vec![Participant::new("300")],
            vec![Participant::new("100"), Participant::new("200")],
        );

        let ids: Vec<&str> = result
            .participants
            .iter()
            .map(|p| p.participant_id.as_str())
            .collect();
        assert_eq!(ids, ["100", "200", "300"]);
    }

    #[test]
    fn amount_parsing_tolerates_separators_and_garbage() {
        assert_eq!(parse_amount("4000"), 4000);
        assert_eq!(parse_amount("4,000"), 4000);
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("n/a"), 0);
        assert_eq!(parse_amount("-1000"), -1000);
    }
}
