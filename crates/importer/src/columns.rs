/// The fixed whitelist of roster columns that may be imported. Everything
/// outside this list is discarded at parse time, so personal data beyond it
/// never reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterColumn {
    Id,
    GamerTag,
    ShortGamerTag,
    AdminNotes,
    CheckedIn,
    TotalOwed,
    TotalPaid,
    TotalTransaction,
}

impl RosterColumn {
    pub const ALL: [RosterColumn; 8] = [
        RosterColumn::Id,
        RosterColumn::GamerTag,
        RosterColumn::ShortGamerTag,
        RosterColumn::AdminNotes,
        RosterColumn::CheckedIn,
        RosterColumn::TotalOwed,
        RosterColumn::TotalPaid,
        RosterColumn::TotalTransaction,
    ];

    /// Accepted header spellings, compared case-insensitively after trimming.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            RosterColumn::Id => &["Id"],
            RosterColumn::GamerTag => &["GamerTag"],
            RosterColumn::ShortGamerTag => &["Short GamerTag"],
            RosterColumn::AdminNotes => &["Admin Notes"],
            RosterColumn::CheckedIn => &["Checked In"],
            RosterColumn::TotalOwed => &["Total Owed"],
            RosterColumn::TotalPaid => &["Total Paid"],
            RosterColumn::TotalTransaction => &["Total Transaction"],
        }
    }

    fn matches(self, header: &str) -> bool {
        self.aliases()
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(header))
    }

    fn ordinal(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }
}

/// Column positions resolved once per import from a header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: [Option<usize>; RosterColumn::ALL.len()],
}

impl ColumnMap {
    /// Resolves the whitelist against a candidate header row. Returns `None`
    /// unless the row carries the identifier column and at least one of the
    /// two display-name columns.
    pub fn resolve(row: &[String]) -> Option<Self> {
        let mut indices = [None; RosterColumn::ALL.len()];

        for column in RosterColumn::ALL {
            indices[column.ordinal()] = row
                .iter()
                .position(|cell| column.matches(cell.trim()));
        }

        let map = Self { indices };
        let has_name = map.index(RosterColumn::GamerTag).is_some()
            || map.index(RosterColumn::ShortGamerTag).is_some();

        (map.index(RosterColumn::Id).is_some() && has_name).then_some(map)
    }

    pub fn index(&self, column: RosterColumn) -> Option<usize> {
        self.indices[column.ordinal()]
    }

    /// Trimmed cell content for a column, empty when the column is absent
    /// or the row is short.
    pub fn cell<'r>(&self, row: &'r [String], column: RosterColumn) -> &'r str {
        self.index(column)
            .and_then(|i| row.get(i))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn resolve_requires_id_and_a_name_column() {
        assert!(ColumnMap::resolve(&row(&["Id", "GamerTag"])).is_some());
        assert!(ColumnMap::resolve(&row(&["Id", "Short GamerTag"])).is_some());
        assert!(ColumnMap::resolve(&row(&["Id", "Total Owed"])).is_none());
        assert!(ColumnMap::resolve(&row(&["GamerTag", "Total Owed"])).is_none());
    }

    #[test]
    fn resolve_is_case_insensitive_and_trims() {
        let map = ColumnMap::resolve(&row(&[" id ", "GAMERTAG", "checked in"])).unwrap();

        assert_eq!(map.index(RosterColumn::Id), Some(0));
        assert_eq!(map.index(RosterColumn::GamerTag), Some(1));
        assert_eq!(map.index(RosterColumn::CheckedIn), Some(2));
    }

    #[test]
    fn unlisted_columns_are_ignored() {
        let map = ColumnMap::resolve(&row(&["Email", "Id", "Phone", "GamerTag"])).unwrap();

        assert_eq!(map.index(RosterColumn::Id), Some(1));
        assert_eq!(map.index(RosterColumn::GamerTag), Some(3));
        assert_eq!(map.index(RosterColumn::AdminNotes), None);
    }

    #[test]
    fn cell_handles_short_rows() {
        let map = ColumnMap::resolve(&row(&["Id", "GamerTag", "Admin Notes"])).unwrap();
        let data = row(&["101"]);

        assert_eq!(map.cell(&data, RosterColumn::Id), "101");
        assert_eq!(map.cell(&data, RosterColumn::GamerTag), "");
        assert_eq!(map.cell(&data, RosterColumn::AdminNotes), "");
    }
}
