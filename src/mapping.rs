use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::MappingError;

/// One title → key pair from the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub title: String,
    pub key: String,
}

/// A tabular resource handed over by the caller, already parsed out of
/// whatever spreadsheet format it came from. The crate only enforces the
/// `query` / `Titel` / `Nøgle` contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Ordered collection of `(title, key)` pairs plus a derived match order.
///
/// The match order sorts entries by descending title length (in characters,
/// insertion order on ties) and is recomputed on every mutation. Longest
/// first matters: a short title that is a substring of a longer one must
/// never shadow the longer match.
///
/// Titles match as exact, case-sensitive, unanchored substrings. No
/// whole-word anchoring and no fuzzing; a title that happens to be a
/// substring of an unrelated word will still match.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    match_order: Vec<usize>,
}

impl MappingTable {
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut table = MappingTable::default();
        for (title, key) in pairs {
            table.insert(title.into(), key.into())?;
        }
        table.recompute_match_order();
        Ok(table)
    }

    /// Builds a table from a workbook-shaped input: requires a sheet named
    /// `query` with columns `Titel` and `Nøgle`. Row order defines insertion
    /// order. No partial table is produced on failure.
    pub fn from_workbook(sheets: &[Sheet]) -> Result<Self, MappingError> {
        let sheet = sheets
            .iter()
            .find(|s| s.name == "query")
            .ok_or(MappingError::MissingSheet)?;
        let col = |name: &str| {
            sheet
                .columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| MappingError::MissingColumn(name.to_string()))
        };
        let titel = col("Titel")?;
        let noegle = col("Nøgle")?;

        let mut table = MappingTable::default();
        for row in &sheet.rows {
            let title = row.get(titel).cloned().unwrap_or_default();
            let key = row.get(noegle).cloned().unwrap_or_default();
            table.insert(title, key)?;
        }
        table.recompute_match_order();
        debug!("loaded mapping table with {} entries", table.len());
        Ok(table)
    }

    /// Appends one entry, keeping the match order current.
    pub fn push(&mut self, title: impl Into<String>, key: impl Into<String>) -> Result<(), MappingError> {
        self.insert(title.into(), key.into())?;
        self.recompute_match_order();
        Ok(())
    }

    fn insert(&mut self, title: String, key: String) -> Result<(), MappingError> {
        if title.is_empty() {
            return Err(MappingError::EmptyTitle(self.entries.len()));
        }
        if self.entries.iter().any(|e| e.title == title) {
            return Err(MappingError::DuplicateTitle(title));
        }
        self.entries.push(MappingEntry { title, key });
        Ok(())
    }

    fn recompute_match_order(&mut self) {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        // Stable sort keeps insertion order for equal-length titles.
        order.sort_by_key(|&i| std::cmp::Reverse(self.entries[i].title.chars().count()));
        self.match_order = order;
    }

    /// Exact, case-sensitive title lookup.
    pub fn key_for(&self, title: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.title == title)
            .map(|e| e.key.as_str())
    }

    /// Entries in match order: longest title first.
    pub fn lookup_in_order(&self) -> impl Iterator<Item = &MappingEntry> {
        self.match_order.iter().map(|&i| &self.entries[i])
    }

    /// Entries in insertion order, as defined by the source rows.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
