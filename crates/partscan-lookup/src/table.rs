//! Header-indexed tabular data and row resolution.

use crate::error::{LookupError, Result};
use partscan_core::{PartRecord, PartToken};
use serde::{Deserialize, Serialize};

const ID_HEADER: &str = "id";
const NAME_HEADER: &str = "name";
const QUANTITY_HEADER: &str = "quantity";
const POSITION_HEADER: &str = "position";
const CAD_ASSEMBLY_HEADER: &str = "cadassembly";

const UNKNOWN: &str = "Unknown";

/// Lower-case a header and drop every whitespace character.
///
/// `" CAD Assembly "` and `"cadassembly"` normalize to the same name.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Coerce a quantity cell to a non-negative integer.
///
/// Reads the leading integer the way spreadsheet exports are usually
/// written (`"15"`, `" 15 pcs"`). Absent, unparseable or negative values
/// become 0; values beyond `u32` saturate.
#[must_use]
pub fn parse_quantity(cell: Option<&str>) -> u32 {
    let Some(cell) = cell else {
        return 0;
    };

    let trimmed = cell.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if negative || digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or(u32::MAX)
}

/// A header row plus body rows, as returned by the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from an explicit header and body.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create a table whose first row is the header.
    #[must_use]
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0);
        Self { headers, rows }
    }

    /// True when the source returned nothing, not even a header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Raw header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Body rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Find the row for `token` and project it into a record.
    ///
    /// # Errors
    /// - [`LookupError::EmptyTable`] when the table has no rows at all
    /// - [`LookupError::MissingIdColumn`] when no header normalizes to `id`
    /// - [`LookupError::PartNotFound`] when no row matches
    pub fn resolve(&self, token: &PartToken) -> Result<PartRecord> {
        if self.is_empty() {
            tracing::debug!("No data found in sheet");
            return Err(LookupError::EmptyTable);
        }

        let columns = ColumnIndex::locate(&self.headers)?;
        tracing::debug!(rows = self.rows.len(), "Searching sheet rows");

        let wanted = token.normalized();
        let row = self
            .rows
            .iter()
            .find(|row| {
                row.get(columns.id)
                    .is_some_and(|cell| cell.trim().to_lowercase() == wanted)
            })
            .ok_or_else(|| LookupError::PartNotFound {
                token: token.to_string(),
            })?;

        Ok(columns.project(row, token))
    }
}

/// Column positions of the recognized fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    /// Id column
    pub id: usize,
    /// Name column
    pub name: Option<usize>,
    /// Quantity column
    pub quantity: Option<usize>,
    /// Position column
    pub position: Option<usize>,
    /// CAD assembly column
    pub cad_assembly: Option<usize>,
}

impl ColumnIndex {
    /// Locate the recognized columns by exact normalized name.
    ///
    /// # Errors
    /// Returns [`LookupError::MissingIdColumn`] if there is no id column.
    pub fn locate(headers: &[String]) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        tracing::debug!(headers = ?normalized, "Normalized sheet headers");

        let find = |name: &str| normalized.iter().position(|h| h == name);

        let id = find(ID_HEADER).ok_or_else(|| {
            tracing::error!("ID column not found in sheet");
            LookupError::MissingIdColumn {
                headers: normalized.clone(),
            }
        })?;

        Ok(Self {
            id,
            name: find(NAME_HEADER),
            quantity: find(QUANTITY_HEADER),
            position: find(POSITION_HEADER),
            cad_assembly: find(CAD_ASSEMBLY_HEADER),
        })
    }

    /// Build a record from a matched row, applying field defaults.
    #[must_use]
    pub fn project(&self, row: &[String], token: &PartToken) -> PartRecord {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(String::as_str)
                .filter(|value| !value.is_empty())
        };

        PartRecord {
            id: cell(Some(self.id)).unwrap_or(token.as_str()).to_string(),
            name: cell(self.name).unwrap_or(UNKNOWN).to_string(),
            quantity: parse_quantity(cell(self.quantity)),
            position: cell(self.position).unwrap_or(UNKNOWN).to_string(),
            cad_assembly: cell(self.cad_assembly).unwrap_or_default().to_string(),
        }
    }
}
