//! Sort-key resolution and stable ranking of scan rows.

use cfsub_core::measurement::{
    ADDRESS, DOWNLOAD_JITTER, DOWNLOAD_LATENCY, DOWNLOAD_SPEED, UPLOAD_JITTER, UPLOAD_LATENCY, UPLOAD_SPEED,
};
use cfsub_core::Measurement;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Which metric family a sort name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Download,
    Upload,
}

impl Table {
    fn column(self, name: &str) -> Option<usize> {
        let col = match (self, name) {
            (_, "ip" | "address") => ADDRESS,
            (Table::Download, "speed") => DOWNLOAD_SPEED,
            (Table::Download, "latency") => DOWNLOAD_LATENCY,
            (Table::Download, "jitter") => DOWNLOAD_JITTER,
            (Table::Upload, "speed") => UPLOAD_SPEED,
            (Table::Upload, "latency") => UPLOAD_LATENCY,
            (Table::Upload, "jitter") => UPLOAD_JITTER,
            _ => return None,
        };
        Some(col)
    }

    fn default_column(self) -> usize {
        match self {
            Table::Download => DOWNLOAD_SPEED,
            Table::Upload => UPLOAD_SPEED,
        }
    }
}

/// Only jitter ranks low-to-high; speed, latency, and unknown names rank high-to-low.
fn direction(name: &str) -> Direction {
    match name {
        "jitter" => Direction::Ascending,
        _ => Direction::Descending,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: Direction,
}

impl SortKey {
    /// Look `name` up in `table`. Unknown names fall back to the table's speed column,
    /// ranked descending.
    pub fn lookup(table: Table, name: &str) -> SortKey {
        SortKey {
            column: table.column(name).unwrap_or_else(|| table.default_column()),
            direction: direction(name),
        }
    }

    /// A non-empty upload sort replaces the download sort entirely.
    pub fn resolve(download_sort: &str, upload_sort: Option<&str>) -> SortKey {
        match upload_sort.filter(|s| !s.is_empty()) {
            Some(name) => SortKey::lookup(Table::Upload, name),
            None => SortKey::lookup(Table::Download, download_sort),
        }
    }

    fn compare(&self, a: &Measurement, b: &Measurement) -> Ordering {
        let ord = match (a.metric(self.column), b.metric(self.column)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.address.cmp(&b.address),
        };
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Stable sort of `rows` by `key`. Rows with equal keys keep their file order; nothing
/// is dropped.
pub fn rank(mut rows: Vec<Measurement>, key: SortKey) -> Vec<Measurement> {
    rows.sort_by(|a, b| key.compare(a, b));
    debug!(column = key.column, direction = ?key.direction, rows = rows.len(), "ranked");
    rows
}
