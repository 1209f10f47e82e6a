//! One row of a scan result file.
//!
//! Columns are bound by position, never by header text:
//! `address, download speed, upload speed, download latency, upload latency,
//! download jitter, upload jitter`.

pub const ADDRESS: usize = 0;
pub const DOWNLOAD_SPEED: usize = 1;
pub const UPLOAD_SPEED: usize = 2;
pub const DOWNLOAD_LATENCY: usize = 3;
pub const UPLOAD_LATENCY: usize = 4;
pub const DOWNLOAD_JITTER: usize = 5;
pub const UPLOAD_JITTER: usize = 6;

/// Address plus the six metric columns.
pub const COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub address: String,
    /// Metric columns 1..=6 in file order.
    pub metrics: [f64; 6],
}

impl Measurement {
    pub fn new(address: impl Into<String>, metrics: [f64; 6]) -> Self {
        Measurement { address: address.into(), metrics }
    }

    /// Value of a metric column. Returns `None` for the address column or an index past the row.
    pub fn metric(&self, column: usize) -> Option<f64> {
        if column == ADDRESS { return None; }
        self.metrics.get(column - 1).copied()
    }
}
