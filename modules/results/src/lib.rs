//! Scan result files: locating the newest one, parsing it, and resetting the
//! working directories around it.

mod latest;
mod load;
mod purge;

pub use latest::latest_result;
pub use load::{load_measurements, read_measurements};
pub use purge::{reset_working_dirs, PurgeReport, WorkingDirs};
