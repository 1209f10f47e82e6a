use cfsub_core::measurement::COLUMNS;
use cfsub_core::{Error, Measurement, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Parse a result file. The first row is a header and is skipped; every other row must
/// hold an address followed by six numbers, otherwise the whole load fails.
pub fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let rows = read_measurements(file, path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded scan results");
    Ok(rows)
}

/// Parse result rows from any reader. `source` is only used in error messages.
pub fn read_measurements<R: Read>(reader: R, source: &Path) -> Result<Vec<Measurement>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| Error::csv(source, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != COLUMNS {
            return Err(Error::ColumnCount { path: source.to_path_buf(), line, expected: COLUMNS, found: record.len() });
        }
        let mut metrics = [0f64; COLUMNS - 1];
        for (i, slot) in metrics.iter_mut().enumerate() {
            let raw = &record[i + 1];
            *slot = raw.parse().map_err(|_| Error::NotNumeric {
                path: source.to_path_buf(),
                line,
                column: i + 2,
                value: raw.to_string(),
            })?;
        }
        out.push(Measurement::new(&record[0], metrics));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ip,download,upload,dl_latency,ul_latency,dl_jitter,ul_jitter\n";

    fn parse(body: &str) -> Result<Vec<Measurement>> {
        read_measurements(body.as_bytes(), Path::new("scan.csv"))
    }

    #[test]
    fn skips_header_and_keeps_file_order() {
        let body = format!("{HEADER}1.1.1.1,10,2,300,310,5,6\n2.2.2.2, 5.5 ,1,200,210,4,3\n");
        let rows = parse(&body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Measurement::new("1.1.1.1", [10.0, 2.0, 300.0, 310.0, 5.0, 6.0]));
        assert_eq!(rows[1].address, "2.2.2.2");
        assert_eq!(rows[1].metrics[0], 5.5);
    }

    #[test]
    fn header_only_yields_no_rows() {
        assert!(parse(HEADER).unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn non_numeric_value_fails_whole_load() {
        let body = format!("{HEADER}1.1.1.1,10,2,300,310,5,6\n2.2.2.2,fast,1,200,210,4,3\n");
        match parse(&body) {
            Err(Error::NotNumeric { line, column, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, 2);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn short_row_fails_whole_load() {
        let body = format!("{HEADER}1.1.1.1,10,2,300\n");
        assert!(matches!(parse(&body), Err(Error::ColumnCount { found: 4, expected: 7, .. })));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");
        std::fs::write(&path, format!("{HEADER}9.9.9.9,1,2,3,4,5,6\n")).unwrap();
        let rows = load_measurements(&path).unwrap();
        assert_eq!(rows, vec![Measurement::new("9.9.9.9", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0])]);
    }
}
