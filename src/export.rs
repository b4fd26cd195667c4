use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::clock::format_iso8601;
use crate::errors::UtmError;
use crate::history::History;
use crate::params::decompose;

pub const DEFAULT_EXPORT_FILE: &str = "utm-links.csv";

const CSV_HEADER: &str = "URL,Source,Medium,Campaign,Term,Content,Timestamp";

/// Render the history as CSV, one quoted row per entry whose URL and
/// timestamp both still render.
pub fn to_csv(history: &History) -> Result<String, UtmError> {
    let mut buffer = Vec::new();
    writeln!(buffer, "{CSV_HEADER}")?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    let mut skipped = 0;
    for entry in history {
        let fields = match decompose(&entry.url) {
            Ok(fields) => fields,
            Err(e) => {
                debug!(action = "skip", component = "csv_export", error = %e, "Omitting unparseable entry");
                skipped += 1;
                continue;
            }
        };
        let Some(timestamp) = format_iso8601(entry.timestamp) else {
            debug!(action = "skip", component = "csv_export", timestamp = entry.timestamp, "Omitting entry with out-of-range timestamp");
            skipped += 1;
            continue;
        };
        writer.write_record([
            entry.url.as_str(),
            fields.source.as_str(),
            fields.medium.as_str(),
            fields.campaign.as_str(),
            fields.term.as_str(),
            fields.content.as_str(),
            timestamp.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    info!(
        action = "render",
        component = "csv_export",
        row_count = history.len() - skipped,
        skipped,
        "Rendered history as CSV"
    );
    String::from_utf8(bytes).map_err(|e| UtmError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write `contents` to `path`, or to stdout when `path` is `-`.
pub fn save_export(path: &Path, contents: &str) -> Result<PathBuf, UtmError> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(contents.as_bytes())?;
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;

    info!(action = "write", component = "csv_export", path = ?path, bytes = contents.len(), "Export written");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;

    #[test]
    fn test_to_csv_rows() {
        let history = History::new(vec![
            HistoryEntry {
                url: "https://example.com/?utm_source=google&utm_medium=cpc&utm_campaign=summer_sale&utm_term=shoes"
                    .to_string(),
                timestamp: 1_714_564_800_000,
            },
            HistoryEntry {
                url: "garbage".to_string(),
                timestamp: 0,
            },
        ]);

        let csv = to_csv(&history).unwrap();
        assert_eq!(
            csv,
            "URL,Source,Medium,Campaign,Term,Content,Timestamp\n\
             \"https://example.com/?utm_source=google&utm_medium=cpc&utm_campaign=summer_sale&utm_term=shoes\",\
             \"google\",\"cpc\",\"summer_sale\",\"shoes\",\"\",\"2024-05-01T12:00:00.000Z\"\n"
        );
    }

    #[test]
    fn test_to_csv_empty_history() {
        assert_eq!(
            to_csv(&History::default()).unwrap(),
            "URL,Source,Medium,Campaign,Term,Content,Timestamp\n"
        );
    }

    #[test]
    fn test_to_csv_skips_out_of_range_timestamp() {
        let history = History::new(vec![
            HistoryEntry {
                url: "https://example.com/?utm_source=far&utm_medium=b&utm_campaign=c".to_string(),
                timestamp: i64::MAX,
            },
            HistoryEntry {
                url: "https://example.com/?utm_source=near&utm_medium=b&utm_campaign=c".to_string(),
                timestamp: 0,
            },
        ]);

        let csv = to_csv(&history).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(!csv.contains("\"far\""));
        assert!(csv.contains("\"near\""));
        assert!(!csv.contains(",\"\"\n"));
    }

    #[test]
    fn test_to_csv_escapes_quotes() {
        let history = History::new(vec![HistoryEntry {
            url: "https://example.com/?utm_source=a%22b".to_string(),
            timestamp: 0,
        }]);

        let csv = to_csv(&history).unwrap();
        assert!(csv.contains(r#","a""b","#));
    }
}
