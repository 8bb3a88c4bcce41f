use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use rankscout_common::{RankScoutError, Target, KEYWORD_COLUMN, WEBSITE_COLUMN};

/// A header row plus string cells. Every row is exactly as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input sheet: {}", path.display()))?;
        let sheet = Self::from_reader(file)
            .with_context(|| format!("Failed to parse input sheet: {}", path.display()))?;
        debug!(path = %path.display(), rows = sheet.rows.len(), "Read input sheet");
        Ok(sheet)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.context("Failed to parse CSV record")?;
            let mut cells: Vec<String> = record.iter().map(String::from).collect();
            if cells.len() > headers.len() {
                warn!(
                    row = idx + 1,
                    extra = cells.len() - headers.len(),
                    "Dropping cells beyond the header width"
                );
            }
            cells.resize(headers.len(), String::new());
            rows.push(cells);
        }

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// One target per row, from the `Keyword` and `Website` columns.
    pub fn targets(&self) -> Result<Vec<Target>, RankScoutError> {
        let keyword_idx = self
            .column_index(KEYWORD_COLUMN)
            .ok_or_else(|| RankScoutError::MissingColumn(KEYWORD_COLUMN.to_string()))?;
        let website_idx = self
            .column_index(WEBSITE_COLUMN)
            .ok_or_else(|| RankScoutError::MissingColumn(WEBSITE_COLUMN.to_string()))?;

        Ok(self
            .rows
            .iter()
            .map(|row| Target::new(row[keyword_idx].as_str(), row[website_idx].as_str()))
            .collect())
    }

    /// Replace a column's values in place, or append it if absent.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), RankScoutError> {
        if values.len() != self.rows.len() {
            return Err(RankScoutError::Sheet(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output sheet: {}", path.display()))?;
        self.to_writer(file)?;
        debug!(path = %path.display(), rows = self.rows.len(), "Wrote output sheet");
        Ok(())
    }

    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Sheet {
        Sheet::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn reads_targets_and_keeps_other_columns() {
        let sheet = parse("Client, Keyword ,Website\nOm,tiffin noida,omkitchen.in\nOm,meal box,https://omkitchen.in\n");

        assert_eq!(sheet.headers, vec!["Client", "Keyword", "Website"]);
        let targets = sheet.targets().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1], Target::new("meal box", "https://omkitchen.in"));
    }

    #[test]
    fn missing_website_column_is_reported() {
        let sheet = parse("Keyword,Site\ntiffin,omkitchen.in\n");

        let err = sheet.targets().unwrap_err();
        assert!(matches!(err, RankScoutError::MissingColumn(ref c) if c == "Website"));
    }

    #[test]
    fn short_rows_are_padded() {
        let sheet = parse("Keyword,Website,Notes\ntiffin\n");

        assert_eq!(sheet.rows[0], vec!["tiffin", "", ""]);
        assert_eq!(sheet.targets().unwrap()[0].website, "");
    }

    #[test]
    fn set_column_appends_then_replaces() {
        let mut sheet = parse("Keyword,Website\na,x.com\nb,y.com\n");

        sheet
            .set_column("Google Search Rank", vec!["1".into(), "2".into()])
            .unwrap();
        sheet
            .set_column("Google Search Rank", vec!["3".into(), "4".into()])
            .unwrap();

        assert_eq!(sheet.headers.len(), 3);
        assert_eq!(sheet.rows[1], vec!["b", "y.com", "4"]);
    }

    #[test]
    fn set_column_rejects_wrong_length() {
        let mut sheet = parse("Keyword,Website\na,x.com\n");
        assert!(sheet.set_column("X", vec![]).is_err());
    }

    #[test]
    fn writes_headers_then_rows() {
        let sheet = Sheet {
            headers: vec!["Keyword".into(), "Google Places Rank".into()],
            rows: vec![vec!["tiffin, noida".into(), "Not in top 50".into()]],
        };

        let mut out = Vec::new();
        sheet.to_writer(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Keyword,Google Places Rank\n\"tiffin, noida\",Not in top 50\n"
        );
    }
}
