use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use dental_model::SchemaError;

/// Delimited table as read from disk: headers plus raw cell text.
///
/// Cells are kept exactly as read so the raw export can reproduce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Rows as column-name to cell mappings.
    pub fn row_maps(&self) -> Vec<BTreeMap<&str, &str>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.as_str(), cell.as_str()))
                    .collect()
            })
            .collect()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Read a delimited file. The first non-blank line is the header.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable, SchemaError> {
    let file = std::fs::File::open(path)
        .map_err(|error| SchemaError::Unreadable(format!("{}: {error}", path.display())))?;
    read_delimited_from(file, delimiter)
        .map_err(|error| match error {
            SchemaError::Unreadable(message) => {
                SchemaError::Unreadable(format!("{}: {message}", path.display()))
            }
            other => other,
        })
}

/// Read delimited text from any reader.
pub fn read_delimited_from<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, SchemaError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|error| SchemaError::Unreadable(format!("line {}: {error}", index + 1)))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match &headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(headers) => {
                let mut row = Vec::with_capacity(headers.len());
                for idx in 0..headers.len() {
                    row.push(record.get(idx).unwrap_or("").to_string());
                }
                rows.push(row);
            }
        }
    }
    Ok(RawTable {
        headers: headers.unwrap_or_default(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_semicolon_table() {
        let text = "\u{feff}Id;NumberOfTeeth\n\n1;2\n2;\n";
        let table = read_delimited_from(text.as_bytes(), b';').expect("read");
        assert_eq!(table.headers, vec!["Id", "NumberOfTeeth"]);
        assert_eq!(table.rows, vec![vec!["1", "2"], vec!["2", ""]]);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = read_delimited_from("A;B;C\n1\n".as_bytes(), b';').expect("read");
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        let maps = table.row_maps();
        assert_eq!(maps[0].get("A"), Some(&"1"));
        assert_eq!(maps[0].get("C"), Some(&""));
    }

    #[test]
    fn empty_input_has_no_headers() {
        let table = read_delimited_from("".as_bytes(), b';').expect("read");
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
