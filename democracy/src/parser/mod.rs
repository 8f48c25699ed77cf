//! Generic CSV reader with encoding and delimiter auto-detection.
//!
//! Produces a header row plus string cells. No index-specific logic here;
//! see [`crate::transform::reshape`] for the wide table layout.

use std::path::Path;

/// CSV parsing error with context
#[derive(Debug, Clone, PartialEq)]
pub struct CsvError {
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A parsed table with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Column headers, trimmed
    pub headers: Vec<String>,
    /// Data rows, each padded or truncated to the header width
    pub rows: Vec<Vec<String>>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

impl ParseResult {
    /// Position of a header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the given encoding.
///
/// Latin-1 labels decode as windows-1252, its superset. Unknown encodings
/// fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// Blank lines are skipped. Short rows are padded with empty cells, extra
/// cells are dropped.
///
/// # Example
/// ```ignore
/// use democracy::parser::parse_str;
///
/// let table = parse_str("Country,2023\nNorway,9.81", ',').unwrap();
/// assert_eq!(table.headers, vec!["Country", "2023"]);
/// assert_eq!(table.rows[0][1], "9.81");
/// ```
pub fn parse_str(content: &str, delimiter: char) -> Result<ParseResult, CsvError> {
    parse_with_metadata(content, delimiter, "utf-8".to_string())
}

/// Parse CSV file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> Result<ParseResult, CsvError> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| {
        CsvError::new(0, format!("Cannot read file '{}': {}", path.as_ref().display(), e))
    })?;

    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
///
/// Valid UTF-8 is always read as UTF-8; detection only runs on other bytes.
pub fn parse_bytes_auto(bytes: &[u8]) -> Result<ParseResult, CsvError> {
    let (content, encoding) = match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), "utf-8".to_string()),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            (decode_content(bytes, &encoding), encoding)
        }
    };
    let delimiter = detect_delimiter(&content);

    parse_with_metadata(&content, delimiter, encoding)
}

/// Parse CSV text and record which encoding produced it.
pub fn parse_with_metadata(
    content: &str,
    delimiter: char,
    encoding: String,
) -> Result<ParseResult, CsvError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(CsvError::new(1, "Empty CSV file"));
    }

    let delimiter_byte = u8::try_from(delimiter)
        .map_err(|_| CsvError::new(0, format!("Unsupported delimiter '{}'", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| to_csv_error(&e, 1))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::new(1, "No headers found"));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| to_csv_error(&e, idx + 2))?;

        let mut row: Vec<String> = record
            .iter()
            .take(headers.len())
            .map(|cell| cell.trim().to_string())
            .collect();
        row.resize(headers.len(), String::new());

        rows.push(row);
    }

    Ok(ParseResult {
        headers,
        rows,
        encoding,
        delimiter,
    })
}

fn to_csv_error(err: &csv::Error, fallback_line: usize) -> CsvError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback_line);
    CsvError::new(line, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_str("Country,2023\nNorway,9.81\nChad,1.67", ',').unwrap();

        assert_eq!(table.headers, vec!["Country", "2023"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Norway", "9.81"]);
        assert_eq!(table.rows[1], vec!["Chad", "1.67"]);
    }

    #[test]
    fn test_quoted_values_with_delimiter() {
        let csv = "Country,Region\n\"Korea, South\",\"Asia and Australasia\"";
        let table = parse_str(csv, ',').unwrap();

        assert_eq!(table.rows[0][0], "Korea, South");
        assert_eq!(table.rows[0][1], "Asia and Australasia");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_str("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse_str("a,b,c\n1,,3\n4", ',').unwrap();

        assert_eq!(table.rows[0], vec!["1", "", "3"]);
        assert_eq!(table.rows[1], vec!["4", "", ""]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let table = parse_str("a;b\n1;2;3;4", ';').unwrap();
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse_str("", ',').unwrap_err();
        assert!(err.message.contains("Empty"));
    }

    #[test]
    fn test_bom_stripped() {
        let table = parse_str("\u{feff}Region,Country\nX,Y", ',').unwrap();
        assert_eq!(table.headers[0], "Region");
    }

    #[test]
    fn test_error_message_format() {
        let err = CsvError::new(5, "Invalid index value")
            .with_column("2023")
            .with_value("n/a");

        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column '2023'"));
        assert!(msg.contains("value 'n/a'"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_auto_parse_keeps_utf8_names() {
        let csv = "Region,Country,RegimeType,2023,2022\nEurope,Türkiye,Hybrid regime,4.33,4.35\nEurope,Norway,Full democracy,9.81,9.81\n";
        let table = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(table.encoding, "utf-8");
        assert_eq!(table.rows[0][1], "Türkiye");
    }

    #[test]
    fn test_auto_parse_falls_back_on_invalid_utf8() {
        let bytes = b"Region,Country\nEurope,T\xfcrkiye\n";
        let table = parse_bytes_auto(bytes).unwrap();

        assert_ne!(table.encoding, "utf-8");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_decode_latin1_as_windows_1252() {
        assert_eq!(decode_content(b"\x80 T\xfcrkiye", "iso-8859-1"), "€ Türkiye");
    }

    #[test]
    fn test_auto_parse() {
        let csv = "Region,Country,2023\nWestern Europe,Norway,9.81";
        let table = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(table.delimiter, ',');
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.column_index("Country"), Some(1));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Côte" in ISO-8859-1
        let bytes: &[u8] = &[0x43, 0xF4, 0x74, 0x65];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Côte");
    }
}
