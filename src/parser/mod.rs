//! Roster CSV ingestion with encoding and delimiter auto-detection.
//!
//! Converts CSV rows into string-map records. No report-specific logic here;
//! column resolution and typing live in [`crate::models`].
//!
//! The original tool reads spreadsheet exports produced on Chinese-locale
//! machines, so the GBK family is handled alongside the western encodings.

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{SourceError, SourceResult};

/// Result of parsing with metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed records as JSON objects with string values.
    pub records: Vec<Value>,
    /// Detected or used encoding.
    pub encoding: String,
    /// Detected or used delimiter.
    pub delimiter: char,
    /// Column headers.
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "gb2312" | "gbk" | "gb18030" | "euc-cn" => "gb18030".to_string(),
        "big5" | "big5-hkscs" => "big5".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> SourceResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        "gb18030" | "gbk" | "gb2312" => encoding_rs::GB18030.decode(bytes).0.to_string(),
        "big5" => encoding_rs::BIG5.decode(bytes).0.to_string(),
        // Fallback: UTF-8 with lossy conversion
        _ => String::from_utf8_lossy(bytes).to_string(),
    };
    Ok(decoded)
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
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

/// Parse a roster file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> SourceResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse roster bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> SourceResult<ParseResult> {
    if bytes.is_empty() {
        return Err(SourceError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    parse_content(&content, delimiter, encoding)
}

/// Parse decoded CSV content with an explicit delimiter.
pub fn parse_content(content: &str, delimiter: char, encoding: String) -> SourceResult<ParseResult> {
    // Not flexible: a ragged row means the export is broken, not data.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SourceError::NoHeaders);
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = record.get(i).unwrap_or("");
            obj.insert(header.clone(), json!(cell));
        }
        records.push(Value::Object(obj));
    }

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "name,age\nAlice,30\nBob,25";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0]["name"], "Alice");
        assert_eq!(result.records[0]["age"], "30");
        assert_eq!(result.records[1]["name"], "Bob");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "a;b;c\n1;2;3";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.records[0]["b"], "2");
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,value\n\"Alice\",\"Hello, World\"";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.records[0]["value"], "Hello, World");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "a,b\n1,2\n,\n3,4\n";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_empty_cells_kept() {
        let csv = "a;b;c\n1;;3";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.records[0]["b"], "");
        assert_eq!(result.records[0]["c"], "3");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let csv = "a;b;c\n1;2";
        let err = parse_bytes_auto(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Csv(_)));
    }

    #[test]
    fn test_header_only_is_not_an_error() {
        let csv = "a,b,c\n";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.headers, vec!["a", "b", "c"]);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = parse_bytes_auto(b"").unwrap_err();
        assert!(matches!(err, SourceError::EmptyFile));
    }

    #[test]
    fn test_bom_stripped_from_first_header() {
        let csv = "\u{feff}a,b\n1,2";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();
        assert_eq!(result.headers[0], "a");
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_gb18030_decoding() {
        // "学号" encoded as GBK
        let bytes: &[u8] = &[0xD1, 0xA7, 0xBA, 0xC5];
        let decoded = decode_content(bytes, "gb18030").unwrap();
        assert_eq!(decoded, "学号");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.contains("Soci"));
    }
}
