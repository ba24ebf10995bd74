//! Encoding-tolerant reading for raw domain lists.
//!
//! Raw lists are collected from threat feeds, pastes, and mail bodies and
//! are not guaranteed to be UTF-8. Strategy:
//! 1. Strict UTF-8 fast path (the overwhelmingly common case)
//! 2. BOM detection for UTF-8/UTF-16 exports
//! 3. chardetng guess, then decode with replacement characters

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fs;
use std::path::Path;

const DETECT_SAMPLE_SIZE: usize = 8192;

/// Read a text file into a `String`, never failing on encoding issues.
///
/// IO errors (missing file, permissions) still propagate; only the decode
/// step is lossy.
pub fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    if let Ok(text) = std::str::from_utf8(&bytes) {
        return Ok(text.to_string());
    }

    let encoding = sniff_encoding(&bytes);
    let (decoded, _, _) = encoding.decode(&bytes);
    Ok(decoded.into_owned())
}

fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    // BOM markers are the most reliable signal
    if bytes.starts_with(&[0xef, 0xbb, 0xbf]) {
        return UTF_8;
    }
    if bytes.starts_with(&[0xff, 0xfe]) {
        return UTF_16LE;
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        return UTF_16BE;
    }

    let mut detector = EncodingDetector::new();
    let sample = &bytes[..bytes.len().min(DETECT_SAMPLE_SIZE)];
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_plain_utf8() {
        let mut file = NamedTempFile::new().expect("tmp");
        file.write_all("bad.com\nevil.net\n".as_bytes()).expect("write");
        file.flush().expect("flush");

        let text = read_text_lossy(file.path()).expect("read");
        assert_eq!(text, "bad.com\nevil.net\n");
    }

    #[test]
    fn decodes_non_utf8_input_without_failing() {
        let mut file = NamedTempFile::new().expect("tmp");
        // "münchen.example\n" in Latin-1: 0xfc is not valid UTF-8
        file.write_all(b"m\xfcnchen.example\n").expect("write");
        file.flush().expect("flush");

        // Whatever chardetng guesses, the ASCII tail must survive the decode
        let text = read_text_lossy(file.path()).expect("read");
        assert!(text.contains(".example"));
    }

    #[test]
    fn reads_utf16le_with_bom() {
        let mut file = NamedTempFile::new().expect("tmp");
        let mut bytes = vec![0xff, 0xfe];
        for unit in "bad.com\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        file.write_all(&bytes).expect("write");
        file.flush().expect("flush");

        let text = read_text_lossy(file.path()).expect("read");
        assert_eq!(text, "bad.com\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_text_lossy(Path::new("/nonexistent/raw.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
