//! Raw list parsing and normalization.
//!
//! A raw file is one candidate domain per line, where the domain is the
//! first whitespace-delimited field; anything after it is ignored. Each
//! line goes through the substitution table first, so obfuscations like
//! `scam[.]example[.]com` or `hxxp://` survive copy-paste from feeds.

use crate::domain::{RawStats, SubstitutionTable};
use crate::utils::read_text_lossy;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Characters stripped from the edges of a candidate token.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '"', '\'', '`', '|', '<', '>', '(', ')', '[', ']', '{', '}',
];

/// Lines starting with these are comments: hosts-file and adblock styles.
const COMMENT_MARKERS: &[char] = &['#', '!'];

/// Parses one raw input file into normalized domain tokens.
pub struct RawParser {
    subs: SubstitutionTable,
    stats: RawStats,
}

impl RawParser {
    pub fn new(subs: SubstitutionTable) -> Self {
        Self { subs, stats: RawStats::default() }
    }

    /// Parse one raw file into candidate domains, in file order.
    ///
    /// Duplicates are kept here; the merge collapses them. An unreadable
    /// file is fatal so a run never writes after losing its input.
    pub fn parse_file(&mut self, path: &Path) -> Result<Vec<String>> {
        let text = read_text_lossy(path)?;
        let mut domains = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            self.stats.lines_read += 1;
            if let Some(domain) = self.parse_line(idx + 1, line) {
                domains.push(domain);
            }
        }
        Ok(domains)
    }

    pub fn stats(&self) -> &RawStats {
        &self.stats
    }

    /// Normalize one line into a domain token, or reject it.
    fn parse_line(&mut self, line_no: usize, line: &str) -> Option<String> {
        let line = self.subs.apply(line);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.stats.skipped_empty += 1;
            return None;
        }
        if trimmed.starts_with(COMMENT_MARKERS) {
            self.stats.skipped_comment += 1;
            debug!("line {line_no}: comment, skipped");
            return None;
        }

        let token = trimmed.split_whitespace().next()?;
        let token = token.trim_matches(EDGE_PUNCTUATION).to_ascii_lowercase();

        if !domain_shaped(&token) {
            self.stats.skipped_invalid += 1;
            debug!("line {line_no}: token {token:?} is not domain-shaped, skipped");
            return None;
        }

        self.stats.domains += 1;
        debug!("line {line_no}: accepted {token:?}");
        Some(token)
    }
}

/// Basic shape check: non-empty, contains a dot, and carries no path, port,
/// or mailbox characters. Deliberately loose; this curates a blocklist
/// feed, it does not validate DNS.
pub fn domain_shaped(token: &str) -> bool {
    if token.is_empty() || !token.contains('.') {
        return false;
    }
    !token.contains(|c: char| c.is_whitespace() || c == '/' || c == ':' || c == '@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse_lines(lines: &str) -> (Vec<String>, RawStats) {
        let mut file = NamedTempFile::new().expect("tmp");
        file.write_all(lines.as_bytes()).expect("write");
        file.flush().expect("flush");

        let mut parser = RawParser::new(SubstitutionTable::default());
        let domains = parser.parse_file(file.path()).expect("parse");
        (domains, parser.stats().clone())
    }

    #[test]
    fn substitutions_run_before_tokenization() {
        let (domains, _) = parse_lines("scam[.]example[.]com extra text\n");
        assert_eq!(domains, vec!["scam.example.com".to_string()]);
    }

    #[test]
    fn first_token_wins_and_casing_is_normalized() {
        let (domains, _) = parse_lines("New-Scam.ORG  some trailing note\n");
        assert_eq!(domains, vec!["new-scam.org".to_string()]);
    }

    #[test]
    fn comments_and_blanks_are_counted_not_fatal() {
        let (domains, stats) = parse_lines("# header\n\n! adblock note\nbad.com\n");
        assert_eq!(domains, vec!["bad.com".to_string()]);
        assert_eq!(stats.lines_read, 4);
        assert_eq!(stats.skipped_comment, 2);
        assert_eq!(stats.skipped_empty, 1);
        assert_eq!(stats.domains, 1);
    }

    #[test]
    fn tokens_without_a_dot_are_rejected() {
        let (domains, stats) = parse_lines("localhost\nbad.com\n");
        assert_eq!(domains, vec!["bad.com".to_string()]);
        assert_eq!(stats.skipped_invalid, 1);
    }

    #[test]
    fn urls_and_mail_addresses_are_rejected() {
        let (domains, stats) = parse_lines("evil.com/path\nuser@evil.com\nbad.com:8080\nok.net\n");
        assert_eq!(domains, vec!["ok.net".to_string()]);
        assert_eq!(stats.skipped_invalid, 3);
    }

    #[test]
    fn edge_punctuation_is_stripped() {
        let (domains, _) = parse_lines("\"evil.net\",\nweird.site.\n");
        assert_eq!(domains, vec!["evil.net".to_string(), "weird.site".to_string()]);
    }

    #[test]
    fn defanged_scheme_is_removed_by_default_table() {
        let (domains, _) = parse_lines("hxxp://weird[.]site\n");
        assert_eq!(domains, vec!["weird.site".to_string()]);
    }

    #[test]
    fn duplicates_are_preserved_in_file_order() {
        let (domains, _) = parse_lines("bad.com\nBAD.COM\n");
        assert_eq!(domains, vec!["bad.com".to_string(), "bad.com".to_string()]);
    }

    #[test]
    fn unreadable_input_is_fatal() {
        let mut parser = RawParser::new(SubstitutionTable::default());
        assert!(parser.parse_file(Path::new("/nonexistent/raw.txt")).is_err());
    }

    #[test]
    fn domain_shape_check() {
        assert!(domain_shaped("bad.com"));
        assert!(domain_shaped("*.wildcard.example"));
        assert!(!domain_shaped(""));
        assert!(!domain_shaped("nodot"));
        assert!(!domain_shaped("a b.com"));
        assert!(!domain_shaped("evil.com/x"));
    }
}
