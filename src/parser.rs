use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PslError, Result};
use crate::types::{Rule, RuleKind, Section};

/// Regex pattern for PSL section markers
/// Format: // ===BEGIN ICANN DOMAINS===
static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^//\s*===\s*(BEGIN|END)\s+(ICANN|PRIVATE)\s+DOMAINS\s*===")
        .expect("SECTION_MARKER: hardcoded regex is invalid")
});

const WILDCARD_PREFIX: &str = "*.";
const EXCEPTION_PREFIX: char = '!';

/// Section marker found on a comment line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Begin(Section),
    End(Section),
}

fn parse_marker(line: &str) -> Option<Marker> {
    let captures = SECTION_MARKER.captures(line)?;
    let section = match captures.get(2)?.as_str() {
        "ICANN" => Section::Icann,
        _ => Section::Private,
    };
    match captures.get(1)?.as_str() {
        "BEGIN" => Some(Marker::Begin(section)),
        _ => Some(Marker::End(section)),
    }
}

/// Parse a Public Suffix List from text.
///
/// Rules outside any `BEGIN`/`END` pair are assigned to the ICANN section.
/// Duplicate rules are dropped, keeping the first occurrence.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    let mut seen: HashSet<(Vec<String>, RuleKind)> = HashSet::new();
    let mut open: Option<(Section, usize)> = None;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with("//") {
            match (parse_marker(line), open) {
                (Some(Marker::Begin(section)), None) => open = Some((section, line_num)),
                (Some(Marker::Begin(_)), Some((_, begin_line))) => {
                    return Err(PslError::ParseErrorAtLine {
                        line: line_num,
                        message: format!(
                            "BEGIN marker inside section opened at line {}",
                            begin_line
                        ),
                    })
                }
                (Some(Marker::End(section)), Some((current, _))) if section == current => {
                    open = None
                }
                (Some(Marker::End(_)), _) => {
                    return Err(PslError::ParseErrorAtLine {
                        line: line_num,
                        message: "END marker without matching BEGIN".to_string(),
                    })
                }
                (None, _) => {}
            }
            continue;
        }

        // Only the first whitespace-delimited token is the rule
        let token = line.split_whitespace().next().unwrap_or(line);
        let section = open.map(|(section, _)| section).unwrap_or(Section::Icann);

        let rule = Rule::parse(token, section).map_err(|e| PslError::ParseErrorAtLine {
            line: line_num,
            message: e.to_string(),
        })?;

        if !seen.insert((rule.labels.clone(), rule.kind)) {
            debug!("Skipping duplicate rule '{}' at line {}", rule, line_num);
            continue;
        }
        rules.push(rule);
    }

    if let Some((_, begin_line)) = open {
        return Err(PslError::ParseErrorAtLine {
            line: begin_line,
            message: "section is never closed".to_string(),
        });
    }

    Ok(rules)
}

/// Parse a Public Suffix List from a file.
pub fn parse_rules_from_file(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        PslError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to read rules file '{}': {}", path.display(), e),
        ))
    })?;
    parse_rules(&text)
}

impl Rule {
    /// Parse a single rule such as `co.uk`, `*.ck` or `!www.ck`.
    pub fn parse(text: &str, section: Section) -> Result<Rule> {
        let lowered = text.trim().to_lowercase();
        let text = lowered.strip_suffix('.').unwrap_or(lowered.as_str());

        let (kind, body) = if let Some(rest) = text.strip_prefix(EXCEPTION_PREFIX) {
            (RuleKind::Exception, rest)
        } else if let Some(rest) = text.strip_prefix(WILDCARD_PREFIX) {
            (RuleKind::Wildcard, rest)
        } else {
            (RuleKind::Normal, text)
        };

        if body.is_empty() {
            return Err(PslError::InvalidRule(format!("'{}' has no labels", text)));
        }

        let labels: Vec<String> = body.split('.').map(str::to_string).collect();

        if labels.iter().any(|l| l.is_empty()) {
            return Err(PslError::InvalidRule(format!(
                "'{}' contains an empty label",
                text
            )));
        }
        if labels.iter().any(|l| l.contains('*')) {
            return Err(PslError::InvalidRule(format!(
                "'{}' uses '*' outside the leftmost label",
                text
            )));
        }
        if labels.iter().any(|l| l.contains(EXCEPTION_PREFIX)) {
            return Err(PslError::InvalidRule(format!(
                "'{}' uses '!' outside the rule prefix",
                text
            )));
        }
        if kind == RuleKind::Exception && labels.len() < 2 {
            return Err(PslError::InvalidRule(format!(
                "exception '{}' must have at least two labels",
                text
            )));
        }

        Ok(Rule {
            labels,
            kind,
            section,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_marker_regex_compiles() {
        assert!(SECTION_MARKER.is_match("// ===BEGIN ICANN DOMAINS==="));
    }

    #[test]
    fn test_parse_marker() {
        assert_eq!(
            parse_marker("// ===BEGIN ICANN DOMAINS==="),
            Some(Marker::Begin(Section::Icann))
        );
        assert_eq!(
            parse_marker("// ===END PRIVATE DOMAINS==="),
            Some(Marker::End(Section::Private))
        );
        assert_eq!(parse_marker("// ac : https://en.wikipedia.org/wiki/.ac"), None);
    }

    #[test]
    fn test_parse_simple_rules() {
        let rules = parse_rules("com\nco.uk\n").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].labels, vec!["com"]);
        assert_eq!(rules[1].labels, vec!["co", "uk"]);
        assert_eq!(rules[1].kind, RuleKind::Normal);
        assert_eq!(rules[1].section, Section::Icann);
    }

    #[test]
    fn test_parse_wildcard_and_exception() {
        let rules = parse_rules("*.ck\n!www.ck").unwrap();
        assert_eq!(rules[0].kind, RuleKind::Wildcard);
        assert_eq!(rules[0].labels, vec!["ck"]);
        assert_eq!(rules[1].kind, RuleKind::Exception);
        assert_eq!(rules[1].labels, vec!["www", "ck"]);
    }

    #[test]
    fn test_parse_sections() {
        let text = r#"
// ===BEGIN ICANN DOMAINS===
// com : https://en.wikipedia.org/wiki/.com
com
// ===END ICANN DOMAINS===
// ===BEGIN PRIVATE DOMAINS===
// GitHub, Inc.
github.io
// ===END PRIVATE DOMAINS===
"#;
        let rules = parse_rules(text).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].section, Section::Icann);
        assert_eq!(rules[1].section, Section::Private);
    }

    #[test]
    fn test_parse_first_token_only() {
        let rules = parse_rules("co.uk   some trailing text").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].labels, vec!["co", "uk"]);
    }

    #[test]
    fn test_parse_lowercases_and_strips_trailing_dot() {
        let rules = parse_rules("CO.UK.").unwrap();
        assert_eq!(rules[0].labels, vec!["co", "uk"]);
    }

    #[test]
    fn test_parse_deduplicates() {
        let text = "// ===BEGIN ICANN DOMAINS===\ncom\n// ===END ICANN DOMAINS===\n\
                    // ===BEGIN PRIVATE DOMAINS===\ncom\n// ===END PRIVATE DOMAINS===";
        let rules = parse_rules(text).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].section, Section::Icann);
    }

    #[test]
    fn test_parse_rejects_nested_begin() {
        let text = "// ===BEGIN ICANN DOMAINS===\n// ===BEGIN PRIVATE DOMAINS===";
        match parse_rules(text) {
            Err(PslError::ParseErrorAtLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected ParseErrorAtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unmatched_end() {
        let text = "com\n// ===END ICANN DOMAINS===";
        assert!(parse_rules(text).is_err());

        let text = "// ===BEGIN ICANN DOMAINS===\n// ===END PRIVATE DOMAINS===";
        assert!(parse_rules(text).is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_section() {
        let text = "// ===BEGIN PRIVATE DOMAINS===\ngithub.io";
        match parse_rules(text) {
            Err(PslError::ParseErrorAtLine { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected ParseErrorAtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reports_bad_rule_line() {
        let text = "com\n\nfoo..bar";
        match parse_rules(text) {
            Err(PslError::ParseErrorAtLine { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("empty label"), "got: {}", message);
            }
            other => panic!("expected ParseErrorAtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_rule_parse_rejects_malformed() {
        for bad in ["*", "!", "!com", "foo.*.bar", "!*.foo", "*.*.foo", ".com", ""] {
            assert!(
                Rule::parse(bad, Section::Icann).is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_comments_only() {
        let rules = parse_rules("// just a comment\n// another").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = parse_rules_from_file("/nonexistent/public_suffix_list.dat");
        assert!(matches!(result, Err(PslError::IoError(_))));
    }

    #[test]
    fn test_parse_from_file() {
        use std::io::Write;
        let dir = std::env::temp_dir().join("psl_engine_parser_test");
        let _ = fs::create_dir_all(&dir);
        let file_path = dir.join("list.dat");
        let mut f = fs::File::create(&file_path).unwrap();
        writeln!(f, "// ===BEGIN ICANN DOMAINS===").unwrap();
        writeln!(f, "uk").unwrap();
        writeln!(f, "co.uk").unwrap();
        writeln!(f, "// ===END ICANN DOMAINS===").unwrap();
        drop(f);

        let rules = parse_rules_from_file(&file_path).unwrap();
        assert_eq!(rules.len(), 2);

        let _ = fs::remove_file(&file_path);
        let _ = fs::remove_dir(&dir);
    }
}
