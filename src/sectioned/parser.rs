//! Sectioned text parser.
//!
//! Rules:
//! - blank lines are skipped and end a multi-line value; a whitespace-only
//!   line inside a value is an empty line of that value
//! - keys are lowercased; section names keep their case
//! - `#` and `;` start full-line comments
//! - `[name]` opens a section; a name may appear once per source
//! - `key = value` or `key: value`, split on the first delimiter
//! - an indented line right after an entry continues its value

use super::{SectionedDocument, DEFAULT_SECTION};

/// Sectioned text parse errors. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionedError {
    #[error("line {line}: entry before any section header")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: malformed section header")]
    BadHeader { line: usize },

    #[error("line {line}: section [{name}] already defined")]
    DuplicateSection { line: usize, name: String },

    #[error("line {line}: key '{key}' already set in section [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    #[error("line {line}: expected 'key = value'")]
    MissingDelimiter { line: usize },

    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
}

impl SectionedError {
    pub fn line(&self) -> usize {
        match self {
            SectionedError::MissingSectionHeader { line }
            | SectionedError::BadHeader { line }
            | SectionedError::DuplicateSection { line, .. }
            | SectionedError::DuplicateKey { line, .. }
            | SectionedError::MissingDelimiter { line }
            | SectionedError::EmptyKey { line } => *line,
        }
    }
}

/// Where entries currently go.
enum Target {
    None,
    Defaults,
    Section(usize),
}

/// Parse sectioned text.
pub fn parse(text: &str) -> Result<SectionedDocument, SectionedError> {
    let mut doc = SectionedDocument::new();
    let mut target = Target::None;
    let mut seen_defaults = false;
    // Index of the entry an indented line would continue.
    let mut open_entry: Option<usize> = None;
    // Whitespace-only lines seen since the last line of the open value.
    let mut pending_blank = 0;

    for (idx, raw) in text.split('\n').enumerate() {
        let line_no = idx + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if open_entry.is_some() && !raw.is_empty() {
                // Whitespace-only line inside a value: kept if more follows.
                pending_blank += 1;
            } else {
                open_entry = None;
                pending_blank = 0;
            }
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = raw.starts_with(' ') || raw.starts_with('\t');
        if indented {
            if let Some(entry_idx) = open_entry {
                let entries = entries_mut(&mut doc, &target);
                if let Some((_, value)) = entries.and_then(|e| e.get_mut(entry_idx)) {
                    for _ in 0..pending_blank {
                        value.push('\n');
                    }
                    value.push('\n');
                    value.push_str(trimmed);
                }
                pending_blank = 0;
                continue;
            }
        }
        pending_blank = 0;

        if trimmed.starts_with('[') {
            let name = trimmed
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(SectionedError::BadHeader { line: line_no })?;

            open_entry = None;
            if name == DEFAULT_SECTION {
                if seen_defaults {
                    return Err(SectionedError::DuplicateSection {
                        line: line_no,
                        name: name.to_string(),
                    });
                }
                seen_defaults = true;
                target = Target::Defaults;
            } else {
                if doc.section(name).is_some() {
                    return Err(SectionedError::DuplicateSection {
                        line: line_no,
                        name: name.to_string(),
                    });
                }
                doc.section_mut(name);
                target = Target::Section(doc.sections.len() - 1);
            }
            continue;
        }

        let (key, value) = split_entry(trimmed, line_no)?;
        let key = key.to_lowercase();
        let section_name = match &target {
            Target::None => return Err(SectionedError::MissingSectionHeader { line: line_no }),
            Target::Defaults => DEFAULT_SECTION.to_string(),
            Target::Section(i) => doc.sections[*i].name.clone(),
        };
        let Some(entries) = entries_mut(&mut doc, &target) else {
            return Err(SectionedError::MissingSectionHeader { line: line_no });
        };
        if entries.iter().any(|(k, _)| *k == key) {
            return Err(SectionedError::DuplicateKey {
                line: line_no,
                section: section_name,
                key,
            });
        }
        entries.push((key, value.to_string()));
        open_entry = Some(entries.len() - 1);
    }

    Ok(doc)
}

fn entries_mut<'a>(
    doc: &'a mut SectionedDocument,
    target: &Target,
) -> Option<&'a mut Vec<(String, String)>> {
    match target {
        Target::None => None,
        Target::Defaults => Some(&mut doc.defaults),
        Target::Section(i) => doc.sections.get_mut(*i).map(|s| &mut s.entries),
    }
}

fn split_entry(line: &str, line_no: usize) -> Result<(&str, &str), SectionedError> {
    let pos = line
        .find(['=', ':'])
        .ok_or(SectionedError::MissingDelimiter { line: line_no })?;
    let key = line[..pos].trim();
    let value = line[pos + 1..].trim();
    if key.is_empty() {
        return Err(SectionedError::EmptyKey { line: line_no });
    }
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let doc = parse(
            "[META]\ntitle = Cloak\n\n[room1]\ntype = room\nname: Hallway\n",
        )
        .unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.section("META").unwrap().get("title"), Some("Cloak"));
        let room = doc.section("room1").unwrap();
        assert_eq!(room.get("type"), Some("room"));
        assert_eq!(room.get("name"), Some("Hallway"));
    }

    #[test]
    fn test_first_delimiter_wins() {
        let doc = parse("[door]\nlock = state=open\nnote = see: here\n").unwrap();
        let door = doc.section("door").unwrap();
        assert_eq!(door.get("lock"), Some("state=open"));
        assert_eq!(door.get("note"), Some("see: here"));
    }

    #[test]
    fn test_comments_and_crlf() {
        let doc = parse("# header\r\n[a]\r\n; note\r\nx = 1\r\n").unwrap();
        assert_eq!(doc.section("a").unwrap().get("x"), Some("1"));
    }

    #[test]
    fn test_empty_value() {
        let doc = parse("[CONFIG]\nbanner =\n").unwrap();
        assert_eq!(doc.section("CONFIG").unwrap().get("banner"), Some(""));
    }

    #[test]
    fn test_continuation_lines() {
        let doc = parse("[hall]\ndescription = A long\n\thall with\n    many doors.\nname = Hall\n")
            .unwrap();
        let hall = doc.section("hall").unwrap();
        assert_eq!(
            hall.get("description"),
            Some("A long\nhall with\nmany doors.")
        );
        assert_eq!(hall.get("name"), Some("Hall"));
    }

    #[test]
    fn test_blank_line_ends_continuation() {
        let doc = parse("[hall]\ndescription = One\n\n  name = Hall\n").unwrap();
        let hall = doc.section("hall").unwrap();
        assert_eq!(hall.get("description"), Some("One"));
        assert_eq!(hall.get("name"), Some("Hall"));
    }

    #[test]
    fn test_keys_are_lowercased() {
        let doc = parse("[Rock]\nType = thing\nLocation = nowhere\n").unwrap();
        let rock = doc.section("Rock").unwrap();
        assert_eq!(rock.get("type"), Some("thing"));
        assert_eq!(rock.get("location"), Some("nowhere"));
        assert!(doc.section("rock").is_none());

        let err = parse("[x]\nname = a\nNAME = b\n").unwrap_err();
        assert!(matches!(err, SectionedError::DuplicateKey { line: 3, .. }));
    }

    #[test]
    fn test_whitespace_only_line_inside_value() {
        let doc = parse("[hall]\ndescription = P1.\n\t\n\tP2.\nname = Hall\n").unwrap();
        let hall = doc.section("hall").unwrap();
        assert_eq!(hall.get("description"), Some("P1.\n\nP2."));
        assert_eq!(hall.get("name"), Some("Hall"));
    }

    #[test]
    fn test_trailing_whitespace_lines_dropped() {
        let doc = parse("[hall]\ndescription = P1.\n\t\n  \n\n[x]\n").unwrap();
        assert_eq!(doc.section("hall").unwrap().get("description"), Some("P1."));
    }

    #[test]
    fn test_values_are_trimmed() {
        let doc = parse("[limbo]\nname =   Limbo  \n").unwrap();
        assert_eq!(doc.section("limbo").unwrap().get("name"), Some("Limbo"));
    }

    #[test]
    fn test_default_section() {
        let doc = parse("[DEFAULT]\ntype = thing\n[rock]\nname = Rock\n").unwrap();
        assert_eq!(doc.defaults, vec![("type".to_string(), "thing".to_string())]);
        assert!(doc.section("DEFAULT").is_none());
    }

    #[test]
    fn test_entry_before_section() {
        assert_eq!(
            parse("x = 1\n[a]\n"),
            Err(SectionedError::MissingSectionHeader { line: 1 })
        );
    }

    #[test]
    fn test_duplicate_section() {
        let err = parse("[a]\nx = 1\n[b]\n[a]\n").unwrap_err();
        assert_eq!(
            err,
            SectionedError::DuplicateSection {
                line: 4,
                name: "a".to_string()
            }
        );
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn test_duplicate_key() {
        let err = parse("[a]\nx = 1\nx = 2\n").unwrap_err();
        assert!(matches!(err, SectionedError::DuplicateKey { line: 3, .. }));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse("[a]\njust words\n"),
            Err(SectionedError::MissingDelimiter { line: 2 })
        );
        assert_eq!(parse("[a]\n= 1\n"), Err(SectionedError::EmptyKey { line: 2 }));
        assert_eq!(parse("[a\n"), Err(SectionedError::BadHeader { line: 1 }));
        assert_eq!(parse("[ ]\n"), Err(SectionedError::BadHeader { line: 1 }));
    }
}
