//! Parse INI-style store text into sections of ordered key/value items.

use super::{Section, Store, StoreError};

/// Name of the section whose keys every other section inherits.
pub(crate) const DEFAULT_SECTION: &str = "DEFAULT";

/// Where the next continuation line should be appended.
enum Cursor {
    None,
    Defaults(usize),
    Section(usize, usize),
}

/// Parse store text. `origin` is only used in error messages.
pub(crate) fn parse_store(text: &str, origin: &str) -> Result<Store, StoreError> {
    let mut store = Store::default();
    // Index into store.sections, or None while inside [DEFAULT].
    let mut current: Option<Option<usize>> = None;
    let mut cursor = Cursor::None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            cursor = Cursor::None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = trimmed.len() < line.len();
        if indented {
            let target = match cursor {
                Cursor::Defaults(i) => store.defaults.get_mut(i),
                Cursor::Section(s, i) => store.sections.get_mut(s).and_then(|s| s.items.get_mut(i)),
                Cursor::None => None,
            };
            if let Some((_, value)) = target {
                value.push('\n');
                value.push_str(trimmed);
                continue;
            }
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let Some(end) = rest.rfind(']') else {
                return Err(syntax(origin, line_no, "unterminated section header"));
            };
            let name = &rest[..end];
            if name.is_empty() {
                return Err(syntax(origin, line_no, "empty section name"));
            }
            cursor = Cursor::None;
            if name == DEFAULT_SECTION {
                current = Some(None);
                continue;
            }
            let existing = store.sections.iter().position(|s| s.name == name);
            let index = match existing {
                Some(i) => i,
                None => {
                    store.sections.push(Section {
                        name: name.to_string(),
                        items: Vec::new(),
                    });
                    store.sections.len() - 1
                }
            };
            current = Some(Some(index));
            continue;
        }

        let Some(section) = current else {
            return Err(syntax(origin, line_no, "key/value line before any section header"));
        };
        let Some((key, value)) = split_option(trimmed) else {
            return Err(syntax(origin, line_no, "expected `key = value`"));
        };

        match section {
            None => {
                let i = upsert(&mut store.defaults, key, value);
                cursor = Cursor::Defaults(i);
            }
            Some(s) => {
                let Some(sec) = store.sections.get_mut(s) else {
                    continue;
                };
                let i = upsert(&mut sec.items, key, value);
                cursor = Cursor::Section(s, i);
            }
        }
    }

    Ok(store)
}

/// Split on the first `=` or `:`; the key must be non-empty.
fn split_option(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

/// Insert or replace `key`, keeping the first position. Returns the item index.
fn upsert(items: &mut Vec<(String, String)>, key: &str, value: &str) -> usize {
    if let Some(i) = items.iter().position(|(k, _)| k == key) {
        items[i].1 = value.to_string();
        return i;
    }
    items.push((key.to_string(), value.to_string()));
    items.len() - 1
}

fn syntax(origin: &str, line: usize, message: &str) -> StoreError {
    StoreError::Syntax {
        origin: origin.to_string(),
        line,
        message: message.to_string(),
    }
}
