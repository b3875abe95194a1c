//! Delimited record reader.
//!
//! Excel-style quoting: `"` quotes a field and is doubled inside one. Quoted
//! fields may span lines. Spaces at the start of a field are skipped, and
//! stray characters after a closing quote are kept. The delimiter may be any
//! non-empty string.

const QUOTE: char = '"';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartRecord,
    StartField,
    InField,
    InQuoted,
    QuoteInQuoted,
}

/// Iterator over the records of `text`. A blank line yields an empty record.
pub struct DelimitedReader<'a> {
    rest: &'a str,
    delimiter: &'a str,
}

impl<'a> DelimitedReader<'a> {
    pub fn new(text: &'a str, delimiter: &'a str) -> Self {
        Self {
            rest: text,
            delimiter,
        }
    }

    fn at_delimiter(&self, tail: &str) -> bool {
        !self.delimiter.is_empty() && tail.starts_with(self.delimiter)
    }
}

/// Byte offset just past the line terminator starting at `pos`.
fn skip_terminator(text: &str, pos: usize) -> usize {
    if text[pos..].starts_with("\r\n") {
        pos + 2
    } else {
        pos + 1
    }
}

impl Iterator for DelimitedReader<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.rest;
        if text.is_empty() {
            return None;
        }

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = State::StartRecord;
        let mut pos = 0;

        while let Some(c) = text[pos..].chars().next() {
            let newline = c == '\n' || c == '\r';
            match state {
                State::InQuoted => {
                    if c == QUOTE {
                        state = State::QuoteInQuoted;
                    } else {
                        field.push(c);
                    }
                }
                State::StartRecord | State::StartField if newline => {
                    if state == State::StartField {
                        fields.push(std::mem::take(&mut field));
                    }
                    self.rest = &text[skip_terminator(text, pos)..];
                    return Some(fields);
                }
                State::InField | State::QuoteInQuoted if newline => {
                    fields.push(std::mem::take(&mut field));
                    self.rest = &text[skip_terminator(text, pos)..];
                    return Some(fields);
                }
                State::StartRecord | State::StartField => {
                    if c == QUOTE {
                        state = State::InQuoted;
                    } else if c == ' ' {
                        state = State::StartField;
                    } else if self.at_delimiter(&text[pos..]) {
                        fields.push(std::mem::take(&mut field));
                        state = State::StartField;
                        pos += self.delimiter.len();
                        continue;
                    } else {
                        field.push(c);
                        state = State::InField;
                    }
                }
                State::InField => {
                    if self.at_delimiter(&text[pos..]) {
                        fields.push(std::mem::take(&mut field));
                        state = State::StartField;
                        pos += self.delimiter.len();
                        continue;
                    }
                    field.push(c);
                }
                State::QuoteInQuoted => {
                    if c == QUOTE {
                        field.push(QUOTE);
                        state = State::InQuoted;
                    } else if self.at_delimiter(&text[pos..]) {
                        fields.push(std::mem::take(&mut field));
                        state = State::StartField;
                        pos += self.delimiter.len();
                        continue;
                    } else {
                        field.push(c);
                        state = State::InField;
                    }
                }
            }
            pos += c.len_utf8();
        }

        self.rest = "";
        if state != State::StartRecord {
            fields.push(field);
        }
        Some(fields)
    }
}
