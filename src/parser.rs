use std::iter::Peekable;
use std::str::Lines;

use crate::error::ParseError;
use crate::section::{Entry, Section};

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Peekable<Lines<'a>>,
    /// 1-based number of the last line read.
    line: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().peekable(),
            line: 0,
        }
    }

    pub fn into_sections(mut self) -> Result<Vec<Section>, ParseError> {
        let mut sections = Vec::<Section>::with_capacity(16);

        while let Some(raw) = self.next_line() {
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = self.parse_section_name(header)?;
                sections.push(Section::new(name));
                continue;
            }

            let Some(section) = sections.last_mut() else {
                // Leading comments (e.g. a copyright banner) are allowed; anything else is not.
                if trimmed.starts_with(';') {
                    continue;
                }
                return Err(ParseError::ContentOutsideSection { line: self.line });
            };

            if let Some(comment) = trimmed.strip_prefix(';') {
                section.push(Entry::Comment(comment.to_owned()));
                continue;
            }

            let line = self.read_entry(trimmed);
            if !line.is_empty() {
                section.push(parse_section_entry(&line));
            }
        }

        Ok(sections)
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line)
    }

    /// Validate the remainder of a header line, `header` being everything after the `[`.
    fn parse_section_name(&self, header: &str) -> Result<String, ParseError> {
        let line = self.line;
        let Some(end) = header.find(']') else {
            return Err(ParseError::UnterminatedSectionName { line });
        };

        let section_name = header[..end].trim();

        if section_name.is_empty() {
            return Err(ParseError::SectionNameEmpty { line });
        } else if section_name.chars().count() > 255 {
            return Err(ParseError::SectionNameTooLong { line });
        }

        // Only whitespace or a comment may follow the closing bracket.
        let rest = header[end + 1..].trim_start();
        match rest.chars().next() {
            None | Some(';') => Ok(section_name.to_owned()),
            Some(c) => Err(ParseError::UnexpectedCharacter { line, c }),
        }
    }

    /// Read an entry starting at `first`, flattening Line Continuators (\) and stripping inline
    /// comments.
    fn read_entry(&mut self, first: &'a str) -> String {
        let mut line = String::with_capacity(first.len());
        let mut within_quotes = false;
        let mut current = first;

        loop {
            let stripped = strip_inline_comment(current, &mut within_quotes);

            // If the line ends with a Line Continuator, strip it and continue to next line. A
            // section header is never joined, so the backslash stays part of the value.
            let continues = self
                .lines
                .peek()
                .is_some_and(|next| !next.trim_start().starts_with('['));
            match stripped.strip_suffix('\\') {
                Some(s) if continues => {
                    line.push_str(s.trim_end());
                    current = self.next_line().map_or("", str::trim);
                }
                _ => {
                    line.push_str(stripped);
                    break;
                }
            }
        }

        line
    }
}

fn strip_inline_comment<'s>(line: &'s str, within_quotes: &mut bool) -> &'s str {
    for (i, c) in line.char_indices() {
        match c {
            '"' => *within_quotes = !*within_quotes,
            ';' if !*within_quotes => return line[..i].trim_end(),
            _ => {}
        }
    }

    line.trim_end()
}

/// Splits a line at its first unquoted `=`. Lines without one become a key with an empty value.
fn parse_section_entry(line: &str) -> Entry {
    debug_assert!(!line.is_empty());
    debug_assert!(!line.contains(['\r', '\n']));

    let mut within_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' => within_quotes = !within_quotes,
            '=' if !within_quotes => {
                let key = line[..i].trim().to_owned();
                let value = line[i + 1..].trim().to_owned();
                return Entry::Item(key, value);
            }
            _ => {}
        }
    }

    Entry::Item(line.trim().to_owned(), String::new())
}
