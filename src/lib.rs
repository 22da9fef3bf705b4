#![allow(clippy::module_inception)]

use std::{fmt::Write, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// Byte offset into a source file, paired with the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    /// Span covering both `self` and `other`, assuming `self` starts first.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Finds the line holding the byte offset `position`.
///
/// Returns the 1-based line number, the line's text and the offset of
/// `position` inside that line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Errors at end of input point just past the last character.
    if pos == source.len() {
        let last = source.split_inclusive('\n').last().unwrap_or("");
        let line_number = source.split_inclusive('\n').count().max(1);
        return Some((line_number, last.to_string(), last.trim_end_matches('\n').len()));
    }

    None
}

/// Formats a caret diagnostic for `error` against the text it was found in.
///
/// ```text
/// Error: TypeMismatch (incompatible initializer type ...)
/// -> main.si
///    |
/// 20 | var a: Int = "x"
///    | -------------^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let _ = writeln!(out, "-> {}", position.1);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    const SOURCE: &str = "Hello, world!\nvar x: Int = 1\n\n    Testing { }\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 42).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "    Testing { }\n");
        assert_eq!(line_pos, 12);
    }

    #[test]
    fn test_get_line_past_end() {
        assert!(super::get_line_at_position(SOURCE, 500).is_none());
        let (line_number, _, _) = super::get_line_at_position("abc", 3).unwrap();
        assert_eq!(line_number, 1);
    }

    #[test]
    fn test_render_error_points_at_column() {
        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: String::from("#"),
            },
            Position(27, Rc::new(String::from("main.si"))),
        );

        let rendered = super::render_error(&error, SOURCE);
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Error: UnrecognisedToken");
        assert_eq!(lines[1], "-> main.si");
        assert_eq!(lines[3], "2 | var x: Int = 1");
        assert_eq!(lines[4], "  | -------------^");
    }
}
