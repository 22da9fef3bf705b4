use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Receives the text matched at the current position and is responsible
/// for advancing the lexer past it.
pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            // Every pattern is anchored so a match is always at the current position.
            regex: Regex::new(&format!("^(?:{})", pattern)).unwrap(),
            handler,
        }
    }
}

pub struct Lexer {
    patterns: Rc<Vec<RegexPattern>>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            patterns: Rc::new(vec![
                RegexPattern::new("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
                RegexPattern::new("[0-9]+(\\.[0-9]+)?", number_handler),
                // Semicolons are optional separators and lex as whitespace.
                RegexPattern::new("[\\s;]+", skip_handler),
                RegexPattern::new("\"([^\"\\\\]|\\\\.)*\"", string_handler),
                RegexPattern::new("//[^\\n]*", skip_handler),
                RegexPattern::new("(?s:/\\*.*?\\*/)", skip_handler),
                RegexPattern::new("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
                RegexPattern::new("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
                RegexPattern::new("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
                RegexPattern::new("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
                RegexPattern::new("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
                RegexPattern::new("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
                RegexPattern::new("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
                RegexPattern::new("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
                RegexPattern::new("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
                RegexPattern::new("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
                RegexPattern::new("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
                RegexPattern::new("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
                RegexPattern::new(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
                RegexPattern::new(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
                RegexPattern::new("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
                RegexPattern::new("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
                RegexPattern::new("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
                RegexPattern::new("\\$", MK_DEFAULT_HANDLER!(TokenKind::Dollar, "$")),
                RegexPattern::new(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
                RegexPattern::new(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
                RegexPattern::new("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
                RegexPattern::new("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
                RegexPattern::new("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
                RegexPattern::new("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
                RegexPattern::new("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
            ]),
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Span of the next `len` bytes from the current position.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, matched: &str) {
    let literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            // Unknown escapes keep the backslash.
            _ => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let span = lexer.span_of(matched.len());
    lexer.push(MK_TOKEN!(kind, String::from(matched), span));
    lexer.advance_n(matched.len());
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let patterns = Rc::clone(&lex.patterns);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            let Some(found) = pattern.regex.find(lex.remainder()) else {
                continue;
            };

            // Zero-width matches would never advance.
            if found.is_empty() {
                continue;
            }

            let text = found.as_str().to_string();
            (pattern.handler)(&mut lex, &text);
            matched = true;
            break;
        }

        if !matched {
            return Err(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: lex.at().to_string(),
                },
                Position(lex.pos as u32, Rc::clone(&lex.file)),
            ));
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    tracing::trace!(tokens = lex.tokens.len(), "tokenized {}", lex.file);
    Ok(lex.tokens)
}
