//! # Jack Tokenizer
//!
//! A single-pass scanner over Jack source, driven by a small state machine:
//! Start, Ident, Int, Str, LineComment, BlockComment. Whitespace is skipped,
//! both comment forms are consumed, identifiers are promoted to keywords by
//! table lookup, and string constants lose their enclosing quotes.
//!
//! Scanning recovers and keeps going after a lexical fault (a bad character
//! or a string cut off by a newline), but the first fault is remembered and
//! reported at the end, so the file as a whole still fails.

use crate::error::CompileError;
use phf::phf_map;
use serde::Serialize;

/// The 21 reserved words of the Jack language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "class" => Keyword::Class,
    "constructor" => Keyword::Constructor,
    "function" => Keyword::Function,
    "method" => Keyword::Method,
    "field" => Keyword::Field,
    "static" => Keyword::Static,
    "var" => Keyword::Var,
    "int" => Keyword::Int,
    "char" => Keyword::Char,
    "boolean" => Keyword::Boolean,
    "void" => Keyword::Void,
    "true" => Keyword::True,
    "false" => Keyword::False,
    "null" => Keyword::Null,
    "this" => Keyword::This,
    "let" => Keyword::Let,
    "do" => Keyword::Do,
    "if" => Keyword::If,
    "else" => Keyword::Else,
    "while" => Keyword::While,
    "return" => Keyword::Return,
};

/// Single printable characters the grammar treats as symbols.
const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(char),
    Identifier,
    IntConst,
    StringConst,
    Eof,
}

/// One scanned token, owning its original lexeme. `offset` is the byte
/// offset of the lexeme's first character, used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }
}

/// Scans a complete Jack source into an ordered token sequence, terminated
/// by an `Eof` sentinel.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut first_error: Option<CompileError> = None;
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let mut lexeme = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    lexeme.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let kind = match KEYWORDS.get(lexeme.as_str()) {
                Some(&keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Identifier,
            };
            tokens.push(Token::new(kind, lexeme, start));
        } else if ch.is_ascii_digit() {
            let mut lexeme = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() {
                    lexeme.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::new(TokenKind::IntConst, lexeme, start));
        } else if ch == '"' {
            chars.next();
            if let Some(lexeme) = scan_string(&mut chars, start, &mut first_error) {
                tokens.push(Token::new(TokenKind::StringConst, lexeme, start));
            }
        } else if ch == '/' {
            chars.next();
            match chars.peek().map(|&(_, c)| c) {
                Some('/') => {
                    for (_, c) in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    if !skip_block_comment(&mut chars) && first_error.is_none() {
                        first_error =
                            Some(CompileError::lexer(start, "unterminated block comment"));
                    }
                }
                _ => tokens.push(Token::new(TokenKind::Symbol('/'), "/", start)),
            }
        } else if SYMBOLS.contains(ch) {
            chars.next();
            tokens.push(Token::new(TokenKind::Symbol(ch), ch.to_string(), start));
        } else {
            chars.next();
            if first_error.is_none() {
                first_error = Some(CompileError::lexer(
                    start,
                    format!("unexpected character '{ch}'"),
                ));
            }
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }
    let end = source.len();
    tokens.push(Token::new(TokenKind::Eof, "", end));
    Ok(tokens)
}

/// Consumes a string constant after the opening quote. A newline before the
/// closing quote is a lexical error; scanning resumes on the next line.
fn scan_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
    first_error: &mut Option<CompileError>,
) -> Option<String> {
    let mut lexeme = String::new();
    for (_, c) in chars.by_ref() {
        match c {
            '"' => return Some(lexeme),
            '\n' => {
                if first_error.is_none() {
                    *first_error =
                        Some(CompileError::lexer(start, "unterminated string constant"));
                }
                return None;
            }
            _ => lexeme.push(c),
        }
    }
    if first_error.is_none() {
        *first_error = Some(CompileError::lexer(start, "unterminated string constant"));
    }
    None
}

/// Consumes a `/* ... */` comment. Returns false when the closing marker is
/// missing.
fn skip_block_comment(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> bool {
    while let Some((_, c)) = chars.next() {
        if c == '*' && chars.peek().map(|&(_, n)| n) == Some('/') {
            chars.next();
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_are_promoted_from_identifiers() {
        let tokens = tokenize("class Main classy").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Class));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "Main");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].lexeme, "classy");
    }

    #[test]
    fn symbols_and_integers() {
        assert_eq!(
            kinds("let x = 42;"),
            vec![
                TokenKind::Keyword(Keyword::Let),
                TokenKind::Identifier,
                TokenKind::Symbol('='),
                TokenKind::IntConst,
                TokenKind::Symbol(';'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_constants_lose_their_quotes() {
        let tokens = tokenize("\"hello world\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringConst);
        assert_eq!(tokens[0].lexeme, "hello world");
    }

    #[test]
    fn comments_are_skipped() {
        let source = "// line\nlet /* block\nspanning */ x = 1; /** doc */";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Let));
        assert_eq!(tokens.len(), 6); // let x = 1 ; Eof
    }

    #[test]
    fn slash_is_still_a_symbol() {
        let tokens = tokenize("a / b").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Symbol('/'));
    }

    #[test]
    fn eof_sentinel_is_always_last() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_string_is_reported_but_scanning_continues() {
        let err = tokenize("let s = \"oops\nlet t = 1;").unwrap_err();
        match err {
            CompileError::Lex { message, .. } => {
                assert!(message.contains("unterminated string"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(tokenize("let x = 1; /* dangling").is_err());
    }

    #[test]
    fn bad_character_is_an_error() {
        assert!(tokenize("let x = #;").is_err());
    }

    #[test]
    fn offsets_point_at_the_lexeme() {
        let tokens = tokenize("do run();").unwrap();
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 3);
        assert_eq!(tokens[1].lexeme, "run");
    }
}
