//! Hand-written, zero-copy lexer.
//!
//! The lexer makes one forward pass over the raw bytes. A [`Token`] is a
//! kind plus byte offsets and the 1-based line/column of its first byte;
//! it owns no text. Turning a token into text is a separate, explicit
//! step ([`Token::bytes`], [`Token::text`], [`Token::intern`]).
//!
//! Whitespace is dropped, but comments and blank lines are emitted as
//! tokens so the parser can keep them as trivia and tell trailing
//! comments from standalone ones. Lines are not tokens; the parser uses
//! the line and column recorded on each token instead.
//!
//! The lexer never fails: bytes it cannot classify (including invalid
//! UTF-8) become [`TokenKind::Illegal`] tokens and scanning continues.
//! The stream always ends with exactly one [`TokenKind::Eof`].

use std::borrow::Cow;
use std::fmt;

use beanfront_core::{InternedStr, Position, StringInterner};
use thiserror::Error;

use crate::span::Span;

/// Token types produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Literals =====
    /// `YYYY-MM-DD`.
    Date,
    /// `[-+]?digits(,ddd)*(.digits)?`.
    Number,
    /// Double-quoted string, quotes included; may be unterminated.
    String,
    /// `#tag`.
    Tag,
    /// `^link`.
    Link,
    /// Capitalised word containing `:`.
    Account,
    /// Any other word: currencies, `TRUE`/`FALSE`, metadata keys.
    Ident,

    // ===== Keywords =====
    /// `txn`.
    Txn,
    /// `balance`.
    Balance,
    /// `open`.
    Open,
    /// `close`.
    Close,
    /// `commodity`.
    Commodity,
    /// `pad`.
    Pad,
    /// `note`.
    Note,
    /// `document`.
    Document,
    /// `price`.
    Price,
    /// `event`.
    Event,
    /// `custom`.
    Custom,
    /// `option`.
    Option_,
    /// `include`.
    Include,
    /// `plugin`.
    Plugin,
    /// `pushtag`.
    Pushtag,
    /// `poptag`.
    Poptag,
    /// `pushmeta`.
    Pushmeta,
    /// `popmeta`.
    Popmeta,

    // ===== Punctuation =====
    /// `*`: cleared flag, merge cost, multiplication.
    Star,
    /// `!`: pending flag.
    Bang,
    /// `:`.
    Colon,
    /// `,`.
    Comma,
    /// `@`.
    At,
    /// `@@`.
    AtAt,
    /// `{`.
    LBrace,
    /// `}`.
    RBrace,
    /// `{{`.
    LDoubleBrace,
    /// `}}`.
    RDoubleBrace,
    /// `~`.
    Tilde,
    /// `(`.
    LParen,
    /// `)`.
    RParen,
    /// `+` not followed by a digit.
    Plus,
    /// `-` not followed by a digit.
    Minus,
    /// `/`.
    Slash,

    // ===== Structural =====
    /// `;` to end of line.
    Comment,
    /// A line holding nothing but whitespace.
    BlankLine,
    /// A byte that starts no valid token.
    Illegal,
    /// End of input.
    Eof,
}

const KEYWORDS: [(&[u8], TokenKind); 18] = [
    (b"txn", TokenKind::Txn),
    (b"balance", TokenKind::Balance),
    (b"open", TokenKind::Open),
    (b"close", TokenKind::Close),
    (b"commodity", TokenKind::Commodity),
    (b"pad", TokenKind::Pad),
    (b"note", TokenKind::Note),
    (b"document", TokenKind::Document),
    (b"price", TokenKind::Price),
    (b"event", TokenKind::Event),
    (b"custom", TokenKind::Custom),
    (b"option", TokenKind::Option_),
    (b"include", TokenKind::Include),
    (b"plugin", TokenKind::Plugin),
    (b"pushtag", TokenKind::Pushtag),
    (b"poptag", TokenKind::Poptag),
    (b"pushmeta", TokenKind::Pushmeta),
    (b"popmeta", TokenKind::Popmeta),
];

impl TokenKind {
    /// Look up a lowercase word in the keyword table.
    pub fn keyword(word: &[u8]) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    /// Returns true for the fixed keyword set.
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Txn
                | Self::Balance
                | Self::Open
                | Self::Close
                | Self::Commodity
                | Self::Pad
                | Self::Note
                | Self::Document
                | Self::Price
                | Self::Event
                | Self::Custom
                | Self::Option_
                | Self::Include
                | Self::Plugin
                | Self::Pushtag
                | Self::Poptag
                | Self::Pushmeta
                | Self::Popmeta
        )
    }

    /// Returns true if a posting can start with this token.
    pub const fn starts_posting(self) -> bool {
        matches!(self, Self::Star | Self::Bang | Self::Account)
    }

    /// Human-readable description used in diagnostics.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Number => "number",
            Self::String => "string",
            Self::Tag => "tag",
            Self::Link => "link",
            Self::Account => "account",
            Self::Ident => "identifier",
            Self::Txn => "'txn'",
            Self::Balance => "'balance'",
            Self::Open => "'open'",
            Self::Close => "'close'",
            Self::Commodity => "'commodity'",
            Self::Pad => "'pad'",
            Self::Note => "'note'",
            Self::Document => "'document'",
            Self::Price => "'price'",
            Self::Event => "'event'",
            Self::Custom => "'custom'",
            Self::Option_ => "'option'",
            Self::Include => "'include'",
            Self::Plugin => "'plugin'",
            Self::Pushtag => "'pushtag'",
            Self::Poptag => "'poptag'",
            Self::Pushmeta => "'pushmeta'",
            Self::Popmeta => "'popmeta'",
            Self::Star => "'*'",
            Self::Bang => "'!'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::At => "'@'",
            Self::AtAt => "'@@'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LDoubleBrace => "'{{'",
            Self::RDoubleBrace => "'}}'",
            Self::Tilde => "'~'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Slash => "'/'",
            Self::Comment => "comment",
            Self::BlankLine => "blank line",
            Self::Illegal => "illegal character",
            Self::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token: a kind and a view into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Token type.
    pub kind: TokenKind,
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// 1-based line of the first byte.
    pub line: usize,
    /// 1-based column (in characters) of the first byte.
    pub column: usize,
}

impl Token {
    /// Create a token.
    pub const fn new(kind: TokenKind, start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            kind,
            start,
            end,
            line,
            column,
        }
    }

    /// The byte range of this token.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Borrow the token's bytes.
    pub fn bytes<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        self.span().bytes(source)
    }

    /// Borrow the token's text; only invalid UTF-8 forces a (lossy) copy.
    pub fn text<'a>(&self, source: &'a [u8]) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes(source))
    }

    /// Copy the token's text into an owned string.
    pub fn to_owned_text(&self, source: &[u8]) -> String {
        self.text(source).into_owned()
    }

    /// Intern the token's text.
    pub fn intern(&self, source: &[u8], interner: &mut StringInterner) -> InternedStr {
        interner.intern(&self.text(source))
    }

    /// The column just past the token's last character.
    pub fn end_column(&self, source: &[u8]) -> usize {
        self.column + count_chars(self.bytes(source))
    }

    /// Returns true if `other` starts on the same line as this token.
    pub const fn same_line(&self, other: &Self) -> bool {
        self.line == other.line
    }
}

/// The first lexical problem found while scanning.
///
/// Reported for diagnostics only; scanning never stops at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A byte that is not part of a valid UTF-8 sequence.
    #[error("{position}: invalid UTF-8 byte 0x{byte:02x}")]
    InvalidUtf8 {
        /// Where the byte is.
        position: Position,
        /// The offending byte.
        byte: u8,
    },
    /// A character that starts no token.
    #[error("{position}: unexpected character '{found}'")]
    UnexpectedChar {
        /// Where the character is.
        position: Position,
        /// The offending character.
        found: char,
    },
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Single-pass tokenizer over a byte buffer.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    line: usize,
    column: usize,
    line_start: usize,
    line_has_token: bool,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a lexer at the start of `source`, past a UTF-8 byte order mark.
    pub fn new(source: &'src [u8]) -> Self {
        let start = if source.starts_with(BOM) { BOM.len() } else { 0 };
        Self {
            source,
            pos: start,
            line: 1,
            column: 1,
            line_start: start,
            line_has_token: false,
            finished: false,
        }
    }

    /// Produce the next token. Returns `Eof` forever once input is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            let Some(&byte) = self.source.get(self.pos) else {
                let end = self.source.len();
                return Token::new(TokenKind::Eof, end, end, self.line, self.column);
            };
            match byte {
                b' ' | b'\t' | b'\r' => {
                    self.pos += 1;
                    self.column += 1;
                }
                b'\n' => {
                    let blank = (!self.line_has_token).then(|| {
                        Token::new(TokenKind::BlankLine, self.line_start, self.pos, self.line, 1)
                    });
                    self.pos += 1;
                    self.line += 1;
                    self.column = 1;
                    self.line_start = self.pos;
                    self.line_has_token = false;
                    if let Some(token) = blank {
                        return token;
                    }
                }
                _ => break,
            }
        }

        self.line_has_token = true;
        let (start, line, column) = (self.pos, self.line, self.column);
        let kind = self.scan_token();
        self.column += count_chars(&self.source[start..self.pos]).max(1);
        Token::new(kind, start, self.pos, line, column)
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.source.get(self.pos + ahead).copied()
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    /// Pick between a one- and a two-byte token sharing a first byte.
    fn single_or_double(&mut self, second: u8, single: TokenKind, double: TokenKind) -> TokenKind {
        if self.peek(1) == Some(second) {
            self.pos += 2;
            double
        } else {
            self.pos += 1;
            single
        }
    }

    // Categories overlap in their leading byte, so the order of these arms
    // is significant: dates before numbers, signed numbers before `-`.
    fn scan_token(&mut self) -> TokenKind {
        let byte = self.source[self.pos];
        match byte {
            b'0'..=b'9' => {
                if is_date_at(self.source, self.pos) {
                    self.pos += 10;
                    TokenKind::Date
                } else {
                    self.scan_number()
                }
            }
            b'-' | b'+' if self.peek(1).is_some_and(|b| b.is_ascii_digit()) => self.scan_number(),
            b'"' => self.scan_string(),
            b'#' => self.scan_marker(TokenKind::Tag),
            b'^' => self.scan_marker(TokenKind::Link),
            b'A'..=b'Z' => self.scan_upper_word(),
            0x80..=0xFF => {
                if decode_char(self.source, self.pos).is_some() {
                    self.scan_upper_word()
                } else {
                    self.single(TokenKind::Illegal)
                }
            }
            b'a'..=b'z' => self.scan_lower_word(),
            b';' => self.scan_comment(),
            b'*' => self.single(TokenKind::Star),
            b'!' => self.single(TokenKind::Bang),
            b':' => self.single(TokenKind::Colon),
            b',' => self.single(TokenKind::Comma),
            b'~' => self.single(TokenKind::Tilde),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'/' => self.single(TokenKind::Slash),
            b'@' => self.single_or_double(b'@', TokenKind::At, TokenKind::AtAt),
            b'{' => self.single_or_double(b'{', TokenKind::LBrace, TokenKind::LDoubleBrace),
            b'}' => self.single_or_double(b'}', TokenKind::RBrace, TokenKind::RDoubleBrace),
            _ => self.single(TokenKind::Illegal),
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let src = self.source;
        let mut p = self.pos;
        if matches!(src[p], b'-' | b'+') {
            p += 1;
        }
        p = skip_digits(src, p);
        while src.get(p) == Some(&b',') && is_thousands_group(src, p + 1) {
            p += 4;
        }
        if src.get(p) == Some(&b'.') && src.get(p + 1).is_some_and(u8::is_ascii_digit) {
            p = skip_digits(src, p + 1);
        }
        self.pos = p;
        TokenKind::Number
    }

    /// Strings end at the next unescaped quote or at the end of the line.
    /// Escapes are skipped here and interpreted later by `unquote`.
    fn scan_string(&mut self) -> TokenKind {
        let src = self.source;
        let mut p = self.pos + 1;
        let mut terminated = false;
        while let Some(&b) = src.get(p) {
            match b {
                b'"' => {
                    p += 1;
                    terminated = true;
                    break;
                }
                b'\\' if src.get(p + 1).is_some_and(|n| *n != b'\n') => p += 2,
                b'\n' => break,
                _ => p += 1,
            }
        }
        if !terminated && p > self.pos + 1 && src[p - 1] == b'\r' {
            p -= 1;
        }
        self.pos = p;
        TokenKind::String
    }

    fn scan_marker(&mut self, kind: TokenKind) -> TokenKind {
        let src = self.source;
        let mut p = self.pos + 1;
        while src.get(p).is_some_and(|b| is_tag_byte(*b)) {
            p += 1;
        }
        if p == self.pos + 1 {
            return self.single(TokenKind::Illegal);
        }
        self.pos = p;
        kind
    }

    /// Accounts and identifiers: letters (ASCII or multi-byte), digits,
    /// `:` and `-`. A `:` anywhere makes the word an account.
    fn scan_upper_word(&mut self) -> TokenKind {
        let src = self.source;
        let mut p = self.pos + decode_char(src, self.pos).map_or(1, |(_, width)| width);
        let mut has_colon = false;
        while let Some(&b) = src.get(p) {
            if b.is_ascii_alphanumeric() || b == b'-' {
                p += 1;
            } else if b == b':' {
                has_colon = true;
                p += 1;
            } else if matches!(b, b'_' | b'.' | b'\'')
                && src.get(p + 1).is_some_and(u8::is_ascii_alphanumeric)
            {
                p += 1;
            } else if b >= 0x80 {
                match decode_char(src, p) {
                    Some((c, width)) if c.is_alphanumeric() => p += width,
                    _ => break,
                }
            } else {
                break;
            }
        }
        self.pos = p;
        if has_colon {
            TokenKind::Account
        } else {
            TokenKind::Ident
        }
    }

    fn scan_lower_word(&mut self) -> TokenKind {
        let src = self.source;
        let start = self.pos;
        let mut p = start + 1;
        while src
            .get(p)
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-'))
        {
            p += 1;
        }
        self.pos = p;
        TokenKind::keyword(&src[start..p]).unwrap_or(TokenKind::Ident)
    }

    fn scan_comment(&mut self) -> TokenKind {
        let src = self.source;
        let mut p = self.pos;
        while src.get(p).is_some_and(|b| *b != b'\n') {
            p += 1;
        }
        if p > self.pos + 1 && src[p - 1] == b'\r' {
            p -= 1;
        }
        self.pos = p;
        TokenKind::Comment
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}

/// Tokenize a whole buffer.
///
/// Returns every token (ending with a single `Eof`) and the first lexical
/// problem encountered, if any.
pub fn scan_all(source: &[u8], filename: &str) -> (Vec<Token>, Option<LexError>) {
    let mut tokens = Vec::with_capacity(source.len() / 4 + 1);
    let mut error = None;

    for token in Lexer::new(source) {
        if token.kind == TokenKind::Illegal && error.is_none() {
            let position = Position::new(filename, token.start, token.line, token.column);
            let byte = source[token.start];
            error = Some(match decode_char(source, token.start) {
                Some((found, _)) => LexError::UnexpectedChar { position, found },
                None => LexError::InvalidUtf8 { position, byte },
            });
        }
        tokens.push(token);
    }

    (tokens, error)
}

/// Count UTF-8 characters (non-continuation bytes).
pub(crate) fn count_chars(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| (**b & 0xC0) != 0x80).count()
}

/// Decode the UTF-8 character starting at `p`, with its byte width.
fn decode_char(src: &[u8], p: usize) -> Option<(char, usize)> {
    let width = match *src.get(p)? {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let bytes = src.get(p..p + width)?;
    let c = std::str::from_utf8(bytes).ok()?.chars().next()?;
    Some((c, width))
}

fn is_date_at(src: &[u8], p: usize) -> bool {
    let Some(bytes) = src.get(p..p + 10) else {
        return false;
    };
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

fn skip_digits(src: &[u8], mut p: usize) -> usize {
    while src.get(p).is_some_and(u8::is_ascii_digit) {
        p += 1;
    }
    p
}

/// Exactly three digits not followed by a fourth.
fn is_thousands_group(src: &[u8], p: usize) -> bool {
    (0..3).all(|i| src.get(p + i).is_some_and(u8::is_ascii_digit))
        && !src.get(p + 3).is_some_and(u8::is_ascii_digit)
}

const fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'/' | b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan_all(source.as_bytes(), "test")
            .0
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        let (tokens, _) = scan_all(source.as_bytes(), "test");
        tokens
            .iter()
            .map(|t| t.to_owned_text(source.as_bytes()))
            .collect()
    }

    #[test]
    fn test_date_and_number() {
        assert_eq!(kinds("2024-01-15"), vec![TokenKind::Date, TokenKind::Eof]);
        assert_eq!(kinds("1234.56"), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("-37.45"), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(texts("1,234.56 USD"), vec!["1,234.56", "USD", ""]);
        // Not a date: falls through to number scanning.
        assert_eq!(
            kinds("2024-01"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_thousands_separator_needs_three_digits() {
        assert_eq!(texts("1,23"), vec!["1", ",", "23", ""]);
        assert_eq!(texts("100,2024-01-01"), vec!["100", ",", "2024-01-01", ""]);
    }

    #[test]
    fn test_minus_and_plus() {
        assert_eq!(
            kinds("- 5 +3 + x"),
            vec![
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(texts(r#""Hello, World!""#), vec![r#""Hello, World!""#, ""]);
        assert_eq!(texts(r#""a \" b" x"#), vec![r#""a \" b""#, "x", ""]);
        // Unterminated strings stop at the end of the line.
        let src = "\"open\nnext";
        assert_eq!(texts(src), vec!["\"open", "next", ""]);
    }

    #[test]
    fn test_tags_and_links() {
        assert_eq!(texts("#my-tag ^my_link #a/b.c"), vec!["#my-tag", "^my_link", "#a/b.c", ""]);
        assert_eq!(kinds("# x")[0], TokenKind::Illegal);
    }

    #[test]
    fn test_accounts_and_idents() {
        assert_eq!(
            kinds("Assets:Bank:Checking USD TRUE"),
            vec![
                TokenKind::Account,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
        assert_eq!(texts("Expenses:Café:München"), vec!["Expenses:Café:München", ""]);
        assert_eq!(texts("VANGUARD_500 BRK.B"), vec!["VANGUARD_500", "BRK.B", ""]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("txn balance open close pushmeta popmeta unknown"),
            vec![
                TokenKind::Txn,
                TokenKind::Balance,
                TokenKind::Open,
                TokenKind::Close,
                TokenKind::Pushmeta,
                TokenKind::Popmeta,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
        assert_eq!(TokenKind::keyword(b"option"), Some(TokenKind::Option_));
        assert_eq!(TokenKind::keyword(b"query"), None);
    }

    #[test]
    fn test_punctuation_lookahead() {
        assert_eq!(
            kinds("{ } {{ }} @ @@ , : ~ * !"),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LDoubleBrace,
                TokenKind::RDoubleBrace,
                TokenKind::At,
                TokenKind::AtAt,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Tilde,
                TokenKind::Star,
                TokenKind::Bang,
                TokenKind::Eof
            ]
        );
        assert_eq!(kinds("{}")[..2], [TokenKind::LBrace, TokenKind::RBrace]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let src = "; header\n\n  \n2024-01-01 ; trailing\r\n";
        let (tokens, _) = scan_all(src.as_bytes(), "test");
        let got: Vec<_> = tokens.iter().map(|t| (t.kind, t.line, t.column)).collect();
        assert_eq!(
            got,
            vec![
                (TokenKind::Comment, 1, 1),
                (TokenKind::BlankLine, 2, 1),
                (TokenKind::BlankLine, 3, 1),
                (TokenKind::Date, 4, 1),
                (TokenKind::Comment, 4, 12),
                (TokenKind::Eof, 5, 1),
            ]
        );
        assert_eq!(tokens[4].text(src.as_bytes()), "; trailing");
    }

    #[test]
    fn test_line_and_column_tracking() {
        let src = "2014-05-05 * \"Café\" x\n  Assets:A";
        let (tokens, _) = scan_all(src.as_bytes(), "test");
        assert_eq!((tokens[1].line, tokens[1].column), (1, 12));
        assert_eq!((tokens[2].line, tokens[2].column), (1, 14));
        // Columns count characters: "Café" is 6 characters with quotes.
        assert_eq!((tokens[3].line, tokens[3].column), (1, 21));
        assert_eq!(tokens[2].end_column(src.as_bytes()), 20);
        assert_eq!((tokens[4].line, tokens[4].column), (2, 3));
        assert!(tokens[0].same_line(&tokens[3]));
        assert!(!tokens[3].same_line(&tokens[4]));
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let src = "\u{feff}2024-01-01 open Assets:A\n";
        let (tokens, error) = scan_all(src.as_bytes(), "bom.beancount");
        assert!(error.is_none());
        assert_eq!(tokens[0].kind, TokenKind::Date);
        assert_eq!((tokens[0].start, tokens[0].line, tokens[0].column), (3, 1, 1));
        assert_eq!(tokens[0].text(src.as_bytes()), "2024-01-01");

        // Only a leading mark is skipped.
        assert_eq!(kinds("USD \u{feff}")[1], TokenKind::Ident);
    }

    #[test]
    fn test_illegal_bytes_do_not_stop_scanning() {
        let src = b"USD \xff $ 10";
        let (tokens, error) = scan_all(src, "bad.beancount");
        let got: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            got,
            vec![
                TokenKind::Ident,
                TokenKind::Illegal,
                TokenKind::Illegal,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        assert!(matches!(error, Some(LexError::InvalidUtf8 { byte: 0xff, .. })));
    }

    #[test]
    fn test_single_eof_at_end() {
        for src in ["", "\n", "abc", "2024-01-01 open Assets:X\n\n"] {
            let (tokens, _) = scan_all(src.as_bytes(), "t");
            let eofs: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Eof).collect();
            assert_eq!(eofs.len(), 1);
            let last = tokens.last().unwrap();
            assert_eq!(last.kind, TokenKind::Eof);
            assert_eq!((last.start, last.end), (src.len(), src.len()));
        }
    }

    #[test]
    fn test_intern_shares_allocation() {
        let src = b"USD USD";
        let (tokens, _) = scan_all(src, "t");
        let mut interner = StringInterner::new();
        let a = tokens[0].intern(src, &mut interner);
        let b = tokens[1].intern(src, &mut interner);
        assert!(a.ptr_eq(&b));
    }
}
