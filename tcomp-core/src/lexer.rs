//! Tokenizer for TComplete.
//!
//! The scan is line oriented and has no recursive structure: numbers
//! and identifiers are maximal runs, symbols are matched longest-first
//! against [`SYMBOLS`], and any other character becomes an `Unknown`
//! token. The parser decides what a token means.

use crate::span::Span;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    Number,
    Unknown,
    EndOfInput,
}

/// A single token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn end_of_input(span: Span) -> Self {
        Token::new(TokenKind::EndOfInput, "", span)
    }

    pub fn is_symbol(&self, text: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == text
    }
}

/// Every symbol the lexer recognizes.
///
/// `<=` and `>=` are absent on purpose: `<a,b>=>s` has to split into
/// `>` followed by `=>`.
#[rustfmt::skip]
pub const SYMBOLS: &[&str] = &[
    "\\\"", "\\'", "\\\t", "\\\n", "\\\r", "\\\u{b}", "\\\u{c}", "\\\u{8}", "\\\u{7}",
    "<<@",
    "==", "!=", "=>", "->", "::", "||", "&&", "+=", "-=", "<<", ">>", "^+", "^-",
    "=", "+", "-", "*", "/", "(", ")", "{", "}", "[", "]", ";", ",", ":", "\"", "'",
    "\\", "@", "#", "$", "%", "&", "?", "!", "<", ">", "|", "^", "~",
];

/// Keywords are classified apart from identifiers. The language
/// currently reserves none.
const KEYWORDS: &[&str] = &[];

/// Lex a source string into tokens, always ending with exactly one
/// `EndOfInput` token.
pub fn lex(source: &str) -> Vec<Token> {
    let mut symbols: Vec<Vec<char>> = SYMBOLS.iter().map(|s| s.chars().collect()).collect();
    symbols.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut tokens = Vec::new();
    let mut line_number = 1u32;
    for line in source.lines() {
        let mut lexer = LineLexer {
            chars: line.chars().collect(),
            index: 0,
            line: line_number,
            symbols: &symbols,
        };
        lexer.run(&mut tokens);
        line_number += 1;
    }

    tokens.push(Token::end_of_input(Span::new(line_number, 0)));
    log::debug!("lexed {} tokens over {} lines", tokens.len(), line_number - 1);
    tokens
}

struct LineLexer<'a> {
    chars: Vec<char>,
    index: usize,
    line: u32,
    symbols: &'a [Vec<char>],
}

impl LineLexer<'_> {
    fn run(&mut self, tokens: &mut Vec<Token>) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.index += 1;
                continue;
            }

            let span = Span::new(self.line, self.index as u32 + 1);
            let token = if ch.is_ascii_digit() {
                self.lex_run(TokenKind::Number, span, |c| c.is_ascii_digit())
            } else if is_ident_start(ch) {
                let mut token = self.lex_run(TokenKind::Identifier, span, is_ident_continue);
                if KEYWORDS.contains(&token.text.as_str()) {
                    token.kind = TokenKind::Keyword;
                }
                token
            } else if let Some(token) = self.lex_symbol(span) {
                token
            } else {
                self.index += 1;
                Token::new(TokenKind::Unknown, ch.to_string(), span)
            };
            tokens.push(token);
        }
    }

    fn lex_run(&mut self, kind: TokenKind, span: Span, accept: impl Fn(char) -> bool) -> Token {
        let start = self.index;
        while self.peek_char().is_some_and(&accept) {
            self.index += 1;
        }
        let text: String = self.chars[start..self.index].iter().collect();
        Token::new(kind, text, span)
    }

    fn lex_symbol(&mut self, span: Span) -> Option<Token> {
        let rest = &self.chars[self.index..];
        let symbol = self
            .symbols
            .iter()
            .find(|symbol| rest.starts_with(symbol.as_slice()))?;
        self.index += symbol.len();
        Some(Token::new(
            TokenKind::Symbol,
            symbol.iter().collect::<String>(),
            span,
        ))
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn lexes_variable_declaration() {
        let tokens = lex("[8+]=>a");
        assert_eq!(texts(&tokens), vec!["[", "8", "+", "]", "=>", "a", ""]);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[5].kind, TokenKind::Identifier);
        assert_eq!(tokens[6].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn prefers_longest_symbol() {
        let tokens = lex("<<@x <<y <z");
        assert_eq!(texts(&tokens), vec!["<<@", "x", "<<", "y", "<", "z", ""]);
    }

    #[test]
    fn array_close_splits_before_arrow() {
        let tokens = lex("<a,b>=>s");
        assert_eq!(texts(&tokens), vec!["<", "a", ",", "b", ">", "=>", "s", ""]);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = lex("[+]=>a\n  <<a\n");
        let out = tokens.iter().find(|t| t.text == "<<").expect("output symbol");
        assert_eq!(out.span, Span::new(2, 3));
        let eof = tokens.last().expect("eof");
        assert_eq!(eof.kind, TokenKind::EndOfInput);
        assert_eq!(eof.span, Span::new(3, 0));
    }

    #[test]
    fn unknown_characters_are_single_tokens() {
        let tokens = lex("a.b");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, ".");
    }

    #[test]
    fn empty_source_is_only_end_of_input() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span, Span::new(1, 0));
    }
}
