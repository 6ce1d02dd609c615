//! Recursive-descent parser for TComplete.
//!
//! Parsing is best effort. A failed match records a Syntax diagnostic
//! and the rule carries on from whatever token is now current; the
//! only hard stop is the `max_errors` cutoff, checked after every
//! statement. Loop bodies are parsed by a nested call over a copy of
//! the tokens between the braces, and that call returns its
//! diagnostics instead of reporting them.

use crate::ast::{OutputMode, PLACEHOLDER, Program, Statement, StatementKind};
use crate::bits::Bitset;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

/// Program plus everything the parser complained about.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Diagnostics,
}

/// Parse a token sequence into a [`Program`].
///
/// The sequence is expected to end with an `EndOfInput` token; if it
/// does not, one is assumed after the last token.
pub fn parse(tokens: &[Token], filename: &str, max_errors: usize) -> ParseResult {
    let mut parser = Parser::new(tokens, filename, max_errors);
    parser.run();
    log::debug!(
        "parsed {} statements with {} diagnostics from {filename}",
        parser.program.statements.len(),
        parser.diagnostics.len()
    );
    ParseResult {
        program: parser.program,
        diagnostics: parser.diagnostics,
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    filename: &'a str,
    max_errors: usize,
    eof: Token,
    program: Program,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], filename: &'a str, max_errors: usize) -> Self {
        let eof_span = tokens.last().map(|t| t.span).unwrap_or(Span::new(1, 0));
        Parser {
            tokens,
            pos: 0,
            filename,
            max_errors,
            eof: Token::end_of_input(eof_span),
            program: Program::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn run(&mut self) {
        loop {
            let token = self.current();
            if token.kind == TokenKind::EndOfInput {
                break;
            }
            let span = token.span;
            let symbol = match token.kind {
                TokenKind::Symbol => token.text.clone(),
                _ => String::new(),
            };

            let kind = match symbol.as_str() {
                "[" => Some(self.parse_variable_declaration()),
                "<<" => Some(self.parse_output(OutputMode::Raw)),
                "<<@" => Some(self.parse_output(OutputMode::SignedInteger)),
                "<" => Some(self.parse_array_declaration()),
                "(" => Some(self.parse_loop()),
                "!" => Some(self.parse_expression_assignment()),
                _ => {
                    let message = format!("unexpected token '{}'", self.current().text);
                    self.error(message, span);
                    self.pos += 1;
                    None
                }
            };

            if let Some(kind) = kind {
                log::trace!("parsed statement at {span}: {kind:?}");
                self.program.statements.push(Statement::new(kind, span));
            }

            if self.diagnostics.len() > self.max_errors {
                log::warn!(
                    "too many errors ({} > {}), stopping parse of {}",
                    self.diagnostics.len(),
                    self.max_errors,
                    self.filename
                );
                break;
            }
        }
    }

    // -----------------------------------------------------------------
    // Grammar rules
    // -----------------------------------------------------------------

    /// `'[' bitRun* ']' '=>' identifier`
    fn parse_variable_declaration(&mut self) -> StatementKind {
        self.expect("[");

        let mut bits = Vec::new();
        loop {
            let token = self.current();
            if token.kind == TokenKind::Number {
                let (text, span) = (token.text.clone(), token.span);
                self.pos += 1;
                let count = match text.parse::<usize>() {
                    Ok(count) => count,
                    Err(_) => {
                        self.error(format!("bit run length '{text}' is too large"), span);
                        0
                    }
                };
                if self.eat("+") {
                    bits.extend(std::iter::repeat_n(true, count));
                } else if self.eat("-") {
                    bits.extend(std::iter::repeat_n(false, count));
                } else {
                    let span = self.current().span;
                    self.error("expected '+' or '-'", span);
                }
                continue;
            }
            if self.eat("+") {
                bits.push(true);
                continue;
            }
            if self.eat("-") {
                bits.push(false);
                continue;
            }
            if !self.eat("]") {
                let span = self.current().span;
                self.error("expected ']'", span);
            }
            break;
        }

        self.expect("=>");
        let name = self.identifier();

        StatementKind::VariableDeclaration {
            name,
            bits: Bitset::from_bools(bits),
        }
    }

    /// `('<<' | '<<@') identifier`
    fn parse_output(&mut self, mode: OutputMode) -> StatementKind {
        match mode {
            OutputMode::Raw => self.expect("<<"),
            OutputMode::SignedInteger => self.expect("<<@"),
        };
        let name = self.identifier();
        StatementKind::Output { name, mode }
    }

    /// `'<' identifier (',' identifier)* '>' '=>' identifier`
    fn parse_array_declaration(&mut self) -> StatementKind {
        self.expect("<");

        let mut element_names = Vec::new();
        loop {
            let name = self.identifier();
            if !name.is_empty() {
                element_names.push(name);
            }
            if !self.eat(",") {
                break;
            }
        }

        self.expect(">");
        self.expect("=>");
        let name = self.identifier();

        StatementKind::ArrayDeclaration {
            name,
            element_names,
        }
    }

    /// `'(' ':' identifier '$' '{' statements '}' ')'`
    fn parse_loop(&mut self) -> StatementKind {
        self.expect("(");
        self.expect(":");
        let counter_name = self.identifier();
        self.expect("$");

        let mut body = Vec::new();
        if self.expect("{") {
            let scope = self.extract_scope();
            let nested = parse(&scope, self.filename, self.max_errors);
            self.diagnostics.merge(nested.diagnostics);
            body = nested.program.statements;
        }

        self.expect(")");

        StatementKind::Loop { counter_name, body }
    }

    /// `'!' '{' tokens '}' '=>' identifier`
    fn parse_expression_assignment(&mut self) -> StatementKind {
        self.expect("!");

        let mut template = String::new();
        let mut referenced_names = Vec::new();
        if self.expect("{") {
            for token in self.extract_scope() {
                match token.kind {
                    TokenKind::Identifier => {
                        template.push_str(PLACEHOLDER);
                        referenced_names.push(token.text);
                    }
                    TokenKind::EndOfInput => {}
                    _ => template.push_str(&token.text),
                }
            }
        }

        self.expect("=>");
        let target_name = self.identifier();

        StatementKind::ExpressionAssignment {
            template,
            referenced_names,
            target_name,
        }
    }

    // -----------------------------------------------------------------
    // Token matchers
    // -----------------------------------------------------------------

    /// Consume an Identifier token and return its text. On anything
    /// else, record a diagnostic and return an empty name without
    /// advancing.
    fn identifier(&mut self) -> String {
        let token = self.current();
        if token.kind == TokenKind::Identifier {
            let name = token.text.clone();
            self.pos += 1;
            return name;
        }
        let span = token.span;
        self.error("expected identifier", span);
        String::new()
    }

    /// Consume `text` or record `expected '<text>'` at the current token.
    fn expect(&mut self, text: &str) -> bool {
        if self.eat(text) {
            return true;
        }
        let span = self.current().span;
        self.error(format!("expected '{text}'"), span);
        false
    }

    /// Consume `text` if it is current; silent on mismatch.
    fn eat(&mut self, text: &str) -> bool {
        if self.current().is_symbol(text) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Copy the tokens between an already consumed `{` and its
    /// matching `}`, leaving the cursor after the `}`. The copy ends
    /// with an `EndOfInput` token positioned at the closing brace.
    fn extract_scope(&mut self) -> Vec<Token> {
        let tokens = self.tokens;
        let start = self.pos;
        let mut depth = 1usize;
        let mut index = start;
        while index < tokens.len() {
            let token = &tokens[index];
            if token.kind == TokenKind::EndOfInput {
                break;
            }
            if token.is_symbol("{") {
                depth += 1;
            } else if token.is_symbol("}") {
                depth -= 1;
                if depth == 0 {
                    let mut scope = tokens[start..index].to_vec();
                    scope.push(Token::end_of_input(token.span));
                    self.pos = index + 1;
                    return scope;
                }
            }
            index += 1;
        }

        self.pos = index;
        let span = self.current().span;
        self.error("expected '}'", span);
        let mut scope = tokens[start..index].to_vec();
        scope.push(Token::end_of_input(span));
        scope
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::syntax(self.filename, message, span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::lexer::lex;

    fn parse_source(source: &str) -> ParseResult {
        parse(&lex(source), "test.tc", 20)
    }

    fn kinds(result: &ParseResult) -> Vec<&StatementKind> {
        result.program.statements.iter().map(|s| &s.kind).collect()
    }

    fn declared_bits(source: &str) -> String {
        let result = parse_source(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        match &result.program.statements[0].kind {
            StatementKind::VariableDeclaration { bits, .. } => bits.to_string(),
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn parses_bit_runs_in_order() {
        assert_eq!(declared_bits("[3+2-+-]=>x"), "1110010");
        assert_eq!(declared_bits("[]=>x"), "");
    }

    #[test]
    fn bit_literal_repeats_sign() {
        for n in 0..12 {
            assert_eq!(declared_bits(&format!("[{n}+]=>x")), "1".repeat(n));
            assert_eq!(declared_bits(&format!("[{n}-]=>x")), "0".repeat(n));
        }
    }

    #[test]
    fn parses_output_modes() {
        let result = parse_source("<<a\n<<@b");
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            kinds(&result),
            vec![
                &StatementKind::Output {
                    name: "a".into(),
                    mode: OutputMode::Raw
                },
                &StatementKind::Output {
                    name: "b".into(),
                    mode: OutputMode::SignedInteger
                },
            ]
        );
    }

    #[test]
    fn parses_array_declaration() {
        let result = parse_source("<h, e,l>=>word");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            kinds(&result),
            vec![&StatementKind::ArrayDeclaration {
                name: "word".into(),
                element_names: vec!["h".into(), "e".into(), "l".into()],
            }]
        );
    }

    #[test]
    fn parses_loop_body_through_nested_parser() {
        let result = parse_source("(:n${\n  [+]=>x\n  (:m${ <<x })\n})");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let StatementKind::Loop { counter_name, body } = &result.program.statements[0].kind else {
            panic!("expected loop");
        };
        assert_eq!(counter_name, "n");
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].span, Span::new(2, 3));
        assert!(body[1].is_loop());
    }

    #[test]
    fn statements_after_a_loop_are_parsed() {
        let result = parse_source("(:n${ <<a })\n<<b");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.program.statements.len(), 2);
    }

    #[test]
    fn loop_body_diagnostics_are_merged() {
        let result = parse_source("(:n${ [+]=> })");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = result.diagnostics.iter().next().expect("diagnostic");
        assert_eq!(diag.message, "expected identifier");
        assert_eq!(result.program.statements.len(), 1);
    }

    #[test]
    fn unterminated_loop_body_is_reported() {
        let result = parse_source("(:n${ <<a");
        let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["expected '}'", "expected ')'"]);
        let StatementKind::Loop { body, .. } = &result.program.statements[0].kind else {
            panic!("expected loop");
        };
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn expression_template_replaces_identifiers() {
        let result = parse_source("!{ (a + b) * 2 - a }=>c");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            kinds(&result),
            vec![&StatementKind::ExpressionAssignment {
                template: "({}+{})*2-{}".into(),
                referenced_names: vec!["a".into(), "b".into(), "a".into()],
                target_name: "c".into(),
            }]
        );
    }

    #[test]
    fn missing_close_bracket_does_not_hang() {
        let result = parse_source("[3+ x");
        let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["expected ']'", "expected '=>'"]);
        assert!(result.diagnostics.iter().all(|d| d.kind == DiagnosticKind::Syntax));
    }

    #[test]
    fn count_without_sign_is_reported() {
        let result = parse_source("[3]=>x");
        let diag = result.diagnostics.iter().next().expect("diagnostic");
        assert_eq!(diag.message, "expected '+' or '-'");
        assert_eq!(diag.span, Span::new(1, 3));
    }

    #[test]
    fn unknown_leading_token_is_skipped() {
        let result = parse_source("stray [+]=>b");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.program.statements.len(), 1);
    }

    #[test]
    fn stops_after_error_cutoff() {
        let tokens = lex("<<\n<<\n<<\n<<\n<<\n");
        let result = parse(&tokens, "test.tc", 2);
        assert_eq!(result.diagnostics.len(), 3);
        assert_eq!(result.program.statements.len(), 3);
        assert!(result.program.statements.iter().all(|s| matches!(
            &s.kind,
            StatementKind::Output { name, .. } if name.is_empty()
        )));
    }

    #[test]
    fn diagnostics_point_at_offending_token() {
        let result = parse_source("[+]=>a\n<a b>=>s");
        let diag = result.diagnostics.iter().next().expect("diagnostic");
        assert_eq!(diag.message, "expected '>'");
        assert_eq!(diag.span, Span::new(2, 4));
        assert_eq!(diag.filepath, "test.tc");
    }
}
