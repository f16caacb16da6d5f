//! Hand-written scanner: produces one [`Token`] at a time from source text.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input one token at a time.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.advance();
                self.advance();
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier {
                text: text.to_string(),
                quoted: false,
            })
        }
    }

    /// Scans a quoted identifier (`"column name"`); backtick identifiers are
    /// also accepted as a MySQL-compatibility alias for the same thing.
    fn scan_quoted_identifier(&mut self, quote: char) -> Token {
        self.advance();
        let content_start = self.pos;

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Illegal(
                        "unterminated quoted identifier".to_string(),
                    ));
                }
            }
        }

        let content = self.input[content_start..self.pos].to_string();
        self.advance();

        let doubled = format!("{quote}{quote}");
        let unescaped = content.replace(&doubled, &quote.to_string());
        self.make_token(TokenKind::Identifier {
            text: unescaped,
            quoted: true,
        })
    }

    /// Scans a numeric literal, including `_`-grouped digits, a decimal
    /// point, and an exponent. The original text (underscores included) is
    /// kept verbatim in `TokenKind::Number`.
    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }

        if self.peek() == Some('.')
            && self
                .peek_next()
                .is_none_or(|c| c.is_ascii_digit() || !(c.is_alphabetic() || c == '_'))
        {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let save = self.pos;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = save;
            }
        }

        let text = self.input[self.start..self.pos].to_string();
        self.make_token(TokenKind::Number(text))
    }

    fn scan_string(&mut self, quote: char) -> Token {
        self.advance();
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return self
                        .make_token(TokenKind::Illegal("unterminated string literal".to_string()));
                }
            }
        }

        self.advance();
        self.make_token(TokenKind::String(value))
    }

    /// Scans a `$1` (dollar-numbered) or `$name` (dollar-named) parameter.
    fn scan_dollar_param(&mut self) -> Token {
        self.advance(); // $
        let body_start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let body = &self.input[body_start..self.pos];
        if body.is_empty() {
            return self
                .make_token(TokenKind::Illegal("expected a name or number after '$'".to_string()));
        }
        if let Ok(n) = body.parse::<u32>() {
            self.make_token(TokenKind::DollarNumber(n))
        } else {
            self.make_token(TokenKind::DollarName(body.to_string()))
        }
    }

    /// Scans and returns the next token. Never fails: an unterminated
    /// literal or an unrecognised byte comes back as `TokenKind::Illegal`
    /// rather than an error, so the parser is the single place that decides
    /// what to do about it.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let c = match self.advance() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '+' => self.make_token(TokenKind::Plus),
            '*' => self.make_token(TokenKind::Star),
            '%' => self.make_token(TokenKind::Percent),
            '^' => self.make_token(TokenKind::BitXor),
            '?' => self.make_token(TokenKind::QuestionMark),
            '@' => self.make_token(TokenKind::At),

            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::Arrow)
                } else {
                    self.make_token(TokenKind::Minus)
                }
            }
            '/' => {
                if self.peek() == Some('/') {
                    self.advance();
                    self.make_token(TokenKind::DoubleSlash)
                } else {
                    self.make_token(TokenKind::Slash)
                }
            }
            '~' => self.make_token(TokenKind::BitNot),

            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos = self.start;
                    self.scan_number()
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    self.make_token(TokenKind::DoubleColon)
                } else if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::Assign)
                } else {
                    self.make_token(TokenKind::Colon)
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                }
                self.make_token(TokenKind::Eq)
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else if self.peek() == Some('<') {
                    self.advance();
                    self.make_token(TokenKind::LeftShift)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::RightShift)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Illegal("unexpected character: !".to_string()))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    self.make_token(TokenKind::BitOr)
                }
            }
            '&' => self.make_token(TokenKind::BitAnd),

            '\'' => {
                self.pos = self.start;
                return self.scan_string('\'');
            }
            '"' | '`' => {
                self.pos = self.start;
                return self.scan_quoted_identifier(c);
            }
            '$' => {
                self.pos = self.start;
                return self.scan_dollar_param();
            }

            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }

            c if c.is_alphabetic() || c == '_' => {
                self.pos = self.start;
                self.scan_identifier()
            }

            other => self.make_token(TokenKind::Illegal(format!("unexpected character: {other}"))),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending in `Eof`.
    /// An unscannable fragment comes back as a `TokenKind::Illegal` token in
    /// the stream rather than stopping the scan.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn ident(text: &str) -> TokenKind {
        TokenKind::Identifier {
            text: text.to_string(),
            quoted: false,
        }
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            token_kinds("SELECT -- line comment\nFROM /* block */ t"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                ident("t"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn quoted_identifier_unescapes_doubled_quotes() {
        assert_eq!(
            token_kinds("\"a \"\"b\"\" c\""),
            vec![
                TokenKind::Identifier {
                    text: "a \"b\" c".to_string(),
                    quoted: true,
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn number_preserves_exact_text_including_underscores() {
        assert_eq!(
            token_kinds("1_000_000 3.14 1e10 2.5e-3 3000000000"),
            vec![
                TokenKind::Number("1_000_000".to_string()),
                TokenKind::Number("3.14".to_string()),
                TokenKind::Number("1e10".to_string()),
                TokenKind::Number("2.5e-3".to_string()),
                TokenKind::Number("3000000000".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_with_escaped_quote() {
        assert_eq!(
            token_kinds("'it''s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn dollar_parameters() {
        assert_eq!(
            token_kinds("$1 $42 $name"),
            vec![
                TokenKind::DollarNumber(1),
                TokenKind::DollarNumber(42),
                TokenKind::DollarName("name".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operator_normalisation_and_new_operators() {
        assert_eq!(
            token_kinds("!= <> == -> := //"),
            vec![
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Eq,
                TokenKind::Arrow,
                TokenKind::Assign,
                TokenKind::DoubleSlash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_becomes_an_illegal_token() {
        let kinds = token_kinds("'abc");
        assert!(matches!(&kinds[0], TokenKind::Illegal(msg) if msg.contains("unterminated")));
    }

    #[test]
    fn bare_bang_becomes_an_illegal_token() {
        let kinds = token_kinds("!");
        assert!(matches!(&kinds[0], TokenKind::Illegal(_)));
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("SELECT id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
    }
}
