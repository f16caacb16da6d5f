//! Recursive-descent parser over a Pratt expression core.
//!
//! The parser keeps a one-token lookahead (`current`) plus an on-demand
//! second token (`peeked`, filled by cloning the lexer) for the handful of
//! constructs that need it: `NOT IN`/`NOT BETWEEN`/`NOT LIKE`, a friendly
//! `name: expr` select-item alias, and named call arguments (`name := expr`).
//! Everything else is driven by matching on `current` and calling
//! [`Parser::advance`].

use super::error::ParseError;
use super::pratt::{infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op};
use crate::ast::*;
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Parses one SQL statement from an input string.
///
/// A `Parser` only ever produces a single [`Statement`] per call to
/// [`Parser::parse_statement`] — enforcing that an input contains at most
/// one statement is the job of the crate's facade, not this type.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    input: &'a str,
    current: Token,
    previous: Token,
    peeked: Option<Token>,
    param_counter: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned at the first token of `input`. Infallible
    /// today (the lexer never raises); kept `Result`-returning so a future
    /// fallible setup step doesn't change every call site.
    pub fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Ok(Self {
            lexer,
            input,
            current: current.clone(),
            previous: current,
            peeked: None,
            param_counter: 0,
        })
    }

    #[must_use]
    pub const fn at_eof(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    #[must_use]
    pub const fn current_span(&self) -> Span {
        self.current.span
    }

    /// Consumes a trailing `;` if present. Used by the facade to allow (but
    /// not require) a single terminating semicolon.
    pub fn eat_semicolon(&mut self) -> Result<bool, ParseError> {
        self.eat_kind(&TokenKind::Semicolon)
    }

    // ---- token plumbing -------------------------------------------------

    fn advance(&mut self) -> Result<(), ParseError> {
        let next = if let Some(t) = self.peeked.take() {
            t
        } else {
            self.lexer.next_token()
        };
        self.previous = core::mem::replace(&mut self.current, next);
        Ok(())
    }

    fn peek_ahead(&mut self) -> Result<TokenKind, ParseError> {
        if self.peeked.is_none() {
            let mut clone = self.lexer.clone();
            self.peeked = Some(clone.next_token());
        }
        Ok(self.peeked.as_ref().expect("just filled").kind.clone())
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.current.as_keyword() == Some(kw)
    }

    fn eat_keyword(&mut self, kw: Keyword) -> Result<bool, ParseError> {
        if self.check_keyword(kw) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(kw) {
            self.advance()
        } else {
            Err(self.error_unexpected(kw.as_str()))
        }
    }

    fn eat_kind(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        if &self.current.kind == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_kind(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if &self.current.kind == kind {
            self.advance()
        } else {
            Err(self.error_unexpected(&format!("{kind:?}")))
        }
    }

    fn error_unexpected(&self, expected: &str) -> ParseError {
        if matches!(self.current.kind, TokenKind::Eof) {
            ParseError::unexpected_eof(expected, self.current.span)
        } else {
            ParseError::unexpected(expected, self.current.kind.clone(), self.current.span)
        }
    }

    /// An identifier or keyword used in identifier position — DuckDB treats
    /// most keywords as usable column/table names, so any keyword not
    /// claimed by a more specific grammar rule falls back to its uppercase
    /// spelling here.
    fn parse_name(&mut self) -> Result<(String, bool), ParseError> {
        match self.current.kind.clone() {
            TokenKind::Identifier { text, quoted } => {
                self.advance()?;
                Ok((text, quoted))
            }
            TokenKind::Keyword(kw) => {
                self.advance()?;
                Ok((kw.as_str().to_string(), false))
            }
            _ => Err(self.error_unexpected("an identifier")),
        }
    }

    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.parse_name()?.0];
        while self.eat_kind(&TokenKind::Comma)? {
            names.push(self.parse_name()?.0);
        }
        Ok(names)
    }

    /// Captures the raw source text from the current token up to (but not
    /// including) the matching `)`, given that the opening `(` has already
    /// been consumed. Used for opaque type parameters like `DECIMAL(10, 2)`.
    fn capture_balanced_parens_text(&mut self) -> Result<String, ParseError> {
        let start = self.current.span.start;
        let mut depth: i32 = 1;
        let mut end = start;
        loop {
            match &self.current.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eof => return Err(self.error_unexpected("')'")),
                _ => {}
            }
            end = self.current.span.end;
            self.advance()?;
        }
        self.advance()?; // the matching ')'
        Ok(self.input[start..end].to_string())
    }

    /// Captures the raw source text of a verbatim (DDL/utility) statement,
    /// stopping at a top-level `;` or end of input.
    fn capture_verbatim(&mut self) -> Result<String, ParseError> {
        let start = self.current.span.start;
        let mut end = self.current.span.end;
        let mut depth: i32 = 0;
        loop {
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            end = self.current.span.end;
            self.advance()?;
        }
        Ok(self.input[start..end].to_string())
    }

    // ---- top level --------------------------------------------------

    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::With | Keyword::Select) => {
                Ok(Statement::Select(self.parse_select_statement()?))
            }
            TokenKind::Keyword(Keyword::Insert) => Ok(Statement::Insert(self.parse_insert_statement()?)),
            TokenKind::Keyword(Keyword::Update) => Ok(Statement::Update(self.parse_update_statement()?)),
            TokenKind::Keyword(Keyword::Delete) => Ok(Statement::Delete(self.parse_delete_statement()?)),
            TokenKind::Keyword(Keyword::Create | Keyword::Drop | Keyword::Alter | Keyword::Truncate) => {
                Ok(Statement::Ddl(self.parse_ddl()?))
            }
            TokenKind::Keyword(
                Keyword::Copy
                | Keyword::Export
                | Keyword::Import
                | Keyword::Pragma
                | Keyword::Call
                | Keyword::Install
                | Keyword::Load
                | Keyword::Attach
                | Keyword::Detach
                | Keyword::Use
                | Keyword::Describe
                | Keyword::Show
                | Keyword::Explain
                | Keyword::Summarize
                | Keyword::Vacuum
                | Keyword::Checkpoint
                | Keyword::Reindex
                | Keyword::Grant
                | Keyword::Revoke
                | Keyword::Reset
                | Keyword::Prepare
                | Keyword::Execute
                | Keyword::Deallocate
                | Keyword::Begin
                | Keyword::Commit
                | Keyword::Rollback
                | Keyword::Transaction,
            ) => Ok(Statement::Utility(self.parse_utility()?)),
            _ => Err(self.error_unexpected("a statement")),
        }
    }

    /// Parses a standalone expression (used by `parse_expr` in the facade).
    pub fn parse_expression_only(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr(0)
    }

    fn parse_ddl(&mut self) -> Result<Ddl, ParseError> {
        let kind = self
            .current
            .as_keyword()
            .expect("ddl dispatch only called on a keyword token")
            .as_str()
            .to_string();
        let sql = self.capture_verbatim()?;
        Ok(Ddl { kind, sql })
    }

    fn parse_utility(&mut self) -> Result<Utility, ParseError> {
        let kind = self
            .current
            .as_keyword()
            .expect("utility dispatch only called on a keyword token")
            .as_str()
            .to_string();
        let sql = self.capture_verbatim()?;
        Ok(Utility { kind, sql })
    }

    // ---- SELECT -------------------------------------------------------

    fn parse_select_statement(&mut self) -> Result<Box<SelectStatement>, ParseError> {
        let with = if self.check_keyword(Keyword::With) {
            Some(self.parse_with()?)
        } else {
            None
        };
        let body = self.parse_select_body()?;
        let order_by = self.parse_optional_order_by()?;
        let limit = self.parse_optional_limit()?;
        let offset = if self.eat_keyword(Keyword::Offset)? {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let sample = self.parse_optional_sample()?;
        Ok(Box::new(SelectStatement {
            with,
            body,
            order_by,
            limit,
            offset,
            sample,
        }))
    }

    fn parse_with(&mut self) -> Result<With, ParseError> {
        self.advance()?; // WITH
        let recursive = self.eat_keyword(Keyword::Recursive)?;
        let mut ctes = vec![self.parse_cte()?];
        while self.eat_kind(&TokenKind::Comma)? {
            ctes.push(self.parse_cte()?);
        }
        Ok(With { recursive, ctes })
    }

    fn parse_cte(&mut self) -> Result<Cte, ParseError> {
        let (name, _) = self.parse_name()?;
        let columns = if self.eat_kind(&TokenKind::LeftParen)? {
            let c = self.parse_name_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            c
        } else {
            vec![]
        };
        self.expect_keyword(Keyword::As)?;
        let materialized = if self.eat_keyword(Keyword::Materialized)? {
            Some(true)
        } else if self.check_keyword(Keyword::Not) && matches!(self.peek_ahead()?, TokenKind::Keyword(Keyword::Materialized)) {
            self.advance()?;
            self.advance()?;
            Some(false)
        } else {
            None
        };
        self.expect_kind(&TokenKind::LeftParen)?;
        let query = self.parse_select_statement()?;
        self.expect_kind(&TokenKind::RightParen)?;
        Ok(Cte {
            name,
            columns,
            materialized,
            query,
        })
    }

    fn parse_select_body(&mut self) -> Result<SelectBody, ParseError> {
        let mut left = self.parse_intersect_chain()?;
        loop {
            if self.check_keyword(Keyword::Union) || self.check_keyword(Keyword::Except) {
                let op = if self.eat_keyword(Keyword::Union)? {
                    SetOperator::Union
                } else {
                    self.advance()?;
                    SetOperator::Except
                };
                let all = self.eat_keyword(Keyword::All)?;
                let _ = self.eat_keyword(Keyword::Distinct)?;
                let by_name = if self.eat_keyword(Keyword::By)? {
                    self.expect_keyword(Keyword::Name)?;
                    true
                } else {
                    false
                };
                let right = self.parse_intersect_chain()?;
                left = SelectBody::SetOp {
                    left: Box::new(left),
                    op,
                    all,
                    by_name,
                    right: Box::new(right),
                };
                continue;
            }
            break;
        }
        Ok(left)
    }

    fn parse_intersect_chain(&mut self) -> Result<SelectBody, ParseError> {
        let mut left = self.parse_core_or_values()?;
        while self.check_keyword(Keyword::Intersect) {
            self.advance()?;
            let all = self.eat_keyword(Keyword::All)?;
            let _ = self.eat_keyword(Keyword::Distinct)?;
            let by_name = if self.eat_keyword(Keyword::By)? {
                self.expect_keyword(Keyword::Name)?;
                true
            } else {
                false
            };
            let right = self.parse_core_or_values()?;
            left = SelectBody::SetOp {
                left: Box::new(left),
                op: SetOperator::Intersect,
                all,
                by_name,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_core_or_values(&mut self) -> Result<SelectBody, ParseError> {
        if self.check_keyword(Keyword::Values) {
            self.advance()?;
            Ok(SelectBody::Values(self.parse_values_rows()?))
        } else if matches!(self.current.kind, TokenKind::LeftParen) {
            self.advance()?;
            let inner = self.parse_select_body()?;
            self.expect_kind(&TokenKind::RightParen)?;
            Ok(inner)
        } else {
            Ok(SelectBody::Core(self.parse_select_core()?))
        }
    }

    fn parse_values_rows(&mut self) -> Result<Vec<Vec<Expr>>, ParseError> {
        let mut rows = vec![self.parse_values_row()?];
        while self.eat_kind(&TokenKind::Comma)? {
            rows.push(self.parse_values_row()?);
        }
        Ok(rows)
    }

    fn parse_values_row(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_kind(&TokenKind::LeftParen)?;
        let items = self.parse_expr_list()?;
        self.expect_kind(&TokenKind::RightParen)?;
        Ok(items)
    }

    fn parse_select_core(&mut self) -> Result<Box<SelectCore>, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let mut distinct = false;
        let mut distinct_on = vec![];
        if self.eat_keyword(Keyword::Distinct)? {
            distinct = true;
            if self.eat_keyword(Keyword::On)? {
                self.expect_kind(&TokenKind::LeftParen)?;
                distinct_on = self.parse_expr_list()?;
                self.expect_kind(&TokenKind::RightParen)?;
            }
        } else {
            let _ = self.eat_keyword(Keyword::All)?;
        }
        let columns = self.parse_select_items()?;
        let from = if self.eat_keyword(Keyword::From)? {
            Some(self.parse_table_ref()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let group_by = self.parse_group_by()?;
        let having = if self.eat_keyword(Keyword::Having)? {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let qualify = if self.eat_keyword(Keyword::Qualify)? {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let windows = self.parse_window_clause()?;
        Ok(Box::new(SelectCore {
            distinct,
            distinct_on,
            columns,
            from,
            where_clause,
            group_by,
            having,
            qualify,
            windows,
        }))
    }

    fn parse_select_items(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = vec![self.parse_select_item()?];
        while self.eat_kind(&TokenKind::Comma)? {
            items.push(self.parse_select_item()?);
        }
        Ok(items)
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, ParseError> {
        if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            if matches!(self.peek_ahead()?, TokenKind::Colon) {
                self.advance()?; // name
                self.advance()?; // :
                let expr = self.parse_expr(0)?;
                return Ok(SelectItem {
                    expr,
                    alias: Some(text),
                });
            }
        }
        let expr = self.parse_expr(0)?;
        let alias = if self.eat_keyword(Keyword::As)? {
            Some(self.parse_name()?.0)
        } else if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            self.advance()?;
            Some(text)
        } else {
            None
        };
        Ok(SelectItem { expr, alias })
    }

    fn parse_group_by(&mut self) -> Result<GroupByClause, ParseError> {
        if self.eat_keyword(Keyword::Group)? {
            self.expect_keyword(Keyword::By)?;
            if self.eat_keyword(Keyword::All)? {
                Ok(GroupByClause::All)
            } else {
                Ok(GroupByClause::Exprs(self.parse_group_by_items()?))
            }
        } else {
            Ok(GroupByClause::None)
        }
    }

    fn parse_group_by_items(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = vec![self.parse_group_by_item()?];
        while self.eat_kind(&TokenKind::Comma)? {
            items.push(self.parse_group_by_item()?);
        }
        Ok(items)
    }

    fn parse_group_by_item(&mut self) -> Result<Expr, ParseError> {
        if self.check_keyword(Keyword::Cube) {
            self.advance()?;
            self.expect_kind(&TokenKind::LeftParen)?;
            let sets = self.parse_grouping_set_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            return Ok(Expr::GroupingSets {
                kind: GroupingKind::Cube,
                sets,
            });
        }
        if self.check_keyword(Keyword::Rollup) {
            self.advance()?;
            self.expect_kind(&TokenKind::LeftParen)?;
            let sets = self.parse_grouping_set_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            return Ok(Expr::GroupingSets {
                kind: GroupingKind::Rollup,
                sets,
            });
        }
        if self.check_keyword(Keyword::Grouping) && matches!(self.peek_ahead()?, TokenKind::Keyword(Keyword::Sets)) {
            self.advance()?;
            self.advance()?;
            self.expect_kind(&TokenKind::LeftParen)?;
            let sets = self.parse_grouping_set_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            return Ok(Expr::GroupingSets {
                kind: GroupingKind::GroupingSets,
                sets,
            });
        }
        self.parse_expr(0)
    }

    fn parse_grouping_set_list(&mut self) -> Result<Vec<Vec<Expr>>, ParseError> {
        let mut sets = vec![self.parse_grouping_set_item()?];
        while self.eat_kind(&TokenKind::Comma)? {
            sets.push(self.parse_grouping_set_item()?);
        }
        Ok(sets)
    }

    fn parse_grouping_set_item(&mut self) -> Result<Vec<Expr>, ParseError> {
        if self.eat_kind(&TokenKind::LeftParen)? {
            if matches!(self.current.kind, TokenKind::RightParen) {
                self.advance()?;
                return Ok(vec![]);
            }
            let items = self.parse_expr_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            Ok(items)
        } else {
            Ok(vec![self.parse_expr(0)?])
        }
    }

    fn parse_window_clause(&mut self) -> Result<Vec<NamedWindow>, ParseError> {
        if self.eat_keyword(Keyword::Window)? {
            let mut list = vec![self.parse_named_window()?];
            while self.eat_kind(&TokenKind::Comma)? {
                list.push(self.parse_named_window()?);
            }
            Ok(list)
        } else {
            Ok(vec![])
        }
    }

    fn parse_named_window(&mut self) -> Result<NamedWindow, ParseError> {
        let (name, _) = self.parse_name()?;
        self.expect_keyword(Keyword::As)?;
        let def = self.parse_window_def_body()?;
        Ok(NamedWindow { name, def })
    }

    fn parse_window_def_body(&mut self) -> Result<WindowDef, ParseError> {
        self.expect_kind(&TokenKind::LeftParen)?;
        let base_window = if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            if matches!(
                self.peek_ahead()?,
                TokenKind::Keyword(Keyword::Partition | Keyword::Order | Keyword::Rows | Keyword::Range | Keyword::Groups)
                    | TokenKind::RightParen
            ) {
                self.advance()?;
                Some(text)
            } else {
                None
            }
        } else {
            None
        };
        let partition_by = if self.eat_keyword(Keyword::Partition)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_expr_list()?
        } else {
            vec![]
        };
        let order_by = if self.eat_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_items()?
        } else {
            vec![]
        };
        let frame = self.parse_optional_frame()?;
        self.expect_kind(&TokenKind::RightParen)?;
        Ok(WindowDef {
            base_window,
            partition_by,
            order_by,
            frame,
        })
    }

    fn parse_optional_frame(&mut self) -> Result<Option<WindowFrame>, ParseError> {
        let units = if self.eat_keyword(Keyword::Rows)? {
            FrameUnit::Rows
        } else if self.eat_keyword(Keyword::Range)? {
            FrameUnit::Range
        } else if self.eat_keyword(Keyword::Groups)? {
            FrameUnit::Groups
        } else {
            return Ok(None);
        };
        if self.eat_keyword(Keyword::Between)? {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            let end = Some(self.parse_frame_bound()?);
            Ok(Some(WindowFrame { units, start, end }))
        } else {
            let start = self.parse_frame_bound()?;
            Ok(Some(WindowFrame { units, start, end: None }))
        }
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.eat_keyword(Keyword::Unbounded)? {
            if self.eat_keyword(Keyword::Preceding)? {
                Ok(FrameBound::UnboundedPreceding)
            } else {
                self.expect_keyword(Keyword::Following)?;
                Ok(FrameBound::UnboundedFollowing)
            }
        } else if self.eat_keyword(Keyword::Current)? {
            self.expect_keyword(Keyword::Row)?;
            Ok(FrameBound::CurrentRow)
        } else {
            let e = self.parse_expr(0)?;
            if self.eat_keyword(Keyword::Preceding)? {
                Ok(FrameBound::Preceding(Box::new(e)))
            } else {
                self.expect_keyword(Keyword::Following)?;
                Ok(FrameBound::Following(Box::new(e)))
            }
        }
    }

    fn parse_optional_order_by(&mut self) -> Result<OrderByClause, ParseError> {
        if self.eat_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            if self.check_keyword(Keyword::All) {
                self.advance()?;
                let direction = self.parse_optional_direction()?;
                Ok(OrderByClause::All { direction })
            } else {
                Ok(OrderByClause::Items(self.parse_order_by_items()?))
            }
        } else {
            Ok(OrderByClause::None)
        }
    }

    fn parse_order_by_items(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        let mut items = vec![self.parse_order_by_item()?];
        while self.eat_kind(&TokenKind::Comma)? {
            items.push(self.parse_order_by_item()?);
        }
        Ok(items)
    }

    fn parse_order_by_item(&mut self) -> Result<OrderByItem, ParseError> {
        let expr = self.parse_expr(0)?;
        let direction = self.parse_optional_direction()?;
        let nulls = self.parse_optional_nulls()?;
        Ok(OrderByItem { expr, direction, nulls })
    }

    fn parse_optional_direction(&mut self) -> Result<OrderDirection, ParseError> {
        if self.eat_keyword(Keyword::Asc)? {
            Ok(OrderDirection::Asc)
        } else if self.eat_keyword(Keyword::Desc)? {
            Ok(OrderDirection::Desc)
        } else {
            Ok(OrderDirection::Asc)
        }
    }

    fn parse_optional_nulls(&mut self) -> Result<Option<NullOrdering>, ParseError> {
        if self.eat_keyword(Keyword::Nulls)? {
            if self.eat_keyword(Keyword::First)? {
                Ok(Some(NullOrdering::First))
            } else {
                self.expect_keyword(Keyword::Last)?;
                Ok(Some(NullOrdering::Last))
            }
        } else {
            Ok(None)
        }
    }

    fn parse_optional_limit(&mut self) -> Result<Option<LimitClause>, ParseError> {
        if self.eat_keyword(Keyword::Limit)? {
            let count = self.parse_expr(0)?;
            let percent = self.eat_keyword(Keyword::Percent)?;
            Ok(Some(LimitClause {
                count,
                percent,
                with_ties: false,
            }))
        } else if self.check_keyword(Keyword::Fetch) {
            self.advance()?;
            let _ = self.eat_keyword(Keyword::First)? || self.eat_keyword(Keyword::Next)?;
            let count = self.parse_expr(0)?;
            let percent = self.eat_keyword(Keyword::Percent)?;
            let _ = self.eat_keyword(Keyword::Row)? || self.eat_keyword(Keyword::Rows)?;
            let with_ties = if self.eat_keyword(Keyword::With)? {
                self.expect_keyword(Keyword::Ties)?;
                true
            } else {
                let _ = self.eat_keyword(Keyword::Only)?;
                false
            };
            Ok(Some(LimitClause {
                count,
                percent,
                with_ties,
            }))
        } else {
            Ok(None)
        }
    }

    fn parse_optional_sample(&mut self) -> Result<Option<SampleClause>, ParseError> {
        if self.eat_keyword(Keyword::Using)? {
            self.expect_keyword(Keyword::Sample)?;
            Ok(Some(self.parse_sample_body()?))
        } else if self.check_keyword(Keyword::Tablesample) {
            self.advance()?;
            Ok(Some(self.parse_sample_body()?))
        } else {
            Ok(None)
        }
    }

    fn parse_sample_body(&mut self) -> Result<SampleClause, ParseError> {
        let method = if self.check_keyword(Keyword::Bernoulli) || self.check_keyword(Keyword::System) {
            let m = self.current.as_keyword().expect("checked above").as_str().to_string();
            self.advance()?;
            Some(m)
        } else if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            if matches!(self.peek_ahead()?, TokenKind::LeftParen) {
                self.advance()?;
                Some(text)
            } else {
                None
            }
        } else {
            None
        };
        let has_parens = self.eat_kind(&TokenKind::LeftParen)?;
        let size = self.parse_expr(0)?;
        let percent = self.eat_keyword(Keyword::Percent)?;
        if has_parens {
            self.expect_kind(&TokenKind::RightParen)?;
        }
        Ok(SampleClause { size, percent, method })
    }

    // ---- FROM / joins ---------------------------------------------------

    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let mut left = self.parse_table_ref_primary()?;
        loop {
            if self.eat_kind(&TokenKind::Comma)? {
                let right = self.parse_table_ref_primary()?;
                left = TableRef::Join {
                    left: Box::new(left),
                    op: JoinOperator::Comma,
                    natural: false,
                    right: Box::new(right),
                    constraint: JoinConstraint::None,
                };
                continue;
            }
            if let Some((op, natural)) = self.parse_join_operator()? {
                let right = self.parse_table_ref_primary()?;
                let constraint = self.parse_join_constraint()?;
                left = TableRef::Join {
                    left: Box::new(left),
                    op,
                    natural,
                    right: Box::new(right),
                    constraint,
                };
                continue;
            }
            break;
        }
        Ok(left)
    }

    fn parse_join_operator(&mut self) -> Result<Option<(JoinOperator, bool)>, ParseError> {
        let natural = self.eat_keyword(Keyword::Natural)?;
        if self.eat_keyword(Keyword::Inner)? {
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Inner, natural)));
        }
        if self.eat_keyword(Keyword::Left)? {
            if self.eat_keyword(Keyword::Semi)? {
                self.expect_keyword(Keyword::Join)?;
                return Ok(Some((JoinOperator::LeftSemi, natural)));
            }
            if self.eat_keyword(Keyword::Anti)? {
                self.expect_keyword(Keyword::Join)?;
                return Ok(Some((JoinOperator::LeftAnti, natural)));
            }
            let _ = self.eat_keyword(Keyword::Outer)?;
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Left, natural)));
        }
        if self.eat_keyword(Keyword::Right)? {
            if self.eat_keyword(Keyword::Semi)? {
                self.expect_keyword(Keyword::Join)?;
                return Ok(Some((JoinOperator::RightSemi, natural)));
            }
            if self.eat_keyword(Keyword::Anti)? {
                self.expect_keyword(Keyword::Join)?;
                return Ok(Some((JoinOperator::RightAnti, natural)));
            }
            let _ = self.eat_keyword(Keyword::Outer)?;
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Right, natural)));
        }
        if self.eat_keyword(Keyword::Full)? {
            let _ = self.eat_keyword(Keyword::Outer)?;
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Full, natural)));
        }
        if self.eat_keyword(Keyword::Cross)? {
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Cross, natural)));
        }
        if self.eat_keyword(Keyword::Semi)? {
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Semi, natural)));
        }
        if self.eat_keyword(Keyword::Anti)? {
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Anti, natural)));
        }
        if self.eat_keyword(Keyword::Asof)? {
            if self.eat_keyword(Keyword::Left)? {
                let _ = self.eat_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                return Ok(Some((JoinOperator::AsofLeft, natural)));
            }
            if self.eat_keyword(Keyword::Right)? {
                let _ = self.eat_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                return Ok(Some((JoinOperator::AsofRight, natural)));
            }
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Asof, natural)));
        }
        if self.eat_keyword(Keyword::Positional)? {
            self.expect_keyword(Keyword::Join)?;
            return Ok(Some((JoinOperator::Positional, natural)));
        }
        if self.eat_keyword(Keyword::Join)? {
            return Ok(Some((JoinOperator::Inner, natural)));
        }
        if natural {
            return Err(self.error_unexpected("JOIN after NATURAL"));
        }
        Ok(None)
    }

    fn parse_join_constraint(&mut self) -> Result<JoinConstraint, ParseError> {
        if self.eat_keyword(Keyword::On)? {
            Ok(JoinConstraint::On(Box::new(self.parse_expr(0)?)))
        } else if self.eat_keyword(Keyword::Using)? {
            self.expect_kind(&TokenKind::LeftParen)?;
            let cols = self.parse_name_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            Ok(JoinConstraint::Using(cols))
        } else {
            Ok(JoinConstraint::None)
        }
    }

    fn parse_table_ref_primary(&mut self) -> Result<TableRef, ParseError> {
        let factor = self.parse_table_factor()?;
        let factor = self.parse_pivot_unpivot_suffix(factor)?;
        let sample = self.parse_optional_sample()?;
        Ok(TableRef::Factor { factor, sample })
    }

    fn parse_table_factor(&mut self) -> Result<TableFactor, ParseError> {
        let lateral = self.eat_keyword(Keyword::Lateral)?;
        if matches!(self.current.kind, TokenKind::LeftParen) {
            self.advance()?;
            let query = self.parse_select_statement()?;
            self.expect_kind(&TokenKind::RightParen)?;
            let alias = self.parse_optional_table_alias()?;
            return Ok(TableFactor::Derived { query, lateral, alias });
        }
        if let TokenKind::String(path) = self.current.kind.clone() {
            self.advance()?;
            let alias = self.parse_optional_table_alias()?;
            return Ok(TableFactor::StringSource { path, alias });
        }
        let mut parts = vec![self.parse_name()?.0];
        while self.eat_kind(&TokenKind::Dot)? {
            parts.push(self.parse_name()?.0);
        }
        if matches!(self.current.kind, TokenKind::LeftParen) {
            let parts_pairs: Vec<(String, bool)> = parts.into_iter().map(|p| (p, false)).collect();
            let call = self.parse_function_call(parts_pairs)?;
            let with_ordinality = if self.eat_keyword(Keyword::With)? {
                self.expect_keyword(Keyword::Ordinality)?;
                true
            } else {
                false
            };
            let alias = self.parse_optional_table_alias()?;
            return Ok(TableFactor::Function {
                call: Box::new(call),
                lateral,
                with_ordinality,
                alias,
            });
        }
        let name = parts.pop().expect("at least one part parsed above");
        let (catalog, schema) = match parts.len() {
            0 => (None, None),
            1 => (None, parts.pop()),
            _ => {
                let schema = parts.pop();
                (Some(parts.join(".")), schema)
            }
        };
        let alias = self.parse_optional_table_alias()?;
        Ok(TableFactor::Table {
            catalog,
            schema,
            name,
            alias,
        })
    }

    fn parse_optional_table_alias(&mut self) -> Result<Option<TableAlias>, ParseError> {
        let has_as = self.eat_keyword(Keyword::As)?;
        let name = if has_as {
            Some(self.parse_name()?.0)
        } else if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            self.advance()?;
            Some(text)
        } else {
            None
        };
        let Some(name) = name else { return Ok(None) };
        let columns = if self.eat_kind(&TokenKind::LeftParen)? {
            let cols = self.parse_name_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };
        Ok(Some(TableAlias { name, columns }))
    }

    fn parse_pivot_unpivot_suffix(&mut self, factor: TableFactor) -> Result<TableFactor, ParseError> {
        if self.eat_keyword(Keyword::Pivot)? {
            self.expect_kind(&TokenKind::LeftParen)?;
            let mut aggregates = vec![self.parse_pivot_aggregate()?];
            while self.eat_kind(&TokenKind::Comma)? {
                aggregates.push(self.parse_pivot_aggregate()?);
            }
            self.expect_keyword(Keyword::For)?;
            let (for_column, _) = self.parse_name()?;
            self.expect_keyword(Keyword::In)?;
            self.expect_kind(&TokenKind::LeftParen)?;
            let values = if matches!(self.current.kind, TokenKind::Star) {
                self.advance()?;
                PivotValues::Star
            } else {
                PivotValues::List(self.parse_expr_list()?)
            };
            self.expect_kind(&TokenKind::RightParen)?;
            self.expect_kind(&TokenKind::RightParen)?;
            let alias = self.parse_optional_table_alias()?;
            return Ok(TableFactor::Pivot(Box::new(PivotTable {
                source: Box::new(TableRef::Factor { factor, sample: None }),
                aggregates,
                for_column,
                values,
                group_by: vec![],
                alias,
            })));
        }
        if self.eat_keyword(Keyword::Unpivot)? {
            self.expect_kind(&TokenKind::LeftParen)?;
            let (value_column, _) = self.parse_name()?;
            self.expect_keyword(Keyword::For)?;
            let (name_column, _) = self.parse_name()?;
            self.expect_keyword(Keyword::In)?;
            self.expect_kind(&TokenKind::LeftParen)?;
            let mut groups = vec![];
            loop {
                if self.eat_kind(&TokenKind::LeftParen)? {
                    let cols = self.parse_name_list()?;
                    self.expect_kind(&TokenKind::RightParen)?;
                    let alias = if self.eat_keyword(Keyword::As)? {
                        Some(self.parse_name()?.0)
                    } else {
                        None
                    };
                    groups.push(UnpivotGroup { columns: cols, alias });
                } else {
                    let (n, _) = self.parse_name()?;
                    groups.push(UnpivotGroup {
                        columns: vec![n],
                        alias: None,
                    });
                }
                if !self.eat_kind(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect_kind(&TokenKind::RightParen)?;
            self.expect_kind(&TokenKind::RightParen)?;
            let alias = self.parse_optional_table_alias()?;
            return Ok(TableFactor::Unpivot(Box::new(UnpivotTable {
                source: Box::new(TableRef::Factor { factor, sample: None }),
                value_columns: vec![value_column],
                name_column,
                groups,
                include_nulls: false,
                alias,
            })));
        }
        Ok(factor)
    }

    fn parse_pivot_aggregate(&mut self) -> Result<PivotAggregate, ParseError> {
        let expr = self.parse_expr(0)?;
        let alias = if self.eat_keyword(Keyword::As)? {
            Some(self.parse_name()?.0)
        } else {
            None
        };
        Ok(PivotAggregate { expr, alias })
    }

    // ---- expressions ------------------------------------------------

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = vec![self.parse_expr(0)?];
        while self.eat_kind(&TokenKind::Comma)? {
            items.push(self.parse_expr(0)?);
        }
        Ok(items)
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix_expr()?;
        loop {
            lhs = self.parse_postfix_chain(lhs)?;

            if let Some(kw) = self.peek_negatable_infix_keyword()? {
                if 7 < min_bp {
                    break;
                }
                self.advance()?; // NOT
                lhs = self.parse_keyword_infix_with_kw(lhs, kw, true)?;
                continue;
            }

            if matches!(self.current.kind, TokenKind::Keyword(Keyword::Is)) {
                if 7 < min_bp {
                    break;
                }
                lhs = self.parse_is_expr(lhs)?;
                continue;
            }

            if matches!(
                self.current.kind,
                TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like | Keyword::Ilike | Keyword::Glob | Keyword::Similar)
            ) {
                if 7 < min_bp {
                    break;
                }
                let kw = self.current.as_keyword().expect("matched above");
                lhs = self.parse_keyword_infix_with_kw(lhs, kw, false)?;
                continue;
            }

            if let Some((lbp, rbp)) = infix_binding_power(&self.current.kind) {
                if lbp < min_bp {
                    break;
                }
                if let Some(op) = token_to_binary_op(&self.current.kind) {
                    if op.is_comparison() && matches!(self.peek_ahead()?, TokenKind::Keyword(Keyword::Any | Keyword::All | Keyword::Some)) {
                        self.advance()?; // operator
                        let quantifier = match self.current.as_keyword().expect("matched above") {
                            Keyword::Any => AnyAllKind::Any,
                            Keyword::All => AnyAllKind::All,
                            Keyword::Some => AnyAllKind::Some,
                            _ => unreachable!("peek_ahead matched only ANY|ALL|SOME"),
                        };
                        self.advance()?; // ANY/ALL/SOME
                        self.expect_kind(&TokenKind::LeftParen)?;
                        let subquery = self.parse_select_statement()?;
                        self.expect_kind(&TokenKind::RightParen)?;
                        lhs = Expr::AnyAll {
                            left: Box::new(lhs),
                            op,
                            quantifier,
                            subquery,
                        };
                        continue;
                    }
                    self.advance()?;
                    let rhs = self.parse_expr(rbp)?;
                    lhs = Expr::Binary {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(rhs),
                    };
                    continue;
                }
            }
            break;
        }
        Ok(lhs)
    }

    fn peek_negatable_infix_keyword(&mut self) -> Result<Option<Keyword>, ParseError> {
        if matches!(self.current.kind, TokenKind::Keyword(Keyword::Not)) {
            if let TokenKind::Keyword(kw @ (Keyword::In | Keyword::Between | Keyword::Like | Keyword::Ilike | Keyword::Glob | Keyword::Similar)) =
                self.peek_ahead()?
            {
                return Ok(Some(kw));
            }
        }
        Ok(None)
    }

    fn parse_keyword_infix_with_kw(&mut self, lhs: Expr, kw: Keyword, negated: bool) -> Result<Expr, ParseError> {
        self.advance()?; // consume the dispatching keyword (IN/BETWEEN/LIKE/...)
        match kw {
            Keyword::In => self.parse_in_tail(lhs, negated),
            Keyword::Between => self.parse_between_tail(lhs, negated),
            Keyword::Like => self.parse_like_tail(lhs, negated, false),
            Keyword::Ilike => self.parse_like_tail(lhs, negated, true),
            Keyword::Glob => {
                let pattern = self.parse_expr(19)?;
                Ok(Expr::Glob {
                    expr: Box::new(lhs),
                    pattern: Box::new(pattern),
                    negated,
                })
            }
            Keyword::Similar => {
                self.expect_keyword(Keyword::To)?;
                let pattern = self.parse_expr(19)?;
                let escape = if self.eat_keyword(Keyword::Escape)? {
                    Some(Box::new(self.parse_expr(19)?))
                } else {
                    None
                };
                Ok(Expr::SimilarTo {
                    expr: Box::new(lhs),
                    pattern: Box::new(pattern),
                    escape,
                    negated,
                })
            }
            _ => unreachable!("only called with IN/BETWEEN/LIKE/ILIKE/GLOB/SIMILAR"),
        }
    }

    fn parse_in_tail(&mut self, lhs: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect_kind(&TokenKind::LeftParen)?;
        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let sel = self.parse_select_statement()?;
            self.expect_kind(&TokenKind::RightParen)?;
            Ok(Expr::In {
                expr: Box::new(lhs),
                list: InList::Subquery(sel),
                negated,
            })
        } else {
            let values = self.parse_expr_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            Ok(Expr::In {
                expr: Box::new(lhs),
                list: InList::Values(values),
                negated,
            })
        }
    }

    fn parse_between_tail(&mut self, lhs: Expr, negated: bool) -> Result<Expr, ParseError> {
        let low = self.parse_expr(5)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expr(5)?;
        Ok(Expr::Between {
            expr: Box::new(lhs),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        })
    }

    fn parse_like_tail(&mut self, lhs: Expr, negated: bool, case_insensitive: bool) -> Result<Expr, ParseError> {
        let pattern = self.parse_expr(19)?;
        let escape = if self.eat_keyword(Keyword::Escape)? {
            Some(Box::new(self.parse_expr(19)?))
        } else {
            None
        };
        Ok(Expr::Like {
            expr: Box::new(lhs),
            pattern: Box::new(pattern),
            escape,
            case_insensitive,
            negated,
        })
    }

    fn parse_is_expr(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        self.advance()?; // IS
        let negated = self.eat_keyword(Keyword::Not)?;
        if self.eat_keyword(Keyword::Null)? {
            Ok(Expr::IsNull {
                expr: Box::new(lhs),
                negated,
            })
        } else if self.eat_keyword(Keyword::True)? {
            Ok(Expr::IsBool {
                expr: Box::new(lhs),
                value: true,
                negated,
            })
        } else if self.eat_keyword(Keyword::False)? {
            Ok(Expr::IsBool {
                expr: Box::new(lhs),
                value: false,
                negated,
            })
        } else if self.eat_keyword(Keyword::Distinct)? {
            self.expect_keyword(Keyword::From)?;
            let right = self.parse_expr(7)?;
            Ok(Expr::IsDistinctFrom {
                left: Box::new(lhs),
                right: Box::new(right),
                negated,
            })
        } else {
            Err(self.error_unexpected("NULL, TRUE, FALSE, or DISTINCT FROM after IS"))
        }
    }

    fn parse_postfix_chain(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match &self.current.kind {
                TokenKind::DoubleColon => {
                    self.advance()?;
                    let data_type = self.parse_data_type()?;
                    expr = Expr::TypeCast {
                        expr: Box::new(expr),
                        data_type,
                    };
                }
                TokenKind::LeftBracket => {
                    self.advance()?;
                    let start = if matches!(self.current.kind, TokenKind::Colon) {
                        None
                    } else {
                        Some(Box::new(self.parse_expr(0)?))
                    };
                    if self.eat_kind(&TokenKind::Colon)? {
                        let stop = if matches!(self.current.kind, TokenKind::RightBracket) {
                            None
                        } else {
                            Some(Box::new(self.parse_expr(0)?))
                        };
                        self.expect_kind(&TokenKind::RightBracket)?;
                        expr = Expr::Slice {
                            expr: Box::new(expr),
                            start,
                            stop,
                        };
                    } else {
                        let index = start.ok_or_else(|| self.error_unexpected("an index expression"))?;
                        self.expect_kind(&TokenKind::RightBracket)?;
                        expr = Expr::Index {
                            expr: Box::new(expr),
                            index,
                        };
                    }
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    self.advance()?;
                    let (collation, _) = self.parse_name()?;
                    expr = Expr::Collate {
                        expr: Box::new(expr),
                        collation,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_prefix_expr(&mut self) -> Result<Expr, ParseError> {
        if let Some(bp) = prefix_binding_power(&self.current.kind) {
            if let Some(op) = token_to_unary_op(&self.current.kind) {
                self.advance()?;
                let operand = self.parse_expr(bp)?;
                return Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current.kind.clone() {
            TokenKind::Number(text) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Number(text)))
            }
            TokenKind::String(text) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::String(text)))
            }
            TokenKind::QuestionMark => {
                self.param_counter += 1;
                let n = self.param_counter;
                self.advance()?;
                Ok(Expr::Parameter(Parameter::Positional(n)))
            }
            TokenKind::DollarNumber(n) => {
                self.advance()?;
                Ok(Expr::Parameter(Parameter::Numbered(n)))
            }
            TokenKind::DollarName(n) => {
                self.advance()?;
                Ok(Expr::Parameter(Parameter::Named(n)))
            }
            TokenKind::Star => {
                self.advance()?;
                let modifiers = self.parse_star_modifiers()?;
                Ok(Expr::Star(StarExpr { table: None, modifiers }))
            }
            TokenKind::LeftParen => self.parse_paren_expr(),
            TokenKind::LeftBracket => self.parse_list_or_comprehension(),
            TokenKind::LeftBrace => self.parse_struct_literal(),
            TokenKind::Identifier { .. } => self.parse_identifier_expr(),
            TokenKind::Keyword(kw) => self.parse_keyword_primary(kw),
            _ => Err(self.error_unexpected("an expression")),
        }
    }

    fn parse_keyword_primary(&mut self, kw: Keyword) -> Result<Expr, ParseError> {
        match kw {
            Keyword::Null => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Null))
            }
            Keyword::True => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            Keyword::False => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            Keyword::Default => {
                self.advance()?;
                Ok(Expr::Default)
            }
            Keyword::Case => self.parse_case_expr(),
            Keyword::Cast => {
                self.advance()?;
                self.parse_cast_expr_body(false)
            }
            Keyword::TryCast => {
                self.advance()?;
                self.parse_cast_expr_body(true)
            }
            Keyword::Try => {
                self.advance()?;
                self.expect_keyword(Keyword::Cast)?;
                self.parse_cast_expr_body(true)
            }
            Keyword::Exists => {
                self.advance()?;
                self.expect_kind(&TokenKind::LeftParen)?;
                let subquery = self.parse_select_statement()?;
                self.expect_kind(&TokenKind::RightParen)?;
                Ok(Expr::Exists { subquery, negated: false })
            }
            Keyword::Extract => self.parse_extract_expr(),
            Keyword::Interval => self.parse_interval_expr(),
            Keyword::Struct => {
                self.advance()?;
                self.finish_identifier_like("struct".to_string(), false)
            }
            Keyword::Map => self.parse_map_expr(),
            Keyword::List => {
                self.advance()?;
                self.finish_identifier_like("list".to_string(), false)
            }
            Keyword::Columns => self.parse_columns_expr(),
            Keyword::Grouping => {
                self.advance()?;
                self.finish_identifier_like("grouping".to_string(), false)
            }
            Keyword::Not => {
                self.advance()?;
                let operand = self.parse_expr(5)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                })
            }
            _ => {
                self.advance()?;
                self.finish_identifier_like(kw.as_str().to_string(), false)
            }
        }
    }

    fn parse_identifier_expr(&mut self) -> Result<Expr, ParseError> {
        let (name, quoted) = self.parse_name()?;
        self.finish_identifier_like(name, quoted)
    }

    fn finish_identifier_like(&mut self, first: String, first_quoted: bool) -> Result<Expr, ParseError> {
        let mut parts = vec![(first, first_quoted)];
        loop {
            if matches!(self.current.kind, TokenKind::Dot) {
                self.advance()?;
                if matches!(self.current.kind, TokenKind::Star) {
                    self.advance()?;
                    let table = parts.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>().join(".");
                    let modifiers = self.parse_star_modifiers()?;
                    return Ok(Expr::Star(StarExpr {
                        table: Some(table),
                        modifiers,
                    }));
                }
                let (name, quoted) = self.parse_name()?;
                parts.push((name, quoted));
            } else {
                break;
            }
        }

        if parts.len() == 1 && matches!(self.current.kind, TokenKind::Arrow) {
            self.advance()?;
            let body = self.parse_expr(0)?;
            return Ok(Expr::Lambda {
                params: vec![parts.remove(0).0],
                body: Box::new(body),
            });
        }

        if matches!(self.current.kind, TokenKind::LeftParen) {
            return self.parse_function_call(parts);
        }

        if parts.len() == 1 {
            let (name, quoted) = parts.remove(0);
            Ok(Expr::Column { table: None, name, quoted })
        } else {
            let (name, quoted) = parts.pop().expect("at least two parts in this branch");
            let table = parts.into_iter().map(|(t, _)| t).collect::<Vec<_>>().join(".");
            Ok(Expr::Column {
                table: Some(table),
                name,
                quoted,
            })
        }
    }

    fn parse_function_call(&mut self, mut parts: Vec<(String, bool)>) -> Result<Expr, ParseError> {
        let (name, _) = parts.pop().expect("caller always supplies at least one part");
        let schema = if parts.is_empty() {
            None
        } else {
            Some(parts.into_iter().map(|(t, _)| t).collect::<Vec<_>>().join("."))
        };
        self.advance()?; // (
        let distinct = self.eat_keyword(Keyword::Distinct)?;
        let _ = self.eat_keyword(Keyword::All)?;
        let (args, star) = if matches!(self.current.kind, TokenKind::Star) {
            self.advance()?;
            (vec![], true)
        } else if matches!(self.current.kind, TokenKind::RightParen) {
            (vec![], false)
        } else {
            (self.parse_call_args()?, false)
        };
        let order_by = if self.eat_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_items()?
        } else {
            vec![]
        };
        self.expect_kind(&TokenKind::RightParen)?;

        let filter = if self.check_keyword(Keyword::Filter) {
            self.advance()?;
            self.expect_kind(&TokenKind::LeftParen)?;
            self.expect_keyword(Keyword::Where)?;
            let f = self.parse_expr(0)?;
            self.expect_kind(&TokenKind::RightParen)?;
            Some(Box::new(f))
        } else {
            None
        };

        let within_group = if self.check_keyword(Keyword::Within) {
            self.advance()?;
            self.expect_keyword(Keyword::Group)?;
            self.expect_kind(&TokenKind::LeftParen)?;
            self.expect_keyword(Keyword::Order)?;
            self.expect_keyword(Keyword::By)?;
            let items = self.parse_order_by_items()?;
            self.expect_kind(&TokenKind::RightParen)?;
            items
        } else {
            vec![]
        };

        let window = if self.eat_keyword(Keyword::Over)? {
            if matches!(self.current.kind, TokenKind::LeftParen) {
                Some(WindowSpec::Inline(self.parse_window_def_body()?))
            } else {
                let (n, _) = self.parse_name()?;
                Some(WindowSpec::Named(n))
            }
        } else {
            None
        };

        Ok(Expr::Function(Box::new(FunctionCall {
            schema,
            name,
            distinct,
            star,
            args,
            order_by,
            filter,
            within_group,
            window,
        })))
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![self.parse_call_arg()?];
        while self.eat_kind(&TokenKind::Comma)? {
            args.push(self.parse_call_arg()?);
        }
        Ok(args)
    }

    fn parse_call_arg(&mut self) -> Result<Expr, ParseError> {
        if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            if matches!(self.peek_ahead()?, TokenKind::Assign) {
                self.advance()?; // name
                self.advance()?; // :=
                let value = self.parse_expr(0)?;
                return Ok(Expr::NamedArg {
                    name: text,
                    value: Box::new(value),
                });
            }
        }
        self.parse_expr(0)
    }

    fn parse_star_modifiers(&mut self) -> Result<Vec<StarModifier>, ParseError> {
        let mut mods = vec![];
        loop {
            if self.eat_keyword(Keyword::Exclude)? {
                let cols = if self.eat_kind(&TokenKind::LeftParen)? {
                    let c = self.parse_name_list()?;
                    self.expect_kind(&TokenKind::RightParen)?;
                    c
                } else {
                    vec![self.parse_name()?.0]
                };
                mods.push(StarModifier::Exclude(cols));
            } else if self.eat_keyword(Keyword::Replace)? {
                self.expect_kind(&TokenKind::LeftParen)?;
                let mut pairs = vec![self.parse_replace_pair()?];
                while self.eat_kind(&TokenKind::Comma)? {
                    pairs.push(self.parse_replace_pair()?);
                }
                self.expect_kind(&TokenKind::RightParen)?;
                mods.push(StarModifier::Replace(pairs));
            } else if self.eat_keyword(Keyword::Rename)? {
                self.expect_kind(&TokenKind::LeftParen)?;
                let mut pairs = vec![self.parse_rename_pair()?];
                while self.eat_kind(&TokenKind::Comma)? {
                    pairs.push(self.parse_rename_pair()?);
                }
                self.expect_kind(&TokenKind::RightParen)?;
                mods.push(StarModifier::Rename(pairs));
            } else {
                break;
            }
        }
        Ok(mods)
    }

    fn parse_replace_pair(&mut self) -> Result<(Expr, String), ParseError> {
        let e = self.parse_expr(0)?;
        self.expect_keyword(Keyword::As)?;
        let (n, _) = self.parse_name()?;
        Ok((e, n))
    }

    fn parse_rename_pair(&mut self) -> Result<(String, String), ParseError> {
        let (old, _) = self.parse_name()?;
        self.expect_keyword(Keyword::As)?;
        let (new, _) = self.parse_name()?;
        Ok((old, new))
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // (
        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let sel = self.parse_select_statement()?;
            self.expect_kind(&TokenKind::RightParen)?;
            return Ok(Expr::Subquery(sel));
        }
        if matches!(self.current.kind, TokenKind::RightParen) {
            self.advance()?;
            if self.eat_kind(&TokenKind::Arrow)? {
                let body = self.parse_expr(0)?;
                return Ok(Expr::Lambda {
                    params: vec![],
                    body: Box::new(body),
                });
            }
            return Ok(Expr::ListLiteral(vec![]));
        }
        let first = self.parse_expr(0)?;
        if matches!(self.current.kind, TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat_kind(&TokenKind::Comma)? {
                items.push(self.parse_expr(0)?);
            }
            self.expect_kind(&TokenKind::RightParen)?;
            if self.eat_kind(&TokenKind::Arrow)? {
                let mut params = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Expr::Column { name, table: None, .. } => params.push(name),
                        _ => return Err(self.error_unexpected("a lambda parameter name")),
                    }
                }
                let body = self.parse_expr(0)?;
                return Ok(Expr::Lambda {
                    params,
                    body: Box::new(body),
                });
            }
            return Ok(Expr::ListLiteral(items));
        }
        self.expect_kind(&TokenKind::RightParen)?;
        if self.eat_kind(&TokenKind::Arrow)? {
            let params = match first {
                Expr::Column { name, table: None, .. } => vec![name],
                _ => return Err(self.error_unexpected("a lambda parameter name")),
            };
            let body = self.parse_expr(0)?;
            return Ok(Expr::Lambda {
                params,
                body: Box::new(body),
            });
        }
        Ok(Expr::Paren(Box::new(first)))
    }

    fn parse_list_or_comprehension(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // [
        if matches!(self.current.kind, TokenKind::RightBracket) {
            self.advance()?;
            return Ok(Expr::ListLiteral(vec![]));
        }
        let first = self.parse_expr(0)?;
        if self.check_keyword(Keyword::For) {
            self.advance()?;
            let (var, _) = self.parse_name()?;
            self.expect_keyword(Keyword::In)?;
            let iterable = self.parse_expr(0)?;
            let condition = if self.eat_keyword(Keyword::If)? {
                Some(Box::new(self.parse_expr(0)?))
            } else {
                None
            };
            self.expect_kind(&TokenKind::RightBracket)?;
            return Ok(Expr::ListComprehension {
                var,
                iterable: Box::new(iterable),
                body: Box::new(first),
                condition,
            });
        }
        let mut items = vec![first];
        while self.eat_kind(&TokenKind::Comma)? {
            items.push(self.parse_expr(0)?);
        }
        self.expect_kind(&TokenKind::RightBracket)?;
        Ok(Expr::ListLiteral(items))
    }

    fn parse_struct_literal(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // {
        let mut fields = vec![];
        if !matches!(self.current.kind, TokenKind::RightBrace) {
            loop {
                let key = match self.current.kind.clone() {
                    TokenKind::String(s) => {
                        self.advance()?;
                        s
                    }
                    _ => self.parse_name()?.0,
                };
                self.expect_kind(&TokenKind::Colon)?;
                let value = self.parse_expr(0)?;
                fields.push((key, value));
                if !self.eat_kind(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect_kind(&TokenKind::RightBrace)?;
        Ok(Expr::Struct(fields))
    }

    fn parse_map_expr(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // MAP
        if matches!(self.current.kind, TokenKind::LeftBrace) {
            self.advance()?;
            let mut entries = vec![];
            if !matches!(self.current.kind, TokenKind::RightBrace) {
                loop {
                    let k = self.parse_expr(0)?;
                    self.expect_kind(&TokenKind::Colon)?;
                    let v = self.parse_expr(0)?;
                    entries.push((k, v));
                    if !self.eat_kind(&TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect_kind(&TokenKind::RightBrace)?;
            Ok(Expr::Map(entries))
        } else {
            self.finish_identifier_like("map".to_string(), false)
        }
    }

    fn parse_columns_expr(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // COLUMNS
        self.expect_kind(&TokenKind::LeftParen)?;
        let pattern = if matches!(self.current.kind, TokenKind::Star) {
            self.advance()?;
            Expr::Star(StarExpr::default())
        } else {
            self.parse_expr(0)?
        };
        self.expect_kind(&TokenKind::RightParen)?;
        Ok(Expr::Columns(Box::new(pattern)))
    }

    fn parse_extract_expr(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // EXTRACT
        self.expect_kind(&TokenKind::LeftParen)?;
        let (field, _) = self.parse_name()?;
        self.expect_keyword(Keyword::From)?;
        let expr = self.parse_expr(0)?;
        self.expect_kind(&TokenKind::RightParen)?;
        Ok(Expr::Extract {
            field,
            expr: Box::new(expr),
        })
    }

    fn parse_interval_expr(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // INTERVAL
        let value = self.parse_expr(19)?;
        let unit = match self.current.kind.clone() {
            TokenKind::Identifier { text, .. } => {
                self.advance()?;
                Some(text)
            }
            TokenKind::Keyword(kw) => {
                self.advance()?;
                Some(kw.as_str().to_string())
            }
            _ => None,
        };
        Ok(Expr::Interval {
            value: Box::new(value),
            unit,
        })
    }

    fn parse_case_expr(&mut self) -> Result<Expr, ParseError> {
        self.advance()?; // CASE
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr(0)?))
        };
        let mut when_then = vec![];
        while self.eat_keyword(Keyword::When)? {
            let cond = self.parse_expr(0)?;
            self.expect_keyword(Keyword::Then)?;
            let res = self.parse_expr(0)?;
            when_then.push((cond, res));
        }
        let else_expr = if self.eat_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expr(0)?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(Expr::Case {
            operand,
            when_then,
            else_expr,
        })
    }

    fn parse_cast_expr_body(&mut self, try_cast: bool) -> Result<Expr, ParseError> {
        self.expect_kind(&TokenKind::LeftParen)?;
        let expr = self.parse_expr(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect_kind(&TokenKind::RightParen)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            try_cast,
        })
    }

    fn parse_type_word(&mut self) -> Result<String, ParseError> {
        match self.current.kind.clone() {
            TokenKind::Keyword(kw) => {
                self.advance()?;
                Ok(kw.as_str().to_string())
            }
            TokenKind::Identifier { text, .. } => {
                self.advance()?;
                Ok(text.to_ascii_uppercase())
            }
            _ => Err(self.error_unexpected("a type name")),
        }
    }

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let mut name_parts = vec![self.parse_type_word()?];
        loop {
            match &self.current.kind {
                TokenKind::Keyword(Keyword::Precision) if name_parts.last().map(String::as_str) == Some("DOUBLE") => {
                    name_parts.push("PRECISION".to_string());
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::Varying) => {
                    name_parts.push("VARYING".to_string());
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::With) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Time)?;
                    self.expect_keyword(Keyword::Zone)?;
                    name_parts.push("WITH".to_string());
                    name_parts.push("TIME".to_string());
                    name_parts.push("ZONE".to_string());
                }
                TokenKind::Keyword(Keyword::Without) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Time)?;
                    self.expect_keyword(Keyword::Zone)?;
                    name_parts.push("WITHOUT".to_string());
                    name_parts.push("TIME".to_string());
                    name_parts.push("ZONE".to_string());
                }
                _ => break,
            }
        }
        let name = name_parts.join(" ");
        let params = if self.eat_kind(&TokenKind::LeftParen)? {
            Some(self.capture_balanced_parens_text()?)
        } else {
            None
        };
        let mut array_dims = 0u32;
        while matches!(self.current.kind, TokenKind::LeftBracket) {
            self.advance()?;
            self.expect_kind(&TokenKind::RightBracket)?;
            array_dims += 1;
        }
        Ok(DataType { name, params, array_dims })
    }

    // ---- INSERT / UPDATE / DELETE --------------------------------------

    fn parse_table_name(&mut self) -> Result<TableName, ParseError> {
        let mut parts = vec![self.parse_name()?.0];
        while self.eat_kind(&TokenKind::Dot)? {
            parts.push(self.parse_name()?.0);
        }
        let name = parts.pop().expect("at least one part parsed above");
        let (catalog, schema) = match parts.len() {
            0 => (None, None),
            1 => (None, parts.pop()),
            _ => {
                let schema = parts.pop();
                (Some(parts.join(".")), schema)
            }
        };
        let alias = if self.eat_keyword(Keyword::As)? {
            Some(self.parse_name()?.0)
        } else if let TokenKind::Identifier { text, .. } = self.current.kind.clone() {
            self.advance()?;
            Some(text)
        } else {
            None
        };
        Ok(TableName {
            catalog,
            schema,
            name,
            alias,
        })
    }

    fn parse_assignments(&mut self) -> Result<Vec<Assignment>, ParseError> {
        let mut out = vec![self.parse_assignment()?];
        while self.eat_kind(&TokenKind::Comma)? {
            out.push(self.parse_assignment()?);
        }
        Ok(out)
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let (column, _) = self.parse_name()?;
        self.expect_kind(&TokenKind::Eq)?;
        let value = self.parse_expr(0)?;
        Ok(Assignment { column, value })
    }

    fn parse_returning(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        if self.eat_keyword(Keyword::Returning)? {
            self.parse_select_items()
        } else {
            Ok(vec![])
        }
    }

    fn parse_insert_statement(&mut self) -> Result<Box<InsertStatement>, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        let or_action = if self.eat_keyword(Keyword::Or)? {
            if self.eat_keyword(Keyword::Replace)? {
                Some(OrAction::Replace)
            } else {
                self.expect_keyword(Keyword::Ignore)?;
                Some(OrAction::Ignore)
            }
        } else {
            None
        };
        self.expect_keyword(Keyword::Into)?;
        let target = self.parse_table_name()?;
        let columns = if self.eat_kind(&TokenKind::LeftParen)? {
            let c = self.parse_name_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            c
        } else {
            vec![]
        };
        let by_name = if self.eat_keyword(Keyword::By)? {
            self.expect_keyword(Keyword::Name)?;
            true
        } else {
            false
        };
        let source = if self.eat_keyword(Keyword::Default)? {
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else if self.check_keyword(Keyword::Values) {
            self.advance()?;
            InsertSource::Values(self.parse_values_rows()?)
        } else {
            InsertSource::Query(self.parse_select_statement()?)
        };
        let on_conflict = if self.eat_keyword(Keyword::On)? {
            self.expect_keyword(Keyword::Conflict)?;
            Some(self.parse_on_conflict()?)
        } else {
            None
        };
        let returning = self.parse_returning()?;
        Ok(Box::new(InsertStatement {
            target,
            columns,
            source,
            or_action,
            by_name,
            on_conflict,
            returning,
        }))
    }

    fn parse_on_conflict(&mut self) -> Result<OnConflict, ParseError> {
        let target_columns = if self.eat_kind(&TokenKind::LeftParen)? {
            let c = self.parse_name_list()?;
            self.expect_kind(&TokenKind::RightParen)?;
            c
        } else {
            vec![]
        };
        self.expect_keyword(Keyword::Do)?;
        let action = if self.eat_keyword(Keyword::Nothing)? {
            OnConflictAction::DoNothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_assignments()?;
            let where_clause = if self.eat_keyword(Keyword::Where)? {
                Some(self.parse_expr(0)?)
            } else {
                None
            };
            OnConflictAction::DoUpdate {
                assignments,
                where_clause,
            }
        };
        Ok(OnConflict { target_columns, action })
    }

    fn parse_update_statement(&mut self) -> Result<Box<UpdateStatement>, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let target = self.parse_table_name()?;
        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;
        let from = if self.eat_keyword(Keyword::From)? {
            Some(self.parse_table_ref()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let returning = self.parse_returning()?;
        Ok(Box::new(UpdateStatement {
            target,
            assignments,
            from,
            where_clause,
            returning,
        }))
    }

    fn parse_delete_statement(&mut self) -> Result<Box<DeleteStatement>, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let target = self.parse_table_name()?;
        let using = if self.eat_keyword(Keyword::Using)? {
            Some(self.parse_table_ref()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let returning = self.parse_returning()?;
        Ok(Box::new(DeleteStatement {
            target,
            using,
            where_clause,
            returning,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(sql: &str) -> Statement {
        let mut parser = Parser::new(sql).expect("lexing should succeed");
        parser.parse_statement().expect("parsing should succeed")
    }

    #[test]
    fn illegal_token_surfaces_as_a_parse_error() {
        let mut parser = Parser::new("SELECT ! FROM t").expect("infallible");
        let err = parser.parse_statement().unwrap_err();
        assert!(matches!(err.found, Some(TokenKind::Illegal(_))));
    }

    #[test]
    fn parses_simple_select() {
        let stmt = parse_one("SELECT a, b FROM t WHERE a > 1");
        let Statement::Select(sel) = stmt else { panic!("expected select") };
        let SelectBody::Core(core) = sel.body else { panic!("expected core") };
        assert_eq!(core.columns.len(), 2);
        assert!(core.where_clause.is_some());
    }

    #[test]
    fn parses_large_integer_literal_verbatim() {
        let stmt = parse_one("SELECT 123456789012345678901234567890");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        match &core.columns[0].expr {
            Expr::Literal(Literal::Number(n)) => assert_eq!(n, "123456789012345678901234567890"),
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_joins_and_quoted_identifiers() {
        let stmt = parse_one(r#"SELECT "Weird Col" FROM a LEFT JOIN b ON a.id = b.id"#);
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        match &core.columns[0].expr {
            Expr::Column { quoted: true, name, .. } => assert_eq!(name, "Weird Col"),
            other => panic!("unexpected expr: {other:?}"),
        }
        let Some(TableRef::Join { op: JoinOperator::Left, .. }) = core.from else {
            panic!("expected a left join")
        };
    }

    #[test]
    fn parses_not_in_and_not_between() {
        let stmt = parse_one("SELECT * FROM t WHERE x NOT IN (1, 2) AND y NOT BETWEEN 1 AND 10");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        let where_clause = core.where_clause.expect("where clause");
        match where_clause {
            Expr::Binary { left, right, op: BinaryOp::And } => {
                assert!(matches!(*left, Expr::In { negated: true, .. }));
                assert!(matches!(*right, Expr::Between { negated: true, .. }));
            }
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_window_function() {
        let stmt = parse_one("SELECT row_number() OVER (PARTITION BY a ORDER BY b DESC) FROM t");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        match &core.columns[0].expr {
            Expr::Function(call) => {
                assert_eq!(call.name, "row_number");
                assert!(matches!(call.window, Some(WindowSpec::Inline(_))));
            }
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_cte_and_union() {
        let stmt = parse_one("WITH t AS (SELECT 1 AS x) SELECT x FROM t UNION ALL SELECT x FROM t");
        let Statement::Select(sel) = stmt else { panic!() };
        assert!(sel.with.is_some());
        assert!(matches!(sel.body, SelectBody::SetOp { op: SetOperator::Union, all: true, .. }));
    }

    #[test]
    fn parses_star_with_exclude() {
        let stmt = parse_one("SELECT * EXCLUDE (a, b) FROM t");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        match &core.columns[0].expr {
            Expr::Star(star) => assert_eq!(star.modifiers, vec![StarModifier::Exclude(vec!["a".into(), "b".into()])]),
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_cast_and_double_colon() {
        let stmt = parse_one("SELECT CAST(a AS DECIMAL(10, 2)), b::VARCHAR FROM t");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        match &core.columns[0].expr {
            Expr::Cast { data_type, try_cast, .. } => {
                assert_eq!(data_type.name, "DECIMAL");
                assert_eq!(data_type.params.as_deref(), Some("10, 2"));
                assert!(!try_cast);
            }
            other => panic!("unexpected expr: {other:?}"),
        }
        match &core.columns[1].expr {
            Expr::TypeCast { data_type, .. } => assert_eq!(data_type.name, "VARCHAR"),
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_lambda_and_list_literal() {
        let stmt = parse_one("SELECT list_transform([1, 2, 3], x -> x + 1)");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        match &core.columns[0].expr {
            Expr::Function(call) => {
                assert!(matches!(call.args[0], Expr::ListLiteral(_)));
                assert!(matches!(call.args[1], Expr::Lambda { .. }));
            }
            other => panic!("unexpected expr: {other:?}"),
        }
    }

    #[test]
    fn parses_insert_on_conflict() {
        let stmt = parse_one("INSERT INTO t (a, b) VALUES (1, 2) ON CONFLICT (a) DO UPDATE SET b = EXCLUDED.b RETURNING a");
        let Statement::Insert(ins) = stmt else { panic!() };
        assert_eq!(ins.target.name, "t");
        assert!(ins.on_conflict.is_some());
        assert_eq!(ins.returning.len(), 1);
    }

    #[test]
    fn parses_qualify_and_group_by_all() {
        let stmt = parse_one("SELECT a, count(*) FROM t GROUP BY ALL QUALIFY row_number() OVER () = 1");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        assert_eq!(core.group_by, GroupByClause::All);
        assert!(core.qualify.is_some());
    }

    #[test]
    fn parses_ddl_verbatim() {
        let stmt = parse_one("CREATE TABLE t (a INT, b TEXT)");
        let Statement::Ddl(ddl) = stmt else { panic!() };
        assert_eq!(ddl.kind, "CREATE");
        assert_eq!(ddl.sql, "CREATE TABLE t (a INT, b TEXT)");
    }

    #[test]
    fn parses_utility_verbatim_and_stops_at_semicolon() {
        let mut parser = Parser::new("PRAGMA threads=4; SELECT 1").expect("lex ok");
        let stmt = parser.parse_statement().expect("parse ok");
        let Statement::Utility(util) = stmt else { panic!() };
        assert_eq!(util.kind, "PRAGMA");
        assert_eq!(util.sql, "PRAGMA threads=4");
        assert!(parser.eat_semicolon().expect("eat ok"));
    }

    #[test]
    fn positional_parameters_are_numbered_by_occurrence() {
        let stmt = parse_one("SELECT ? FROM t WHERE a = ? AND b = ?");
        let Statement::Select(sel) = stmt else { panic!() };
        let SelectBody::Core(core) = sel.body else { panic!() };
        assert!(matches!(core.columns[0].expr, Expr::Parameter(Parameter::Positional(1))));
    }

    #[test]
    fn rejects_trailing_garbage_is_left_for_caller() {
        // The parser only produces one statement; detecting trailing input
        // (multi-statement input) is the facade's job, not this type's.
        let mut parser = Parser::new("SELECT 1 SELECT 2").expect("lex ok");
        let _ = parser.parse_statement().expect("parse ok");
        assert!(!parser.at_eof());
    }
}
