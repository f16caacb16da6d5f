//! Token types for the SQL lexer.

use super::Span;

/// Defines the `Keyword` enum together with its `from_str`/`as_str`
/// conversions from a single list of `(Variant, "TEXT")` pairs, so the two
/// directions can never drift out of sync.
macro_rules! keywords {
    ($($variant:ident => $text:expr),* $(,)?) => {
        /// SQL keywords recognised by the lexer. Matching is case-insensitive;
        /// [`Keyword::as_str`] always returns the canonical uppercase spelling.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),*
        }

        impl Keyword {
            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the canonical uppercase spelling of the keyword.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    // Query structure
    Select => "SELECT", From => "FROM", Where => "WHERE", Order => "ORDER",
    By => "BY", Group => "GROUP", Having => "HAVING", Qualify => "QUALIFY",
    Limit => "LIMIT", Offset => "OFFSET", Fetch => "FETCH", Next => "NEXT",
    Percent => "PERCENT", Only => "ONLY", Ties => "TIES", Distinct => "DISTINCT",
    All => "ALL", Some => "SOME", Any => "ANY",

    // Joins
    Join => "JOIN", Inner => "INNER", Left => "LEFT", Right => "RIGHT",
    Full => "FULL", Outer => "OUTER", Cross => "CROSS", Natural => "NATURAL",
    Lateral => "LATERAL", Semi => "SEMI", Anti => "ANTI", Asof => "ASOF",
    Positional => "POSITIONAL", On => "ON", Using => "USING",

    // Set operations
    Union => "UNION", Intersect => "INTERSECT", Except => "EXCEPT",

    // DML
    Insert => "INSERT", Into => "INTO", Values => "VALUES", Update => "UPDATE",
    Set => "SET", Delete => "DELETE", Returning => "RETURNING",
    Conflict => "CONFLICT", Do => "DO", Nothing => "NOTHING", Replace => "REPLACE",
    Ignore => "IGNORE", Name => "NAME",

    // DDL / utility (captured verbatim; recognised so the dispatcher can
    // classify the statement without re-lexing)
    Create => "CREATE", Drop => "DROP", Alter => "ALTER", Table => "TABLE",
    Index => "INDEX", View => "VIEW", Database => "DATABASE", Schema => "SCHEMA",
    Sequence => "SEQUENCE", Macro => "MACRO", Secret => "SECRET",
    Function => "FUNCTION", Type => "TYPE", Temporary => "TEMPORARY",
    Temp => "TEMP", Trigger => "TRIGGER", Truncate => "TRUNCATE",
    Copy => "COPY", Export => "EXPORT", Import => "IMPORT", Pragma => "PRAGMA",
    Call => "CALL", Install => "INSTALL", Load => "LOAD", Attach => "ATTACH",
    Detach => "DETACH", Use => "USE", Describe => "DESCRIBE", Show => "SHOW",
    Explain => "EXPLAIN", Summarize => "SUMMARIZE", Vacuum => "VACUUM",
    Checkpoint => "CHECKPOINT", Reindex => "REINDEX", Grant => "GRANT",
    Revoke => "REVOKE", Reset => "RESET", Prepare => "PREPARE",
    Execute => "EXECUTE", Deallocate => "DEALLOCATE",
    Begin => "BEGIN", Commit => "COMMIT", Rollback => "ROLLBACK",
    Transaction => "TRANSACTION",

    // Constraints (only ever seen inside verbatim DDL text, kept so the
    // lexer never has to special-case them)
    Primary => "PRIMARY", Key => "KEY", Foreign => "FOREIGN",
    References => "REFERENCES", Unique => "UNIQUE", Check => "CHECK",
    Constraint => "CONSTRAINT", Cascade => "CASCADE", Restrict => "RESTRICT",
    If => "IF", Exists => "EXISTS",

    // Logical / predicate
    And => "AND", Or => "OR", Not => "NOT", In => "IN", Between => "BETWEEN",
    Like => "LIKE", Ilike => "ILIKE", Glob => "GLOB", Similar => "SIMILAR",
    To => "TO", Escape => "ESCAPE", Is => "IS", Null => "NULL", True => "TRUE",
    False => "FALSE",

    // Ordering
    Asc => "ASC", Desc => "DESC", Nulls => "NULLS", First => "FIRST",
    Last => "LAST",

    // Case / cast
    As => "AS", Case => "CASE", When => "WHEN", Then => "THEN", Else => "ELSE",
    End => "END", Cast => "CAST", Try => "TRY", TryCast => "TRY_CAST",
    Collate => "COLLATE", Default => "DEFAULT",

    // CTEs
    With => "WITH", Recursive => "RECURSIVE", Materialized => "MATERIALIZED",

    // Windows
    Over => "OVER", Partition => "PARTITION", Window => "WINDOW",
    Rows => "ROWS", Range => "RANGE", Groups => "GROUPS", Unbounded => "UNBOUNDED",
    Preceding => "PRECEDING", Following => "FOLLOWING", Current => "CURRENT",
    Row => "ROW", Filter => "FILTER", Within => "WITHIN",

    // Grouping
    Cube => "CUBE", Rollup => "ROLLUP", Sets => "SETS", Grouping => "GROUPING",

    // PIVOT / UNPIVOT / SAMPLE
    Pivot => "PIVOT", Unpivot => "UNPIVOT", For => "FOR", Sample => "SAMPLE",
    Tablesample => "TABLESAMPLE", Bernoulli => "BERNOULLI", System => "SYSTEM",
    Repeatable => "REPEATABLE", Ordinality => "ORDINALITY",

    // Complex types / star modifiers
    Struct => "STRUCT", Map => "MAP", List => "LIST", Interval => "INTERVAL",
    Columns => "COLUMNS", Exclude => "EXCLUDE", Rename => "RENAME",
    Extract => "EXTRACT",

    // Builtin scalar types referenced by CAST targets
    Int => "INT", Integer => "INTEGER", Smallint => "SMALLINT",
    Bigint => "BIGINT", Hugeint => "HUGEINT", Real => "REAL",
    Double => "DOUBLE", Float => "FLOAT", Decimal => "DECIMAL",
    Numeric => "NUMERIC", Char => "CHAR", Varchar => "VARCHAR",
    Text => "TEXT", Blob => "BLOB", Boolean => "BOOLEAN", Bool => "BOOL",
    Date => "DATE", Time => "TIME", Timestamp => "TIMESTAMP",
    Datetime => "DATETIME", Zone => "ZONE", Without => "WITHOUT",
    Varying => "VARYING", Precision => "PRECISION", Json => "JSON",
    Uuid => "UUID",
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal, preserved verbatim (integer or float).
    Number(String),
    /// String literal, already unescaped.
    String(String),
    /// Identifier, with a flag for whether it was double-quoted in source.
    Identifier { text: String, quoted: bool },
    Keyword(Keyword),

    /// `?`
    QuestionMark,
    /// `$1`
    DollarNumber(u32),
    /// `$name`
    DollarName(String),

    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Eq,
    /// `!=` or `<>`, both normalised to this kind.
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Concat,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    LeftShift,
    RightShift,
    /// `->` (lambda arrow).
    Arrow,
    /// `:=` (named-argument assignment).
    Assign,

    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Dot,
    Colon,
    DoubleColon,
    At,

    /// A byte (or fragment) the scanner doesn't recognise, e.g. a bare `!`
    /// or an unterminated string/identifier. The lexer never raises on
    /// this; it is up to whoever inspects the token to treat it as an
    /// error.
    Illegal(String),

    Eof,
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_is_case_insensitive() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn keyword_as_str_round_trips() {
        for kw in [Keyword::Qualify, Keyword::Pivot, Keyword::Asof, Keyword::Columns] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn token_is_eof() {
        let eof = Token::new(TokenKind::Eof, Span::new(0, 0));
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        assert!(eof.is_eof());
        assert!(!select.is_eof());
    }
}
