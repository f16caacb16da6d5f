//! Binding-power tables for the Pratt expression parser.
//!
//! Postfix forms that always bind tighter than any infix operator — `::`
//! casts, `[...]` indexing/slicing, and `.` member access — are handled by a
//! dedicated suffix loop in [`super::parser`] rather than through these
//! tables, which is the usual Pratt technique for postfix chains.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Returns the prefix binding power for a token, or `None` if it cannot
/// start a prefix expression.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Keyword(Keyword::Not) => Some(5),
        TokenKind::Plus | TokenKind::Minus | TokenKind::BitNot => Some(19),
        _ => None,
    }
}

/// Returns `(left_bp, right_bp)` for an infix operator token, or `None` if
/// the token is not an infix operator this table handles. Left-associative
/// operators have `left_bp < right_bp`; right-associative ones (just `^`,
/// DuckDB's exponentiation operator) have `left_bp > right_bp`.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((7, 8)),
        TokenKind::Keyword(
            Keyword::Is
            | Keyword::In
            | Keyword::Between
            | Keyword::Like
            | Keyword::Ilike
            | Keyword::Glob
            | Keyword::Similar,
        ) => Some((7, 8)),
        TokenKind::BitOr => Some((9, 10)),
        TokenKind::BitAnd => Some((11, 12)),
        TokenKind::LeftShift | TokenKind::RightShift => Some((13, 14)),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((15, 16)),
        TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent => {
            Some((17, 18))
        }
        TokenKind::BitXor => Some((22, 21)),
        _ => None,
    }
}

/// Converts a token to a [`BinaryOp`], for the tokens that map directly
/// (comparison/arithmetic/logical/bitwise). `IS`/`IN`/`BETWEEN`/`LIKE`/
/// `ILIKE`/`GLOB`/`SIMILAR` are parsed into their own dedicated `Expr`
/// variants instead, not through this table.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::DoubleSlash => Some(BinaryOp::IntDiv),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::BitXor => Some(BinaryOp::BitXor),
        TokenKind::LeftShift => Some(BinaryOp::LeftShift),
        TokenKind::RightShift => Some(BinaryOp::RightShift),
        _ => None,
    }
}

/// Converts a token to a [`UnaryOp`] prefix operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        TokenKind::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_bp.0 > add_bp.0);
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let or_bp = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        assert!(and_bp.0 > or_bp.0);
    }

    #[test]
    fn comparison_binds_tighter_than_logical() {
        let eq_bp = infix_binding_power(&TokenKind::Eq).unwrap();
        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        assert!(eq_bp.0 > and_bp.0);
    }

    #[test]
    fn addition_is_left_associative() {
        let (left, right) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn power_is_right_associative() {
        let (left, right) = infix_binding_power(&TokenKind::BitXor).unwrap();
        assert!(left > right);
    }

    #[test]
    fn token_to_binary_op_mapping() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::NotEq), Some(BinaryOp::NotEq));
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }

    #[test]
    fn token_to_unary_op_mapping() {
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(
            token_to_unary_op(&TokenKind::Keyword(Keyword::Not)),
            Some(UnaryOp::Not)
        );
        assert_eq!(token_to_unary_op(&TokenKind::LeftParen), None);
    }
}
