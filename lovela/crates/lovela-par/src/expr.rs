//! Expression grammar:
//!
//! ```ebnf
//! body         := expression { '.' expression }
//! expression   := call { call }
//! call         := literal | variable-ref | function-call | group | tuple | binary-op
//! function-call:= qualified-name [ '(' expression { ',' expression } ')' ]
//! binary-op    := operator-token expression
//! group        := '(' expression ')'
//! tuple        := '(' expression { ',' expression } ')'
//! ```
//!
//! A `body` is the single `Expression` child of a `FunctionDeclaration`;
//! each dot-separated statement inside it becomes one of `Expression`'s
//! children. Within a statement, `call { call }` chaining is represented by
//! *nesting*: every call's first child is the call before it (or a
//! synthesized `ExpressionInput` for the first), so a whole chain walks as
//! one tree and the emitter assigns exactly one named result per statement.

use lovela_lex::TokenKind;

use crate::ast::{Node, NodeKind, TypeSpec};
use crate::error::ParseError;
use crate::types::{infer_decimal_primitive, infer_integer_primitive};
use crate::Parser;

impl Parser {
    /// `body := expression { '.' expression }`. Never fails outright — a
    /// statement that can't be parsed becomes one `Error` child and parsing
    /// resumes after resynchronizing, so one bad statement doesn't lose the
    /// rest of the declaration's body.
    pub(crate) fn parse_body(&mut self) -> Node {
        let start = self.current_span();
        let mut children = Vec::new();
        loop {
            match self.parse_statement_chain() {
                Ok(stmt) => children.push(stmt),
                Err(err) => {
                    let span = err.span();
                    self.report_parse_error(&err);
                    children.push(Node::error(err.to_string(), span));
                    self.synchronize();
                    break;
                }
            }
            if !self.check(TokenKind::SeparatorDot) {
                break;
            }
            if self.continues_body_after_dot() {
                self.advance();
                continue;
            }
            break;
        }
        Node::new(NodeKind::Expression, start).with_children(children)
    }

    /// Whether the token just past the current `.` can only start another
    /// statement inside this body (a literal, `(`, or an operator token —
    /// none of those can open a fresh top-level declaration). An identifier
    /// is ambiguous (it could start either); we resolve that case in favor
    /// of ending the body, since single-statement bodies are by far the
    /// common case.
    fn continues_body_after_dot(&self) -> bool {
        matches!(
            self.peek_ahead(1).kind,
            TokenKind::LiteralInteger
                | TokenKind::LiteralDecimal
                | TokenKind::LiteralString
                | TokenKind::LiteralStringInterpolation
                | TokenKind::ParenRoundOpen
                | TokenKind::OperatorComparison
                | TokenKind::OperatorArithmetic
                | TokenKind::OperatorBitwise
        )
    }

    /// `expression := call { call }`, folded into a nested chain rather than
    /// a flat list of siblings.
    fn parse_statement_chain(&mut self) -> Result<Node, ParseError> {
        let mut node = None;
        while self.is_call_start() {
            node = Some(self.parse_call(node)?);
        }
        Ok(node.unwrap_or_else(|| Node::new(NodeKind::ExpressionInput, self.current_span())))
    }

    fn is_call_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::LiteralInteger
                | TokenKind::LiteralDecimal
                | TokenKind::LiteralString
                | TokenKind::LiteralStringInterpolation
                | TokenKind::Identifier
                | TokenKind::SeparatorSlash
                | TokenKind::ParenRoundOpen
                | TokenKind::OperatorComparison
                | TokenKind::OperatorArithmetic
                | TokenKind::OperatorBitwise
        )
    }

    /// `prev` is the call immediately before this one in the chain, if any;
    /// it becomes this call's input child (or gets discarded, for the calls
    /// that don't reference an input — `Literal`, `Tuple`, a parenthesized
    /// group).
    fn parse_call(&mut self, prev: Option<Node>) -> Result<Node, ParseError> {
        match self.current().kind {
            TokenKind::LiteralInteger
            | TokenKind::LiteralDecimal
            | TokenKind::LiteralString
            | TokenKind::LiteralStringInterpolation => Ok(self.parse_literal()),
            TokenKind::Identifier | TokenKind::SeparatorSlash => self.parse_function_call_or_variable_ref(prev),
            TokenKind::ParenRoundOpen => self.parse_group_or_tuple(),
            TokenKind::OperatorComparison | TokenKind::OperatorArithmetic | TokenKind::OperatorBitwise => {
                self.parse_binary_op(prev)
            }
            _ => Err(ParseError::InvalidCurrentToken {
                span: self.current_span(),
            }),
        }
    }

    fn parse_literal(&mut self) -> Node {
        let token = self.advance();
        let out_type = match token.kind {
            TokenKind::LiteralInteger => token
                .value
                .parse::<i128>()
                .ok()
                .and_then(infer_integer_primitive)
                .map(TypeSpec::Primitive)
                .unwrap_or(TypeSpec::Any),
            TokenKind::LiteralDecimal => token
                .value
                .parse::<f64>()
                .ok()
                .map(infer_decimal_primitive)
                .map(TypeSpec::Primitive)
                .unwrap_or(TypeSpec::Any),
            _ => TypeSpec::Any,
        };
        let span = token.span;
        let value = token.value.clone();
        let mut node = Node::new(NodeKind::Literal, span).with_value(value).with_token(token);
        node.out_type = out_type;
        node
    }

    /// `qualified-name [ '(' expression { ',' expression } ')' ]`. A bare
    /// name with no namespace, no trailing `(...)`, and matching one of the
    /// enclosing declaration's parameter names is a `VariableReference`
    /// instead.
    fn parse_function_call_or_variable_ref(&mut self, prev: Option<Node>) -> Result<Node, ParseError> {
        let span = self.current_span();
        let (namespace, name) = self.parse_qualified_name();

        if namespace.is_empty() && !self.check(TokenKind::ParenRoundOpen) && self.current_params.contains(&name) {
            let mut node = Node::new(NodeKind::VariableReference, span);
            node.value = name;
            return Ok(node);
        }

        let input = prev.unwrap_or_else(|| Node::new(NodeKind::ExpressionInput, span));
        let mut children = vec![input];
        if self.check(TokenKind::ParenRoundOpen) {
            self.advance();
            if !self.check(TokenKind::ParenRoundClose) {
                loop {
                    children.push(self.parse_statement_chain()?);
                    if self.check(TokenKind::SeparatorComma) {
                        self.advance();
                        continue;
                    }
                    break;
                }
            }
            self.expect(TokenKind::ParenRoundClose, "')'")?;
        }

        let mut node = Node::new(NodeKind::FunctionCall, span);
        node.namespace = namespace;
        node.value = name;
        node.children = children;
        Ok(node)
    }

    /// `operator-token expression` — the operand to the right is a single
    /// call, not a further chain, matching how a leading operator (`+ 1`)
    /// reads as one `BinaryOperation` against the implicit input.
    fn parse_binary_op(&mut self, prev: Option<Node>) -> Result<Node, ParseError> {
        let span = self.current_span();
        let operator = self.advance();
        let input = prev.unwrap_or_else(|| Node::new(NodeKind::ExpressionInput, span));
        let right = self.parse_call(None)?;

        let mut node = Node::new(NodeKind::BinaryOperation, span);
        node.value = operator.value.clone();
        node.token = Some(operator);
        node.children = vec![input, right];
        Ok(node)
    }

    /// `'(' expression ')'` or `'(' expression { ',' expression } ')'` —
    /// the presence of a comma is what tells a tuple apart from a plain
    /// parenthesized group; a group contributes no node of its own, it just
    /// unwraps to its single inner expression. Empty parens are the `None`
    /// literal.
    fn parse_group_or_tuple(&mut self) -> Result<Node, ParseError> {
        let span = self.current_span();
        self.advance();

        if self.check(TokenKind::ParenRoundClose) {
            self.advance();
            let mut node = Node::new(NodeKind::Literal, span);
            node.out_type = TypeSpec::None;
            return Ok(node);
        }

        let mut elements = vec![self.parse_statement_chain()?];
        let mut is_tuple = false;
        while self.check(TokenKind::SeparatorComma) {
            is_tuple = true;
            self.advance();
            elements.push(self.parse_statement_chain()?);
        }
        self.expect(TokenKind::ParenRoundClose, "')'")?;

        if is_tuple {
            let mut node = Node::new(NodeKind::Tuple, span);
            node.children = elements;
            Ok(node)
        } else {
            Ok(elements.pop().expect("at least one element was parsed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovela_lex::Lexer;
    use lovela_util::FileId;

    fn parse_one(src: &str) -> Node {
        let lexer = Lexer::new(src);
        let (decls, diags) = Parser::from_lexer(lexer, FileId::DUMMY).parse();
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls.len(), 1);
        decls.into_iter().next().unwrap()
    }

    #[test]
    fn tuple_requires_a_comma() {
        let decl = parse_one("f: (1, 2).");
        let stmt = &decl.children[0].children[0];
        assert_eq!(stmt.kind, NodeKind::Tuple);
        assert_eq!(stmt.children.len(), 2);
    }

    #[test]
    fn parens_without_comma_are_a_transparent_group() {
        let decl = parse_one("f: (1).");
        let stmt = &decl.children[0].children[0];
        assert_eq!(stmt.kind, NodeKind::Literal);
        assert_eq!(stmt.value, "1");
    }

    #[test]
    fn parameter_name_becomes_variable_reference() {
        let decl = parse_one("f(x): x.");
        let stmt = &decl.children[0].children[0];
        assert_eq!(stmt.kind, NodeKind::VariableReference);
        assert_eq!(stmt.value, "x");
    }

    #[test]
    fn call_chain_nests_rather_than_flattens() {
        let decl = parse_one("f: a b.");
        let stmt = &decl.children[0].children[0];
        assert_eq!(stmt.kind, NodeKind::FunctionCall);
        assert_eq!(stmt.value, "b");
        assert_eq!(stmt.children[0].kind, NodeKind::FunctionCall);
        assert_eq!(stmt.children[0].value, "a");
        assert_eq!(stmt.children[0].children[0].kind, NodeKind::ExpressionInput);
    }

    #[test]
    fn function_call_with_arguments() {
        let decl = parse_one("f: g(1, 2).");
        let stmt = &decl.children[0].children[0];
        assert_eq!(stmt.kind, NodeKind::FunctionCall);
        assert_eq!(stmt.value, "g");
        assert_eq!(stmt.children.len(), 3);
        assert_eq!(stmt.children[1].value, "1");
        assert_eq!(stmt.children[2].value, "2");
    }

    #[test]
    fn multiple_dot_separated_statements() {
        let decl = parse_one("f: 1 . (2, 3).");
        assert_eq!(decl.children[0].children.len(), 2);
        assert_eq!(decl.children[0].children[0].kind, NodeKind::Literal);
        assert_eq!(decl.children[0].children[1].kind, NodeKind::Tuple);
    }
}
