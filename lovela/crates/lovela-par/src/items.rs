//! Top-level declaration grammar:
//!
//! ```ebnf
//! top-decl   := [api-prefix] [type-spec] qualified-name
//!               [ '(' params ')' ] [ type-spec ]
//!               ( ':' body | () ) '.'
//! api-prefix := ('->' | '<-') [ string-literal ]
//! type-spec  := '[' ( () | '(' ')' | type-ref ) ']'
//! type-ref   := qualified-name | primitive-type | literal
//! params     := param { ',' param }
//! param      := [identifier] [ type-spec ]
//! ```
//!
//! A declaration whose qualified name comes out empty (nothing before the
//! `:` or the trailing `.`) is the program's entry point.

use lovela_lex::TokenKind;

use crate::ast::{ApiSpec, Node, NodeKind, Primitive, TypeSpec, VariableDeclaration};
use crate::error::ParseError;
use crate::types::{infer_decimal_primitive, infer_integer_primitive};
use crate::Parser;

impl Parser {
    pub(crate) fn parse_top_decl(&mut self) -> Result<Node, ParseError> {
        let span = self.current_span();
        let api_spec = self.parse_api_prefix()?;

        let in_type = if self.check(TokenKind::ParenSquareOpen) {
            self.parse_type_spec()?
        } else {
            TypeSpec::Any
        };

        let (namespace, name) = self.parse_qualified_name();

        let params = if self.check(TokenKind::ParenRoundOpen) {
            self.parse_params()?
        } else {
            Vec::new()
        };

        let out_type = if self.check(TokenKind::ParenSquareOpen) {
            self.parse_type_spec()?
        } else {
            TypeSpec::Any
        };

        self.current_params = params.iter().map(|p| p.name.clone()).collect();

        let mut node = Node::new(NodeKind::FunctionDeclaration, span);
        node.namespace = namespace;
        node.value = name;
        node.parameters = params;
        node.in_type = in_type;
        node.out_type = out_type;
        node.api_spec = api_spec;

        if self.check(TokenKind::SeparatorColon) {
            self.advance();
            let body = self.parse_body();
            node.children = vec![body];
        }
        self.expect(TokenKind::SeparatorDot, "'.'")?;

        self.current_params.clear();
        Ok(node)
    }

    /// `('->' | '<-') [string-literal]` — the string literal, when present,
    /// names the calling convention/dialect (e.g. `'Standard C'`, `'C++'`,
    /// `'dynamic'`); absence just leaves the import/export bit set.
    fn parse_api_prefix(&mut self) -> Result<ApiSpec, ParseError> {
        let mut api_spec = ApiSpec::NONE;
        if self.check(TokenKind::OperatorArrow) {
            let arrow = self.advance();
            api_spec.insert(if arrow.value == "->" {
                ApiSpec::IMPORT
            } else {
                ApiSpec::EXPORT
            });
            if self.check(TokenKind::LiteralString) {
                let dialect = self.advance().value;
                apply_dialect(&dialect, &mut api_spec);
            }
        }
        Ok(api_spec)
    }

    fn parse_params(&mut self) -> Result<Vec<VariableDeclaration>, ParseError> {
        self.expect(TokenKind::ParenRoundOpen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::ParenRoundClose) {
            loop {
                params.push(self.parse_param()?);
                if self.check(TokenKind::SeparatorComma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::ParenRoundClose, "')'")?;
        Ok(params)
    }

    /// `param := [identifier] [type-spec]` — either half may be absent, but
    /// not both (an empty parameter slot is a parse error).
    fn parse_param(&mut self) -> Result<VariableDeclaration, ParseError> {
        let span = self.current_span();
        let name = if self.check(TokenKind::Identifier) {
            self.advance().value
        } else {
            String::new()
        };
        let ty = if self.check(TokenKind::ParenSquareOpen) {
            self.parse_type_spec()?
        } else {
            TypeSpec::Any
        };
        if name.is_empty() && ty == TypeSpec::Any {
            return Err(ParseError::MissingToken {
                what: "parameter name or type",
                span,
            });
        }
        Ok(VariableDeclaration { name, ty })
    }

    /// `'[' ( () | '(' ')' | type-ref ) ']'`
    pub(crate) fn parse_type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        self.expect(TokenKind::ParenSquareOpen, "'['")?;

        let ty = if self.check(TokenKind::ParenSquareClose) {
            TypeSpec::Any
        } else if self.check(TokenKind::ParenRoundOpen) && self.peek_ahead(1).kind == TokenKind::ParenRoundClose {
            self.advance();
            self.advance();
            TypeSpec::None
        } else if self.check(TokenKind::PrimitiveType) {
            let token = self.advance();
            parse_primitive_type(&token.value)
        } else if self.check(TokenKind::LiteralInteger) {
            let token = self.advance();
            let value: i128 = token.value.parse().map_err(|_| ParseError::InvalidCurrentToken { span: token.span })?;
            TypeSpec::Primitive(infer_integer_primitive(value).ok_or(ParseError::InvalidCurrentToken { span: token.span })?)
        } else if self.check(TokenKind::LiteralDecimal) {
            let token = self.advance();
            let value: f64 = token.value.parse().map_err(|_| ParseError::InvalidCurrentToken { span: token.span })?;
            TypeSpec::Primitive(infer_decimal_primitive(value))
        } else if self.check(TokenKind::Identifier) || self.check(TokenKind::SeparatorSlash) {
            let (namespace, name) = self.parse_qualified_name();
            if namespace.is_empty() && name.chars().next().is_some_and(|c| c.is_lowercase()) {
                TypeSpec::Tagged(name)
            } else {
                TypeSpec::Named(name)
            }
        } else {
            return Err(ParseError::InvalidCurrentToken {
                span: self.current_span(),
            });
        };

        self.expect(TokenKind::ParenSquareClose, "']'")?;
        Ok(ty)
    }
}

/// Parses a `PrimitiveType` lexeme (`#([.+])?(1|8|16|32|64)(#*)`) into its
/// `Primitive`. Trailing `#` characters each add one array dimension.
fn parse_primitive_type(lexeme: &str) -> TypeSpec {
    let rest = lexeme.strip_prefix('#').unwrap_or(lexeme);
    let (floating, rest) = match rest.strip_prefix('.') {
        Some(r) => (true, r),
        None => (false, rest),
    };
    let (unsigned, rest) = match rest.strip_prefix('+') {
        Some(r) => (true, r),
        None => (false, rest),
    };
    let dims = rest.chars().rev().take_while(|&c| c == '#').count();
    let digits = &rest[..rest.len() - dims];
    let bits: u16 = digits.parse().unwrap_or(0);

    let mut primitive = if floating {
        Primitive::floating(bits)
    } else if unsigned {
        Primitive::unsigned(bits)
    } else {
        Primitive::signed(bits)
    };
    primitive.array_dims = vec![0; dims];
    TypeSpec::Primitive(primitive)
}

/// Maps an api-prefix dialect string onto the `ApiSpec` bits it implies.
fn apply_dialect(dialect: &str, api_spec: &mut ApiSpec) {
    match dialect {
        "Standard C" | "C" => {
            api_spec.insert(ApiSpec::STANDARD);
            api_spec.insert(ApiSpec::C);
        }
        "Standard C++" | "C++" => {
            api_spec.insert(ApiSpec::STANDARD);
            api_spec.insert(ApiSpec::CPP);
        }
        "dynamic" => api_spec.insert(ApiSpec::DYNAMIC),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovela_lex::Lexer;

    fn parse(src: &str) -> (Vec<Node>, lovela_util::DiagnosticBag) {
        let lexer = Lexer::new(src);
        Parser::from_lexer(lexer, lovela_util::FileId::DUMMY).parse()
    }

    #[test]
    fn cstr_primitive_is_array_of_i8() {
        let ty = parse_primitive_type("#8#");
        assert_eq!(
            ty,
            TypeSpec::Primitive(Primitive {
                bits: 8,
                signed: true,
                floating: false,
                array_dims: vec![0],
            })
        );
    }

    #[test]
    fn double_primitive() {
        assert_eq!(
            parse_primitive_type("#.64"),
            TypeSpec::Primitive(Primitive::floating(64))
        );
    }

    #[test]
    fn unsigned_primitive() {
        assert_eq!(
            parse_primitive_type("#+8"),
            TypeSpec::Primitive(Primitive::unsigned(8))
        );
    }

    #[test]
    fn empty_type_spec_is_any() {
        let (decls, diags) = parse("f[]: + 1.");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls[0].in_type, TypeSpec::Any);
    }

    #[test]
    fn none_type_spec() {
        let (decls, diags) = parse("f[()]: + 1.");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(decls[0].in_type, TypeSpec::None);
    }
}
