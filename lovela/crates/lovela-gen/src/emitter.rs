//! A single-threaded, post-order walk over the parser's node forest that
//! writes a C++-flavoured program stream plus two companion header texts.
//!
//! Three sinks: `program` is written immediately as each declaration is
//! visited; `headers` and `exports` accumulate and are drained by the
//! driver into the imports/exports header files afterwards.

use std::fmt::Write as _;

use lovela_lex::TokenKind;
use lovela_par::{ApiSpec, Node, NodeKind, TypeSpec};
use lovela_util::diagnostic::codes;
use lovela_util::{Diagnostic, DiagnosticBag, Span};

use crate::naming::{convert_primitive_type, convert_type_name, function_name, parameter_name, NONE_TYPE_NAME};
use crate::stdlib_map;

/// Per-function-body state: the shared, incrementing local-variable index
/// (`v1, v2, …`). Reset at the start of every function.
#[derive(Default)]
struct LocalScope {
    variable_index: usize,
}

#[derive(Default)]
pub struct Emitter {
    program: String,
    indent: String,
    headers: Vec<String>,
    exports: Vec<String>,
    diagnostics: DiagnosticBag,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter::default()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }

    /// Visits every top-level declaration. Declarations are independent —
    /// one producing an error doesn't stop the rest from being emitted.
    pub fn emit_program(&mut self, decls: &[Node]) {
        for decl in decls {
            self.visit_top(decl);
        }
    }

    pub fn render_program_file(&self) -> String {
        format!("#include \"lovela-program.h\"\n\n{}", self.program)
    }

    pub fn render_imports_file(&self) -> String {
        let mut out = String::from(
            "// Automatically generated header with function declarations that the lovela program imports.\n#ifndef LOVELA_IMPORTS\n#define LOVELA_IMPORTS\n\n",
        );
        for header in &self.headers {
            writeln!(out, "#include <{header}>").ok();
        }
        out.push_str("\n#endif\n");
        out
    }

    pub fn render_exports_file(&self) -> String {
        let mut out = String::from(
            "// Automatically generated header with function declarations that the lovela program exports.\n#ifndef LOVELA_EXPORTS\n#define LOVELA_EXPORTS\n\n",
        );
        for declaration in &self.exports {
            writeln!(out, "{declaration};").ok();
        }
        out.push_str("\n#endif\n");
        out
    }

    fn visit_top(&mut self, node: &Node) {
        match node.kind {
            NodeKind::FunctionDeclaration => self.function_declaration(node),
            NodeKind::Error => {
                tracing::debug!(message = %node.value, "skipping declaration that failed to parse");
            }
            other => {
                self.diagnostics.push(
                    Diagnostic::error(format!("unexpected top-level node kind {other:?}"))
                        .code(codes::E_GEN_UNHANDLED_NODE)
                        .span(node.span)
                        .build(),
                );
            }
        }
    }

    fn begin_scope(&mut self) {
        writeln!(self.program, "{}{{", self.indent).ok();
        self.indent.push('\t');
    }

    fn end_scope(&mut self) {
        self.indent.pop();
        writeln!(self.program, "{}}}", self.indent).ok();
    }

    fn add_header(&mut self, header: &str) {
        if !self.headers.iter().any(|h| h == header) {
            self.headers.push(header.to_string());
        }
    }

    /// `None` means the type can't appear in a primitive-only (export or
    /// foreign-import) signature; a diagnostic has already been recorded.
    fn check_primitive_export_type(&mut self, ty: &TypeSpec, span: Span) -> Option<String> {
        match ty {
            TypeSpec::None => Some(NONE_TYPE_NAME.to_string()),
            TypeSpec::Any => Some("void*".to_string()),
            TypeSpec::Primitive(p) => convert_primitive_type(p).or_else(|| {
                self.diagnostics.push(
                    Diagnostic::error("exported/imported functions must have primitive in, out, and parameter types")
                        .code(codes::E_GEN_NON_PRIMITIVE_EXPORT)
                        .span(span)
                        .build(),
                );
                None
            }),
            TypeSpec::Tagged(_) | TypeSpec::Named(_) => {
                self.diagnostics.push(
                    Diagnostic::error("exported/imported functions must have primitive in, out, and parameter types")
                        .code(codes::E_GEN_NON_PRIMITIVE_EXPORT)
                        .span(span)
                        .build(),
                );
                None
            }
        }
    }

    fn function_declaration(&mut self, node: &Node) {
        if node.value.is_empty() {
            self.main_function_declaration(node);
            return;
        }

        if node.api_spec.contains(ApiSpec::IMPORT) {
            self.imported_function_declaration(node);
        }

        let mut template_params = Vec::new();

        let out_type_name = convert_type_name(&node.out_type);
        if matches!(node.out_type, TypeSpec::Tagged(_)) {
            template_params.push(out_type_name.clone());
        }

        let in_type_name = convert_type_name(&node.in_type);
        if matches!(node.in_type, TypeSpec::Tagged(_)) {
            template_params.push(in_type_name.clone());
        }

        let mut params: Vec<(String, String)> = vec![(in_type_name, "in".to_string())];
        for (index, param) in node.parameters.iter().enumerate() {
            let name = parameter_name(&param.name, index + 1);
            let type_name = convert_type_name(&param.ty);
            if matches!(param.ty, TypeSpec::Tagged(_)) {
                template_params.push(type_name.clone());
            }
            params.push((type_name, name));
        }

        if !template_params.is_empty() {
            let list = template_params
                .iter()
                .map(|p| format!("typename {p}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(self.program, "{}template <{}>", self.indent, list).ok();
        }

        write!(self.program, "{}{} {}(lovela::context& context", self.indent, out_type_name, function_name(&node.value)).ok();
        for (ty, name) in &params {
            write!(self.program, ", {ty} {name}").ok();
        }
        write!(self.program, ")").ok();

        if node.api_spec.contains(ApiSpec::IMPORT) {
            self.imported_function_body(node, &params);
        } else {
            self.function_body(node);
        }
        writeln!(self.program).ok();

        if node.api_spec.contains(ApiSpec::EXPORT) {
            self.exported_function_declaration(node);
        }
    }

    fn main_function_declaration(&mut self, node: &Node) {
        if !matches!(node.out_type, TypeSpec::None) {
            self.diagnostics.push(
                Diagnostic::warning("the main function's out-type wasn't None; the parser should have rejected that")
                    .code(codes::E_GEN_UNHANDLED_NODE)
                    .span(node.span)
                    .build(),
            );
        }
        write!(self.program, "{} lovela::main(lovela::context& context, {} in)", NONE_TYPE_NAME, NONE_TYPE_NAME).ok();
        self.function_body(node);
        writeln!(self.program).ok();
    }

    fn function_body(&mut self, node: &Node) {
        let Some(body) = node.children.first() else {
            write!(self.program, ";").ok();
            return;
        };

        writeln!(self.program).ok();
        self.begin_scope();
        writeln!(self.program, "{}static_cast<void>(context);", self.indent).ok();

        let mut scope = LocalScope { variable_index: 1 };
        writeln!(self.program, "{}auto& v1 = in; static_cast<void>(v1);", self.indent).ok();

        self.expression(body, &mut scope);

        if matches!(node.out_type, TypeSpec::None) {
            writeln!(self.program, "{}return {{}};", self.indent).ok();
        } else {
            writeln!(self.program, "{}return v{};", self.indent, scope.variable_index).ok();
        }
        self.end_scope();
    }

    fn imported_function_declaration(&mut self, node: &Node) {
        if node.api_spec.contains(ApiSpec::STANDARD) {
            let header = if node.api_spec.contains(ApiSpec::CPP) {
                stdlib_map::cpp_header(&node.value)
            } else {
                stdlib_map::c_header(&node.value)
            };
            if let Some(header) = header {
                self.add_header(header);
            }
            return;
        }

        let explicit = node.api_spec.contains(ApiSpec::C) || node.api_spec.contains(ApiSpec::CPP) || node.api_spec.contains(ApiSpec::DYNAMIC);
        if !explicit {
            // No calling convention was named; the user is expected to
            // supply the declaration themselves in a hand-written imports
            // header.
            return;
        }

        let Some((signature, ..)) = self.foreign_signature(node) else {
            return;
        };

        if node.api_spec.contains(ApiSpec::C) {
            write!(self.program, "LOVELA_API_C ").ok();
        } else if node.api_spec.contains(ApiSpec::CPP) {
            write!(self.program, "LOVELA_API_CPP ").ok();
        }
        if node.api_spec.contains(ApiSpec::DYNAMIC) && node.api_spec.contains(ApiSpec::IMPORT) {
            write!(self.program, "LOVELA_API_DYNAMIC_IMPORT ").ok();
        } else if node.api_spec.contains(ApiSpec::DYNAMIC) && node.api_spec.contains(ApiSpec::EXPORT) {
            write!(self.program, "LOVELA_API_DYNAMIC_EXPORT ").ok();
        }
        writeln!(self.program, "{signature};").ok();
        writeln!(self.program).ok();
    }

    /// Builds the primitive-only `outType name(params...)` signature shared
    /// by exported and explicitly-declared imported functions. Returns the
    /// signature text, whether the in-type was `None`, and the forwarding
    /// parameter names in signature order (`in` included only when present
    /// in the signature itself).
    fn foreign_signature(&mut self, node: &Node) -> Option<(String, bool, Vec<String>)> {
        let mut sig_params: Vec<(String, String)> = Vec::new();

        let in_is_none = matches!(node.in_type, TypeSpec::None);
        let in_name = self.check_primitive_export_type(&node.in_type, node.span)?;
        if !in_is_none {
            sig_params.push((in_name, "in".to_string()));
        }

        let out_is_none = matches!(node.out_type, TypeSpec::None);
        let raw_out_name = self.check_primitive_export_type(&node.out_type, node.span)?;
        let out_name = if out_is_none { "void".to_string() } else { raw_out_name };

        for (index, param) in node.parameters.iter().enumerate() {
            let name = parameter_name(&param.name, index + 1);
            let type_name = self.check_primitive_export_type(&param.ty, node.span)?;
            sig_params.push((type_name, name));
        }

        let params_text = sig_params.iter().map(|(ty, name)| format!("{ty} {name}")).collect::<Vec<_>>().join(", ");
        let names = sig_params.into_iter().map(|(_, name)| name).collect();
        Some((format!("{out_name} {}({params_text})", node.value), in_is_none, names))
    }

    fn exported_function_declaration(&mut self, node: &Node) {
        let Some((signature, in_is_none, forward_names)) = self.foreign_signature(node) else {
            return;
        };
        let out_is_none = matches!(node.out_type, TypeSpec::None);

        let mut declaration = String::new();
        if node.api_spec.contains(ApiSpec::C) {
            declaration.push_str("LOVELA_API_C ");
        } else if node.api_spec.contains(ApiSpec::CPP) {
            declaration.push_str("LOVELA_API_CPP ");
        }
        if node.api_spec.contains(ApiSpec::DYNAMIC) {
            declaration.push_str("LOVELA_API_DYNAMIC_EXPORT ");
        }
        declaration.push_str(&signature);
        self.exports.push(declaration);

        writeln!(self.program, "{signature}").ok();
        self.begin_scope();
        writeln!(self.program, "{}lovela::context context;", self.indent).ok();
        if in_is_none {
            writeln!(self.program, "{}{} in;", self.indent, NONE_TYPE_NAME).ok();
        }

        write!(self.program, "{}", self.indent).ok();
        if !out_is_none {
            write!(self.program, "return ").ok();
        }
        write!(self.program, "{}(context", function_name(&node.value)).ok();
        if in_is_none {
            write!(self.program, ", in").ok();
        }
        // `forward_names` already includes `in` when the signature carries
        // it (in_is_none == false), so this never double-threads it.
        for name in &forward_names {
            write!(self.program, ", {name}").ok();
        }
        writeln!(self.program, ");").ok();
        self.end_scope();
        writeln!(self.program).ok();
    }

    fn imported_function_body(&mut self, node: &Node, params: &[(String, String)]) {
        writeln!(self.program).ok();
        self.begin_scope();
        writeln!(self.program, "{}static_cast<void>(context);", self.indent).ok();

        write!(self.program, "{}", self.indent).ok();
        let out_is_none = matches!(node.out_type, TypeSpec::None);
        if !out_is_none {
            write!(self.program, "return ").ok();
        }
        write!(self.program, "{}(", node.value).ok();
        for (index, (_, name)) in params.iter().enumerate() {
            if index > 0 {
                write!(self.program, ", ").ok();
            }
            write!(self.program, "{name}").ok();
        }
        writeln!(self.program, ");").ok();
        if out_is_none {
            writeln!(self.program, "{}return {{}};", self.indent).ok();
        }
        self.end_scope();
    }

    /// `Expression`: one `const auto v_k = ...;` statement per body-level
    /// child (each dot-separated statement shares the function's variable
    /// index counter).
    fn expression(&mut self, node: &Node, scope: &mut LocalScope) {
        for statement in &node.children {
            scope.variable_index += 1;
            let index = scope.variable_index;
            write!(self.program, "{}const auto v{index} = ", self.indent).ok();
            self.emit_value(statement, scope);
            writeln!(self.program, "; static_cast<void>(v{index});").ok();
        }
    }

    /// Recursively renders a call-chain node inline, with no indentation
    /// or trailing punctuation of its own — the caller (`expression`, or a
    /// parent call building its own argument list) owns those.
    fn emit_value(&mut self, node: &Node, scope: &LocalScope) {
        match node.kind {
            NodeKind::ExpressionInput => {
                write!(self.program, "v{}", scope.variable_index.saturating_sub(1)).ok();
            }
            NodeKind::FunctionCall => {
                write!(self.program, "{}(context", function_name(&node.value)).ok();
                for child in &node.children {
                    write!(self.program, ", ").ok();
                    self.emit_value(child, scope);
                }
                write!(self.program, ")").ok();
            }
            NodeKind::BinaryOperation => {
                if node.children.len() != 2 {
                    self.diagnostics.push(
                        Diagnostic::error("binary operation missing an operand")
                            .code(codes::E_GEN_UNHANDLED_NODE)
                            .span(node.span)
                            .build(),
                    );
                    return;
                }
                self.emit_value(&node.children[0], scope);
                write!(self.program, " {} ", node.value).ok();
                self.emit_value(&node.children[1], scope);
            }
            NodeKind::Literal => {
                let is_string = node.token.as_ref().map(|t| t.kind) == Some(TokenKind::LiteralString);
                if is_string {
                    write!(self.program, "{}", double_quote(&node.value)).ok();
                } else if node.value.is_empty() {
                    write!(self.program, "{{}}").ok();
                } else {
                    write!(self.program, "{}", node.value).ok();
                }
            }
            NodeKind::Tuple => {
                write!(self.program, "(").ok();
                for (index, child) in node.children.iter().enumerate() {
                    if index > 0 {
                        write!(self.program, ", ").ok();
                    }
                    self.emit_value(child, scope);
                }
                write!(self.program, ")").ok();
            }
            NodeKind::VariableReference => {
                write!(self.program, "{}", parameter_name(&node.value, 0)).ok();
            }
            NodeKind::Error => {
                write!(self.program, "/* {} */", node.value).ok();
            }
            NodeKind::FunctionDeclaration | NodeKind::Expression => {
                self.diagnostics.push(
                    Diagnostic::error(format!("unhandled node kind in expression position: {:?}", node.kind))
                        .code(codes::E_GEN_UNHANDLED_NODE)
                        .span(node.span)
                        .build(),
                );
            }
        }
    }
}

fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovela_lex::Lexer;
    use lovela_par::Parser;

    fn emit(source: &str) -> Emitter {
        let lexer = Lexer::new(source);
        let parser = Parser::from_lexer(lexer, lovela_util::FileId::DUMMY);
        let (decls, parse_diagnostics) = parser.parse();
        assert!(!parse_diagnostics.has_errors(), "source failed to parse: {source}");
        let mut emitter = Emitter::new();
        emitter.emit_program(&decls);
        emitter
    }

    #[test]
    fn scenario_1_unexported_function() {
        let emitter = emit("func: + 1.");
        assert!(!emitter.diagnostics().has_errors());
        assert!(emitter.program().contains("auto f_func(lovela::context& context, auto in)"));
        assert!(emitter.program().contains("const auto v2 = v1 + 1;"));
        assert!(emitter.program().contains("return v2;"));
    }

    #[test]
    fn scenario_2_exported_function() {
        let emitter = emit("<- [#32] ex [#32]: + 1.");
        assert!(!emitter.diagnostics().has_errors());
        assert!(emitter.program().contains("l_i32 f_ex(lovela::context& context, l_i32 in)"));
        assert!(emitter.program().contains("const auto v2 = v1 + 1;"));
        assert!(emitter.program().contains("return v2;"));
        assert!(emitter.exports().iter().any(|e| e.contains("l_i32 ex(l_i32 in)")));
        assert!(emitter.program().contains("f_ex(context, in)"));
    }

    #[test]
    fn scenario_3_standard_c_import_has_no_forward_declaration() {
        let emitter = emit("-> 'Standard C' puts.");
        assert!(!emitter.diagnostics().has_errors());
        assert!(emitter.headers().iter().any(|h| h == "stdio.h"));
        // A Standard import never gets a raw forward declaration (no
        // LOVELA_API_* prefixed line naming the bare symbol) — only the
        // `f_puts` wrapper's body calls through to it.
        assert!(!emitter.program().contains("LOVELA_API"));
        assert!(emitter.program().contains("puts("));
    }

    #[test]
    fn main_function_uses_none_sentinel_signature() {
        let emitter = emit(": + 1.");
        assert!(emitter.program().contains("lovela::None lovela::main(lovela::context& context, lovela::None in)"));
    }

    #[test]
    fn exported_function_with_non_primitive_type_is_rejected() {
        let emitter = emit("<- [widget] ex [#32]: + 1.");
        assert!(emitter.diagnostics().has_errors());
        assert!(emitter.exports().is_empty());
    }

    #[test]
    fn tuple_renders_as_parenthesized_comma_list() {
        let emitter = emit("func: (1, 2).");
        assert!(emitter.program().contains("(1, 2)"));
    }

    #[test]
    fn string_literal_is_double_quoted() {
        let emitter = emit("func: 'hi'.");
        assert!(emitter.program().contains("\"hi\""));
    }
}
