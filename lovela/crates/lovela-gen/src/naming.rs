//! Name-mangling helpers shared by every visitor: the prefixes are the
//! emitter's entire namespacing scheme, so every generated identifier goes
//! through one of these.

use lovela_par::{Primitive, TypeSpec};

pub const ANY_TYPE_NAME: &str = "auto";
pub const NONE_TYPE_NAME: &str = "lovela::None";
pub const INVALID_TYPE_NAME: &str = "InvalidTypeName";

pub fn function_name(name: &str) -> String {
    format!("f_{name}")
}

pub fn parameter_name(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("param{index}")
    } else {
        format!("p_{name}")
    }
}

pub fn variable_name(index: usize) -> String {
    format!("v{index}")
}

/// `ConvertTypeName` — the type used inside a function signature or local
/// declaration. `Tagged`/`Primitive` may additionally need a template
/// parameter or be rejected outright; that's the caller's job.
pub fn convert_type_name(ty: &TypeSpec) -> String {
    match ty {
        TypeSpec::Any => ANY_TYPE_NAME.to_string(),
        TypeSpec::None => NONE_TYPE_NAME.to_string(),
        TypeSpec::Tagged(name) => format!("Tag{name}"),
        TypeSpec::Named(name) => format!("t_{name}"),
        TypeSpec::Primitive(p) => convert_primitive_type(p).unwrap_or_else(|| INVALID_TYPE_NAME.to_string()),
    }
}

/// `ConvertPrimitiveType` — `None` for widths/kinds the target language
/// can't represent (1-bit integers, 16-bit floats, anything outside the
/// 8/16/32/64 table).
pub fn convert_primitive_type(p: &Primitive) -> Option<String> {
    if !p.is_emittable() {
        return None;
    }

    if !p.floating && p.signed && p.bits == 8 && p.array_dims == [0] {
        return Some("l_cstr".to_string());
    }

    let sign = if p.floating { 'f' } else if p.signed { 'i' } else { 'u' };
    let mut name = format!("l_{sign}{}", p.bits);
    name.push_str(&"*".repeat(p.array_dims.len()));
    Some(name)
}
