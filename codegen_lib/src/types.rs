//! Type resolution: collapses each field's type union to one concrete
//! representation, and maps schema types onto the generated Go types.
//!
//! Everything here is pure - same field in, same answer out - since the
//! output feeds source text that gets diffed across regenerations.

use anyhow::{bail, Result};

use crate::schema::{ApiDescription, Field};

/// Keyboard markup types that collapse to the shared `ReplyMarkup` interface
/// in generated code.
const MARKUP_TYPES: &[&str] = &[
    "InlineKeyboardMarkup",
    "ReplyKeyboardMarkup",
    "ReplyKeyboardRemove",
    "ForceReply",
];

/// Collapse a field's type union to the single type used for encoding.
///
/// Fixed ranking, evaluated once per field:
/// 1. a single candidate is taken as-is;
/// 2. any union containing `InputFile` encodes as `InputFile` (the textual
///    alternative survives as a runtime branch, not a separate type);
/// 3. `Integer or String` ids encode as `Integer`;
/// 4. unions made entirely of keyboard markup collapse to `ReplyMarkup`.
///
/// Anything else fails generation rather than guessing.
pub fn preferred_type(f: &Field) -> Result<String> {
    if f.types.is_empty() {
        bail!("field {} declares no types", f.name);
    }
    if f.types.len() == 1 {
        return Ok(f.types[0].clone());
    }
    if f.types.iter().any(|t| t == "InputFile") {
        return Ok("InputFile".to_string());
    }
    if f.types.len() == 2
        && f.types.iter().any(|t| t == "Integer")
        && f.types.iter().any(|t| t == "String")
    {
        return Ok("Integer".to_string());
    }
    if f.types.iter().all(|t| MARKUP_TYPES.contains(&t.as_str())) {
        return Ok("ReplyMarkup".to_string());
    }
    bail!(
        "unable to pick a preferred type for field {} from {:?}",
        f.name,
        f.types
    );
}

/// Map a schema type name to its Go spelling.
pub fn go_type(schema_ty: &str) -> String {
    if let Some(elem) = schema_ty.strip_prefix("Array of ") {
        return format!("[]{}", go_type(elem));
    }
    match schema_ty {
        "Integer" => "int64".to_string(),
        "String" => "string".to_string(),
        "Boolean" => "bool".to_string(),
        "Float" | "Float number" => "float64".to_string(),
        // API objects, InputFile and ReplyMarkup keep their names
        other => other.to_string(),
    }
}

/// Whether `schema_ty` is an Array union member.
pub fn is_array(schema_ty: &str) -> bool {
    schema_ty.starts_with("Array of ")
}

/// Whether a Go type names an API object defined by the description. Such
/// types are returned by pointer so their error-path zero form is `nil`.
pub fn is_api_type(d: &ApiDescription, go_ty: &str) -> bool {
    d.types.contains_key(go_ty)
}

/// Go zero value of a generated return type, used on every early error
/// return in the emitted body.
pub fn zero_value(go_ty: &str) -> String {
    if go_ty.starts_with('*') || go_ty.starts_with("[]") {
        return "nil".to_string();
    }
    match go_ty {
        "int64" => "0".to_string(),
        "string" => "\"\"".to_string(),
        "bool" => "false".to_string(),
        "float64" => "0.0".to_string(),
        other => format!("{}{{}}", other),
    }
}

/// Primitive conversions that have a direct string form in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stringer {
    Int64,
    Verbatim,
    Bool,
    Float64,
}

impl Stringer {
    pub fn for_go_type(go_ty: &str) -> Option<Stringer> {
        match go_ty {
            "int64" => Some(Stringer::Int64),
            "string" => Some(Stringer::Verbatim),
            "bool" => Some(Stringer::Bool),
            "float64" => Some(Stringer::Float64),
            _ => None,
        }
    }

    /// Render the conversion of `expr` to its form-value string.
    pub fn apply(self, expr: &str) -> String {
        match self {
            Stringer::Int64 => format!("strconv.FormatInt({}, 10)", expr),
            Stringer::Verbatim => expr.to_string(),
            Stringer::Bool => format!("strconv.FormatBool({})", expr),
            Stringer::Float64 => format!("strconv.FormatFloat({}, 'f', -1, 64)", expr),
        }
    }
}

/// Resolve a method's declared return candidates to one Go return type.
///
/// The description declares either a single return type, or the edit-shape
/// pair `<object> or Boolean` (True when the edit applied to an inline
/// message). The pair deliberately resolves to the object; every other
/// combination is refused instead of silently taking the first entry.
pub fn resolve_return_type(
    d: &ApiDescription,
    method_name: &str,
    returns: &[String],
) -> Result<String> {
    let schema_ty = match returns {
        [single] => single,
        [obj, boolean] if boolean == "Boolean" && d.types.contains_key(obj.as_str()) => obj,
        [] => bail!("method {} declares no return type", method_name),
        _ => bail!(
            "method {} declares ambiguous return types {:?}",
            method_name,
            returns
        ),
    };
    let ret = go_type(schema_ty);
    if is_api_type(d, &ret) {
        return Ok(format!("*{}", ret));
    }
    Ok(ret)
}
