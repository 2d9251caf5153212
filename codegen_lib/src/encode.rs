//! Encoding strategy engine: decides how each field's runtime value reaches
//! the request form, and emits the matching Go collection statements.
//!
//! Strategy selection is a pure function of field metadata, evaluated once
//! per field at generation time. The union ambiguity (e.g. "InputFile or
//! String") becomes a runtime branch in the emitted code, never dynamic
//! dispatch in the generator.

use anyhow::{Context, Result};

use crate::naming::{snake_to_camel, snake_to_title};
use crate::schema::Field;
use crate::types::{go_type, is_array, preferred_type, Stringer};

/// How one field's value is collected into the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStrategy {
    /// Primitive with a direct string conversion.
    Primitive(Stringer),
    /// File upload, registered in the multipart sink and referenced through
    /// `attach://<field>`. `allow_string` admits a verbatim file-id/URL
    /// branch for unions that declare a textual alternative.
    InputFile { allow_string: bool },
    /// Self-serializing keyboard markup.
    Markup,
    /// Single media object, serialized against the shared multipart sink
    /// with the field name as disambiguation key.
    Media,
    /// Ordered media sequence; one sink entry per index, aggregated into a
    /// single JSON array value.
    MediaSeq,
    /// Anything else is JSON-encoded. `guard_nil` wraps the block for array
    /// types so an absent optional emits no value at all.
    Json { guard_nil: bool },
}

/// Classify a field by its resolved preferred type. First match wins.
pub fn classify(f: &Field) -> Result<ValueStrategy> {
    let field_type = preferred_type(f)?;
    if let Some(stringer) = Stringer::for_go_type(&go_type(&field_type)) {
        return Ok(ValueStrategy::Primitive(stringer));
    }
    Ok(match field_type.as_str() {
        "InputFile" => ValueStrategy::InputFile {
            allow_string: f.types.len() > 1,
        },
        "ReplyMarkup" => ValueStrategy::Markup,
        "InputMedia" => ValueStrategy::Media,
        "Array of InputMedia" => ValueStrategy::MediaSeq,
        _ => ValueStrategy::Json {
            guard_nil: is_array(&field_type),
        },
    })
}

/// True when any field forces multipart transport for the whole method.
/// This is a property of the field list, not of any runtime value.
pub fn multipart_required(fields: &[Field]) -> bool {
    fields.iter().any(|f| {
        matches!(
            classify(f),
            Ok(ValueStrategy::InputFile { .. } | ValueStrategy::Media | ValueStrategy::MediaSeq)
        )
    })
}

/// Emit the value-collection statements for every field, in declaration
/// order. `default_ret` is the method's zero value for early error returns
/// inside the emitted body.
pub fn collect_values(fields: &[Field], default_ret: &str) -> Result<String> {
    let mut body = String::new();
    for f in fields {
        let strategy = classify(f)
            .with_context(|| format!("failed to get preferred type for field {}", f.name))?;

        let param = if f.required {
            snake_to_camel(&f.name)
        } else {
            format!("opts.{}", snake_to_title(&f.name))
        };

        strategy.emit(&mut body, &f.name, &param, default_ret);
    }
    Ok(body)
}

impl ValueStrategy {
    /// Append this field's Go collection statements to `out`.
    ///
    /// Serialization failures belong to the emitted code's runtime: every
    /// fallible branch returns the method's zero value and an error wrapping
    /// the field name.
    pub fn emit(&self, out: &mut String, field: &str, param: &str, default_ret: &str) {
        match *self {
            ValueStrategy::Primitive(stringer) => {
                out.push_str(&format!("\n\tv.Add(\"{}\", {})", field, stringer.apply(param)));
            }
            ValueStrategy::InputFile { allow_string } => {
                emit_input_file(out, field, param, default_ret, allow_string);
            }
            ValueStrategy::Markup => {
                out.push_str(&format!("\n\tbytes, err := {}.ReplyMarkup()", param));
                out.push_str("\n\tif err != nil {");
                out.push_str(&format!(
                    "\n\t\treturn {}, fmt.Errorf(\"failed to marshal field {}: %w\", err)",
                    default_ret, field
                ));
                out.push_str("\n\t}");
                out.push_str(&format!("\n\tv.Add(\"{}\", string(bytes))", field));
            }
            ValueStrategy::Media => {
                out.push_str(&format!(
                    "\n\tinputMediaBs, err := {}.InputMediaParams(\"{}\", data)",
                    param, field
                ));
                out.push_str("\n\tif err != nil {");
                out.push_str(&format!(
                    "\n\t\treturn {}, fmt.Errorf(\"failed to marshal field {}: %w\", err)",
                    default_ret, field
                ));
                out.push_str("\n\t}");
                out.push_str(&format!("\n\tv.Add(\"{}\", string(inputMediaBs))", field));
            }
            ValueStrategy::MediaSeq => {
                emit_media_seq(out, field, param, default_ret);
            }
            ValueStrategy::Json { guard_nil } => {
                emit_json(out, field, param, default_ret, guard_nil);
            }
        }
    }
}

fn emit_input_file(out: &mut String, field: &str, param: &str, default_ret: &str, allow_string: bool) {
    out.push_str(&format!("\n\tif {} != nil {{", param));
    if allow_string {
        // plain string is an external reference or file-id, sent verbatim
        out.push_str(&format!("\n\t\tif s, ok := {}.(string); ok {{", param));
        out.push_str(&format!("\n\t\t\tv.Add(\"{}\", s)", field));
        out.push_str(&format!("\n\t\t}} else if r, ok := {}.(io.Reader); ok {{", param));
    } else {
        out.push_str(&format!("\n\t\tif r, ok := {}.(io.Reader); ok {{", param));
    }
    out.push_str(&format!("\n\t\t\tv.Add(\"{}\", \"attach://{}\")", field, field));
    out.push_str(&format!("\n\t\t\tdata[\"{}\"] = NamedReader{{File: r}}", field));
    out.push_str(&format!("\n\t\t}} else if nf, ok := {}.(NamedReader); ok {{", param));
    out.push_str(&format!("\n\t\t\tv.Add(\"{}\", \"attach://{}\")", field, field));
    out.push_str(&format!("\n\t\t\tdata[\"{}\"] = nf", field));
    out.push_str("\n\t\t} else {");
    out.push_str(&format!(
        "\n\t\t\treturn {}, fmt.Errorf(\"unknown type for InputFile: %T\", {})",
        default_ret, param
    ));
    out.push_str("\n\t\t}");
    out.push_str("\n\t}");
}

fn emit_media_seq(out: &mut String, field: &str, param: &str, default_ret: &str) {
    out.push_str(&format!("\n\tif {} != nil {{", param));
    out.push_str("\n\t\tvar rawList []json.RawMessage");
    out.push_str(&format!("\n\t\tfor idx, im := range {} {{", param));
    out.push_str(&format!(
        "\n\t\t\tinputMediaBs, err := im.InputMediaParams(\"{}\" + strconv.Itoa(idx), data)",
        field
    ));
    out.push_str("\n\t\t\tif err != nil {");
    out.push_str(&format!(
        "\n\t\t\t\treturn {}, fmt.Errorf(\"failed to marshal InputMedia list item %d for field {}: %w\", idx, err)",
        default_ret, field
    ));
    out.push_str("\n\t\t\t}");
    out.push_str("\n\t\t\trawList = append(rawList, inputMediaBs)");
    out.push_str("\n\t\t}");
    out.push_str("\n\t\tbytes, err := json.Marshal(rawList)");
    out.push_str("\n\t\tif err != nil {");
    out.push_str(&format!(
        "\n\t\t\treturn {}, fmt.Errorf(\"failed to marshal raw json list of InputMedia for field {}: %w\", err)",
        default_ret, field
    ));
    out.push_str("\n\t\t}");
    out.push_str(&format!("\n\t\tv.Add(\"{}\", string(bytes))", field));
    out.push_str("\n\t}");
}

fn emit_json(out: &mut String, field: &str, param: &str, default_ret: &str, guard_nil: bool) {
    let indent = if guard_nil {
        out.push_str(&format!("\n\tif {} != nil {{", param));
        "\t\t"
    } else {
        "\t"
    };
    out.push_str(&format!("\n{}bytes, err := json.Marshal({})", indent, param));
    out.push_str(&format!("\n{}if err != nil {{", indent));
    out.push_str(&format!(
        "\n{}\treturn {}, fmt.Errorf(\"failed to marshal field {}: %w\", err)",
        indent, default_ret, field
    ));
    out.push_str(&format!("\n{}}}", indent));
    out.push_str(&format!("\n{}v.Add(\"{}\", string(bytes))", indent, field));
    if guard_nil {
        out.push_str("\n\t}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, required: bool, types: &[&str]) -> Field {
        Field {
            name: name.to_string(),
            required,
            types: types.iter().map(|t| t.to_string()).collect(),
            description: String::new(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&field("chat_id", true, &["Integer", "String"])).unwrap(),
            ValueStrategy::Primitive(Stringer::Int64)
        );
        assert_eq!(
            classify(&field("photo", false, &["InputFile", "String"])).unwrap(),
            ValueStrategy::InputFile { allow_string: true }
        );
        assert_eq!(
            classify(&field("thumbnail", false, &["InputFile"])).unwrap(),
            ValueStrategy::InputFile { allow_string: false }
        );
        assert_eq!(
            classify(&field("media", true, &["InputMedia"])).unwrap(),
            ValueStrategy::Media
        );
        assert_eq!(
            classify(&field("media", true, &["Array of InputMedia"])).unwrap(),
            ValueStrategy::MediaSeq
        );
        assert_eq!(
            classify(&field("entities", false, &["Array of MessageEntity"])).unwrap(),
            ValueStrategy::Json { guard_nil: true }
        );
        assert_eq!(
            classify(&field("permissions", true, &["ChatPermissions"])).unwrap(),
            ValueStrategy::Json { guard_nil: false }
        );
    }

    #[test]
    fn test_multipart_required() {
        // any attachment-bearing field flips the whole method
        assert!(multipart_required(&[
            field("chat_id", true, &["Integer"]),
            field("photo", false, &["InputFile", "String"]),
        ]));
        assert!(multipart_required(&[field("media", true, &["Array of InputMedia"])]));
        assert!(!multipart_required(&[
            field("chat_id", true, &["Integer"]),
            field("text", true, &["String"]),
            field("entities", false, &["Array of MessageEntity"]),
        ]));
    }

    #[test]
    fn test_emit_input_file_union() {
        let mut out = String::new();
        ValueStrategy::InputFile { allow_string: true }.emit(&mut out, "photo", "opts.Photo", "nil");
        assert!(out.contains("if s, ok := opts.Photo.(string); ok {"));
        assert!(out.contains("v.Add(\"photo\", s)"));
        assert!(out.contains("v.Add(\"photo\", \"attach://photo\")"));
        assert!(out.contains("data[\"photo\"] = NamedReader{File: r}"));
        assert!(out.contains("unknown type for InputFile: %T"));
    }

    #[test]
    fn test_emit_input_file_strict() {
        let mut out = String::new();
        ValueStrategy::InputFile { allow_string: false }.emit(&mut out, "sticker", "sticker", "nil");
        // no verbatim string branch when the schema declares InputFile alone
        assert!(!out.contains(".(string)"));
        assert!(out.contains("if r, ok := sticker.(io.Reader); ok {"));
        assert!(out.contains("data[\"sticker\"] = nf"));
    }

    #[test]
    fn test_emit_media_seq_index_keys() {
        let mut out = String::new();
        ValueStrategy::MediaSeq.emit(&mut out, "media", "media", "nil");
        assert!(out.contains("if media != nil {"));
        assert!(out.contains("InputMediaParams(\"media\" + strconv.Itoa(idx), data)"));
        assert!(out.contains("json.Marshal(rawList)"));
    }

    #[test]
    fn test_emit_json_guard() {
        let mut out = String::new();
        ValueStrategy::Json { guard_nil: true }.emit(&mut out, "entities", "opts.Entities", "nil");
        assert!(out.contains("if opts.Entities != nil {"));

        let mut out = String::new();
        ValueStrategy::Json { guard_nil: false }.emit(&mut out, "permissions", "permissions", "false");
        assert!(!out.contains("!= nil"));
        assert!(out.contains("return false, fmt.Errorf(\"failed to marshal field permissions: %w\", err)"));
    }

    #[test]
    fn test_collect_values_param_selection() {
        let body = collect_values(
            &[
                field("chat_id", true, &["Integer", "String"]),
                field("caption", false, &["String"]),
            ],
            "nil",
        )
        .unwrap();
        assert!(body.contains("v.Add(\"chat_id\", strconv.FormatInt(chatId, 10))"));
        assert!(body.contains("v.Add(\"caption\", opts.Caption)"));
    }
}
