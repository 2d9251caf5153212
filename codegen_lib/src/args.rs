//! Argument planning: splits a method's fields into required positional
//! parameters and the synthesized `<Method>Opts` struct.

use anyhow::{Context, Result};

use crate::naming::{export_method_name, snake_to_camel, snake_to_title};
use crate::schema::MethodDescription;
use crate::types::{go_type, preferred_type};

/// Planned call surface of one generated method.
#[derive(Debug)]
pub struct PlannedArgs {
    /// Comma-joined parameter list for the function signature. Required
    /// fields in declaration order; the opts struct, when present, last.
    pub signature: String,
    /// Rendered `<Method>Opts` struct for the optional fields, emitted ahead
    /// of the owning method. `None` when every field is required.
    pub opts_struct: Option<String>,
}

/// Plan the signature for the method named `method_name`.
pub fn plan_args(method_name: &str, method: &MethodDescription) -> Result<PlannedArgs> {
    let mut params = Vec::new();
    let mut opt_fields = String::new();

    for f in &method.fields {
        let field_type = preferred_type(f)
            .with_context(|| format!("failed to get preferred type for field {}", f.name))?;
        let go_ty = go_type(&field_type);

        if f.required {
            params.push(format!("{} {}", snake_to_camel(&f.name), go_ty));
            continue;
        }

        // optional fields carry their schema description into the struct
        opt_fields.push_str(&format!("\t// {}\n", f.description));
        opt_fields.push_str(&format!("\t{} {}\n", snake_to_title(&f.name), go_ty));
    }

    let opts_struct = if opt_fields.is_empty() {
        None
    } else {
        let opts_name = format!("{}Opts", export_method_name(method_name));
        params.push(format!("opts {}", opts_name));
        Some(format!("type {} struct {{\n{}}}\n", opts_name, opt_fields))
    };

    Ok(PlannedArgs {
        signature: params.join(", "),
        opts_struct,
    })
}
