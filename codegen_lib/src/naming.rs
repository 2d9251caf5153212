//! Identifier-case conversions between the schema's snake_case names and the
//! generated code's Go conventions.

/// `chat_id` -> `chatId`. Parameter names in generated signatures.
pub fn snake_to_camel(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut upper_next = false;
    for ch in s.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// `chat_id` -> `ChatId`. Exported struct field names.
pub fn snake_to_title(s: &str) -> String {
    uppercase_first(&snake_to_camel(s))
}

/// `sendPhoto` -> `SendPhoto`. Method names arrive in lowerCamel already;
/// exporting them only needs the leading capital.
pub fn export_method_name(s: &str) -> String {
    uppercase_first(s)
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("chat_id"), "chatId");
        assert_eq!(snake_to_camel("disable_web_page_preview"), "disableWebPagePreview");
        assert_eq!(snake_to_camel("url"), "url");
    }

    #[test]
    fn test_snake_to_title() {
        assert_eq!(snake_to_title("chat_id"), "ChatId");
        assert_eq!(snake_to_title("photo"), "Photo");
        assert_eq!(snake_to_title("reply_markup"), "ReplyMarkup");
    }

    #[test]
    fn test_export_method_name() {
        assert_eq!(export_method_name("sendPhoto"), "SendPhoto");
        assert_eq!(export_method_name("getMe"), "GetMe");
    }
}
