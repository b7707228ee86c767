//! Codec for the `c("a", "b")` list literals stored in the ingredient,
//! instruction and image columns of the recipe dataset.

/// Encodes a list of strings as `c("a", "b")`. Backslashes are doubled and
/// embedded double quotes escaped with a backslash; an empty list becomes `c()`.
pub fn encode_list_literal<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "c()".to_string();
    }
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref().replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("c({})", quoted.join(", "))
}

/// Extracts the quoted items of a list literal, in order.
///
/// Anything outside quotes is ignored, so a plain string without quotes
/// yields an empty list. An escaped quote is kept verbatim: `\"` stays
/// `\"` in the returned item, it only stops the quote from closing the item.
/// A doubled backslash decodes to a single one.
pub fn parse_list_literal(literal: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }
        let mut item = String::new();
        let mut closed = false;
        while let Some(inner) = chars.next() {
            match inner {
                '\\' => match chars.peek() {
                    Some('\\') => {
                        chars.next();
                        item.push('\\');
                    }
                    Some('"') => {
                        chars.next();
                        item.push_str("\\\"");
                    }
                    _ => item.push('\\'),
                },
                '"' => {
                    closed = true;
                    break;
                }
                _ => item.push(inner),
            }
        }
        // An unterminated quote is not an item.
        if closed {
            items.push(item);
        }
    }

    items
}
