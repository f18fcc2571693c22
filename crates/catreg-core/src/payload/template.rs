//! Positional `{N}` templates for JSON request bodies.

use super::PayloadError;

/// Replace every `{N}` with `args[N]`, JSON-string escaped. Everything else,
/// JSON braces included, is copied verbatim.
pub fn render(template: &str, args: &[&str]) -> Result<String, PayloadError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with('}') {
            let index: usize = after[..digits]
                .parse()
                .map_err(|_| PayloadError::Placeholder(after[..digits].to_string()))?;
            let value = args.get(index).ok_or(PayloadError::MissingArgument {
                index,
                provided: args.len(),
            })?;
            out.push_str(&json_escape(value)?);
            rest = &after[digits + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// `value` escaped for use inside a JSON string literal (no surrounding quotes).
fn json_escape(value: &str) -> Result<String, PayloadError> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}
