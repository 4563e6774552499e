//! JSON extraction from model output
//!
//! Models wrap their JSON in pleasantries or markdown fences often enough
//! that the raw text cannot be parsed directly. This scanner pulls out the
//! first balanced `{...}` object, tracking string literals and escapes so
//! braces inside values do not confuse the depth count.

/// Extract the first balanced JSON object from `text`, ignoring any
/// surrounding prose. Returns `None` if no complete object is present.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
