//! The JSON-to-Module Encoder (§4.10): rewrites a JSON asset's content into the module
//! shape the target runtime's loader expects, since the runtime has no native `import …
//! from "*.json"` support.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var",
    "void", "while", "with", "yield", "let", "static", "enum", "await", "implements",
    "package", "protected", "interface", "private", "public", "null", "true", "false",
];

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !RESERVED_WORDS.contains(&name)
}

/// Pick a free top-level identifier starting from `"d"`, trying `"d1"`, `"d2"`, … when the
/// object already owns a property with that name.
fn pick_identifier(object: &serde_json::Map<String, Value>) -> String {
    if !object.contains_key("d") {
        return "d".to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("d{n}");
        if !object.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Encode `json_text` per §4.10. The `const` initializer reuses the original (trimmed)
/// source text verbatim rather than a re-serialization, so formatting and key order are
/// preserved exactly as authored.
pub fn encode(json_text: &str) -> String {
    let trimmed = json_text.trim();
    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => return format!("export default {trimmed};\n"),
    };

    match &value {
        Value::Object(object) => {
            let id = pick_identifier(object);
            let mut out = format!("const {id} = {trimmed};\nexport default {id};\n");
            for key in object.keys() {
                if is_valid_identifier(key) {
                    out.push_str(&format!("export const {key} = {id}.{key};\n"));
                }
            }
            out
        }
        _ => format!("export default {trimmed};\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_object_with_mixed_identifier_validity() {
        let out = encode(r#"{"a":1,"b-c":2}"#);
        assert!(out.starts_with(r#"const d = {"a":1,"b-c":2};"#));
        assert!(out.contains("export default d;"));
        assert!(out.contains("export const a = d.a;"));
        assert!(!out.contains("export const b-c"));
    }

    #[test]
    fn picks_free_identifier_when_d_is_taken() {
        let out = encode(r#"{"d":1}"#);
        assert!(out.contains("const d1 = "));
        assert!(out.contains("export default d1;"));
    }

    #[test]
    fn non_object_json_emits_bare_default() {
        let out = encode("[1,2,3]");
        assert_eq!(out, "export default [1,2,3];\n");
    }

    #[test]
    fn rejects_reserved_word_keys() {
        let out = encode(r#"{"class":1,"ok":2}"#);
        assert!(!out.contains("export const class"));
        assert!(out.contains("export const ok = d.ok;"));
    }
}
