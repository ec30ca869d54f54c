//! The Post-Processor (§4.7, §4.9): strict-mode-prologue removal, JSON-to-module rewriting,
//! and optional minify/source-map fusion, applied to every asset before serialization.

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Statement};
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;

use crate::asset_table::AssetTable;
use crate::closure::CompressionMode;
use crate::json_module;

/// Delete every top-level `"use strict";` expression statement (§4.7). Best-effort: a
/// source that fails to reparse here is passed through unchanged rather than aborting the
/// bundling over a cosmetic step.
pub fn remove_strict_directive(source: &str) -> String {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !parsed.errors.is_empty() {
        return source.to_string();
    }
    let mut program = parsed.program;
    program.body.retain(|stmt| !is_use_strict(stmt));
    Codegen::new().build(&program).code
}

fn is_use_strict(stmt: &Statement) -> bool {
    let Statement::ExpressionStatement(expr) = stmt else {
        return false;
    };
    matches!(&expr.expression, Expression::StringLiteral(lit) if lit.value.as_str() == "use strict")
}

/// Drop a trailing `//# sourceMappingURL=...` line; the map travels as an independent
/// asset rather than an inline comment.
pub fn strip_sourcemapping_comment(source: &str) -> String {
    let had_trailing_newline = source.ends_with('\n');
    let mut lines: Vec<&str> = source.lines().collect();
    if lines
        .last()
        .is_some_and(|l| l.trim_start().starts_with("//# sourceMappingURL="))
    {
        lines.pop();
    }
    let mut out = lines.join("\n");
    if had_trailing_newline && !out.is_empty() {
        out.push('\n');
    }
    out
}

struct MinifyOutput {
    code: String,
    map_json: Option<String>,
}

/// Rewrite `process.env.FRIDA_COMPILE` to the literal `true` before the minifier ever sees
/// the source (§4.9), so its own dead-code elimination collapses any `if (process.env.
/// FRIDA_COMPILE) { ... }` guard the same way it would a hand-written literal condition —
/// without needing the minifier itself to know about this particular global.
fn substitute_global_defines(source: &str) -> String {
    let pattern = Regex::new(r"\bprocess\.env\.FRIDA_COMPILE\b").expect("static pattern is valid");
    pattern.replace_all(source, "true").into_owned()
}

fn minify(source: &str, asset_name: &str, origin: &Path, prior_map: Option<&[u8]>) -> MinifyOutput {
    let source = substitute_global_defines(source);

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, &source, SourceType::mjs()).parse();
    let mut program = parsed.program;

    Minifier::new(MinifierOptions::default()).minify(&allocator, &mut program);

    let codegen_options = CodegenOptions {
        source_map_path: Some(PathBuf::from(asset_name.trim_start_matches('/'))),
        ..CodegenOptions::default()
    };
    let ret = Codegen::new().with_options(codegen_options).build(&program);

    let prior_map_json = prior_map.map(|bytes| String::from_utf8_lossy(bytes).into_owned());
    let map_json = ret
        .map
        .map(|map| fuse_source_map(&map.to_json_string(), asset_name, origin, prior_map_json.as_deref()));
    MinifyOutput { code: ret.code, map_json }
}

/// Fuse the minifier's own map (minified JS ← pre-minify JS) with whatever map the compiler
/// already produced for that pre-minify JS (pre-minify JS ← original typed source), so the
/// final map traces straight from minified output back to the original source rather than
/// only as far back as the intermediate, pre-minify code. Falls back to passing the
/// minifier's map through unchanged when there is no prior map to fuse with (§4.9).
///
/// Sets `sourceRoot` to `portable(dirname(origin)) + "/"`, strips that prefix from every
/// `sources` entry, and sets `file` to the basename of the emitted asset.
fn fuse_source_map(new_map_json: &str, asset_name: &str, origin: &Path, prior_map_json: Option<&str>) -> String {
    let mut value: serde_json::Value =
        serde_json::from_str(new_map_json).unwrap_or_else(|_| serde_json::json!({}));

    if let Some(prior_json) = prior_map_json {
        if let Ok(prior_value) = serde_json::from_str::<serde_json::Value>(prior_json) {
            let composed = value
                .get("mappings")
                .and_then(|m| m.as_str())
                .zip(prior_value.get("mappings").and_then(|m| m.as_str()))
                .map(|(new_mappings, prior_mappings)| {
                    compose_mappings(new_mappings, prior_mappings)
                });
            if let (Some(composed_mappings), Some(obj)) = (composed, value.as_object_mut()) {
                obj.insert("mappings".to_string(), serde_json::Value::String(composed_mappings));
                if let Some(sources) = prior_value.get("sources").cloned() {
                    obj.insert("sources".to_string(), sources);
                }
                if let Some(sources_content) = prior_value.get("sourcesContent").cloned() {
                    obj.insert("sourcesContent".to_string(), sources_content);
                }
            }
        }
    }

    let root = format!(
        "{}/",
        fob_graph::path::to_portable(origin.parent().unwrap_or(Path::new("")))
    );
    let filename = Path::new(asset_name.trim_start_matches('/'))
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(asset_name)
        .to_string();

    if let Some(obj) = value.as_object_mut() {
        obj.insert("sourceRoot".to_string(), serde_json::Value::String(root.clone()));
        obj.insert("file".to_string(), serde_json::Value::String(filename));
        if let Some(sources) = obj.get_mut("sources").and_then(|s| s.as_array_mut()) {
            for source in sources.iter_mut() {
                if let Some(s) = source.as_str() {
                    let stripped = s.strip_prefix(&root).unwrap_or(s).to_string();
                    *source = serde_json::Value::String(stripped);
                }
            }
        }
    }
    value.to_string()
}

/// One decoded VLQ mapping segment, in absolute (not delta-encoded) form: a generated
/// position plus the source file index and original position it traces back to. Segments
/// with no source (the 1-field form) are dropped; every segment this module produces
/// carries a source.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    gen_col: i64,
    source: i64,
    src_line: i64,
    src_col: i64,
}

const VLQ_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn decode_vlq_value(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0;
    loop {
        let c = chars.next()?;
        let digit = VLQ_ALPHABET.iter().position(|&b| b == c as u8)? as i64;
        let continuation = digit & 0x20 != 0;
        result += (digit & 0x1f) << shift;
        shift += 5;
        if !continuation {
            break;
        }
    }
    let negate = result & 1 != 0;
    let value = result >> 1;
    Some(if negate { -value } else { value })
}

fn encode_vlq_value(value: i64, out: &mut String) {
    let mut vlq = if value < 0 { (-value << 1) | 1 } else { value << 1 };
    loop {
        let mut digit = vlq & 0x1f;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0x20;
        }
        out.push(VLQ_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Decode a `mappings` string into per-generated-line lists of absolute segments. Segments
/// that carry no source (a bare generated-column marker) are skipped.
fn decode_mappings(mappings: &str) -> Vec<Vec<Segment>> {
    let mut lines = Vec::new();
    let mut source = 0i64;
    let mut src_line = 0i64;
    let mut src_col = 0i64;
    for line_str in mappings.split(';') {
        let mut gen_col = 0i64;
        let mut segments = Vec::new();
        for seg_str in line_str.split(',') {
            if seg_str.is_empty() {
                continue;
            }
            let mut chars = seg_str.chars().peekable();
            let mut values = Vec::with_capacity(5);
            while chars.peek().is_some() {
                match decode_vlq_value(&mut chars) {
                    Some(v) => values.push(v),
                    None => break,
                }
            }
            if values.is_empty() {
                continue;
            }
            gen_col += values[0];
            if values.len() >= 4 {
                source += values[1];
                src_line += values[2];
                src_col += values[3];
                segments.push(Segment { gen_col, source, src_line, src_col });
            }
        }
        lines.push(segments);
    }
    lines
}

fn encode_mappings(lines: &[Vec<Segment>]) -> String {
    let mut out = String::new();
    let mut prev_source = 0i64;
    let mut prev_src_line = 0i64;
    let mut prev_src_col = 0i64;
    for (i, segments) in lines.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let mut prev_gen_col = 0i64;
        for (j, seg) in segments.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            encode_vlq_value(seg.gen_col - prev_gen_col, &mut out);
            encode_vlq_value(seg.source - prev_source, &mut out);
            encode_vlq_value(seg.src_line - prev_src_line, &mut out);
            encode_vlq_value(seg.src_col - prev_src_col, &mut out);
            prev_gen_col = seg.gen_col;
            prev_source = seg.source;
            prev_src_line = seg.src_line;
            prev_src_col = seg.src_col;
        }
    }
    out
}

/// Find the segment covering `(line, col)` in a decoded mapping's generated space: the last
/// segment on that line whose generated column doesn't exceed `col`.
fn lookup(lines: &[Vec<Segment>], line: i64, col: i64) -> Option<(i64, i64, i64)> {
    let segments = lines.get(usize::try_from(line).ok()?)?;
    segments
        .iter()
        .take_while(|s| s.gen_col <= col)
        .last()
        .map(|s| (s.source, s.src_line, s.src_col))
}

/// Compose `new_mappings` (minified ← pre-minify) with `prior_mappings` (pre-minify ←
/// original) into one mapping from minified straight back to the original source, by
/// re-pointing every segment of the first map through a lookup into the second.
fn compose_mappings(new_mappings: &str, prior_mappings: &str) -> String {
    let new_lines = decode_mappings(new_mappings);
    let prior_lines = decode_mappings(prior_mappings);

    let composed: Vec<Vec<Segment>> = new_lines
        .iter()
        .map(|line| {
            line.iter()
                .filter_map(|seg| {
                    lookup(&prior_lines, seg.src_line, seg.src_col).map(|(source, src_line, src_col)| Segment {
                        gen_col: seg.gen_col,
                        source,
                        src_line,
                        src_col,
                    })
                })
                .collect()
        })
        .collect();

    encode_mappings(&composed)
}

/// Run the full post-processing pass over every asset currently in the table.
pub fn apply(table: &mut AssetTable, compression: CompressionMode, source_maps_enabled: bool) {
    let json_names: Vec<String> = table
        .output
        .keys()
        .filter(|n| n.ends_with(".json"))
        .cloned()
        .collect();
    for name in json_names {
        if let Some(bytes) = table.output.get(&name) {
            let text = String::from_utf8_lossy(bytes).into_owned();
            let encoded = json_module::encode(&text);
            table.output.insert(name, encoded.into_bytes());
        }
    }

    let js_names: Vec<String> = table
        .output
        .keys()
        .filter(|n| n.ends_with(".js"))
        .cloned()
        .collect();
    for name in js_names {
        let Some(bytes) = table.output.get(&name).cloned() else {
            continue;
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let mut code = strip_sourcemapping_comment(&text);
        code = remove_strict_directive(&code);

        if matches!(compression, CompressionMode::TerserLike) {
            let origin = table.origins.get(&name).cloned().unwrap_or_default();
            let map_name = format!("{name}.map");
            let prior_map = table.output.get(&map_name).cloned();
            let out = minify(&code, &name, &origin, prior_map.as_deref());
            code = out.code;
            if source_maps_enabled {
                if let Some(map_json) = out.map_json {
                    table.output.insert(map_name, map_json.into_bytes());
                }
            }
        }

        table.output.insert(name, code.into_bytes());
    }
}
