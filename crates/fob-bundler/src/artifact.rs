//! The Artifact Serializer (§4.9 emission order, §6 wire format) and its matching parser,
//! used for round-trip verification.

use crate::asset_table::AssetTable;
use crate::Error;

const MAGIC: &str = "📦";
const DIVIDER: &str = "✄";

/// Sort asset names lexicographically, float `entry_asset` to position 0, and place any
/// `.map` sibling immediately before its base asset (§4.9).
fn emission_order(table: &AssetTable, entry_asset: &str) -> Vec<String> {
    let mut names: Vec<String> = table
        .output
        .keys()
        .filter(|n| !n.ends_with(".map"))
        .cloned()
        .collect();
    names.sort();
    if let Some(pos) = names.iter().position(|n| n == entry_asset) {
        let entry = names.remove(pos);
        names.insert(0, entry);
    }

    let mut ordered = Vec::with_capacity(table.output.len());
    for name in names {
        let map_name = format!("{name}.map");
        if table.output.contains_key(&map_name) {
            ordered.push(map_name);
        }
        ordered.push(name);
    }
    ordered
}

/// Serialize the asset table into the wire-exact manifest-plus-payload artifact.
pub fn serialize(table: &AssetTable, entry_asset: &str) -> Vec<u8> {
    let order = emission_order(table, entry_asset);

    let mut manifest = String::new();
    manifest.push_str(MAGIC);
    manifest.push('\n');
    for name in &order {
        let bytes = table
            .output
            .get(name)
            .expect("emission order only ever lists assets present in the table");
        manifest.push_str(&format!("{} {}\n", bytes.len(), name));
        if let Some(alias) = table.aliases.get(name) {
            manifest.push_str(&format!("\u{21bb} {alias}\n"));
        }
    }
    manifest.push_str(DIVIDER);
    manifest.push('\n');

    let mut out = manifest.into_bytes();
    for (i, name) in order.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(format!("\n{DIVIDER}\n").as_bytes());
        }
        out.extend_from_slice(table.output.get(name).unwrap());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAsset {
    pub name: String,
    pub alias: Option<String>,
    pub bytes: Vec<u8>,
}

struct ManifestEntry {
    len: usize,
    name: String,
    alias: Option<String>,
}

/// Parse a serialized artifact back into its manifest entries and payloads.
pub fn parse(artifact: &[u8]) -> Result<Vec<ParsedAsset>, Error> {
    let header_end = find_subslice(artifact, DIVIDER.as_bytes())
        .ok_or_else(|| Error::MalformedArtifact("missing manifest/payload separator".to_string()))?;
    let header = std::str::from_utf8(&artifact[..header_end])
        .map_err(|_| Error::MalformedArtifact("manifest is not valid UTF-8".to_string()))?;

    let mut lines = header.lines();
    let magic = lines
        .next()
        .ok_or_else(|| Error::MalformedArtifact("empty artifact".to_string()))?;
    if magic != MAGIC {
        return Err(Error::MalformedArtifact(format!("unexpected magic header {magic:?}")));
    }

    let mut entries: Vec<ManifestEntry> = Vec::new();
    let mut pending: Option<ManifestEntry> = None;
    for line in lines {
        if let Some(alias) = line.strip_prefix("\u{21bb} ") {
            let entry = pending
                .as_mut()
                .ok_or_else(|| Error::MalformedArtifact("alias line with no preceding manifest entry".to_string()))?;
            entry.alias = Some(alias.to_string());
            continue;
        }
        if let Some(prev) = pending.take() {
            entries.push(prev);
        }
        let (len_str, name) = line
            .split_once(' ')
            .ok_or_else(|| Error::MalformedArtifact(format!("malformed manifest line {line:?}")))?;
        let len = len_str
            .parse::<usize>()
            .map_err(|_| Error::MalformedArtifact(format!("non-numeric length in {line:?}")))?;
        pending = Some(ManifestEntry { len, name: name.to_string(), alias: None });
    }
    if let Some(prev) = pending.take() {
        entries.push(prev);
    }

    let payload_start = header_end + DIVIDER.len() + 1;
    let mut rest = artifact
        .get(payload_start..)
        .ok_or_else(|| Error::MalformedArtifact("artifact truncated after manifest".to_string()))?;

    let separator = format!("\n{DIVIDER}\n");
    let mut results = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        if entry.len > rest.len() {
            return Err(Error::MalformedArtifact(format!("payload for {} is truncated", entry.name)));
        }
        let bytes = rest[..entry.len].to_vec();
        rest = &rest[entry.len..];
        if i + 1 < entries.len() {
            rest = rest.strip_prefix(separator.as_bytes()).ok_or_else(|| {
                Error::MalformedArtifact(format!("missing payload separator after {}", entry.name))
            })?;
        }
        results.push(ParsedAsset { name: entry.name.clone(), alias: entry.alias.clone(), bytes });
    }

    Ok(results)
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
