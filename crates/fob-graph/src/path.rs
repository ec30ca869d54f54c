//! Conversions between host-native and portable (forward-slash) path forms.
//!
//! Every asset name, manifest entry and source-map `sources` entry is portable; every
//! filesystem query stays native. On platforms whose native separator already is `/` both
//! conversions are identities.

use std::path::{Path, PathBuf};

const NATIVE_SEP: char = std::path::MAIN_SEPARATOR;

/// Convert a native path into its portable (`/`-separated) string form.
pub fn to_portable(path: &Path) -> String {
    let s = path.to_string_lossy();
    if NATIVE_SEP == '/' {
        s.into_owned()
    } else {
        s.replace(NATIVE_SEP, "/")
    }
}

/// Convert a portable string into a native `PathBuf`.
pub fn to_native(portable: &str) -> PathBuf {
    if NATIVE_SEP == '/' {
        PathBuf::from(portable)
    } else {
        PathBuf::from(portable.replace('/', &NATIVE_SEP.to_string()))
    }
}

/// Build an asset name: a portable path that begins with `/`.
pub fn asset_name(portable: &str) -> String {
    if let Some(stripped) = portable.strip_prefix('/') {
        format!("/{stripped}")
    } else {
        format!("/{portable}")
    }
}

/// Derive an asset name for `path` by stripping whichever of `project_root` or
/// `compiler_root` is the longest matching prefix. Fails if neither is a prefix.
pub fn derive_asset_name(
    path: &Path,
    project_root: &Path,
    compiler_root: &Path,
) -> Option<String> {
    let under_project = path.strip_prefix(project_root).ok();
    let under_compiler = path.strip_prefix(compiler_root).ok();

    let chosen = match (under_project, under_compiler) {
        (Some(p), Some(c)) => {
            if project_root.as_os_str().len() >= compiler_root.as_os_str().len() {
                Some(p)
            } else {
                Some(c)
            }
        }
        (Some(p), None) => Some(p),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    }?;

    Some(asset_name(&to_portable(chosen)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portable_round_trips_on_unix_like_input() {
        let p = Path::new("a/b/c.js");
        assert_eq!(to_portable(p), "a/b/c.js");
        assert_eq!(to_native(&to_portable(p)), PathBuf::from("a/b/c.js"));
    }

    #[test]
    fn asset_name_always_has_leading_slash() {
        assert_eq!(asset_name("index.js"), "/index.js");
        assert_eq!(asset_name("/index.js"), "/index.js");
    }

    #[test]
    fn derive_asset_name_prefers_longest_matching_root() {
        let project = Path::new("/p");
        let compiler = Path::new("/p/node_modules/frida-compile");
        let path = Path::new("/p/node_modules/frida-compile/ext/runtime.js");
        assert_eq!(
            derive_asset_name(path, project, compiler).as_deref(),
            Some("/ext/runtime.js")
        );
    }

    #[test]
    fn derive_asset_name_fails_outside_both_roots() {
        let project = Path::new("/p");
        let compiler = Path::new("/c");
        let path = Path::new("/elsewhere/x.js");
        assert_eq!(derive_asset_name(path, project, compiler), None);
    }
}
