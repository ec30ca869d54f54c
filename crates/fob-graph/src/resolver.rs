//! The Resolver (§4.4): turns a bare or absolute module specifier plus the requesting
//! module's path into an on-disk path, signalling whether an alias must be registered to
//! map the canonical asset name back to the specifier a consumer wrote.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::fs::ProjectFs;
use crate::package_json::PackageDescriptor;
use crate::shim::{ShimRegistry, ShimTarget};

/// The fixed roots and module directories the resolver consults.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub project_root: PathBuf,
    pub compiler_root: PathBuf,
    pub project_modules_dir: PathBuf,
    pub compiler_modules_dir: PathBuf,
}

/// A resolved module plus whatever alias it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    /// The canonical asset name for `path` (§4.4 step 8 derives this the same way the
    /// Path Normalizer does for every other asset: stripping whichever of `compilerRoot`/
    /// `projectRoot` is the longest matching prefix). `None` when `path` lies under neither
    /// root, mirroring `path::derive_asset_name`'s own failure case.
    pub asset_name: Option<String>,
    /// The specifier to register `asset_name` under in the Asset Table's `aliases` map;
    /// present only when `aliasNeeded`.
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Resolved),
    Missing,
}

/// Split a specifier into its package name and remaining sub-path components, honoring
/// the `@scope/name` convention.
fn split_specifier(specifier: &str) -> (String, Vec<&str>) {
    let tokens: Vec<&str> = specifier.split('/').collect();
    if tokens.first().is_some_and(|t| t.starts_with('@')) && tokens.len() > 1 {
        (format!("{}/{}", tokens[0], tokens[1]), tokens[2..].to_vec())
    } else {
        (
            tokens.first().copied().unwrap_or(specifier).to_string(),
            tokens.get(1..).map(|s| s.to_vec()).unwrap_or_default(),
        )
    }
}

fn join_sub_path(base: &Path, sub_path: &[&str]) -> PathBuf {
    sub_path.iter().fold(base.to_path_buf(), |p, seg| p.join(seg))
}

fn read_descriptor_at(dir: &Path, fs: &dyn ProjectFs) -> Option<PackageDescriptor> {
    let candidate = dir.join("package.json");
    fs.read_to_string(&candidate)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
}

/// Whether `requester` is rooted under the compiler's own install, including its symlinked
/// `frida-compile` alias inside the project's `node_modules`.
fn requester_is_under_compiler(requester: &Path, config: &ResolverConfig) -> bool {
    requester.starts_with(&config.compiler_root)
        || requester.starts_with(config.project_modules_dir.join("frida-compile"))
}

/// Resolve `specifier` as seen from `requester`. Relative specifiers (`.`/`..`) are the
/// Dependency Walker's job (§4.5); this only handles absolute paths and bare package
/// specifiers, per §4.4 steps 1-8.
pub fn resolve(
    specifier: &str,
    requester: &Path,
    shims: &ShimRegistry,
    config: &ResolverConfig,
    fs: &dyn ProjectFs,
) -> Resolution {
    let (mut resolved, mut alias_needed): (PathBuf, bool);

    if specifier.starts_with('/') {
        resolved = PathBuf::from(specifier);
        alias_needed = false;
    } else {
        let (pkg_name, sub_path) = split_specifier(specifier);
        if let Some(target) = shims.target(&pkg_name) {
            resolved = match target {
                ShimTarget::File(f) => f,
                ShimTarget::Directory(d) => join_sub_path(&d, &sub_path),
            };
            alias_needed = true;
        } else {
            let base = if requester_is_under_compiler(requester, config) {
                &config.compiler_modules_dir
            } else {
                &config.project_modules_dir
            };
            let mut segs = vec![pkg_name.as_str()];
            segs.extend(sub_path.iter().copied());
            resolved = join_sub_path(base, &segs);
            alias_needed = !sub_path.is_empty();
        }
    }

    // Step 5/6: directory resolution via package descriptor, else `index.js`.
    if fs.is_dir(&resolved) {
        if let Some(desc) = read_descriptor_at(&resolved, fs) {
            let mut candidate = resolved.join(desc.entry_file());
            if fs.is_dir(&candidate) {
                candidate = candidate.join("index.js");
            }
            resolved = candidate;
            alias_needed = true;
        } else {
            resolved = resolved.join("index.js");
        }
    }

    // Step 7: bare-extension fallback.
    if !fs.exists(&resolved) {
        let with_ext = append_extension(&resolved, "js");
        if fs.exists(&with_ext) {
            resolved = with_ext;
        } else {
            return Resolution::Missing;
        }
    }

    resolved = resolved.clean();

    let asset_name = crate::path::derive_asset_name(&resolved, &config.project_root, &config.compiler_root);
    let alias = if alias_needed { Some(specifier.to_string()) } else { None };

    Resolution::Found(Resolved { path: resolved, asset_name, alias })
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// `find_descriptor` is re-exported for callers (e.g. the Module-Kind Detector) that need
/// the ancestor-walk behavior rather than the resolver's directory-entry lookup.
pub use crate::package_json::find_descriptor as ancestor_package_descriptor;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::ProjectFs;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFs {
        files: Mutex<HashMap<PathBuf, String>>,
        dirs: Mutex<HashSet<PathBuf>>,
    }

    impl FakeFs {
        fn new() -> Self {
            Self::default()
        }
        fn file(self, path: &str, content: &str) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), content.to_string());
            self
        }
        fn dir(self, path: &str) -> Self {
            self.dirs.lock().unwrap().insert(PathBuf::from(path));
            self
        }
    }

    impl ProjectFs for FakeFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
        }
        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.lock().unwrap().contains(path)
        }
        fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
        }
    }

    fn config() -> ResolverConfig {
        ResolverConfig {
            project_root: PathBuf::from("/p"),
            compiler_root: PathBuf::from("/compiler"),
            project_modules_dir: PathBuf::from("/p/node_modules"),
            compiler_modules_dir: PathBuf::from("/compiler/node_modules"),
        }
    }

    #[test]
    fn shim_takes_precedence_and_needs_alias() {
        // `shim_dir` always resolves to the compiler's or the project's own modules
        // directory in production (`resolve_shim_dir`), never a third unrelated root.
        let fs = FakeFs::new()
            .dir("/compiler/node_modules/frida-fs")
            .file("/compiler/node_modules/frida-fs/index.js", "export {}");
        let shims = ShimRegistry::new(PathBuf::from("/compiler/node_modules"));
        let res = resolve("fs", Path::new("/p/src/index.js"), &shims, &config(), &fs);
        match res {
            Resolution::Found(r) => {
                assert_eq!(r.path, PathBuf::from("/compiler/node_modules/frida-fs/index.js"));
                assert_eq!(r.asset_name.as_deref(), Some("/node_modules/frida-fs/index.js"));
                assert_eq!(r.alias, Some("fs".to_string()));
            }
            Resolution::Missing => panic!("expected fs to resolve via shim"),
        }
    }

    #[test]
    fn bare_package_directory_resolution_still_needs_an_alias() {
        // The specifier itself has no sub-path, but resolving through the package
        // descriptor's `main` field still requires an alias back to the bare specifier.
        let fs = FakeFs::new()
            .dir("/p/node_modules/left-pad")
            .file(
                "/p/node_modules/left-pad/package.json",
                r#"{"main":"index.js"}"#,
            )
            .file("/p/node_modules/left-pad/index.js", "module.exports = {}");
        let shims = ShimRegistry::new(PathBuf::from("/shims"));
        let res = resolve("left-pad", Path::new("/p/src/index.js"), &shims, &config(), &fs);
        match res {
            Resolution::Found(r) => {
                assert_eq!(r.path, PathBuf::from("/p/node_modules/left-pad/index.js"));
                assert_eq!(r.asset_name.as_deref(), Some("/node_modules/left-pad/index.js"));
                assert_eq!(r.alias, Some("left-pad".to_string()));
            }
            Resolution::Missing => panic!("expected left-pad to resolve"),
        }
    }

    #[test]
    fn missing_specifier_is_reported() {
        let fs = FakeFs::new();
        let shims = ShimRegistry::new(PathBuf::from("/shims"));
        let res = resolve("nonexistent", Path::new("/p/src/index.js"), &shims, &config(), &fs);
        assert_eq!(res, Resolution::Missing);
    }

    #[test]
    fn absolute_specifier_needs_no_alias() {
        let fs = FakeFs::new().file("/p/other.js", "export {}");
        let shims = ShimRegistry::new(PathBuf::from("/shims"));
        let res = resolve("/p/other.js", Path::new("/p/src/index.js"), &shims, &config(), &fs);
        match res {
            Resolution::Found(r) => {
                assert_eq!(r.path, PathBuf::from("/p/other.js"));
                assert_eq!(r.asset_name.as_deref(), Some("/other.js"));
                assert_eq!(r.alias, None);
            }
            Resolution::Missing => panic!("expected absolute path to resolve"),
        }
    }
}
