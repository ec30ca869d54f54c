//! A process-wide mapping from bare module name to an on-disk shim, overriding normal
//! resolution for the runtime-platform substitutes of common Node standard modules.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// The fixed set of bare names the target runtime ships shims for, each mapped to the
/// shim package directory (or, rarely, a `.js` file) beneath the shim directory.
const SHIMMED: &[(&str, &str)] = &[
    ("assert", "frida-assert"),
    ("base64-js", "base64-js"),
    ("buffer", "frida-buffer"),
    ("diagnostics_channel", "frida-diagnostics-channel"),
    ("events", "frida-events"),
    ("fs", "frida-fs"),
    ("http", "frida-http"),
    ("https", "frida-https"),
    ("http-parser-js", "http-parser-js"),
    ("ieee754", "ieee754"),
    ("net", "frida-net"),
    ("os", "frida-os"),
    ("path", "frida-path"),
    ("process", "frida-process"),
    ("punycode", "punycode"),
    ("querystring", "frida-querystring"),
    ("readable-stream", "readable-stream"),
    ("stream", "frida-stream"),
    ("string_decoder", "frida-string-decoder"),
    ("timers", "frida-timers"),
    ("tty", "frida-tty"),
    ("url", "frida-url"),
    ("util", "frida-util"),
    ("vm", "frida-vm"),
];

/// Maps a shimmed bare package name to the package directory (or single file) that
/// substitutes for it, rooted under the configured shim directory.
#[derive(Debug, Clone)]
pub struct ShimRegistry {
    shim_dir: PathBuf,
    targets: FxHashMap<&'static str, &'static str>,
}

impl ShimRegistry {
    pub fn new(shim_dir: PathBuf) -> Self {
        Self {
            shim_dir,
            targets: SHIMMED.iter().copied().collect(),
        }
    }

    pub fn shim_dir(&self) -> &std::path::Path {
        &self.shim_dir
    }

    pub fn contains(&self, pkg_name: &str) -> bool {
        self.targets.contains_key(pkg_name)
    }

    /// Resolve `pkg_name` to its shim location: a `.js` file used directly, or a package
    /// directory to be joined with the remaining sub-path.
    pub fn target(&self, pkg_name: &str) -> Option<ShimTarget> {
        let name = *self.targets.get(pkg_name)?;
        let path = self.shim_dir.join(name);
        if name.ends_with(".js") {
            Some(ShimTarget::File(path))
        } else {
            Some(ShimTarget::Directory(path))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimTarget {
    File(PathBuf),
    Directory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_shim_resolves_under_shim_dir() {
        let reg = ShimRegistry::new(PathBuf::from("/shims"));
        assert!(reg.contains("fs"));
        assert_eq!(
            reg.target("fs"),
            Some(ShimTarget::Directory(PathBuf::from("/shims/frida-fs")))
        );
    }

    #[test]
    fn unknown_package_is_not_shimmed() {
        let reg = ShimRegistry::new(PathBuf::from("/shims"));
        assert!(!reg.contains("lodash"));
        assert_eq!(reg.target("lodash"), None);
    }
}
