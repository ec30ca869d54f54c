//! Property coverage for the resolver's alias-bijectivity invariant (§4.4 step 8): whenever
//! a resolution registers an alias, the specifier half of that alias is always exactly the
//! string the caller passed in, verbatim, never a normalized or re-derived form. That's what
//! lets the Asset Table build a true bijection between canonical asset names and the
//! specifiers consumers actually wrote.

use fob_graph::{resolver, NativeFs, ResolverConfig, Resolution, ShimRegistry};
use proptest::prelude::*;
use tempfile::TempDir;

fn pkg_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}(-[a-z0-9]{1,8}){0,2}"
}

fn sub_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A bare specifier with a non-empty sub-path always resolves to an alias whose
    /// specifier half equals the input string exactly.
    #[test]
    fn alias_specifier_half_always_equals_input(
        pkg in pkg_name(),
        segments in proptest::collection::vec(sub_segment(), 1..4),
    ) {
        let project = TempDir::new().unwrap();
        let node_modules = project.path().join("node_modules");
        let pkg_dir = node_modules.join(&pkg);
        let mut file_dir = pkg_dir.clone();
        for seg in &segments[..segments.len() - 1] {
            file_dir = file_dir.join(seg);
        }
        std::fs::create_dir_all(&file_dir).unwrap();
        let leaf = &segments[segments.len() - 1];
        std::fs::write(file_dir.join(format!("{leaf}.js")), "export {}").unwrap();

        let specifier = format!("{pkg}/{}", segments.join("/"));
        let config = ResolverConfig {
            project_root: project.path().to_path_buf(),
            compiler_root: project.path().join("compiler"),
            project_modules_dir: node_modules.clone(),
            compiler_modules_dir: project.path().join("compiler/node_modules"),
        };
        let shims = ShimRegistry::new(project.path().join("shims"));
        let requester = project.path().join("src/index.js");

        let resolution = resolver::resolve(&specifier, &requester, &shims, &config, &NativeFs);

        match resolution {
            Resolution::Found(resolved) => {
                let aliased_specifier = resolved
                    .alias
                    .expect("a bare specifier with a sub-path always needs an alias");
                prop_assert_eq!(aliased_specifier, specifier);
            }
            Resolution::Missing => prop_assert!(false, "expected {specifier} to resolve"),
        }
    }

    /// Two distinct specifiers that resolve to distinct files never collide on `asset_name`
    /// — the value the Asset Table actually stores for each (via `insert_asset`), not a
    /// separately-derived path the closure loop discards.
    #[test]
    fn distinct_specifiers_get_distinct_asset_names(
        pkg_a in pkg_name(),
        pkg_b in pkg_name(),
        seg_a in sub_segment(),
        seg_b in sub_segment(),
    ) {
        prop_assume!(pkg_a != pkg_b);

        let project = TempDir::new().unwrap();
        let node_modules = project.path().join("node_modules");
        for (pkg, seg) in [(&pkg_a, &seg_a), (&pkg_b, &seg_b)] {
            let dir = node_modules.join(pkg);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(format!("{seg}.js")), "export {}").unwrap();
        }

        let config = ResolverConfig {
            project_root: project.path().to_path_buf(),
            compiler_root: project.path().join("compiler"),
            project_modules_dir: node_modules.clone(),
            compiler_modules_dir: project.path().join("compiler/node_modules"),
        };
        let shims = ShimRegistry::new(project.path().join("shims"));
        let requester = project.path().join("src/index.js");

        let spec_a = format!("{pkg_a}/{seg_a}");
        let spec_b = format!("{pkg_b}/{seg_b}");
        let resolved_a = resolver::resolve(&spec_a, &requester, &shims, &config, &NativeFs);
        let resolved_b = resolver::resolve(&spec_b, &requester, &shims, &config, &NativeFs);

        let asset_name = |res: Resolution, label: &str| -> String {
            match res {
                Resolution::Found(r) => r.asset_name.expect("path lies under the project root"),
                Resolution::Missing => panic!("expected {label} to resolve"),
            }
        };

        let name_a = asset_name(resolved_a, &spec_a);
        let name_b = asset_name(resolved_b, &spec_b);
        prop_assert_ne!(name_a, name_b);
    }
}
