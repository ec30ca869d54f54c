//! Process-wide `compilerRoot` derivation (§6): from `FRIDA_COMPILE_ROOT` if set, producing
//! the symbolic root `/frida-compile`; otherwise two directories above the running executable.

use std::path::PathBuf;

const ENV_VAR: &str = "FRIDA_COMPILE_ROOT";
const SYMBOLIC_ROOT: &str = "/frida-compile";

pub fn compiler_root() -> PathBuf {
    if std::env::var_os(ENV_VAR).is_some() {
        return PathBuf::from(SYMBOLIC_ROOT);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(SYMBOLIC_ROOT))
}
