//! Home, scratch and mock root locations.

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the primary working directory, or None if the user's home cannot be resolved.
pub fn try_rpg_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("RPG_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".rpg"))
}

/// Returns the rpg home directory (`~/.rpg`).
///
/// Falls back to `<system temp>/rpg` when neither `RPG_HOME` is set nor a
/// home directory can be resolved (e.g. inside a build container).
pub fn rpg_home() -> PathBuf {
    try_rpg_home().unwrap_or_else(|| std::env::temp_dir().join("rpg"))
}

/// Scratch root: ~/.rpg/tmp
///
/// Every source and binary build gets its own subdirectory here.
pub fn tmp_path() -> PathBuf {
    rpg_home().join("tmp")
}

/// Name of the sandbox root for a distribution/architecture pair
/// (e.g. `fedora-22-x86_64`).
pub fn root_name(distro: &str, arch: &str) -> String {
    format!("{distro}-{arch}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_name() {
        assert_eq!(root_name("fedora-22", "x86_64"), "fedora-22-x86_64");
    }
}
