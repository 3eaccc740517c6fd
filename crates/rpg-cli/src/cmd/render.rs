//! Render command

use anyhow::{Context, Result};
use rpg_core::plugin::{EmptySack, FindFilePlugin, PluginRegistry};
use rpg_core::write_spec_file;
use rpg_schema::{Descriptor, write_descriptor};
use std::path::Path;

/// Load a descriptor from a TOML file.
pub fn load_descriptor(path: &Path) -> Result<Descriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Render a descriptor, optionally scanning a project tree for files first.
pub fn render(descriptor_path: &Path, scan: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let mut descriptor = load_descriptor(descriptor_path)?;

    if let Some(project_dir) = scan {
        let mut plugins = PluginRegistry::new();
        plugins.register(FindFilePlugin);
        plugins.run_compiled(project_dir, &mut descriptor, &EmptySack)?;
    }

    match output {
        Some(path) => write_spec_file(&descriptor, path),
        None => {
            let stdout = std::io::stdout();
            write_descriptor(&descriptor, &mut stdout.lock()).context("Failed to render spec")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_with_scan_lists_files() {
        let tmp = tempdir().unwrap();
        let descriptor = tmp.path().join("demo.toml");
        let project = tmp.path().join("project");
        let spec = tmp.path().join("demo.spec");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("demo.py"), "").unwrap();
        std::fs::write(&descriptor, "[tags]\nName = \"demo\"\n").unwrap();

        render(&descriptor, Some(&project), Some(&spec)).unwrap();

        assert_eq!(
            std::fs::read_to_string(&spec).unwrap(),
            "Name: demo\n\n%files\ndemo.py\n\n%changelog\n"
        );
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let tmp = tempdir().unwrap();
        let descriptor = tmp.path().join("bad.toml");
        std::fs::write(&descriptor, "[scripts]\n\"%nope\" = \"x\"\n").unwrap();

        let err = load_descriptor(&descriptor).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
