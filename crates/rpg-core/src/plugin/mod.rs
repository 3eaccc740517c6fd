//! Analysis plugins that populate file entries by inspecting a project tree.
//!
//! A plugin sees the descriptor read-only and the top-level package's
//! [`FileList`] mutably; adding or editing file entries is the only effect
//! it can have on the build description. Plugins run in registration order
//! and must not assume anything about each other beyond that.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rpg_core::plugin::{EmptySack, FindFilePlugin, PluginRegistry};
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(FindFilePlugin);
//! registry.run_compiled(project_dir, &mut descriptor, &EmptySack)?;
//! ```

mod find_file;

pub use find_file::FindFilePlugin;

use anyhow::{Context, Result};
use rpg_schema::{Descriptor, FileList};
use std::path::Path;

/// Opaque dependency lookup handed to plugins.
///
/// Resolution semantics live outside this crate; plugins only ask which
/// package provides a path.
pub trait DependencySack {
    /// Name of the package providing `path`, if known.
    fn provider_of(&self, path: &Path) -> Option<String>;
}

/// A sack that knows no packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySack;

impl DependencySack for EmptySack {
    fn provider_of(&self, _: &Path) -> Option<String> {
        None
    }
}

/// A caller-registered analysis step.
pub trait AnalysisPlugin: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Called once the project has been compiled in `project_dir`.
    ///
    /// # Errors
    ///
    /// Implementations return an error if the project tree cannot be
    /// inspected. Entries added before the error are kept.
    fn compiled(
        &self,
        project_dir: &Path,
        descriptor: &Descriptor,
        files: &mut FileList,
        sack: &dyn DependencySack,
    ) -> Result<()>;
}

/// Ordered set of registered plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn AnalysisPlugin>>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Plugins run in the order they were registered.
    pub fn register(&mut self, plugin: impl AnalysisPlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Names of registered plugins, in order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin's `compiled` phase against the top-level package.
    ///
    /// # Errors
    ///
    /// Stops at the first failing plugin and returns its error. File
    /// entries added up to that point stay on the descriptor.
    pub fn run_compiled(
        &self,
        project_dir: &Path,
        descriptor: &mut Descriptor,
        sack: &dyn DependencySack,
    ) -> Result<()> {
        let mut files = std::mem::take(&mut descriptor.package.files);
        let result = self.plugins.iter().try_for_each(|plugin| {
            tracing::debug!("Running analysis plugin {}", plugin.name());
            plugin
                .compiled(project_dir, descriptor, &mut files, sack)
                .with_context(|| format!("Analysis plugin {} failed", plugin.name()))
        });
        descriptor.package.files = files;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_schema::FileEntry;

    /// Adds a fixed path, recording the descriptor name it saw.
    struct Fixed(&'static str);

    impl AnalysisPlugin for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn compiled(
            &self,
            _: &Path,
            descriptor: &Descriptor,
            files: &mut FileList,
            _: &dyn DependencySack,
        ) -> Result<()> {
            let name = descriptor.package.name().unwrap_or("unnamed");
            files.insert(FileEntry::new(format!("{name}/{}", self.0)));
            Ok(())
        }
    }

    struct Failing;

    impl AnalysisPlugin for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn compiled(
            &self,
            _: &Path,
            _: &Descriptor,
            _: &mut FileList,
            _: &dyn DependencySack,
        ) -> Result<()> {
            anyhow::bail!("tree unreadable")
        }
    }

    #[test]
    fn test_plugins_run_in_registration_order() {
        let mut registry = PluginRegistry::new();
        registry.register(Fixed("first"));
        registry.register(Fixed("second"));
        assert_eq!(registry.names(), vec!["first", "second"]);

        let mut descriptor = Descriptor::named("demo");
        registry
            .run_compiled(Path::new("/nonexistent"), &mut descriptor, &EmptySack)
            .unwrap();

        let paths: Vec<_> = descriptor
            .package
            .files
            .iter()
            .map(|entry| entry.path.display().to_string())
            .collect();
        assert_eq!(paths, vec!["demo/first", "demo/second"]);
    }

    #[test]
    fn test_duplicate_entries_are_dropped() {
        let mut registry = PluginRegistry::new();
        registry.register(Fixed("same"));
        registry.register(Fixed("same"));

        let mut descriptor = Descriptor::named("demo");
        registry
            .run_compiled(Path::new("/nonexistent"), &mut descriptor, &EmptySack)
            .unwrap();

        assert_eq!(descriptor.package.files.len(), 1);
    }

    #[test]
    fn test_failure_keeps_earlier_entries() {
        let mut registry = PluginRegistry::new();
        registry.register(Fixed("kept"));
        registry.register(Failing);
        registry.register(Fixed("never"));

        let mut descriptor = Descriptor::named("demo");
        let err = registry
            .run_compiled(Path::new("/nonexistent"), &mut descriptor, &EmptySack)
            .unwrap_err();

        assert!(err.to_string().contains("failing"));
        assert_eq!(descriptor.package.files.len(), 1);
    }
}
