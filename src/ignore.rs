use crate::adapter::AdapterRegistry;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, extra_excludes: Option<&[String]>) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        // 1. Load from .gitignore and .ignore
        builder.add(root.join(".gitignore"));
        builder.add(root.join(".ignore"));

        // 2. Add defaults (global)
        let defaults = [
            // Dependency and build output
            "node_modules/", "bower_components/", "jspm_packages/",
            "dist/", "build/", "out/", "coverage/", ".next/", ".nuxt/", ".turbo/",
            "target/", ".git/", ".vscode/", ".idea/",

            // Generated bundles
            "*.min.js", "*.bundle.js", "*.map",
        ];

        for pattern in defaults {
            // static patterns; a bad one would only mean less filtering
            builder.add_line(None, pattern).ok();
        }

        // 3. Add user config excludes
        if let Some(excludes) = extra_excludes {
            for pattern in excludes {
                builder.add_line(None, pattern).ok();
            }
        }

        Self {
            inner: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched(path, is_dir).is_ignore()
    }
}

/// Source files under `paths` that some adapter can parse, sorted.
///
/// Files named explicitly are kept even when an exclude pattern matches them.
pub fn collect_files(paths: &[PathBuf], filter: &IgnoreFilter, registry: &AdapterRegistry) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if registry.find_adapter(path).is_some() {
                files.push(path.clone());
            }
            continue;
        }

        let walk_filter = filter.clone();
        let walker = WalkBuilder::new(path)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                entry.depth() == 0 || !walk_filter.is_ignored(entry.path(), is_dir)
            })
            .build();

        for entry in walker.flatten() {
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file && registry.find_adapter(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::default_registry;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "export {};\n").unwrap();
    }

    #[test]
    fn test_default_excludes() {
        let dir = TempDir::new().unwrap();
        let filter = IgnoreFilter::new(dir.path(), None);
        assert!(filter.is_ignored(&dir.path().join("node_modules"), true));
        assert!(filter.is_ignored(&dir.path().join("vendor.min.js"), false));
        assert!(!filter.is_ignored(&dir.path().join("src/index.ts"), false));
    }

    #[test]
    fn test_collect_skips_excluded_and_unknown_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/a.ts");
        touch(root, "src/b.tsx");
        touch(root, "src/c.js");
        touch(root, "src/notes.md");
        touch(root, "node_modules/pkg/index.ts");
        touch(root, "generated/api.ts");

        let excludes = vec!["generated/".to_string()];
        let filter = IgnoreFilter::new(root, Some(&excludes));
        let files = collect_files(&[root.to_path_buf()], &filter, &default_registry());

        let relative: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(relative, vec!["src/a.ts", "src/b.tsx", "src/c.js"]);
    }

    #[test]
    fn test_explicit_file_is_kept() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "generated/api.ts");
        let excludes = vec!["generated/".to_string()];
        let filter = IgnoreFilter::new(dir.path(), Some(&excludes));

        let file = dir.path().join("generated/api.ts");
        let files = collect_files(&[file.clone()], &filter, &default_registry());
        assert_eq!(files, vec![file]);
    }
}
