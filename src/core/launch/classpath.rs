use std::path::{Path, PathBuf};

use tracing::debug;

/// Launch classpath, kept symbolic so each script flavor can render it
/// against its own libraries-dir variable.
///
/// Order: pinned library, every other library jar, primary archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    /// Relative to the libraries root, `/`-separated.
    pub pinned: String,
    /// Relative to the libraries root, `/`-separated, sorted.
    pub libraries: Vec<String>,
    /// Relative to the program directory.
    pub primary: String,
}

impl Classpath {
    /// Enumerate every jar below `libs_dir`, pinning `pinned` first.
    pub fn discover(libs_dir: &Path, pinned: &str, primary: &str) -> Self {
        let pinned = normalize(pinned);
        let mut libraries: Vec<String> = collect_library_jars(libs_dir)
            .into_iter()
            .filter_map(|jar| relative_to(libs_dir, &jar))
            .filter(|rel| !same_entry(rel, &pinned))
            .collect();
        libraries.sort();
        libraries.dedup();

        debug!(
            "Classpath: pinned {} + {} libraries + {}",
            pinned,
            libraries.len(),
            primary
        );

        Self {
            pinned,
            libraries,
            primary: primary.to_string(),
        }
    }

    /// Join into a single classpath string. Library entries are prefixed
    /// with `lib_dir_ref` and use `path_sep` between components.
    pub fn render(&self, lib_dir_ref: &str, path_sep: char, entry_sep: char) -> String {
        let lib_entry = |rel: &str| {
            let native = rel.replace('/', &path_sep.to_string());
            format!("{}{}{}", lib_dir_ref, path_sep, native)
        };

        std::iter::once(lib_entry(self.pinned.as_str()))
            .chain(self.libraries.iter().map(|rel| lib_entry(rel.as_str())))
            .chain(std::iter::once(self.primary.clone()))
            .collect::<Vec<_>>()
            .join(&entry_sep.to_string())
    }
}

fn is_library_jar(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
}

fn collect_library_jars(libs_dir: &Path) -> Vec<PathBuf> {
    let mut jars = Vec::new();
    if !libs_dir.is_dir() {
        return jars;
    }

    let mut stack = vec![libs_dir.to_path_buf()];
    while let Some(current_dir) = stack.pop() {
        let read_dir = match std::fs::read_dir(&current_dir) {
            Ok(read_dir) => read_dir,
            Err(_) => continue,
        };

        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_library_jar(&path) {
                jars.push(path);
            }
        }
    }

    jars
}

fn relative_to(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn normalize(rel: &str) -> String {
    rel.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn same_entry(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PINNED: &str = "org/lwjgl/lwjgl/lwjgl/2.9.3-grayscreenfix/lwjgl-2.9.3-grayscreenfix.jar";

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"jar").unwrap();
    }

    #[test]
    fn pinned_first_primary_last_and_pinned_not_repeated() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), PINNED);
        touch(temp.path(), "net/java/jinput/jinput/2.0.5/jinput-2.0.5.jar");
        touch(temp.path(), "net/sf/jopt-simple/jopt-simple/4.5/jopt-simple-4.5.jar");
        touch(temp.path(), "net/sf/readme.txt");

        let classpath = Classpath::discover(temp.path(), PINNED, "a1.1.1.jar");

        assert_eq!(classpath.libraries.len(), 2);
        assert!(!classpath.libraries.iter().any(|l| l == PINNED));

        let rendered = classpath.render("$LIB_DIR", '/', ':');
        let entries: Vec<&str> = rendered.split(':').collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], format!("$LIB_DIR/{}", PINNED));
        assert_eq!(entries[3], "a1.1.1.jar");
    }

    #[test]
    fn pinned_entry_is_kept_even_when_not_installed() {
        let temp = tempfile::tempdir().unwrap();
        let classpath = Classpath::discover(temp.path(), PINNED, "a1.1.1.jar");

        assert!(classpath.libraries.is_empty());
        let rendered = classpath.render("%LIB_DIR%", '\\', ';');
        assert_eq!(
            rendered,
            "%LIB_DIR%\\org\\lwjgl\\lwjgl\\lwjgl\\2.9.3-grayscreenfix\\lwjgl-2.9.3-grayscreenfix.jar;a1.1.1.jar"
        );
    }

    #[test]
    fn missing_libraries_dir_gives_empty_list() {
        let temp = tempfile::tempdir().unwrap();
        let classpath = Classpath::discover(&temp.path().join("absent"), PINNED, "client.jar");
        assert!(classpath.libraries.is_empty());
    }
}
