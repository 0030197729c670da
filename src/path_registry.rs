use crate::config::MAX_PATHS;
use crate::error::ShellError;
use std::path::{Path, PathBuf};

/// Ordered list of directories searched for executables.
///
/// Entries keep insertion order, which is also resolution precedence: the first
/// directory containing a matching executable wins. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRegistry {
    dirs: Vec<String>,
    capacity: usize,
}

impl PathRegistry {
    /// Create a registry holding `dirs`, capped at `capacity` entries.
    pub fn new<I, S>(dirs: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dirs: Vec<String> = dirs.into_iter().map(Into::into).collect();
        dirs.truncate(capacity);
        Self { dirs, capacity }
    }

    /// Append `dir` after the existing entries.
    pub fn add(&mut self, dir: &str) -> Result<(), ShellError> {
        if self.dirs.len() >= self.capacity {
            return Err(ShellError::Builtin(format!(
                "path: registry is full ({} entries)",
                self.capacity
            )));
        }
        self.dirs.push(dir.to_string());
        Ok(())
    }

    /// Remove the first entry equal to `dir`; later entries move up one slot.
    pub fn remove(&mut self, dir: &str) -> Result<(), ShellError> {
        match self.dirs.iter().position(|d| d == dir) {
            Some(idx) => {
                self.dirs.remove(idx);
                Ok(())
            }
            None => Err(ShellError::Builtin(format!("path: '{}' not found", dir))),
        }
    }

    pub fn clear(&mut self) {
        self.dirs.clear();
    }

    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Resolve a command name to the executable that would be launched.
    ///
    /// Behavior:
    /// - Name with a single component: search every registry directory in order and
    ///   return the first `dir/name` that is an executable file. Relative registry
    ///   entries are taken relative to `cwd`.
    /// - Absolute name, or relative name with several components (`./foo`, `bin/foo`):
    ///   the registry is not consulted; `cwd` anchors relative names. Such names
    ///   still run after `path clear`, unlike a lookup that only ever tries
    ///   `dir/name` for each registry entry.
    /// - Empty name: `None`.
    pub fn resolve(&self, name: &str, cwd: &Path) -> Option<PathBuf> {
        let path = Path::new(name);
        let mut components = path.components();
        match (components.next(), components.next()) {
            (None, _) => None,
            (Some(_), None) if !path.has_root() => {
                self.dirs
                    .iter()
                    .filter(|dir| !dir.is_empty())
                    .map(|dir| cwd.join(dir).join(path))
                    .find(|candidate| is_executable(candidate))
            }
            _ => {
                let candidate = cwd.join(path);
                is_executable(&candidate).then_some(candidate)
            }
        }
    }
}

impl Default for PathRegistry {
    fn default() -> Self {
        Self::new([crate::config::DEFAULT_PATH], MAX_PATHS)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "smash_registry_{}_{}_{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let file = dir.join(name);
        fs::write(&file, "#!/bin/sh\nexit 0\n").expect("write script");
        fs::set_permissions(&file, fs::Permissions::from_mode(mode)).expect("chmod");
        file
    }

    #[test]
    fn test_default_holds_bin() {
        let reg = PathRegistry::default();
        assert_eq!(reg.dirs(), &["/bin".to_string()]);
    }

    #[test]
    fn test_add_then_remove_restores_contents() {
        let mut reg = PathRegistry::new(["/bin", "/usr/local/bin"], 8);
        let before = reg.clone();

        reg.add("/x").unwrap();
        assert_eq!(reg.dirs().last().map(String::as_str), Some("/x"));
        reg.remove("/x").unwrap();

        assert_eq!(reg, before);
    }

    #[test]
    fn test_remove_compacts_and_keeps_order() {
        let mut reg = PathRegistry::new(["/a", "/b", "/c", "/b"], 8);
        reg.remove("/b").unwrap();
        assert_eq!(reg.dirs(), &["/a", "/c", "/b"]);
    }

    #[test]
    fn test_remove_missing_is_error_and_no_op() {
        let mut reg = PathRegistry::new(["/a"], 8);
        assert!(reg.remove("/nope").is_err());
        assert_eq!(reg.dirs(), &["/a"]);
    }

    #[test]
    fn test_add_fails_when_full() {
        let mut reg = PathRegistry::new(["/a", "/b"], 2);
        assert!(reg.add("/c").is_err());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let mut reg = PathRegistry::new(["/a"], 4);
        reg.add("/a").unwrap();
        assert_eq!(reg.dirs(), &["/a", "/a"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_finds_sh_in_bin() {
        let reg = PathRegistry::default();
        let found = reg.resolve("sh", Path::new("/")).expect("sh in /bin");
        assert_eq!(found, PathBuf::from("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_after_clear_fails() {
        let mut reg = PathRegistry::default();
        assert!(reg.resolve("sh", Path::new("/")).is_some());
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.resolve("sh", Path::new("/")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_first_match_wins() {
        let first = make_unique_temp_dir("first");
        let second = make_unique_temp_dir("second");
        write_script(&first, "tool", 0o755);
        write_script(&second, "tool", 0o755);

        let reg = PathRegistry::new(
            [
                second.to_string_lossy().to_string(),
                first.to_string_lossy().to_string(),
            ],
            8,
        );
        assert_eq!(reg.resolve("tool", Path::new("/")), Some(second.join("tool")));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_skips_files_without_execute_bit() {
        let plain = make_unique_temp_dir("plain");
        let exec = make_unique_temp_dir("exec");
        write_script(&plain, "tool", 0o644);
        write_script(&exec, "tool", 0o700);

        let reg = PathRegistry::new(
            [
                plain.to_string_lossy().to_string(),
                exec.to_string_lossy().to_string(),
            ],
            8,
        );
        assert_eq!(reg.resolve("tool", Path::new("/")), Some(exec.join("tool")));

        let _ = fs::remove_dir_all(plain);
        let _ = fs::remove_dir_all(exec);
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_absolute_and_relative_names_bypass_registry() {
        let dir = make_unique_temp_dir("direct");
        write_script(&dir, "tool", 0o755);

        let mut reg = PathRegistry::default();
        reg.clear();

        let absolute = dir.join("tool");
        assert_eq!(
            reg.resolve(&absolute.to_string_lossy(), Path::new("/")),
            Some(absolute.clone())
        );
        assert_eq!(reg.resolve("./tool", &dir), Some(dir.join("./tool")));
        assert!(reg.resolve("tool", &dir).is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_resolve_empty_name() {
        assert!(PathRegistry::default().resolve("", Path::new("/")).is_none());
    }
}
