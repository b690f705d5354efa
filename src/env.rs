use std::{ffi::OsStr, ops::Deref, path::PathBuf};

use is_executable::IsExecutable;

/// Directories searched for programs, in `PATH` order.
#[derive(Debug, Clone)]
pub struct PathEnv {
    pub paths: Vec<PathBuf>,
}

impl PathEnv {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn from_path_var(var: Option<&OsStr>) -> Self {
        match var {
            None => Self::new(),
            Some(paths) => Self::from_paths(std::env::split_paths(paths).collect()),
        }
    }

    /// Resolves a program name the way `execvp` does: names containing a `/`
    /// are taken as paths, everything else is looked up in each directory.
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        if name.contains('/') {
            let path = PathBuf::from(name);
            return path.is_executable().then_some(path);
        }

        self.paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file() && candidate.is_executable())
    }
}

impl Default for PathEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PathEnv {
    type Target = Vec<PathBuf>;

    fn deref(&self) -> &Self::Target {
        &self.paths
    }
}
