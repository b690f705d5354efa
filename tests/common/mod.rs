use std::{fs, io, path::PathBuf};

use pipesh::{config::Config, execution::process::ProcessSpawner, result::CommandResult};
use tempfile::TempDir;

/// A scratch directory whose path only holds characters the tokenizer keeps
/// inside one word.
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn build<S: AsRef<str>>(prefix: S) -> Result<Self, io::Error> {
        let dir = tempfile::Builder::new().prefix(prefix.as_ref()).tempdir()?;
        Ok(Scratch { dir })
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).unwrap()
    }
}

pub struct Outcome {
    pub result: CommandResult,
    pub diagnostics: String,
    pub spawned: usize,
}

/// Runs one line with real processes and reaps all of them.
pub fn run(line: &str) -> Outcome {
    let config = Config {
        path_env: pipesh::get_path_env(),
        ..Config::default()
    };
    let mut spawner = ProcessSpawner::new(config.path_env.clone());
    let mut diagnostics = Vec::new();
    let result = pipesh::run_line(line, &config, &mut spawner, &mut diagnostics).unwrap();
    let spawned = spawner.wait_all().len();
    Outcome {
        result,
        diagnostics: String::from_utf8(diagnostics).unwrap(),
        spawned,
    }
}
