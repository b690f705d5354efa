use std::{
    io,
    os::unix::process::CommandExt,
    path::PathBuf,
    process::{Child, Command, ExitStatus},
};

use log::{debug, warn};

use crate::{
    env::PathEnv,
    execution::Spawner,
    redirect::Stream,
    result::ShellError,
};

pub struct ChildBuilder<'a> {
    program: PathBuf,
    argv: &'a [&'a str],
    stdin: Stream,
    stdout: Stream,
}

impl<'a> ChildBuilder<'a> {
    /// `argv[0]` is what the child sees as its own name.
    pub fn new(program: PathBuf, argv: &'a [&'a str]) -> Self {
        Self {
            program,
            argv,
            stdin: Stream::Standard,
            stdout: Stream::Standard,
        }
    }

    pub fn stdin(&mut self, stream: Stream) {
        self.stdin = stream;
    }

    pub fn stdout(&mut self, stream: Stream) {
        self.stdout = stream;
    }

    /// Spawns the child. The descriptors handed over are closed in this
    /// process as soon as the spawn returns, whether it succeeded or not.
    pub fn build(self) -> io::Result<Child> {
        let mut cmd = Command::new(&self.program);
        if let Some((name, args)) = self.argv.split_first() {
            cmd.arg0(name).args(args);
        }
        cmd.stdin(self.stdin.into_stdio());
        cmd.stdout(self.stdout.into_stdio());
        cmd.spawn()
    }
}

/// Spawns real processes and keeps them until [`ProcessSpawner::wait_all`].
#[derive(Debug)]
pub struct ProcessSpawner {
    path_env: PathEnv,
    children: Vec<Child>,
}

impl ProcessSpawner {
    pub fn new(path_env: PathEnv) -> Self {
        Self {
            path_env,
            children: Vec::new(),
        }
    }

    /// Number of children not yet reaped.
    pub fn pending(&self) -> usize {
        self.children.len()
    }

    /// Reaps every child spawned since the last call, in spawn order.
    pub fn wait_all(&mut self) -> Vec<ExitStatus> {
        self.children
            .drain(..)
            .filter_map(|mut child| {
                let pid = child.id();
                match child.wait() {
                    Ok(status) => {
                        debug!("Reaped: {pid} {status}");
                        Some(status)
                    }
                    Err(e) => {
                        warn!("wait for {pid} failed: {e}");
                        None
                    }
                }
            })
            .collect()
    }
}

impl Spawner for ProcessSpawner {
    fn spawn(&mut self, argv: &[&str], stdin: Stream, stdout: Stream) -> Result<(), ShellError> {
        let Some(&name) = argv.first() else {
            return Ok(());
        };
        let program = self
            .path_env
            .find_executable(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;

        let mut builder = ChildBuilder::new(program, argv);
        builder.stdin(stdin);
        builder.stdout(stdout);
        let child = builder.build().map_err(|source| spawn_error(name, source))?;
        debug!("Spawned: '{name}' pid {}", child.id());
        self.children.push(child);
        Ok(())
    }
}

/// `fork` itself failing means the host is out of processes or memory;
/// anything else is the program's own fault.
fn spawn_error(name: &str, source: io::Error) -> ShellError {
    match source.raw_os_error() {
        Some(libc::EAGAIN) | Some(libc::ENOMEM) => ShellError::Fork(source),
        _ => ShellError::Exec {
            name: name.to_string(),
            source,
        },
    }
}
