pub mod config;
pub mod env;
pub mod execution;
pub mod logging;
pub mod parse;
pub mod redirect;
pub mod result;

use std::io::Write;

use crate::{
    config::Config,
    env::PathEnv,
    execution::{Pipeline, Spawner},
    parse::LineBuffer,
    redirect::Stream,
    result::{CommandResult, ShellError},
};

pub fn get_path_env() -> PathEnv {
    PathEnv::from_path_var(std::env::var_os("PATH").as_deref())
}

/// Lays out and starts the processes for one input line.
///
/// Reaping the children is left to the caller. Diagnostics are written to
/// `diagnostics`; only fatal errors are returned.
pub fn run_line<S: Spawner, W: Write>(
    input: &str,
    config: &Config,
    spawner: &mut S,
    diagnostics: &mut W,
) -> Result<CommandResult, ShellError> {
    let mut line = LineBuffer::new(input);
    if line.len() > config.max_line_length {
        let _ = writeln!(
            diagnostics,
            "pipesh: {}",
            ShellError::LineTooLong(config.max_line_length)
        );
        return Ok(CommandResult::Normal);
    }

    Pipeline::new(spawner, diagnostics)
        .max_segments(config.max_segments)
        .run(&mut line, Stream::Standard, Stream::Standard)
}
