pub mod process;

use std::{
    io::{self, Write},
    ops::Range,
    path::Path,
};

use log::{debug, trace};

use crate::{
    parse::{LineBuffer, Operator},
    redirect::{self, Stream},
    result::{CommandResult, ShellError},
};

/// Default bound on the number of segments in one line.
pub const MAX_SEGMENTS: usize = 100;

/// Starts one process per pipeline segment.
///
/// Implementations take ownership of both streams and must not keep them
/// past the spawn: once `spawn` returns the child is their only holder.
pub trait Spawner {
    fn spawn(&mut self, argv: &[&str], stdin: Stream, stdout: Stream) -> Result<(), ShellError>;
}

/// Lays out the processes of one line, left to right.
pub struct Pipeline<'a, S, W> {
    spawner: &'a mut S,
    diagnostics: &'a mut W,
    max_segments: usize,
}

impl<'a, S: Spawner, W: Write> Pipeline<'a, S, W> {
    pub fn new(spawner: &'a mut S, diagnostics: &'a mut W) -> Self {
        Self {
            spawner,
            diagnostics,
            max_segments: MAX_SEGMENTS,
        }
    }

    pub fn max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments;
        self
    }

    fn report(&mut self, err: ShellError) {
        debug!("reported: {err}");
        let _ = writeln!(self.diagnostics, "pipesh: {err}");
    }

    /// Runs every segment of `line`. `input` feeds the first segment and
    /// `output` receives the last one.
    ///
    /// Errors local to a segment are reported and stop the line at that
    /// segment; processes already started keep running. Only a failure to
    /// create a pipe or a process is returned.
    pub fn run(
        &mut self,
        line: &mut LineBuffer,
        mut input: Stream,
        output: Stream,
    ) -> Result<CommandResult, ShellError> {
        let mut pos = 0;

        for _ in 0..self.max_segments {
            let segment = line.parse(pos);
            debug!(
                "Cmd: {:?} Next: '{}' In: {} Out: {}",
                line.words(&segment.args),
                segment.operator,
                input,
                output
            );

            if segment.is_empty() {
                // `| ls` or `ls | | wc`: nothing to run, keep the current input
                if segment.operator == Operator::Pipe {
                    pos = segment.next + 1;
                    continue;
                }
                return Ok(CommandResult::Normal);
            }

            if line.word(&segment.args[0]) == "exit" {
                debug!("exit requested");
                return Ok(CommandResult::Exit);
            }

            let mut args = segment.args;
            let mut stdin = input;
            let mut stdout = None;
            let mut operator = segment.operator;
            let mut next = segment.next;

            while operator.is_redirect() {
                let target = line.parse(next + 1);
                let Some((file, extra)) = target.args.split_first() else {
                    self.report(ShellError::MissingRedirectTarget(operator));
                    return Ok(CommandResult::Normal);
                };
                let path = Path::new(line.word(file));

                let opened = if operator == Operator::Input {
                    redirect::open_input(path).map(|stream| {
                        debug!("Reading: '{}' In: {}", path.display(), stream);
                        stdin = stream;
                    })
                } else {
                    redirect::open_output(path).map(|stream| {
                        debug!("Writing: '{}' Out: {}", path.display(), stream);
                        stdout = Some(stream);
                    })
                };
                if let Err(err) = opened {
                    self.report(err);
                    return Ok(CommandResult::Normal);
                }

                args.extend(extra.iter().cloned());
                operator = target.operator;
                next = target.next;
            }

            match operator {
                Operator::Pipe => {
                    let (reader, writer) = io::pipe().map_err(ShellError::Pipe)?;
                    let reader = Stream::from(reader);
                    let writer = Stream::from(writer);
                    trace!("Piping: Write: {writer} --> Read: {reader}");

                    // an explicit `>` wins; the unused write end closes here
                    let stdout = stdout.unwrap_or(writer);
                    self.spawn(line, &args, stdin, stdout)?;

                    input = reader;
                    pos = next + 1;
                }
                Operator::End => {
                    let stdout = stdout.unwrap_or(output);
                    self.spawn(line, &args, stdin, stdout)?;
                    return Ok(CommandResult::Normal);
                }
                Operator::Background | Operator::Input | Operator::Output => {
                    self.report(ShellError::InvalidInput(operator));
                    return Ok(CommandResult::Normal);
                }
            }
        }

        self.report(ShellError::TooManySegments(self.max_segments));
        Ok(CommandResult::Normal)
    }

    fn spawn(
        &mut self,
        line: &LineBuffer,
        args: &[Range<usize>],
        stdin: Stream,
        stdout: Stream,
    ) -> Result<(), ShellError> {
        let argv = line.words(args);
        debug!("Fork: {:?} In: {} Out: {}", argv, stdin, stdout);
        match self.spawner.spawn(&argv, stdin, stdout) {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                self.report(err);
                Ok(())
            }
        }
    }
}
