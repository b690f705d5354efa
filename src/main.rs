use std::io::{self, Write};

use pipesh::{config::Config, execution::process::ProcessSpawner, result::CommandResult};
use rustyline::{DefaultEditor, error::ReadlineError};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    pipesh::logging::init(&config)?;
    log::info!("starting, search path has {} entries", config.path_env.len());

    let mut rl = DefaultEditor::with_config(rustyline::Config::default())?;
    let mut spawner = ProcessSpawner::new(config.path_env.clone());
    loop {
        let readline = rl.readline(&config.prompt);
        let ret = match readline {
            Ok(line) => {
                let ret = pipesh::run_line(&line, &config, &mut spawner, &mut io::stderr())?;
                if ret == CommandResult::Normal {
                    // every child of this line, not just the last one
                    spawner.wait_all();
                }
                io::stdout().flush()?;
                ret
            }
            // Ctrl-C drops the current line, like bash and zsh
            Err(ReadlineError::Interrupted) => CommandResult::Normal,
            Err(ReadlineError::Eof) => CommandResult::Exit,
            Err(e) => {
                return Err(anyhow::anyhow!(e));
            }
        };

        if ret == CommandResult::Exit {
            log::info!("exit, {} children left running", spawner.pending());
            break;
        }
    }
    Ok(())
}
