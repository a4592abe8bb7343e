use anyhow::Context;
use tinysh::Interpreter;
use tinysh::cli::Cli;
use tinysh::logging;

fn main() -> anyhow::Result<()> {
    let cli: Cli = argh::from_env();
    match &cli.log_file {
        Some(path) => logging::init_file_logging(path)?,
        None => logging::init_stderr_logging(),
    }

    let mut sh = Interpreter::default();
    match cli.command {
        Some(line) => {
            sh.execute_line(line.trim());
        }
        None => sh.repl(&cli.prompt).context("reading input failed")?,
    }
    Ok(())
}
