use argh::FromArgs;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// A small interactive shell with builtins, external commands and output
/// redirection.
pub struct Cli {
    #[argh(option, short = 'c')]
    /// run this command line and exit instead of starting the prompt
    pub command: Option<String>,

    #[argh(option, default = "String::from(\"$ \")")]
    /// prompt printed before each input line
    pub prompt: String,

    #[argh(option)]
    /// write logs to this file instead of standard error
    pub log_file: Option<PathBuf>,
}
