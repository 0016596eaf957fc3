//! `crewkey completions <SHELL>`: print a completion script to stdout.
//!
//!   crewkey completions bash > ~/.local/share/bash-completion/completions/crewkey

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

const BIN_NAME: &str = "crewkey";

pub fn execute(shell: Shell) -> Result<()> {
    write_script(shell, &mut io::stdout().lock())
}

fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
    out.flush()?;
    Ok(())
}
