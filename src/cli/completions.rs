//! Shell completion script generation
//!
//! Generates completion scripts for bash, zsh and fish using clap_complete.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion script to stdout
///
/// ```bash
/// salat completions bash > ~/.bash_completion.d/salat
/// salat completions zsh > ~/.zsh/completions/_salat
/// salat completions fish > ~/.config/fish/completions/salat.fish
/// ```
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
