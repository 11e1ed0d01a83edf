use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    parrun completions bash > ~/.bash_completion.d/parrun\n\n\
                  Generate zsh completions:\n    parrun completions zsh > ~/.zfunc/_parrun\n\n\
                  Generate fish completions:\n    parrun completions fish > ~/.config/fish/completions/parrun.fish\n\n\
                  Generate PowerShell completions:\n    parrun completions powershell")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
