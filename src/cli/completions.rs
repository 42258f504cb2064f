use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    pacfall completions --shell bash > ~/.bash_completion.d/pacfall\n\n\
                  Generate zsh completions:\n    pacfall completions --shell zsh > ~/.zfunc/_pacfall\n\n\
                  Generate fish completions:\n    pacfall completions --shell fish > ~/.config/fish/completions/pacfall.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}
