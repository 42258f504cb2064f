use clap::Parser;

/// Arguments for the search command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Name to find alternatives for
    pub term: String,

    /// Alternatives listed per source
    #[arg(long, value_name = "N")]
    pub max_candidates: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use super::*;

    #[test]
    fn test_cli_parsing_search() {
        let cli = Cli::try_parse_from(["pacfall", "search", "burpsuite"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.term, "burpsuite");
                assert_eq!(args.max_candidates, None);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_parsing_search_requires_term() {
        assert!(Cli::try_parse_from(["pacfall", "search"]).is_err());
    }
}
