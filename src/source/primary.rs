//! Official repositories through `pacman`

use std::time::Duration;

use super::command::{self, CommandSpec};
use super::{CommandOutcome, ExistenceResult, PackageSource, SourceKind, dedup_preserving_order};

/// The synchronous, local-index-backed source
#[derive(Debug, Clone)]
pub struct PacmanSource {
    command: String,
    privilege_wrapper: String,
    lookup_timeout: Duration,
    install_timeout: Duration,
}

impl PacmanSource {
    pub fn new(
        command: impl Into<String>,
        privilege_wrapper: impl Into<String>,
        lookup_timeout: Duration,
        install_timeout: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            privilege_wrapper: privilege_wrapper.into(),
            lookup_timeout,
            install_timeout,
        }
    }

    fn query(&self, args: &[&str]) -> CommandOutcome {
        command::run(&CommandSpec::new(
            self.command.clone(),
            args.iter().copied(),
            self.lookup_timeout,
        ))
    }
}

impl PackageSource for PacmanSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Primary
    }

    fn exists(&mut self, name: &str) -> ExistenceResult {
        let outcome = self.query(&["-Si", name]);
        ExistenceResult::new(name, SourceKind::Primary, outcome.success)
    }

    fn search(&mut self, term: &str) -> Vec<String> {
        // pacman exits 1 when nothing matches
        let pattern = escape_search_term(term);
        let outcome = self.query(&["-Ssq", &pattern]);
        if !outcome.success {
            return Vec::new();
        }
        parse_name_lines(&outcome.stdout)
    }

    fn is_installed(&mut self, name: &str) -> bool {
        self.query(&["-Q", name]).success
    }

    fn install(&mut self, names: &[String]) -> CommandOutcome {
        if names.is_empty() {
            return CommandOutcome::succeeded("");
        }
        let mut args = vec![
            self.command.clone(),
            "-S".to_string(),
            "--needed".to_string(),
            "--noconfirm".to_string(),
        ];
        args.extend(names.iter().cloned());
        command::run(
            &CommandSpec::new(self.privilege_wrapper.clone(), args, self.install_timeout)
                .interactive(),
        )
    }
}

/// `pacman -Ss` takes an extended regex; escape it so the term matches literally
pub fn escape_search_term(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\'
        ) {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern
}

/// One package name per line (`pacman -Ssq` output)
pub fn parse_name_lines(output: &str) -> Vec<String> {
    dedup_preserving_order(
        output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_lines() {
        let output = "nmap\n\nzenmap\n  ncrack  \nnmap\n";
        assert_eq!(parse_name_lines(output), vec!["nmap", "zenmap", "ncrack"]);
    }

    #[test]
    fn test_parse_name_lines_empty() {
        assert!(parse_name_lines("").is_empty());
        assert!(parse_name_lines("\n\n").is_empty());
    }

    #[test]
    fn test_escape_search_term() {
        assert_eq!(escape_search_term("nmap"), "nmap");
        assert_eq!(escape_search_term("gtk2+"), "gtk2\\+");
        assert_eq!(escape_search_term("python3.12"), "python3\\.12");
        assert_eq!(escape_search_term("lib32-glibc"), "lib32-glibc");
    }

    #[cfg(unix)]
    #[test]
    fn test_search_passes_literal_pattern() {
        use std::os::unix::fs::PermissionsExt;

        let dir = crate::test_fixtures::create_temp_dir();
        let script = dir.path().join("pacman");
        std::fs::write(&script, "#!/bin/sh\nprintf '%s\\n' \"$2\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut source = PacmanSource::new(
            script.to_string_lossy(),
            "pacfall-missing-sudo",
            Duration::from_secs(5),
            Duration::from_secs(5),
        );
        assert_eq!(source.search("gtk2+"), vec!["gtk2\\+"]);
    }

    #[test]
    fn test_install_nothing_is_noop_success() {
        let mut source = PacmanSource::new(
            "pacfall-missing-pacman",
            "pacfall-missing-sudo",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert!(source.install(&[]).success);
    }

    #[test]
    fn test_missing_binary_degrades_to_negative_answers() {
        let mut source = PacmanSource::new(
            "pacfall-missing-pacman",
            "pacfall-missing-sudo",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert!(!source.exists("htop").exists);
        assert!(source.search("htop").is_empty());
        assert!(!source.is_installed("htop"));
        assert!(!source.install(&["htop".to_string()]).success);
    }
}
