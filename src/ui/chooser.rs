//! Interactive alternative selection
//!
//! The operator sees a 1-based numbered list and types one line. `0`, an
//! empty line, or anything that is not a listed number means "skip"; there is
//! no re-prompt.

use console::Style;
use inquire::{Confirm, Text};

use crate::error::Result;
use crate::source::{CandidateAlternative, SourceKind};

/// Operator's answer to a candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidate list
    Pick(usize),
    Skip,
}

/// Source of operator decisions during alternative search
pub trait Chooser {
    /// Ask whether alternatives should be searched for `requested` at all
    fn confirm_search(&mut self, requested: &str) -> Result<bool>;

    /// Pick one of `candidates` as a substitute for `requested`
    fn choose(&mut self, requested: &str, candidates: &[CandidateAlternative])
    -> Result<Selection>;
}

/// Terminal chooser backed by inquire prompts
#[derive(Debug, Default)]
pub struct PromptChooser;

impl Chooser for PromptChooser {
    fn confirm_search(&mut self, requested: &str) -> Result<bool> {
        let answer = Confirm::new(&format!(
            "'{requested}' could not be installed. Search for alternatives?"
        ))
        .with_default(true)
        .prompt_skippable()?;
        Ok(answer.unwrap_or(false))
    }

    fn choose(
        &mut self,
        requested: &str,
        candidates: &[CandidateAlternative],
    ) -> Result<Selection> {
        eprintln!();
        eprint!("{}", render_candidates(requested, candidates));
        let input = Text::new("Select an alternative (0 or empty to skip):").prompt_skippable()?;
        Ok(input.map_or(Selection::Skip, |line| {
            parse_selection(&line, candidates.len())
        }))
    }
}

/// Numbered candidate list, primary source first, as shown to the operator
pub fn render_candidates(requested: &str, candidates: &[CandidateAlternative]) -> String {
    let mut rendered = format!(
        "Alternatives for {}:\n",
        Style::new().bold().yellow().apply_to(requested)
    );
    for (position, candidate) in candidates.iter().enumerate() {
        let tag = match candidate.source {
            SourceKind::Primary => Style::new().green().apply_to(candidate.source),
            SourceKind::Community => Style::new().magenta().apply_to(candidate.source),
        };
        rendered.push_str(&format!(
            "  {:>2}) {} [{}]\n",
            position + 1,
            candidate.name,
            tag
        ));
    }
    rendered.push_str("   0) skip\n");
    rendered
}

/// Interpret one line of operator input against a list of `count` candidates
pub fn parse_selection(input: &str, count: usize) -> Selection {
    match input.trim().parse::<usize>() {
        Ok(number) if (1..=count).contains(&number) => Selection::Pick(number - 1),
        _ => Selection::Skip,
    }
}
