use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::navis::tools::error::{Result, ToolError};

/// Interactive fallbacks used when no input path was given on the command
/// line.
pub trait InputPrompt {
    /// Lets the user pick a candidate file. `None` when nothing was picked or
    /// picking is not possible.
    fn pick_file(&mut self) -> Option<PathBuf>;

    /// Asks the user to type a path. An empty answer means nothing was given.
    fn ask_path(&mut self) -> Result<String>;
}

/// Resolves the input document: explicit path first, then the picker, then
/// a typed path.
pub fn resolve_input(explicit: Option<&Path>, prompt: &mut dyn InputPrompt) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return existing_file(path.to_path_buf());
    }

    if let Some(picked) = prompt.pick_file() {
        debug!(path = %picked.display(), "input picked interactively");
        return existing_file(picked);
    }

    let answer = prompt.ask_path()?;
    let typed = answer.trim().trim_matches('"').trim();
    if typed.is_empty() {
        return Err(ToolError::NoInputSelected);
    }
    existing_file(PathBuf::from(typed))
}

fn existing_file(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ToolError::MissingInput(path))
    }
}

/// Terminal-backed prompt: lists the `*.xml` files of a directory for
/// selection, then falls back to reading a path from stdin.
pub struct TerminalPrompt {
    search_dir: PathBuf,
}

impl TerminalPrompt {
    pub fn new(search_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: search_dir.into(),
        }
    }

    /// XML files directly inside the search directory, sorted by path.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let escaped = glob::Pattern::escape(&self.search_dir.to_string_lossy());
        let pattern = Path::new(&escaped).join("*.xml");
        let pattern = pattern.to_string_lossy();
        let mut candidates: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
            Err(error) => {
                debug!(%error, "invalid candidate pattern");
                Vec::new()
            }
        };
        candidates.retain(|path| path.is_file());
        candidates.sort();
        candidates
    }
}

impl InputPrompt for TerminalPrompt {
    fn pick_file(&mut self) -> Option<PathBuf> {
        if !io::stdin().is_terminal() {
            return None;
        }

        let candidates = self.candidates();
        if candidates.is_empty() {
            return None;
        }

        println!("Select XML file to parse:");
        for (index, candidate) in candidates.iter().enumerate() {
            println!("  {}) {}", index + 1, candidate.display());
        }
        print!("Number (blank to type a path): ");
        io::stdout().flush().ok()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        choose(&candidates, &answer)
    }

    fn ask_path(&mut self) -> Result<String> {
        println!("Please enter the path to the XML file:");
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

fn choose(candidates: &[PathBuf], answer: &str) -> Option<PathBuf> {
    let index: usize = answer.trim().parse().ok()?;
    candidates.get(index.checked_sub(1)?).cloned()
}
