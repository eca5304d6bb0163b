pub mod backup;
pub mod config;
pub mod run;
pub mod workout;

use std::io::{BufRead, Write};

/// Ask a yes/no question on the terminal. Anything but "y"/"yes" is no.
pub fn confirm(question: &str) -> std::io::Result<bool> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
