//! Terminal confirmation prompt

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use colored::Colorize;

use crate::application::ports::{ConfirmPrompt, Confirmer};

/// Asks on stderr and reads the answer from stdin
pub struct TerminalConfirmer {
    assume_yes: bool,
}

impl TerminalConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        if self.assume_yes {
            return true;
        }

        let question = format!(
            "{} {}\n{} [y/N] ",
            "?".cyan().bold(),
            prompt.title.bold(),
            prompt.text
        );

        // stdin reads block
        let answer = tokio::task::spawn_blocking(move || {
            eprint!("{}", question);
            let _ = io::stderr().flush();
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(e)) => {
                log::warn!("Could not read confirmation: {}", e);
                false
            }
            Err(e) => {
                log::warn!("Confirmation task failed: {}", e);
                false
            }
        }
    }
}

/// Only an explicit yes confirms
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
