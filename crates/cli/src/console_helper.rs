use anyhow::{Context, Result};
use console::{style, Style};
use dialoguer::Input;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Colored console output and input for the interactive shell.
pub struct ConsoleHelper;

static PROMPTING: AtomicBool = AtomicBool::new(false);

impl ConsoleHelper {
    /// Prints alternating tag/value parts, tags in cyan.
    pub fn info(parts: impl IntoIterator<Item = impl AsRef<str>>) {
        println!("{}", Self::format_pairs(parts, Style::new().cyan()));
    }

    pub fn warning(message: impl AsRef<str>) {
        log_single("Warning", Style::new().yellow(), message);
    }

    pub fn error(message: impl AsRef<str>) {
        log_single("Error", Style::new().red(), message);
    }

    /// True while a prompt is waiting for input; the redraw loop holds off.
    pub fn is_prompting() -> bool {
        PROMPTING.load(Ordering::SeqCst)
    }

    /// Reads one line from stdin after printing `prompt> `.
    pub fn read_user_input(prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        if !prompt.is_empty() {
            write!(stdout, "{}> ", style(prompt).green())?;
            stdout.flush()?;
        }

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("stdin closed");
        }
        trim_newline(&mut line);
        Ok(line)
    }

    /// Asks for a value with an editable prompt. Empty input is allowed.
    pub fn prompt(prompt: &str) -> Result<String> {
        PROMPTING.store(true, Ordering::SeqCst);
        let _guard = PromptGuard;
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("failed to read input")?;
        Ok(value.trim().to_string())
    }

    fn format_pairs(parts: impl IntoIterator<Item = impl AsRef<str>>, tag: Style) -> String {
        parts
            .into_iter()
            .enumerate()
            .map(|(index, part)| {
                if index % 2 == 0 {
                    tag.apply_to(part.as_ref()).to_string()
                } else {
                    part.as_ref().to_string()
                }
            })
            .collect()
    }
}

fn log_single(tag: &str, color: Style, message: impl AsRef<str>) {
    println!("{} {}", color.apply_to(format!("{tag}:")), message.as_ref());
}

fn trim_newline(value: &mut String) {
    while value.ends_with(['\n', '\r']) {
        value.pop();
    }
}

struct PromptGuard;

impl Drop for PromptGuard {
    fn drop(&mut self) {
        PROMPTING.store(false, Ordering::SeqCst);
    }
}
