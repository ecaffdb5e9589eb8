//! Interactive console for driving the engine by hand

use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};

use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};

pub struct Repl {
    editor: DefaultEditor,
    registry: CommandRegistry,
    ctx: CommandContext,
}

impl Repl {
    /// Create a new REPL around a running engine
    pub fn new(ctx: CommandContext) -> RustylineResult<Self> {
        Ok(Repl {
            editor: DefaultEditor::new()?,
            registry: create_registry(),
            ctx,
        })
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "♪".bright_yellow(),
            "bgmkit background music engine".bright_cyan().bold()
        );
        println!(
            "Try {}, {} or {}.",
            "start".cyan(),
            "bounce".cyan(),
            "volume 0.3".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        loop {
            let prompt = format!("{} ", "bgm>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);
                    if !dispatch(&self.registry, &mut self.ctx, line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Run one input line; `false` means the session should end
fn dispatch(registry: &CommandRegistry, ctx: &mut CommandContext, line: &str) -> bool {
    match registry.execute(line, ctx) {
        CommandResult::Success => {}
        CommandResult::Message(msg) => println!("{}", msg),
        CommandResult::Exit => {
            println!("{}", "Goodbye!".bright_cyan());
            return false;
        }
        CommandResult::Error(e) => println!("{} {}", "Error:".bright_red().bold(), e.red()),
        CommandResult::NotACommand => println!(
            "{} unknown command '{}', try {}",
            "Error:".bright_red().bold(),
            line,
            "help".bright_green()
        ),
    }
    true
}

/// Convenience function to start the REPL
pub fn start(ctx: CommandContext) -> Result<()> {
    let mut repl = Repl::new(ctx).map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
