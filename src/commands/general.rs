//! General REPL commands (help, quit, save)

use std::path::PathBuf;

use colored::*;

use crate::commands::{CommandContext, CommandResult};

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `save [path]` command
pub fn cmd_save(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let path = if args.is_empty() {
        match &ctx.config_path {
            Some(path) => path.clone(),
            None => return CommandResult::Error("Usage: save <path>".to_string()),
        }
    } else {
        PathBuf::from(args)
    };

    let params = ctx.current_params();
    match params.save(&path) {
        Ok(()) => {
            ctx.params = params;
            ctx.config_path = Some(path.clone());
            CommandResult::Message(
                format!("Saved settings to {}", path.display())
                    .bright_green()
                    .to_string(),
            )
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "bgmkit commands".bold());
    println!("{}", "===============".bold());
    println!();
    println!("{}", "Music:".green());
    println!("  {}              - Start the background music", "start".cyan());
    println!("  {}               - Fade the music out", "stop".cyan());
    println!("  {}      - Start or stop", "toggle on|off".cyan());
    println!("  {}              - Flip the music preference", "music".cyan());
    println!("  {}      - Set the music volume", "volume <0..1>".cyan());
    println!("  {}             - Show engine status", "status".cyan());
    println!();
    println!("{}", "Sound effects:".green());
    println!("  {}             - Ball bounce", "bounce".cyan());
    println!("  {}              - Button click", "click".cyan());
    println!(
        "  {} - Send a game event",
        "event <bounced|clicked|started|exited>".cyan()
    );
    println!();
    println!("{}", "Other:".green());
    println!("  {}        - Write settings as TOML", "save [path]".cyan());
    println!("  {}               - This help", "help".cyan());
    println!("  {}               - Exit", "quit".cyan());
}
