//! Music transport commands (start, stop, toggle, music, volume, status)

use colored::*;

use crate::audio::transport::PlaybackState;
use crate::commands::{CommandContext, CommandResult};

fn sent(result: anyhow::Result<()>, message: &str) -> CommandResult {
    match result {
        Ok(()) => CommandResult::Message(message.bright_green().to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `start` command
pub fn cmd_start(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    sent(ctx.engine.start(), "Music started")
}

/// Handle `stop` command
pub fn cmd_stop(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    sent(ctx.engine.stop(), "Music stopped")
}

/// Handle `toggle on|off` command
pub fn cmd_toggle(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let enabled = match args {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        _ => return CommandResult::Error("Usage: toggle on|off".to_string()),
    };
    let message = if enabled { "Music on" } else { "Music off" };
    sent(ctx.engine.toggle(enabled), message)
}

/// Handle `music` command: flip the music preference
pub fn cmd_music(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !ctx.engine.is_ready() {
        return CommandResult::Error("Audio is unavailable".to_string());
    }
    let enabling = !ctx.engine.status().music_enabled;
    let message = if enabling {
        "Music enabled"
    } else {
        "Music disabled"
    };
    sent(ctx.engine.toggle_music(), message)
}

/// Handle `volume [0..1]` command
pub fn cmd_volume(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Music volume: {:.2}",
            ctx.engine.status().volume
        ));
    }

    match args.parse::<f32>() {
        Ok(volume) if (0.0..=1.0).contains(&volume) => {
            ctx.params.bgm.volume = volume;
            sent(
                ctx.engine.set_volume(volume),
                &format!("Music volume set to {:.2}", volume),
            )
        }
        _ => CommandResult::Error("Invalid volume. Use a value between 0 and 1".to_string()),
    }
}

/// Handle `status` command
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let status = ctx.engine.status();
    let state = match status.state {
        PlaybackState::Playing => status.state.name().bright_green(),
        PlaybackState::Disabled => status.state.name().bright_red(),
        _ => status.state.name().yellow(),
    };
    let on_off = |on: bool| if on { "on".green() } else { "off".red() };
    CommandResult::Message(format!(
        "{} {}  {} {}  {} {:.2}  {} {}  {} {}  {} {}",
        "state:".bold(),
        state,
        "beat:".bold(),
        status.beat,
        "volume:".bold(),
        status.volume,
        "music:".bold(),
        on_off(status.music_enabled),
        "sfx:".bold(),
        on_off(status.sfx_enabled),
        "dropped:".bold(),
        status.dropped_voices
    ))
}
