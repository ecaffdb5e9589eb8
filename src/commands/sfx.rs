//! Sound effect and game event commands (bounce, click, event)

use bgmkit_core::types::{GameEvent, SfxKind};

use crate::commands::{CommandContext, CommandResult};

fn play(kind: SfxKind, ctx: &mut CommandContext) -> CommandResult {
    match ctx.engine.play_one_shot(kind) {
        Ok(()) => CommandResult::Success,
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `bounce` command
pub fn cmd_bounce(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    play(SfxKind::Bounce, ctx)
}

/// Handle `click` command
pub fn cmd_click(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    play(SfxKind::Click, ctx)
}

/// Handle `event <bounced|clicked|started|exited>` command
pub fn cmd_event(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let Some(event) = GameEvent::from_name(args) else {
        return CommandResult::Error(
            "Usage: event <bounced|clicked|started|exited>".to_string(),
        );
    };
    match ctx.engine.handle_event(event) {
        Ok(()) => CommandResult::Message(format!("Sent {:?}", event)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}
