//! Command registry for REPL commands
//!
//! Provides a clean, extensible pattern for handling REPL commands.

pub mod general;
pub mod music;
pub mod sfx;

use std::path::PathBuf;

use bgmkit_core::AudioParams;

use crate::audio::playback_engine::EngineHandle;

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Unknown command
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub engine: EngineHandle,
    /// Parameters as last loaded or saved
    pub params: AudioParams,
    /// Where `save` writes when no path is given
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(engine: EngineHandle, params: AudioParams, config_path: Option<PathBuf>) -> Self {
        Self {
            engine,
            params,
            config_path,
        }
    }

    /// Current parameters with the engine's live volume and music preference
    pub fn current_params(&self) -> AudioParams {
        let status = self.engine.status();
        let mut params = self.params.clone();
        params.bgm.volume = status.volume;
        params.bgm.enabled = status.music_enabled;
        params
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Music transport
    registry.register("start", music::cmd_start);
    registry.register("stop", music::cmd_stop);
    registry.register("toggle", music::cmd_toggle);
    registry.register("music", music::cmd_music);
    registry.register("volume", music::cmd_volume);
    registry.register("status", music::cmd_status);

    // Sound effects and game events
    registry.register("bounce", sfx::cmd_bounce);
    registry.register("click", sfx::cmd_click);
    registry.register("event", sfx::cmd_event);

    // General commands
    registry.register("save", general::cmd_save);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::audio::recording::RecordingBackend;

    /// A context whose engine records into `backend`
    pub fn context(backend: &RecordingBackend) -> CommandContext {
        let handle = backend.clone();
        let engine = EngineHandle::spawn(AudioParams::default(), move || Ok(handle));
        CommandContext::new(engine, AudioParams::default(), None)
    }

    /// Spin until `f` holds or a second passes
    pub fn eventually(f: impl Fn() -> bool) -> bool {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(1);
        while std::time::Instant::now() < deadline {
            if f() {
                return true;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        f()
    }
}
