//! Game events the audio engine reacts to.

use serde::{Deserialize, Serialize};

/// Signals sent by the game; the engine maps each to a transport action or
/// a one-shot cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    BallBounced,
    ButtonClicked,
    GameStarted,
    GameExited,
}

impl GameEvent {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bounced" | "bounce" | "ballbounced" => Some(GameEvent::BallBounced),
            "clicked" | "click" | "buttonclicked" => Some(GameEvent::ButtonClicked),
            "started" | "start" | "gamestarted" => Some(GameEvent::GameStarted),
            "exited" | "exit" | "gameexited" => Some(GameEvent::GameExited),
            _ => None,
        }
    }
}
