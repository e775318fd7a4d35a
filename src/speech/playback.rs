//! Starting playback of a generated file.
//!
//! Players can fail transiently right after the file is written (device busy,
//! file not yet visible to another process), so starting is retried under a
//! `RetryPolicy`. Giving up is not fatal: the file stays on disk for download.

use crate::config::RetryPolicy;
use crate::error::ReaderError;
use serde::Serialize;
use std::path::Path;
use std::process::Stdio;

#[async_trait::async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Begin playback and return without waiting for it to finish.
    async fn play(&self, path: &Path) -> Result<(), String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Started { attempts: u32 },
    NotStarted(ReaderError),
    /// Caller asked for no playback.
    Disabled,
}

impl PlaybackStatus {
    pub fn warning(&self) -> Option<String> {
        match self {
            PlaybackStatus::NotStarted(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

/// Try `player` up to `policy.max_attempts` times, pausing `policy.backoff`
/// between failed attempts.
pub async fn start_playback(player: &dyn AudioPlayer, path: &Path, policy: RetryPolicy) -> PlaybackStatus {
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match player.play(path).await {
            Ok(()) => {
                log::info!("[PLAYBACK] Started {} on attempt {}", path.display(), attempt);
                return PlaybackStatus::Started { attempts: attempt };
            }
            Err(e) => {
                log::warn!("[PLAYBACK] Attempt {}/{} failed: {}", attempt, max_attempts, e);
                if attempt < max_attempts {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }
    PlaybackStatus::NotStarted(ReaderError::PlaybackNotStarted {
        attempts: max_attempts,
    })
}

/// Command-line audio players, tried in order.
const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("mpg123", &["-q"]),
    ("afplay", &[]),
];

/// Plays through the first installed command-line player.
#[derive(Default)]
pub struct SystemPlayer;

impl SystemPlayer {
    /// Name of the player that would be used, if any is installed.
    pub fn detect() -> Option<&'static str> {
        PLAYERS
            .iter()
            .find(|(name, _)| which::which(name).is_ok())
            .map(|(name, _)| *name)
    }
}

#[async_trait::async_trait]
impl AudioPlayer for SystemPlayer {
    async fn play(&self, path: &Path) -> Result<(), String> {
        let (binary, args) = PLAYERS
            .iter()
            .find_map(|(name, args)| which::which(name).ok().map(|bin| (bin, *args)))
            .ok_or("no audio player found (tried mpv, ffplay, mpg123, afplay)")?;

        if !path.exists() {
            return Err(format!("{} is not there yet", path.display()));
        }

        tokio::process::Command::new(&binary)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("failed to start {}: {}", binary.display(), e))
    }
}
