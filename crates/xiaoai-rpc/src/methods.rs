//! Logical device operations and their wire methods.
//!
//! All wire method names live in [`Operation::wire_method`]; adding a remote
//! method means adding a variant there.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::client::RpcClient;
use crate::error::{ClientError, Result};
use crate::protocol::{DeviceResult, Params};

/// Operations the speaker hook understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Query device state
    Status,
    /// Text-to-speech
    Speak,
    /// Playback command
    Control,
    /// Volume change
    Volume,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Status,
        Operation::Speak,
        Operation::Control,
        Operation::Volume,
    ];

    #[must_use]
    pub fn wire_method(self) -> &'static str {
        match self {
            Operation::Status => "STATUS",
            Operation::Speak => "TTS",
            Operation::Control => "CONTROL",
            Operation::Volume => "VOLUME",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::Status => "status",
            Operation::Speak => "speak",
            Operation::Control => "control",
            Operation::Volume => "volume",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "status" => Ok(Operation::Status),
            "speak" | "tts" => Ok(Operation::Speak),
            "control" => Ok(Operation::Control),
            "volume" => Ok(Operation::Volume),
            other => Err(ClientError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Highest volume level the device accepts
pub const MAX_VOLUME: u8 = 100;

/// Target for a `VOLUME` call.
///
/// Levels above [`MAX_VOLUME`] are clamped when sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Up,
    Down,
    Level(u8),
}

impl VolumeChange {
    fn to_value(self) -> Value {
        match self {
            VolumeChange::Up => Value::from("up"),
            VolumeChange::Down => Value::from("down"),
            VolumeChange::Level(level) => Value::from(level.min(MAX_VOLUME)),
        }
    }
}

impl FromStr for VolumeChange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "up" => Ok(VolumeChange::Up),
            "down" => Ok(VolumeChange::Down),
            level => level
                .parse::<u8>()
                .ok()
                .filter(|v| *v <= MAX_VOLUME)
                .map(VolumeChange::Level)
                .ok_or_else(|| format!("expected 'up', 'down' or 0-100, got '{level}'")),
        }
    }
}

/// Playback commands understood by `CONTROL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackCommand {
    Channel,
    Prev,
    Next,
    Play,
    Pause,
    Toggle,
    Resume,
}

impl PlaybackCommand {
    pub const ALL: [PlaybackCommand; 7] = [
        PlaybackCommand::Channel,
        PlaybackCommand::Prev,
        PlaybackCommand::Next,
        PlaybackCommand::Play,
        PlaybackCommand::Pause,
        PlaybackCommand::Toggle,
        PlaybackCommand::Resume,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackCommand::Channel => "ch",
            PlaybackCommand::Prev => "prev",
            PlaybackCommand::Next => "next",
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Toggle => "toggle",
            PlaybackCommand::Resume => "resume",
        }
    }
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PlaybackCommand::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| {
                format!("expected one of ch, prev, next, play, pause, toggle, resume, got '{s}'")
            })
    }
}

fn single_param(key: &str, value: Value) -> Params {
    let mut params = Params::new();
    params.insert(key.to_string(), value);
    params
}

/// Params for a `TTS` call, with `&` removed from the message.
#[must_use]
pub fn speak_params(msg: &str) -> Params {
    single_param("msg", Value::from(msg.replace('&', "")))
}

/// Params for a `CONTROL` call.
#[must_use]
pub fn control_params(command: PlaybackCommand) -> Params {
    single_param("method", Value::from(command.as_str()))
}

/// Params for a `VOLUME` call.
#[must_use]
pub fn volume_params(change: VolumeChange) -> Params {
    single_param("v", change.to_value())
}

impl RpcClient {
    /// Run a logical operation, forwarding `params` unchanged.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn invoke(&self, operation: Operation, params: Params) -> Result<DeviceResult> {
        self.call(operation.wire_method(), params).await
    }

    /// Run an operation given by its logical name.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnsupportedOperation` for unknown names, without
    /// sending anything; otherwise see [`RpcClient::call`].
    pub async fn invoke_named(&self, name: &str, params: Params) -> Result<DeviceResult> {
        let operation: Operation = name.parse()?;
        self.invoke(operation, params).await
    }

    /// Query device state.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn status(&self) -> Result<DeviceResult> {
        self.invoke(Operation::Status, Params::new()).await
    }

    /// Text-to-speech with caller-supplied params.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn speak(&self, params: Params) -> Result<DeviceResult> {
        self.invoke(Operation::Speak, params).await
    }

    /// Playback command with caller-supplied params.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn control(&self, params: Params) -> Result<DeviceResult> {
        self.invoke(Operation::Control, params).await
    }

    /// Volume change with caller-supplied params.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn volume(&self, params: Params) -> Result<DeviceResult> {
        self.invoke(Operation::Volume, params).await
    }

    /// Speak `msg` on the device.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn speak_text(&self, msg: &str) -> Result<DeviceResult> {
        self.speak(speak_params(msg)).await
    }

    /// Send a playback command such as `play` or `next`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn control_command(&self, command: PlaybackCommand) -> Result<DeviceResult> {
        self.control(control_params(command)).await
    }

    /// # Errors
    ///
    /// See [`RpcClient::call`].
    pub async fn set_volume(&self, change: VolumeChange) -> Result<DeviceResult> {
        self.volume(volume_params(change)).await
    }
}
