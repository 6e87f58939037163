//! Message vocabulary between the control surface and the host
//!
//! Outbound messages are flat `{type, value}` objects. Inbound updates use
//! the same shape with `type` set to `update` followed by the capitalized
//! parameter name, e.g. `{"type": "updateVolume", "value": 0.5}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// Parameters understood by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    Volume,
    Frequency,
    Detune,
    Attack,
    Decay,
    Sustain,
    Release,
    Cutoff,
    Resonance,
    Waveform,
    FilterType,
    PlayNote,
    StopNote,
}

impl ParamKind {
    pub const ALL: [ParamKind; 13] = [
        ParamKind::Volume,
        ParamKind::Frequency,
        ParamKind::Detune,
        ParamKind::Attack,
        ParamKind::Decay,
        ParamKind::Sustain,
        ParamKind::Release,
        ParamKind::Cutoff,
        ParamKind::Resonance,
        ParamKind::Waveform,
        ParamKind::FilterType,
        ParamKind::PlayNote,
        ParamKind::StopNote,
    ];

    /// Wire name of the parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Volume => "volume",
            ParamKind::Frequency => "frequency",
            ParamKind::Detune => "detune",
            ParamKind::Attack => "attack",
            ParamKind::Decay => "decay",
            ParamKind::Sustain => "sustain",
            ParamKind::Release => "release",
            ParamKind::Cutoff => "cutoff",
            ParamKind::Resonance => "resonance",
            ParamKind::Waveform => "waveform",
            ParamKind::FilterType => "filterType",
            ParamKind::PlayNote => "playNote",
            ParamKind::StopNote => "stopNote",
        }
    }

    /// Whether messages of this kind carry no value
    pub fn is_trigger(&self) -> bool {
        matches!(self, ParamKind::PlayNote | ParamKind::StopNote)
    }

    /// Whether the value is a choice string rather than a number
    pub fn is_choice(&self) -> bool {
        matches!(self, ParamKind::Waveform | ParamKind::FilterType)
    }

    /// Parse an inbound `update<Param>` type
    pub fn from_update_type(kind: &str) -> Option<Self> {
        let rest = kind.strip_prefix("update")?;
        let mut chars = rest.chars();
        let first = chars.next()?;
        if !first.is_ascii_uppercase() {
            return None;
        }
        let name: String = first.to_ascii_lowercase().to_string() + chars.as_str();
        name.parse().ok()
    }

    /// Inbound `update<Param>` type for this parameter
    pub fn update_type(&self) -> String {
        let name = self.as_str();
        let mut out = String::with_capacity(name.len() + 6);
        out.push_str("update");
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
        out
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        ParamKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PlatformError::MessageFailed(format!("unknown parameter `{s}`")))
    }
}

/// Message payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
    Number(f64),
    Text(String),
}

impl MessageValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MessageValue::Number(n) => Some(*n),
            MessageValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MessageValue::Number(_) => None,
            MessageValue::Text(s) => Some(s),
        }
    }

    /// Interpret as an on/off flag; non-zero numbers are on
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MessageValue::Number(n) => Some(*n != 0.0),
            MessageValue::Text(s) => match s.as_str() {
                "true" | "on" => Some(true),
                "false" | "off" => Some(false),
                _ => None,
            },
        }
    }
}

impl From<f64> for MessageValue {
    fn from(value: f64) -> Self {
        MessageValue::Number(value)
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        MessageValue::Text(value.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        MessageValue::Text(value)
    }
}

/// Message sent to the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<MessageValue>,
}

impl OutboundMessage {
    /// Numeric parameter change
    pub fn number(kind: ParamKind, value: f64) -> Self {
        Self {
            kind,
            value: Some(MessageValue::Number(value)),
        }
    }

    /// Choice parameter change
    pub fn text(kind: ParamKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(MessageValue::Text(value.into())),
        }
    }

    pub fn play_note() -> Self {
        Self {
            kind: ParamKind::PlayNote,
            value: None,
        }
    }

    pub fn stop_note() -> Self {
        Self {
            kind: ParamKind::StopNote,
            value: None,
        }
    }

    /// Encode as a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Raw inbound envelope, before the type is interpreted
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<MessageValue>,
}

impl InboundMessage {
    /// Decode an inbound JSON object
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Interpret as a parameter update; `None` for unknown types or a
    /// missing value
    pub fn into_update(self) -> Option<HostUpdate> {
        let param = ParamKind::from_update_type(&self.kind)?;
        let value = self.value?;
        Some(HostUpdate { param, value })
    }
}

/// Host-driven parameter update
#[derive(Clone, Debug, PartialEq)]
pub struct HostUpdate {
    pub param: ParamKind,
    pub value: MessageValue,
}
