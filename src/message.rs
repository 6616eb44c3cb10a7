//! DLT message model consumed by the decoder plugin.
//!
//! This module provides the plugin's view of a host-owned log message.
//! The host parses the DLT wire format and hands the plugin a structured
//! message; the plugin reads its identification fields and payload, and
//! rewrites the argument list when a decode succeeds.

use serde::{Deserialize, Serialize};

/// Byte order of a message's payload encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

/// Encoding variant of a DLT message.
///
/// Only verbose-mode messages carry typed arguments, so only those are
/// candidates for script decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageMode {
    NonVerbose,
    Verbose,
}

/// Type tag of a verbose-mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeInfo {
    Bool,
    SignedInteger,
    UnsignedInteger,
    Float,
    String,
    RawData,
}

/// A single typed argument of a verbose-mode message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DltArgument {
    pub type_info: TypeInfo,
    pub endianness: Endianness,
    pub payload_offset: usize,
    pub data: Vec<u8>,
}

impl DltArgument {
    /// Build a string-typed argument at payload offset zero.
    ///
    /// This is the shape a successful decode writes back into the message:
    /// the decoded text as UTF-8 bytes, carrying the endianness of the
    /// message it replaces arguments for.
    pub fn string(endianness: Endianness, text: &str) -> Self {
        Self {
            type_info: TypeInfo::String,
            endianness,
            payload_offset: 0,
            data: text.as_bytes().to_vec(),
        }
    }

    /// View the argument data as UTF-8 text, if it is string-typed and valid.
    pub fn as_text(&self) -> Option<&str> {
        if self.type_info != TypeInfo::String {
            return None;
        }
        std::str::from_utf8(&self.data).ok()
    }
}

/// A structured DLT log message.
///
/// Owned by the host application. The plugin mutates a message only through
/// [`clear_arguments`](DltMessage::clear_arguments) and
/// [`add_argument`](DltMessage::add_argument); everything else is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DltMessage {
    apid: String,
    ctid: String,
    timestamp: u32,
    mode: MessageMode,
    endianness: Endianness,
    payload: Vec<u8>,
    arguments: Vec<DltArgument>,
}

impl DltMessage {
    /// Create a message with an empty argument list.
    ///
    /// # Arguments
    ///
    /// * `apid` - Application identifier (short string, e.g. "APP1")
    /// * `ctid` - Context identifier (short string, e.g. "CTX1")
    /// * `timestamp` - Message timestamp in 0.1 ms units
    /// * `mode` - Verbose or non-verbose encoding
    /// * `endianness` - Payload byte order
    /// * `payload` - Raw payload bytes
    pub fn new(
        apid: impl Into<String>,
        ctid: impl Into<String>,
        timestamp: u32,
        mode: MessageMode,
        endianness: Endianness,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            apid: apid.into(),
            ctid: ctid.into(),
            timestamp,
            mode,
            endianness,
            payload,
            arguments: Vec::new(),
        }
    }

    pub fn apid(&self) -> &str {
        &self.apid
    }

    pub fn ctid(&self) -> &str {
        &self.ctid
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn mode(&self) -> MessageMode {
        self.mode
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn arguments(&self) -> &[DltArgument] {
        &self.arguments
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Append an argument to the message.
    pub fn add_argument(&mut self, argument: DltArgument) {
        self.arguments.push(argument);
    }

    /// Remove all arguments from the message.
    pub fn clear_arguments(&mut self) {
        self.arguments.clear();
    }
}
