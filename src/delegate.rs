//! Decoder delegate strategy trait and error types.
//!
//! The delegate is the user-extensible half of the plugin: an object that
//! decides whether a message is decodable and, if so, produces the decoded
//! text. The shipped implementation binds a Python object (see the
//! `python_bridge` module, feature `python-bridge`), but anything
//! implementing [`DecoderDelegate`] can be plugged into the adapter.

use std::fmt;

use crate::record::FieldRecord;

/// Error type for delegate operations
#[derive(Debug, Clone)]
pub enum DelegateError {
    /// No delegate was bound at construction; the adapter is non-functional.
    Unbound,
    /// Loading or executing the bootstrap script failed.
    Bootstrap(String),
    /// The delegate raised during a call.
    Execution(String),
    /// The delegate returned a value outside its contract.
    InvalidResult(String),
}

impl fmt::Display for DelegateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelegateError::Unbound => write!(f, "Decoder delegate is not bound"),
            DelegateError::Bootstrap(msg) => write!(f, "Bootstrap error: {}", msg),
            DelegateError::Execution(msg) => write!(f, "Execution error: {}", msg),
            DelegateError::InvalidResult(msg) => {
                write!(f, "Invalid delegate result: {}", msg)
            }
        }
    }
}

impl std::error::Error for DelegateError {}

/// Strategy interface for user-supplied message decoders.
///
/// Implementations must be `Send + Sync`; the adapter serializes all calls
/// through a single lock, but the handle itself is shared across threads.
///
/// # Contract
///
/// * `load_config` - receives a config file path chosen by the host; what is
///   done with it is entirely up to the delegate.
/// * `matches` - decides whether this delegate can decode the message.
/// * `decode` - produces the decoded text, or `None` to decline the message.
pub trait DecoderDelegate: Send + Sync {
    /// Forward a configuration file path to the delegate.
    fn load_config(&self, path: &str) -> Result<(), DelegateError>;

    /// Check whether the delegate wants to decode this message.
    fn matches(&self, record: &FieldRecord) -> Result<bool, DelegateError>;

    /// Decode the message, returning the replacement text or `None` if the
    /// delegate declines.
    fn decode(&self, record: &FieldRecord) -> Result<Option<String>, DelegateError>;
}
