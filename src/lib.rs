//! # Pydlt-Decoder: Script-Driven DLT Decoder Plugin
//!
//! Pydlt-decoder is a decoder plugin for DLT (Diagnostic Log and Trace) log
//! viewers that delegates message classification and decoding to a
//! user-supplied Python script. The crate itself is a thin adapter: it
//! marshals a structured log message into a generic field record, invokes
//! the user's callbacks, and writes the decoded text back into the
//! message's argument list.
//!
//! ## Features
//!
//! - **Host plugin contract**: [`DltPlugin`] / [`DltDecoderPlugin`] traits
//!   mirroring the viewer's plugin interface
//! - **Strategy seam**: any [`DecoderDelegate`] implementation can back the
//!   adapter; the Python binding is one such implementation
//! - **Python bridge**: optional PyO3 integration binding the delegate to a
//!   user script at `~/.config/pydltdecoder.py` (feature: `python-bridge`)
//! - **Fail-safe boundary**: delegate errors are logged and mapped to "no
//!   match" / "no decode"; one bad message never disrupts the host stream
//!
//! ## Example: user script
//!
//! ```python
//! class HexDecoder:
//!     def load_config(self, path):
//!         pass
//!
//!     def check_message(self, msg):
//!         return msg["app"] == "APP1"
//!
//!     def decode_message(self, msg):
//!         return True, msg["pl"].hex()
//!
//! decoder = HexDecoder()
//! ```
//!
//! ## Example: embedding the adapter
//!
//! ```ignore
//! use pydlt_decoder::{DltDecoderPlugin, ScriptDecoderPlugin};
//!
//! let plugin = ScriptDecoderPlugin::from_user_config();
//! if plugin.is_msg(&msg, false) {
//!     plugin.decode_msg(&mut msg, false);
//! }
//! ```

// Core modules
pub mod delegate;
pub mod message;
pub mod plugin;
pub mod record;

// Optional Python bridge (feature-gated)
#[cfg(feature = "python-bridge")]
pub mod python_bridge;

// Re-export key types
pub use delegate::{DecoderDelegate, DelegateError};
pub use message::{DltArgument, DltMessage, Endianness, MessageMode, TypeInfo};
pub use plugin::{DltDecoderPlugin, DltPlugin, ScriptDecoderPlugin, PLUGIN_INTERFACE_VERSION};
pub use record::FieldRecord;

#[cfg(feature = "python-bridge")]
pub use python_bridge::{PythonDelegate, BOOTSTRAP_CONFIG_PATH};
