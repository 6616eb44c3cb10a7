//! Host plugin interface and the script-backed decoder adapter.
//!
//! The traits in this module mirror the host viewer's plugin contract: a
//! base interface for identification and configuration, and a decoder
//! interface with the two message hooks (`is_msg`, `decode_msg`).
//! [`ScriptDecoderPlugin`] implements both over a boxed
//! [`DecoderDelegate`], serializing every delegate call through a single
//! lock so user code never runs concurrently.

use std::path::Path;
use std::sync::Mutex;

use crate::delegate::{DecoderDelegate, DelegateError};
use crate::message::{DltArgument, DltMessage, MessageMode};
use crate::record::FieldRecord;

/// Version of the host plugin-interface contract this plugin targets.
pub const PLUGIN_INTERFACE_VERSION: &str = "1.0.0";

/// Base plugin interface: identification and configuration hooks.
pub trait DltPlugin {
    /// Human-readable plugin name.
    fn name(&self) -> String;

    /// Version of the plugin itself.
    fn plugin_version(&self) -> String;

    /// Version of the plugin-interface contract.
    fn plugin_interface_version(&self) -> String;

    /// Optional plugin description shown by the host.
    fn description(&self) -> String;

    /// Last error text, or empty if none.
    fn error(&self) -> String;

    /// Load a configuration file. Returns `true` on success.
    fn load_config(&self, path: &Path) -> bool;

    /// Save a configuration file. Returns `true` on success.
    fn save_config(&self, path: &Path) -> bool;

    /// Lines describing the loaded configuration.
    fn info_config(&self) -> Vec<String>;
}

/// Decoder plugin interface: the per-message hooks.
pub trait DltDecoderPlugin: DltPlugin {
    /// Decide whether this plugin can decode the message.
    fn is_msg(&self, msg: &DltMessage, triggered_by_user: bool) -> bool;

    /// Decode the message in place. Returns `true` if the message was
    /// decoded and its argument list rewritten.
    fn decode_msg(&self, msg: &mut DltMessage, triggered_by_user: bool) -> bool;
}

/// Decoder plugin adapter delegating to a user-supplied script.
///
/// The adapter owns at most one delegate, bound once at construction and
/// never replaced. When construction could not bind a delegate the adapter
/// stays in an explicit unavailable state: [`is_available`] reports it, and
/// every message hook returns its safe default (`false`) instead of
/// faulting.
///
/// [`is_available`]: ScriptDecoderPlugin::is_available
pub struct ScriptDecoderPlugin {
    delegate: Option<Box<dyn DecoderDelegate>>,
    /// Serializes all calls into the delegate. Held for the full duration of
    /// each call, released on every exit path.
    call_lock: Mutex<()>,
}

impl ScriptDecoderPlugin {
    /// Create an adapter over the given delegate.
    pub fn new(delegate: Box<dyn DecoderDelegate>) -> Self {
        Self {
            delegate: Some(delegate),
            call_lock: Mutex::new(()),
        }
    }

    /// Create an adapter with no delegate bound.
    ///
    /// All message hooks on an unavailable adapter return `false`.
    pub fn unavailable() -> Self {
        Self {
            delegate: None,
            call_lock: Mutex::new(()),
        }
    }

    /// Construct from the user's bootstrap script at the fixed config path
    /// (`~/.config/pydltdecoder.py`).
    ///
    /// Bootstrap failure is logged and yields an unavailable adapter rather
    /// than an error; the host keeps running either way.
    #[cfg(feature = "python-bridge")]
    pub fn from_user_config() -> Self {
        match crate::python_bridge::PythonDelegate::from_default_config() {
            Ok(delegate) => Self::new(Box::new(delegate)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to bootstrap decoder delegate");
                Self::unavailable()
            }
        }
    }

    /// Whether a delegate was successfully bound at construction.
    pub fn is_available(&self) -> bool {
        self.delegate.is_some()
    }

    /// Run a closure against the delegate under the call lock.
    fn call_delegate<T>(
        &self,
        f: impl FnOnce(&dyn DecoderDelegate) -> Result<T, DelegateError>,
    ) -> Result<T, DelegateError> {
        let _guard = self.call_lock.lock().unwrap();
        let delegate = self.delegate.as_deref().ok_or(DelegateError::Unbound)?;
        f(delegate)
    }
}

impl DltPlugin for ScriptDecoderPlugin {
    fn name(&self) -> String {
        "Python Decoder Plugin".to_string()
    }

    fn plugin_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn plugin_interface_version(&self) -> String {
        PLUGIN_INTERFACE_VERSION.to_string()
    }

    fn description(&self) -> String {
        String::new()
    }

    fn error(&self) -> String {
        String::new()
    }

    /// Forwards the path to the delegate's `load_config`.
    ///
    /// Always reports success: the host treats config loading as advisory
    /// here, and what the delegate does with the path is its own business.
    /// Delegate failures are logged, not surfaced.
    fn load_config(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        if let Err(e) = self.call_delegate(|d| d.load_config(&path_str)) {
            tracing::error!(error = %e, path = %path.display(), "load_config failed");
        }
        true
    }

    /// Config is one-way (load only); saving is a no-op.
    fn save_config(&self, _path: &Path) -> bool {
        true
    }

    fn info_config(&self) -> Vec<String> {
        Vec::new()
    }
}

impl DltDecoderPlugin for ScriptDecoderPlugin {
    fn is_msg(&self, msg: &DltMessage, _triggered_by_user: bool) -> bool {
        // Cheap pre-filter: only verbose messages with arguments can be
        // decoded, and rejecting them here avoids a delegate round-trip.
        if msg.mode() != MessageMode::Verbose || msg.argument_count() == 0 {
            return false;
        }

        let record = FieldRecord::from(msg);
        match self.call_delegate(|d| d.matches(&record)) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, app = msg.apid(), ctx = msg.ctid(), "check_message failed");
                false
            }
        }
    }

    /// Decode the message in place.
    ///
    /// On success the argument list is replaced with exactly one
    /// string-typed argument carrying the decoded text, the original
    /// message's endianness, and payload offset zero. On any failure the
    /// hook returns `false`; callers must not assume the argument list was
    /// preserved on failure paths.
    fn decode_msg(&self, msg: &mut DltMessage, _triggered_by_user: bool) -> bool {
        let record = FieldRecord::from(&*msg);
        let text = match self.call_delegate(|d| d.decode(&record)) {
            Ok(Some(text)) => text,
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    record = %record.to_json().unwrap_or_default(),
                    "decode_message failed"
                );
                return false;
            }
        };

        let endianness = msg.endianness();
        msg.clear_arguments();
        msg.add_argument(DltArgument::string(endianness, &text));
        tracing::debug!(app = msg.apid(), ctx = msg.ctid(), "Message decoded");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Endianness, TypeInfo};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockDelegate {
        matches_result: Result<bool, DelegateError>,
        decode_result: Result<Option<String>, DelegateError>,
        calls: AtomicUsize,
    }

    impl MockDelegate {
        fn new(
            matches_result: Result<bool, DelegateError>,
            decode_result: Result<Option<String>, DelegateError>,
        ) -> Self {
            Self {
                matches_result,
                decode_result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DecoderDelegate for MockDelegate {
        fn load_config(&self, _path: &str) -> Result<(), DelegateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn matches(&self, _record: &FieldRecord) -> Result<bool, DelegateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.matches_result.clone()
        }

        fn decode(&self, _record: &FieldRecord) -> Result<Option<String>, DelegateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.decode_result.clone()
        }
    }

    fn verbose_message_with_args() -> DltMessage {
        let mut msg = DltMessage::new(
            "APP1",
            "CTX1",
            42,
            MessageMode::Verbose,
            Endianness::Big,
            vec![0x41, 0x42],
        );
        msg.add_argument(DltArgument::string(Endianness::Big, "raw"));
        msg
    }

    #[test]
    fn test_is_msg_rejects_non_verbose_without_delegate_call() {
        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Ok(true),
            Ok(None),
        )));
        let mut msg = DltMessage::new(
            "APP1",
            "CTX1",
            42,
            MessageMode::NonVerbose,
            Endianness::Little,
            vec![0x01],
        );
        msg.add_argument(DltArgument::string(Endianness::Little, "x"));

        assert!(!plugin.is_msg(&msg, false));
    }

    #[test]
    fn test_is_msg_rejects_zero_arguments_without_delegate_call() {
        let delegate = Box::new(MockDelegate::new(Ok(true), Ok(None)));
        let plugin = ScriptDecoderPlugin::new(delegate);
        let msg = DltMessage::new(
            "APP1",
            "CTX1",
            42,
            MessageMode::Verbose,
            Endianness::Little,
            vec![0x01],
        );

        assert!(!plugin.is_msg(&msg, false));
    }

    #[test]
    fn test_is_msg_passes_through_predicate_result() {
        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Ok(true),
            Ok(None),
        )));
        assert!(plugin.is_msg(&verbose_message_with_args(), false));

        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Ok(false),
            Ok(None),
        )));
        assert!(!plugin.is_msg(&verbose_message_with_args(), false));
    }

    #[test]
    fn test_is_msg_maps_delegate_error_to_false() {
        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Err(DelegateError::Execution("boom".to_string())),
            Ok(None),
        )));
        assert!(!plugin.is_msg(&verbose_message_with_args(), false));
    }

    #[test]
    fn test_decode_msg_replaces_arguments_on_success() {
        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Ok(true),
            Ok(Some("decoded text".to_string())),
        )));
        let mut msg = verbose_message_with_args();
        msg.add_argument(DltArgument::string(Endianness::Big, "second"));

        assert!(plugin.decode_msg(&mut msg, false));
        assert_eq!(msg.argument_count(), 1);

        let arg = &msg.arguments()[0];
        assert_eq!(arg.type_info, TypeInfo::String);
        assert_eq!(arg.endianness, Endianness::Big);
        assert_eq!(arg.payload_offset, 0);
        assert_eq!(arg.as_text(), Some("decoded text"));
    }

    #[test]
    fn test_decode_msg_declined_leaves_arguments_alone() {
        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Ok(true),
            Ok(None),
        )));
        let mut msg = verbose_message_with_args();

        assert!(!plugin.decode_msg(&mut msg, false));
        assert_eq!(msg.argument_count(), 1);
        assert_eq!(msg.arguments()[0].as_text(), Some("raw"));
    }

    #[test]
    fn test_decode_msg_maps_delegate_error_to_false() {
        let plugin = ScriptDecoderPlugin::new(Box::new(MockDelegate::new(
            Ok(true),
            Err(DelegateError::Execution("boom".to_string())),
        )));
        let mut msg = verbose_message_with_args();
        assert!(!plugin.decode_msg(&mut msg, false));
    }

    #[test]
    fn test_unavailable_adapter_safe_defaults() {
        let plugin = ScriptDecoderPlugin::unavailable();
        assert!(!plugin.is_available());

        let mut msg = verbose_message_with_args();
        assert!(!plugin.is_msg(&msg, false));
        assert!(!plugin.decode_msg(&mut msg, false));
        // load_config still reports success by contract.
        assert!(plugin.load_config(Path::new("/tmp/whatever.cfg")));
    }

    #[test]
    fn test_load_config_forwards_and_reports_success() {
        let delegate = Box::new(MockDelegate::new(Ok(true), Ok(None)));
        let plugin = ScriptDecoderPlugin::new(delegate);
        assert!(plugin.load_config(Path::new("/tmp/decoder.cfg")));
    }

    #[test]
    fn test_save_config_is_noop_success() {
        let plugin = ScriptDecoderPlugin::unavailable();
        assert!(plugin.save_config(Path::new("/tmp/decoder.cfg")));
    }

    #[test]
    fn test_metadata_accessors() {
        let plugin = ScriptDecoderPlugin::unavailable();
        assert_eq!(plugin.name(), "Python Decoder Plugin");
        assert_eq!(plugin.plugin_interface_version(), PLUGIN_INTERFACE_VERSION);
        assert!(plugin.description().is_empty());
        assert!(plugin.error().is_empty());
        assert!(plugin.info_config().is_empty());
        assert!(!plugin.plugin_version().is_empty());
    }
}
