//! Generic field record handed to the decoder delegate.
//!
//! A [`FieldRecord`] is the delegate-facing view of a log message: a fixed
//! set of four fields, built fresh for every call and discarded afterwards.
//! The payload bytes are copied into the record rather than borrowed, so the
//! record never outlives or aliases the host's message storage.

use serde::Serialize;

use crate::message::DltMessage;

/// The key/value view of a log message passed to the delegate.
///
/// Wire shape is exactly four keys: `app` (string), `ctx` (string),
/// `ts` (integer), `pl` (byte sequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    pub app: String,
    pub ctx: String,
    pub ts: u32,
    pub pl: Vec<u8>,
}

impl FieldRecord {
    /// Render the record as a JSON string, mainly for diagnostics.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&DltMessage> for FieldRecord {
    /// Pure, total conversion: copies the four consumed message fields.
    fn from(msg: &DltMessage) -> Self {
        Self {
            app: msg.apid().to_string(),
            ctx: msg.ctid().to_string(),
            ts: msg.timestamp(),
            pl: msg.payload().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Endianness, MessageMode};

    fn make_message() -> DltMessage {
        DltMessage::new(
            "APP1",
            "CTX1",
            42,
            MessageMode::Verbose,
            Endianness::Little,
            vec![0x41, 0x42],
        )
    }

    #[test]
    fn test_conversion_copies_all_fields() {
        let msg = make_message();
        let record = FieldRecord::from(&msg);

        assert_eq!(record.app, "APP1");
        assert_eq!(record.ctx, "CTX1");
        assert_eq!(record.ts, 42);
        assert_eq!(record.pl, vec![0x41, 0x42]);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let msg = make_message();
        let first = FieldRecord::from(&msg);
        let second = FieldRecord::from(&msg);
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_is_copied_not_shared() {
        let msg = make_message();
        let mut record = FieldRecord::from(&msg);
        record.pl.push(0xFF);
        assert_eq!(msg.payload(), &[0x41, 0x42]);
    }

    #[test]
    fn test_to_json_shape() {
        let msg = make_message();
        let record = FieldRecord::from(&msg);
        let json: serde_json::Value =
            serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert_eq!(json["app"], "APP1");
        assert_eq!(json["ctx"], "CTX1");
        assert_eq!(json["ts"], 42);
        assert_eq!(json["pl"], serde_json::json!([0x41, 0x42]));
    }
}
