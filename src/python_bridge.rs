//! Python bridge binding the decoder delegate to user-supplied Python code.
//!
//! This module is only available when the `python-bridge` feature is enabled.
//!
//! # Feature Gate
//!
//! ```toml
//! [dependencies]
//! pydlt-decoder = { version = "0.1", features = ["python-bridge"] }
//! ```
//!
//! # Delegate contract
//!
//! The bootstrap script must leave a module-level `decoder` object behind,
//! exposing:
//!
//! ```python
//! class Decoder:
//!     def load_config(self, path): ...
//!     def check_message(self, msg): ...   # -> bool
//!     def decode_message(self, msg): ...  # -> (bool, str)
//! decoder = Decoder()
//! ```
//!
//! `msg` is a dict with exactly the keys `app` (str), `ctx` (str),
//! `ts` (int) and `pl` (bytes).

use std::fs;
use std::path::Path;

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict, PyModule, PyTuple};

use crate::delegate::{DecoderDelegate, DelegateError};
use crate::record::FieldRecord;

/// Location of the bootstrap script, relative to the user's home directory.
pub const BOOTSTRAP_CONFIG_PATH: &str = ".config/pydltdecoder.py";

/// Decoder delegate backed by a Python object.
///
/// Holds one long-lived handle to the `decoder` object bound at bootstrap.
/// Every call takes the interpreter's execution lock via
/// `Python::with_gil`, which releases it on every exit path including
/// panics. The handle is write-once; the script is never reloaded.
pub struct PythonDelegate {
    delegate: Py<PyAny>,
}

impl PythonDelegate {
    /// Bootstrap from the fixed user config path
    /// (`~/.config/pydltdecoder.py`).
    pub fn from_default_config() -> Result<Self, DelegateError> {
        let home = dirs::home_dir()
            .ok_or_else(|| DelegateError::Bootstrap("Home directory not found".to_string()))?;
        Self::from_script(&home.join(BOOTSTRAP_CONFIG_PATH))
    }

    /// Bootstrap from an explicit script path.
    ///
    /// Initializes the embedded interpreter (idempotent, process-wide),
    /// executes the script in a fresh module namespace, and binds the
    /// module-level `decoder` object.
    ///
    /// # Errors
    ///
    /// `DelegateError::Bootstrap` if the script cannot be read, raises
    /// during execution, or does not define `decoder`.
    pub fn from_script(path: &Path) -> Result<Self, DelegateError> {
        let code = fs::read_to_string(path).map_err(|e| {
            DelegateError::Bootstrap(format!(
                "Failed to read bootstrap script {}: {}",
                path.display(),
                e
            ))
        })?;

        pyo3::prepare_freethreaded_python();

        Python::with_gil(|py| {
            let module = PyModule::new(py, "pydltdecoder_bootstrap").map_err(|e| {
                DelegateError::Bootstrap(format!("Failed to create bootstrap module: {}", e))
            })?;

            py.run(&code, Some(module.dict()), None).map_err(|e| {
                DelegateError::Bootstrap(format!(
                    "Bootstrap script {} raised: {}",
                    path.display(),
                    e
                ))
            })?;

            let delegate = module.getattr("decoder").map_err(|_| {
                DelegateError::Bootstrap(format!(
                    "Bootstrap script {} did not define 'decoder'",
                    path.display()
                ))
            })?;

            tracing::info!(script = %path.display(), "Decoder delegate bound");
            Ok(Self {
                delegate: delegate.into_py(py),
            })
        })
    }
}

impl DecoderDelegate for PythonDelegate {
    fn load_config(&self, path: &str) -> Result<(), DelegateError> {
        Python::with_gil(|py| {
            self.delegate
                .as_ref(py)
                .call_method1("load_config", (path,))
                .map_err(|e| DelegateError::Execution(format!("load_config raised: {}", e)))?;
            Ok(())
        })
    }

    fn matches(&self, record: &FieldRecord) -> Result<bool, DelegateError> {
        Python::with_gil(|py| {
            let msg = record_to_dict(py, record)?;
            let result = self
                .delegate
                .as_ref(py)
                .call_method1("check_message", (msg,))
                .map_err(|e| DelegateError::Execution(format!("check_message raised: {}", e)))?;

            result.extract::<bool>().map_err(|e| {
                DelegateError::InvalidResult(format!("check_message did not return a bool: {}", e))
            })
        })
    }

    fn decode(&self, record: &FieldRecord) -> Result<Option<String>, DelegateError> {
        Python::with_gil(|py| {
            let msg = record_to_dict(py, record)?;
            let result = self
                .delegate
                .as_ref(py)
                .call_method1("decode_message", (msg,))
                .map_err(|e| DelegateError::Execution(format!("decode_message raised: {}", e)))?;

            // The wire contract is a (bool, str) pair; the bool folds into
            // the Option on the Rust side.
            let pair = result.downcast::<PyTuple>().map_err(|_| {
                DelegateError::InvalidResult(
                    "decode_message must return a (bool, str) tuple".to_string(),
                )
            })?;
            if pair.len() != 2 {
                return Err(DelegateError::InvalidResult(format!(
                    "decode_message returned a {}-tuple, expected 2",
                    pair.len()
                )));
            }

            let success = pair
                .get_item(0)
                .and_then(|v| v.extract::<bool>())
                .map_err(|e| {
                    DelegateError::InvalidResult(format!(
                        "decode_message success flag is not a bool: {}",
                        e
                    ))
                })?;
            if !success {
                return Ok(None);
            }

            let text = pair
                .get_item(1)
                .and_then(|v| v.extract::<String>())
                .map_err(|e| {
                    DelegateError::InvalidResult(format!(
                        "decode_message text is not a string: {}",
                        e
                    ))
                })?;
            Ok(Some(text))
        })
    }
}

/// Convert a field record to the Python dict handed to the delegate.
///
/// The payload is copied into a fresh `bytes` object; the dict never
/// references the record's storage.
fn record_to_dict<'py>(
    py: Python<'py>,
    record: &FieldRecord,
) -> Result<&'py PyDict, DelegateError> {
    let dict = PyDict::new(py);
    let fill = || -> PyResult<()> {
        dict.set_item("app", &record.app)?;
        dict.set_item("ctx", &record.ctx)?;
        dict.set_item("ts", record.ts)?;
        dict.set_item("pl", PyBytes::new(py, &record.pl))?;
        Ok(())
    };
    fill().map_err(|e| DelegateError::Execution(format!("Failed to build message dict: {}", e)))?;
    Ok(dict)
}
