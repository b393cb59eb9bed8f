//! Generator configuration.

use crate::error::{GenerateError, Result};
use crate::imports::RuntimePaths;

/// Options for Go code generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoCodegenOptions {
    /// Prepended to every runtime import path.
    pub import_prefix: String,

    /// Import paths of the `context`, `client`, `server` and `common`
    /// packages the generated code calls into.
    pub runtime: RuntimePaths,
}

impl GoCodegenOptions {
    /// Parse a protoc plugin parameter: comma-separated `key=value` pairs.
    ///
    /// Recognised keys are `import_prefix`, `client_pkg`, `server_pkg` and
    /// `common_pkg`. Blank entries are ignored.
    pub fn parse(parameter: &str) -> Result<Self> {
        let mut options = Self::default();

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                return Err(GenerateError::InvalidOption {
                    option: part.to_string(),
                    reason: "expected key=value".into(),
                });
            };
            let value = value.trim().to_string();
            match key.trim() {
                "import_prefix" => options.import_prefix = value,
                "client_pkg" => options.runtime.client = value,
                "server_pkg" => options.runtime.server = value,
                "common_pkg" => options.runtime.common = value,
                other => {
                    return Err(GenerateError::InvalidOption {
                        option: other.to_string(),
                        reason: "unknown key".into(),
                    });
                }
            }
        }

        Ok(options)
    }

    /// Runtime import paths with the prefix applied.
    pub fn runtime_paths(&self) -> RuntimePaths {
        self.runtime.with_prefix(&self.import_prefix)
    }
}
