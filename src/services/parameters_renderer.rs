use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::models::connection_parameters::ConnectionParameters;
use crate::utils::error::{BootstrapError, Result};

/// Name of the mapping the test suite imports
pub const MAPPING_NAME: &str = "CONNECTION_PARAMETERS";

/// Renders connection parameters as a Python module
#[derive(Debug, Clone, Default)]
pub struct ParametersRenderer;

impl ParametersRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the module text. Output depends only on the record.
    pub fn render(&self, params: &ConnectionParameters) -> String {
        let mut out = String::new();
        out.push_str("#!/usr/bin/env python\n");
        out.push_str("# -*- coding: utf-8 -*-\n");
        out.push_str("# Generated by ci-bootstrap. Do not edit.\n");
        out.push_str(MAPPING_NAME);
        out.push_str(" = {\n");
        for (key, value) in params.entries() {
            out.push_str(&format!("    '{}': {},\n", key, python_literal(value)));
        }
        out.push_str("}\n");
        out
    }

    /// Write the module to `path`, replacing whatever is there.
    ///
    /// The file holds the account password, so it is written owner-only
    /// (mode 0600 on Unix) whatever the mode of the file it replaces.
    pub fn write(&self, params: &ConnectionParameters, path: &Path) -> Result<PathBuf> {
        let missing = params.missing_variables();
        if !missing.is_empty() {
            warn!(variables = %missing.join(", "), "rendering empty connection parameters");
        }

        let contents = self.render(params);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let render_error = |source: std::io::Error| BootstrapError::RenderError {
            path: path.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(render_error)?;

        let mut file = NamedTempFile::new_in(&dir).map_err(render_error)?;
        file.write_all(contents.as_bytes()).map_err(render_error)?;
        file.flush().map_err(render_error)?;
        file.persist(path).map_err(|e| render_error(e.error))?;

        info!(path = %path.display(), "rendered connection parameters");
        Ok(path.to_path_buf())
    }
}

/// Quote a value as a single-quoted Python string literal
pub fn python_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
