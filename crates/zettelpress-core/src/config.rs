// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the HTTP server listens on.
    pub http_port: u16,
    /// Suppress console windows for shell commands on Windows
    /// (CREATE_NO_WINDOW). Ignored on other platforms.
    pub hide_shell_windows: bool,
    /// Executable used to hand PDFs to the Windows spool. Must accept
    /// SumatraPDF-style `-print-to` / `-print-to-default` flags.
    pub print_helper: String,
    /// Maximum accepted multipart upload size in bytes.
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: 3000,
            hide_shell_windows: true,
            print_helper: "SumatraPDF.exe".into(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Default configuration with environment overrides applied.
    ///
    /// Recognised variables: `ZETTELPRESS_PORT`, `ZETTELPRESS_PRINT_HELPER`.
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("ZETTELPRESS_PORT") {
            if let Ok(port) = port.parse() {
                config.http_port = port;
            }
        }
        if let Ok(helper) = std::env::var("ZETTELPRESS_PRINT_HELPER") {
            if !helper.trim().is_empty() {
                config.print_helper = helper;
            }
        }
        config
    }
}
