// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Zettelpress.

use thiserror::Error;

/// Top-level error type for all Zettelpress operations.
#[derive(Debug, Error)]
pub enum ZettelpressError {
    // -- Shell / spool errors --
    #[error("shell command `{command}` failed: {detail}")]
    Process { command: String, detail: String },

    #[error("print dispatch failed: {0}")]
    Dispatch(String),

    #[error("native printer capability error: {0}")]
    Native(String),

    // -- Document errors --
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Request validation --
    #[error("invalid ticket request: {0}")]
    InvalidTicket(String),

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ZettelpressError>;
