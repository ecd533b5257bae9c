// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optional native printer capability.
//
// A platform API, when one exists, is preferred over shelling out: it is
// faster and returns structured descriptors. Absence of the capability is a
// routing condition for the discovery chains, not an error.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use zettelpress_core::error::Result;

/// Platform printer API surfaced to the discovery chains.
///
/// Descriptors are returned raw (as [`Value`]); normalization happens in
/// [`crate::resolve`]. Either method may fail — the chains fall back to
/// shell queries.
#[async_trait]
pub trait NativePrinterApi: Send + Sync {
    async fn list_printers(&self) -> Result<Vec<Value>>;
    async fn default_printer(&self) -> Result<Option<Value>>;
}

/// The native capability for this platform, when one exists.
pub fn platform_native() -> Option<Arc<dyn NativePrinterApi>> {
    #[cfg(windows)]
    {
        Some(Arc::new(windows::SpoolerApi))
    }
    #[cfg(not(windows))]
    {
        None
    }
}

#[cfg(windows)]
mod windows {
    use super::*;
    use zettelpress_core::error::ZettelpressError;

    /// Win32 spooler enumeration via the `winprint` crate.
    pub struct SpoolerApi;

    #[async_trait]
    impl NativePrinterApi for SpoolerApi {
        async fn list_printers(&self) -> Result<Vec<Value>> {
            // Enumeration is synchronous against the local spooler and
            // cheap enough to run inline on the worker thread.
            let devices = winprint::printer::PrinterDevice::all()
                .map_err(|e| ZettelpressError::Native(format!("spooler enumeration: {e:?}")))?;
            Ok(devices
                .into_iter()
                .map(|device| serde_json::json!({ "Name": device.name() }))
                .collect())
        }

        async fn default_printer(&self) -> Result<Option<Value>> {
            // The spooler enumeration exposes no default flag; the shell
            // chain answers this one.
            Ok(None)
        }
    }
}
