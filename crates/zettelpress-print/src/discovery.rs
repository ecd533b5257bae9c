// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-effort printer discovery.
//
// Two strategy chains — one for enumerating installed printers, one for the
// OS default — try a native capability first and then progressively older
// shell queries, stopping at the first mechanism that yields anything.
// Later strategies only run after earlier ones are confirmed unproductive,
// so a healthy system spawns no subprocesses at all when the native API
// answers. Every strategy failure is logged and swallowed; the service
// returns a valid (possibly empty) inventory in all cases.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use zettelpress_core::AppConfig;
use zettelpress_core::types::PrinterInventory;
use zettelpress_core::error::Result;

use crate::native::{NativePrinterApi, platform_native};
use crate::platform;
use crate::resolve::resolve_printer_name;
use crate::shell::{ShellRunner, SystemShell};

/// Mechanisms for listing installed printers, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListStrategy {
    /// Platform spooler API, when present in this runtime.
    Native,
    /// Modern per-platform listing command.
    ShellPrimary,
    /// Broader device/management query.
    ShellManagement,
    /// Deprecated tabular query with a `Name` header line.
    ShellLegacy,
}

const LIST_CHAIN: &[ListStrategy] = &[
    ListStrategy::Native,
    ListStrategy::ShellPrimary,
    ListStrategy::ShellManagement,
    ListStrategy::ShellLegacy,
];

/// Mechanisms for finding the OS default printer, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultStrategy {
    Native,
    /// Shell query filtering installed printers by the is-default flag.
    ShellFlagFilter,
    /// Legacy two-column name/default table (Windows only).
    ShellTable,
}

const DEFAULT_CHAIN: &[DefaultStrategy] = &[
    DefaultStrategy::Native,
    DefaultStrategy::ShellFlagFilter,
    DefaultStrategy::ShellTable,
];

/// Live printer lookup against the operating system.
///
/// Holds no cross-request state; every [`discover`](Self::discover) call is
/// an independent snapshot.
pub struct DiscoveryService {
    shell: Arc<dyn ShellRunner>,
    native: Option<Arc<dyn NativePrinterApi>>,
}

impl DiscoveryService {
    pub fn new(shell: Arc<dyn ShellRunner>, native: Option<Arc<dyn NativePrinterApi>>) -> Self {
        Self { shell, native }
    }

    /// Service wired to the real shell and this platform's native
    /// capability (if any).
    pub fn with_platform_defaults(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(SystemShell::new(config.hide_shell_windows)),
            platform_native(),
        )
    }

    /// Snapshot the printers the OS knows about right now.
    ///
    /// Total by construction: both chains absorb and log their strategies'
    /// failures, and resolution of a malformed descriptor is absence, not
    /// an error. An empty inventory therefore means "nothing could be
    /// learned", not "no printers installed".
    pub async fn discover(&self) -> PrinterInventory {
        let raw_printers = self.list_printers().await;
        let raw_default = self.default_printer().await;

        let printers: Vec<String> = raw_printers
            .iter()
            .filter_map(resolve_printer_name)
            .collect();
        let default_printer = raw_default.as_ref().and_then(resolve_printer_name);

        debug!(
            printers = printers.len(),
            default = default_printer.as_deref().unwrap_or("<none>"),
            "discovery snapshot complete"
        );

        PrinterInventory {
            printers,
            default_printer,
        }
    }

    /// Raw, unresolved descriptors from the first productive list strategy.
    pub async fn list_printers(&self) -> Vec<Value> {
        for strategy in LIST_CHAIN {
            match self.attempt_list(*strategy).await {
                Ok(descriptors) if !descriptors.is_empty() => {
                    debug!(?strategy, count = descriptors.len(), "printer listing succeeded");
                    return descriptors;
                }
                Ok(_) => debug!(?strategy, "strategy yielded nothing, trying next"),
                Err(e) => warn!(?strategy, error = %e, "listing strategy failed, trying next"),
            }
        }
        Vec::new()
    }

    /// Raw descriptor of the default printer from the first productive
    /// strategy.
    pub async fn default_printer(&self) -> Option<Value> {
        for strategy in DEFAULT_CHAIN {
            match self.attempt_default(*strategy).await {
                Ok(Some(descriptor)) => {
                    debug!(?strategy, "default-printer lookup succeeded");
                    return Some(descriptor);
                }
                Ok(None) => debug!(?strategy, "strategy yielded nothing, trying next"),
                Err(e) => warn!(?strategy, error = %e, "default-printer strategy failed, trying next"),
            }
        }
        None
    }

    async fn attempt_list(&self, strategy: ListStrategy) -> Result<Vec<Value>> {
        match strategy {
            ListStrategy::Native => match &self.native {
                Some(native) => native.list_printers().await,
                // Capability absent: route to the shell strategies.
                None => Ok(Vec::new()),
            },
            ListStrategy::ShellPrimary => self.run_name_query(platform::LIST_PRIMARY).await,
            ListStrategy::ShellManagement => self.run_name_query(platform::LIST_MANAGEMENT).await,
            ListStrategy::ShellLegacy => {
                let output = self.shell.run(platform::LIST_LEGACY).await?;
                Ok(to_descriptors(platform::parse_legacy_name_table(
                    &output.stdout,
                )))
            }
        }
    }

    async fn attempt_default(&self, strategy: DefaultStrategy) -> Result<Option<Value>> {
        match strategy {
            DefaultStrategy::Native => match &self.native {
                Some(native) => native.default_printer().await,
                None => Ok(None),
            },
            DefaultStrategy::ShellFlagFilter => {
                let output = self.shell.run(platform::DEFAULT_FILTER).await?;
                let name = output.stdout.trim();
                Ok((!name.is_empty()).then(|| Value::String(name.to_string())))
            }
            DefaultStrategy::ShellTable => match platform::DEFAULT_TABLE {
                Some(command) => {
                    let output = self.shell.run(command).await?;
                    Ok(platform::parse_default_flag_table(&output.stdout).map(Value::String))
                }
                None => Ok(None),
            },
        }
    }

    async fn run_name_query(&self, command: &str) -> Result<Vec<Value>> {
        let output = self.shell.run(command).await?;
        Ok(to_descriptors(platform::parse_name_lines(&output.stdout)))
    }
}

fn to_descriptors(names: Vec<String>) -> Vec<Value> {
    names.into_iter().map(Value::String).collect()
}
