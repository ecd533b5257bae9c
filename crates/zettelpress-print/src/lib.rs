// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// zettelpress-print — Printer discovery and spool dispatch.
//
// The OS printing subsystems expose differently-shaped data across platforms
// and drivers, so discovery is built as a chain of progressively less-capable
// query mechanisms: a native spooler API where the platform has one, then a
// sequence of shell commands. Every mechanism's failure is absorbed and
// logged; the discovery service as a whole never fails.

pub mod discovery;
pub mod dispatch;
pub mod native;
pub mod platform;
pub mod resolve;
pub mod shell;

pub use discovery::DiscoveryService;
pub use dispatch::{DispatchOptions, dispatch_pdf};
pub use native::{NativePrinterApi, platform_native};
pub use resolve::resolve_printer_name;
pub use shell::{ShellOutput, ShellRunner, SystemShell};
