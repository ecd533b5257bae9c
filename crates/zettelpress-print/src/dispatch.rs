// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spool dispatch — hand a rendered PDF to the operating system print queue.
//
// Unix spools through CUPS `lp`; Windows has no scriptable PDF-to-printer
// verb, so dispatch goes through a SumatraPDF-compatible helper executable
// (`-print-to` / `-print-to-default`), configurable in `AppConfig`.

use std::path::Path;

use tracing::info;

use zettelpress_core::AppConfig;
use zettelpress_core::error::{Result, ZettelpressError};

use crate::shell::ShellRunner;

/// Options for a single spool submission.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Print queue to submit to. `None` means the OS default printer.
    pub printer: Option<String>,
}

/// Submit the PDF at `path` to the OS print spool.
///
/// Fails with the spool's own error when the named printer is unknown to
/// the OS. The subprocess is awaited to completion, like every other shell
/// invocation in this crate.
pub async fn dispatch_pdf(
    shell: &dyn ShellRunner,
    path: &Path,
    options: &DispatchOptions,
    config: &AppConfig,
) -> Result<()> {
    if let Some(printer) = &options.printer {
        // Printer names are caller-supplied and end up inside a shell
        // command line; refuse anything that could break out of quoting.
        if printer.chars().any(|c| c == '\'' || c == '"' || c.is_control()) {
            return Err(ZettelpressError::Dispatch(format!(
                "printer name contains quoting or control characters: {printer:?}"
            )));
        }
    }

    let command = spool_command(path, options, config);
    shell.run(&command).await?;
    info!(
        path = %path.display(),
        printer = options.printer.as_deref().unwrap_or("<default>"),
        "ticket handed to spool"
    );
    Ok(())
}

#[cfg(not(windows))]
fn spool_command(path: &Path, options: &DispatchOptions, _config: &AppConfig) -> String {
    match &options.printer {
        Some(printer) => format!("lp -d '{}' '{}'", printer, path.display()),
        None => format!("lp '{}'", path.display()),
    }
}

#[cfg(windows)]
fn spool_command(path: &Path, options: &DispatchOptions, config: &AppConfig) -> String {
    match &options.printer {
        Some(printer) => format!(
            "{} -print-to \"{}\" -silent \"{}\"",
            config.print_helper,
            printer,
            path.display()
        ),
        None => format!(
            "{} -print-to-default -silent \"{}\"",
            config.print_helper,
            path.display()
        ),
    }
}
