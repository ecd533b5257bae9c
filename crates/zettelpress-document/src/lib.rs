// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// zettelpress-document — Document processing for the Zettelpress ticket
// printer.
//
// Provides the ticket PDF renderer (80mm thermal roll layout) and image
// preprocessing (grayscale + binarization for thermal heads).

pub mod image;
pub mod ticket;

pub use image::prepare_ticket_image;
pub use ticket::TicketRenderer;
