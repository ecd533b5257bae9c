// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP routes.
//
//   GET  /printers         → installed printers + default, always 200
//   POST /tickets/print    → multipart ticket, renders and spools a PDF
//   POST /tickets/preview  → same pipeline minus the spool, replies the PDF
//
// Uploaded images and rendered PDFs live in `NamedTempFile` guards scoped
// to the handling request, so the files disappear when the handler returns.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use bytes::Buf;
use futures_util::TryStreamExt;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use warp::Filter;
use warp::filters::multipart::{FormData, Part};
use warp::http::HeaderValue;
use warp::http::header::CONTENT_TYPE;
use warp::reply::Response;

use zettelpress_core::error::{Result, ZettelpressError};
use zettelpress_core::types::{TicketReceipt, TicketRequest};
use zettelpress_core::AppConfig;
use zettelpress_document::{TicketRenderer, prepare_ticket_image};
use zettelpress_print::{
    DiscoveryService, DispatchOptions, ShellRunner, SystemShell, dispatch_pdf, platform_native,
};

use crate::response::{ApiFailure, ApiResponse};

/// Shared, read-only state behind all routes.
pub struct ServerContext {
    pub config: AppConfig,
    pub shell: Arc<dyn ShellRunner>,
    pub discovery: DiscoveryService,
    pub renderer: TicketRenderer,
}

impl ServerContext {
    /// Context wired to the real shell and this platform's native printer
    /// capability.
    pub fn new(config: AppConfig) -> Self {
        let shell: Arc<dyn ShellRunner> = Arc::new(SystemShell::new(config.hide_shell_windows));
        let discovery = DiscoveryService::new(Arc::clone(&shell), platform_native());
        Self {
            config,
            shell,
            discovery,
            renderer: TicketRenderer::new(),
        }
    }
}

/// The complete route tree.
pub fn api(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    printers(ctx.clone())
        .or(print_ticket(ctx.clone()))
        .unify()
        .or(preview_ticket(ctx))
        .unify()
}

fn with_context(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (Arc<ServerContext>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&ctx))
}

/// `GET /printers` — discovery never fails, so neither does this route.
fn printers(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    warp::path!("printers")
        .and(warp::get())
        .and(with_context(ctx))
        .then(|ctx: Arc<ServerContext>| async move {
            let inventory = ctx.discovery.discover().await;
            ApiResponse::success(inventory).into_response()
        })
}

/// `POST /tickets/print`
fn print_ticket(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let max_upload = ctx.config.max_upload_bytes;
    warp::path!("tickets" / "print")
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload))
        .and(with_context(ctx))
        .then(|form: FormData, ctx: Arc<ServerContext>| async move {
            match handle_print(form, &ctx).await {
                Ok(receipt) => {
                    info!(id = %receipt.id, "ticket spooled");
                    ApiResponse::success(receipt).into_response()
                }
                Err(err) => {
                    warn!(error = %err, "ticket print failed");
                    ApiFailure::from_error(&err).into_response()
                }
            }
        })
}

/// `POST /tickets/preview`
fn preview_ticket(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let max_upload = ctx.config.max_upload_bytes;
    warp::path!("tickets" / "preview")
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload))
        .and(with_context(ctx))
        .then(|form: FormData, ctx: Arc<ServerContext>| async move {
            match handle_preview(form, &ctx).await {
                Ok(pdf) => pdf_response(pdf),
                Err(err) => {
                    warn!(error = %err, "ticket preview failed");
                    ApiFailure::from_error(&err).into_response()
                }
            }
        })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_print(form: FormData, ctx: &ServerContext) -> Result<TicketReceipt> {
    let fields = collect_fields(form).await?;
    let ticket = fields.to_request()?;
    let pdf = render_ticket(&fields, &ticket, ctx)?;

    let spool_file = tempfile::Builder::new()
        .prefix("zettelpress-")
        .suffix(".pdf")
        .tempfile()?;
    std::fs::write(spool_file.path(), &pdf)?;

    let options = DispatchOptions {
        printer: ticket.printer.clone(),
    };
    dispatch_pdf(ctx.shell.as_ref(), spool_file.path(), &options, &ctx.config).await?;

    Ok(TicketReceipt::new(ticket.printer))
}

async fn handle_preview(form: FormData, ctx: &ServerContext) -> Result<Vec<u8>> {
    let fields = collect_fields(form).await?;
    let ticket = fields.to_request()?;
    render_ticket(&fields, &ticket, ctx)
}

fn render_ticket(
    fields: &TicketFields,
    ticket: &TicketRequest,
    ctx: &ServerContext,
) -> Result<Vec<u8>> {
    // A bad image never fails the ticket; preprocessing degrades to None.
    let image = fields
        .image
        .as_ref()
        .and_then(|file| prepare_ticket_image(file.path()));
    ctx.renderer.render(ticket, image.as_deref())
}

fn pdf_response(pdf: Vec<u8>) -> Response {
    let mut response = Response::new(pdf.into());
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    response
}

// ---------------------------------------------------------------------------
// Multipart plumbing
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TicketFields {
    title: Option<String>,
    description: Option<String>,
    printer: Option<String>,
    /// Uploaded image, parked in a temp file for the image pipeline.
    image: Option<NamedTempFile>,
}

impl TicketFields {
    fn to_request(&self) -> Result<TicketRequest> {
        let title = self.title.as_deref().map(str::trim).unwrap_or("");
        if title.is_empty() {
            return Err(ZettelpressError::InvalidTicket("title is required".into()));
        }
        let printer = self
            .printer
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);
        Ok(TicketRequest {
            title: title.to_string(),
            description: self.description.clone().unwrap_or_default(),
            printer,
        })
    }
}

async fn collect_fields(mut form: FormData) -> Result<TicketFields> {
    let mut fields = TicketFields::default();
    while let Some(part) = form.try_next().await.map_err(multipart_err)? {
        let name = part.name().to_string();
        match name.as_str() {
            "title" => fields.title = Some(text_field(part).await?),
            "description" => fields.description = Some(text_field(part).await?),
            "printer" => fields.printer = Some(text_field(part).await?),
            "image" => fields.image = Some(file_field(part).await?),
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }
    Ok(fields)
}

async fn text_field(part: Part) -> Result<String> {
    let bytes = part_bytes(part).await?;
    String::from_utf8(bytes)
        .map_err(|_| ZettelpressError::InvalidTicket("form field is not valid UTF-8".into()))
}

/// Park an uploaded file part in a temp file, keeping the original
/// extension so the image decoder can sniff the format from the name.
async fn file_field(part: Part) -> Result<NamedTempFile> {
    let suffix = part
        .filename()
        .and_then(|f| Path::new(f).extension().and_then(|e| e.to_str()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".img".into());
    let bytes = part_bytes(part).await?;
    let file = tempfile::Builder::new()
        .prefix("zettelpress-")
        .suffix(&suffix)
        .tempfile()?;
    std::fs::write(file.path(), &bytes)?;
    Ok(file)
}

async fn part_bytes(part: Part) -> Result<Vec<u8>> {
    part.stream()
        .try_fold(Vec::new(), |mut acc, mut data| async move {
            acc.extend_from_slice(&data.copy_to_bytes(data.remaining()));
            Ok(acc)
        })
        .await
        .map_err(multipart_err)
}

fn multipart_err(err: warp::Error) -> ZettelpressError {
    ZettelpressError::InvalidTicket(format!("multipart body: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use zettelpress_print::ShellOutput;

    const BOUNDARY: &str = "zp-test-boundary";

    /// Shell on which every command fails — discovery degrades to empty
    /// and spool dispatch errors out.
    struct DeadShell;

    #[async_trait]
    impl ShellRunner for DeadShell {
        async fn run(&self, command: &str) -> Result<ShellOutput> {
            Err(ZettelpressError::Process {
                command: command.to_string(),
                detail: "test shell: unavailable".into(),
            })
        }
    }

    fn test_context() -> Arc<ServerContext> {
        let shell: Arc<dyn ShellRunner> = Arc::new(DeadShell);
        Arc::new(ServerContext {
            config: AppConfig::default(),
            shell: Arc::clone(&shell),
            discovery: DiscoveryService::new(shell, None),
            renderer: TicketRenderer::new(),
        })
    }

    fn multipart_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn multipart_content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    #[tokio::test]
    async fn printers_endpoint_is_always_ok() {
        let response = warp::test::request()
            .method("GET")
            .path("/printers")
            .reply(&api(test_context()))
            .await;

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).expect("json body");
        assert_eq!(body["ok"], serde_json::json!(true));
        assert_eq!(body["printers"], serde_json::json!([]));
        assert_eq!(body["defaultPrinter"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn preview_replies_with_pdf_bytes() {
        let body = multipart_body(&[
            ("title", "Vending machine jammed"),
            ("description", "Machine 3, lobby. Keeps the coin."),
        ]);
        let response = warp::test::request()
            .method("POST")
            .path("/tickets/preview")
            .header("content-type", multipart_content_type())
            .body(body)
            .reply(&api(test_context()))
            .await;

        assert_eq!(response.status(), 200);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .expect("content-type header");
        assert_eq!(content_type, "application/pdf");
        assert!(response.body().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn print_without_spool_fails_cleanly() {
        let body = multipart_body(&[("title", "No spool available")]);
        let response = warp::test::request()
            .method("POST")
            .path("/tickets/print")
            .header("content-type", multipart_content_type())
            .body(body)
            .reply(&api(test_context()))
            .await;

        assert_eq!(response.status(), 500);
        let body: serde_json::Value = serde_json::from_slice(response.body()).expect("json body");
        assert_eq!(body["ok"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn print_requires_a_title() {
        let body = multipart_body(&[("description", "no title here")]);
        let response = warp::test::request()
            .method("POST")
            .path("/tickets/print")
            .header("content-type", multipart_content_type())
            .body(body)
            .reply(&api(test_context()))
            .await;

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = serde_json::from_slice(response.body()).expect("json body");
        assert_eq!(body["ok"], serde_json::json!(false));
    }
}
