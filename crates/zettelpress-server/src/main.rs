// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Zettelpress — thermal ticket print service.
//
// Entry point. Initialises logging, builds the discovery/render context,
// and serves the HTTP API.

mod response;
mod routes;

use std::sync::Arc;

use tracing::info;

use zettelpress_core::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(port = config.http_port, "Zettelpress starting");

    let context = Arc::new(routes::ServerContext::new(config.clone()));
    let api = routes::api(context);

    warp::serve(api).run(([0, 0, 0, 0], config.http_port)).await;
}
