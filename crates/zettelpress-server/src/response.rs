// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON response envelope: `{ "ok": true, ...payload }` on success,
// `{ "ok": false, "error": "..." }` on failure.

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use zettelpress_core::ZettelpressError;

/// Successful reply; the payload's fields are flattened next to `ok`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(payload: T) -> Self {
        Self { ok: true, payload }
    }

    pub fn into_response(self) -> Response {
        warp::reply::json(&self).into_response()
    }
}

/// Failed reply. Validation problems report 400, everything else 500.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub ok: bool,
    pub error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiFailure {
    pub fn from_error(err: &ZettelpressError) -> Self {
        let status = match err {
            ZettelpressError::InvalidTicket(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            ok: false,
            error: err.to_string(),
            status,
        }
    }

    pub fn into_response(self) -> Response {
        warp::reply::with_status(warp::reply::json(&self), self.status).into_response()
    }
}
