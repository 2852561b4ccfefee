//! Byte-range streaming endpoints.
//!
//! Files are addressed by catalog id (`/stream/{video_id}`) or by encoded
//! path (`/stream/file/{encoded_path}`). Every successful answer is
//! `206 Partial Content` with an explicit `Content-Range`, even when no
//! `Range` header was sent. The `info` variants resolve and compute the
//! same headers without sending a body.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::Extension;
use reel_core::{Error, Result};
use reel_stream::{range, BoundedSubStream};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::resolver::{self, OpenedFile, StreamSource};
use crate::routes::streaming_helpers::{partial_content, range_header};
use crate::watch::WatchNotifier;

/// Query parameters shared by all stream endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub autowatch: Option<String>,
    /// Lets players show a file name in the URL. Ignored.
    pub fakename: Option<String>,
}

impl StreamQuery {
    /// Only an explicit `autowatch=true` (any case) arms auto-watch.
    pub fn autowatch_requested(&self) -> bool {
        self.autowatch
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

/// GET /stream/{video_id}
pub async fn stream_by_id(
    State(ctx): State<AppContext>,
    Path(video_id): Path<String>,
    Query(query): Query<StreamQuery>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> std::result::Result<Response, AppError> {
    let result = async {
        let source = resolver::resolve_by_id(
            ctx.catalog.as_ref(),
            ctx.users.as_ref(),
            &video_id,
            query.user_id.as_deref(),
        )
        .await?;
        serve(&ctx, source, query.autowatch_requested(), &headers).await
    }
    .await;
    result.map_err(|e| AppError::new(e).with_request_id(Some(request_id.0)))
}

/// GET /stream/file/{encoded_path}
pub async fn stream_by_path(
    State(ctx): State<AppContext>,
    Path(encoded_path): Path<String>,
    Query(query): Query<StreamQuery>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> std::result::Result<Response, AppError> {
    let result = async {
        let source = resolver::resolve_by_encoded_path(
            ctx.users.as_ref(),
            &encoded_path,
            query.user_id.as_deref(),
        )
        .await?;
        serve(&ctx, source, query.autowatch_requested(), &headers).await
    }
    .await;
    result.map_err(|e| AppError::new(e).with_request_id(Some(request_id.0)))
}

/// GET|HEAD /stream/info/{video_id}, HEAD /stream/{video_id}
pub async fn info_by_id(
    State(ctx): State<AppContext>,
    Path(video_id): Path<String>,
    Query(query): Query<StreamQuery>,
    Extension(request_id): Extension<RequestId>,
    method: Method,
    headers: HeaderMap,
) -> std::result::Result<Response, AppError> {
    resolver::resolve_by_id(
        ctx.catalog.as_ref(),
        ctx.users.as_ref(),
        &video_id,
        query.user_id.as_deref(),
    )
    .await
    .map(|source| info(&ctx, &source, &method, &headers))
    .map_err(|e| AppError::new(e).with_request_id(Some(request_id.0)))
}

/// GET|HEAD /stream/info/file/{encoded_path}, HEAD /stream/file/{encoded_path}
pub async fn info_by_path(
    State(ctx): State<AppContext>,
    Path(encoded_path): Path<String>,
    Query(query): Query<StreamQuery>,
    Extension(request_id): Extension<RequestId>,
    method: Method,
    headers: HeaderMap,
) -> std::result::Result<Response, AppError> {
    resolver::resolve_by_encoded_path(ctx.users.as_ref(), &encoded_path, query.user_id.as_deref())
        .await
        .map(|source| info(&ctx, &source, &method, &headers))
        .map_err(|e| AppError::new(e).with_request_id(Some(request_id.0)))
}

async fn serve(
    ctx: &AppContext,
    source: StreamSource,
    autowatch: bool,
    headers: &HeaderMap,
) -> Result<Response> {
    let streaming = &ctx.config.streaming;
    let watch = source.watch_context(autowatch);
    let OpenedFile {
        path,
        file,
        size,
        mime,
    } = source.into_file();

    let range = range::parse(range_header(headers), size);
    let mut body = BoundedSubStream::new(file, range.start, range.len())
        .await
        .map_err(|e| Error::open(&path, e))?;

    if let Some(watch) = watch {
        let notifier = WatchNotifier::new(ctx.watched.clone());
        body = body.with_detector(notifier.detector(watch, size, streaming.effective_threshold()));
        tracing::debug!(video = %watch.video, user = %watch.user, "Auto-watch armed");
    }

    tracing::debug!(
        path = %path.display(),
        range = %range,
        content_type = %mime,
        "Streaming file"
    );

    let stream = ReaderStream::with_capacity(body, streaming.effective_chunk_size());
    Ok(partial_content(
        &streaming.server_name,
        &range,
        &mime,
        true,
        Body::from_stream(stream),
    ))
}

fn info(ctx: &AppContext, source: &StreamSource, method: &Method, headers: &HeaderMap) -> Response {
    let file = source.file();
    let range = range::parse(range_header(headers), file.size);
    // HEAD announces the length it would send; GET has to match its empty body.
    partial_content(
        &ctx.config.streaming.server_name,
        &range,
        &file.mime,
        method == Method::HEAD,
        Body::empty(),
    )
}
