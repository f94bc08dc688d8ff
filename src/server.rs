use std::sync::Arc;

use serde::Serialize;
use tide::{Body, Request, Response, StatusCode};
use tracing::{debug, error, info};

use crate::ReadByLine;

pub const OUT_OF_BOUNDS: &str = "Line index out of bounds";
pub const INVALID_INDEX: &str = "Line index must be an integer";

const USAGE: &str = "To access the API, use the following URLs: /lines/<index>\n";

#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub index: i64,
    pub line_count: usize,
    pub line: String,
}

#[derive(Debug, Serialize)]
pub struct LineError {
    pub index: i64,
    pub line_count: usize,
    pub error: String,
}

#[derive(Debug, Serialize)]
struct InvalidIndex<'a> {
    index_param: &'a str,
    error: &'static str,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

/// Builds the HTTP application around an already built store.
pub fn app<S>(store: Arc<S>) -> tide::Server<Arc<S>>
where
    S: ReadByLine + Send + Sync + 'static,
{
    let mut app = tide::with_state(store);
    app.at("/").get(usage::<S>);
    app.at("/healthcheck").get(healthcheck::<S>);
    app.at("/lines/:index").get(get_line::<S>);
    app
}

/// Serves `store` on `addr` until the listener fails.
pub async fn serve<S>(store: Arc<S>, addr: &str) -> std::io::Result<()>
where
    S: ReadByLine + Send + Sync + 'static,
{
    let app = app(store);
    info!(addr, "listening");
    app.listen(addr.to_owned()).await
}

fn json<T: Serialize>(status: StatusCode, body: &T) -> tide::Result<Response> {
    Ok(Response::builder(status)
        .body(Body::from_json(body)?)
        .build())
}

async fn usage<S>(_req: Request<Arc<S>>) -> tide::Result<String>
where
    S: ReadByLine + Send + Sync + 'static,
{
    Ok(USAGE.to_owned())
}

async fn healthcheck<S>(_req: Request<Arc<S>>) -> tide::Result<Response>
where
    S: ReadByLine + Send + Sync + 'static,
{
    json(StatusCode::Ok, &Health { status: "ok" })
}

async fn get_line<S>(req: Request<Arc<S>>) -> tide::Result<Response>
where
    S: ReadByLine + Send + Sync + 'static,
{
    let raw = req.param("index")?;
    let index: i64 = match raw.parse() {
        Ok(index) => index,
        Err(_) => {
            debug!(index = raw, "rejecting non numeric line index");
            let body = InvalidIndex {
                index_param: raw,
                error: INVALID_INDEX,
            };
            return json(StatusCode::BadRequest, &body);
        }
    };

    let store = req.state();
    let line_count = store.total_lines();
    debug!(index, line_count, "line requested");

    match store.get_line(index).await {
        Ok(Some(line)) => json(
            StatusCode::Ok,
            &LineResponse {
                index,
                line_count,
                line,
            },
        ),
        // 413 for out of range lines, including index == line_count
        Ok(None) => json(
            StatusCode::PayloadTooLarge,
            &LineError {
                index,
                line_count,
                error: OUT_OF_BOUNDS.to_owned(),
            },
        ),
        Err(e) => {
            error!(index, error = %e, "line lookup failed");
            json(
                StatusCode::InternalServerError,
                &LineError {
                    index,
                    line_count,
                    error: e.to_string(),
                },
            )
        }
    }
}
