use std::io::Cursor;

use kvolve::render::Canvas;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{error, warn};

use crate::page;
use crate::sse;
use crate::state::SharedState;

type Body = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn with_body(status: u16, content_type: &str, bytes: Vec<u8>) -> Body {
    let len = bytes.len();
    let mut headers = Vec::new();
    if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        headers.push(h);
    }
    Response::new(StatusCode(status), headers, Cursor::new(bytes), Some(len), None)
}

pub fn html_response(body: String) -> Body {
    with_body(200, "text/html; charset=utf-8", body.into_bytes())
}

pub fn text_response(body: String) -> Body {
    with_body(200, "text/plain; charset=utf-8", body.into_bytes())
}

pub fn png_response(bytes: Vec<u8>) -> Body {
    with_body(200, "image/png", bytes)
}

pub fn redirect(location: &str) -> Body {
    let mut response = with_body(303, "text/plain", Vec::new());
    if let Ok(h) = Header::from_bytes(&b"Location"[..], location.as_bytes()) {
        response.add_header(h);
    }
    response
}

pub fn not_found() -> Body {
    with_body(404, "text/plain", b"404 Not Found".to_vec())
}

pub fn server_error(message: &str) -> Body {
    with_body(500, "text/plain", message.as_bytes().to_vec())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// The SSE handler takes ownership of the request for long-lived streaming;
/// every other route answers with a single buffered response.
pub fn dispatch(request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let path = url.split('?').next().unwrap_or("").to_owned();

    if method == Method::Get && path == "/events" {
        sse::handle(request, state);
        return;
    }

    let response = match (method, path.as_str()) {
        (Method::Get, "/") => handle_page(&state),
        (Method::Get, "/graph.dot") => handle_graph(&state),
        (Method::Get, "/frame.png") => handle_frame(&state),
        (Method::Post, "/network/randomize") => handle_randomize(&state),
        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        warn!(error = %e, path = %path, "failed to send response");
    }
}

fn handle_page(state: &SharedState) -> Body {
    match state.lock() {
        Ok(st) => html_response(page::render_page(&st)),
        Err(_) => server_error("state lock poisoned"),
    }
}

/// `GET /graph.dot` — the network's current Graphviz text.
fn handle_graph(state: &SharedState) -> Body {
    match state.lock() {
        Ok(st) => text_response(st.network.export_graph()),
        Err(_) => server_error("state lock poisoned"),
    }
}

/// `GET /frame.png` — raster of the latest grid frame.
fn handle_frame(state: &SharedState) -> Body {
    let frame = match state.lock() {
        Ok(st) => st.frame.clone(),
        Err(_) => return server_error("state lock poisoned"),
    };
    let Some(frame) = frame else {
        return not_found();
    };
    match Canvas::default().encode_png(&frame) {
        Ok(bytes) => png_response(bytes),
        Err(e) => {
            error!(error = %e, "failed to encode frame");
            server_error("failed to encode frame")
        }
    }
}

/// `POST /network/randomize` — new random inputs, one pass, back to the page.
fn handle_randomize(state: &SharedState) -> Body {
    let result = match state.lock() {
        Ok(mut st) => st.randomize_inputs(),
        Err(_) => return server_error("state lock poisoned"),
    };
    match result {
        Ok(()) => redirect("/"),
        Err(e) => {
            error!(error = %e, "network pass failed");
            server_error(&e.to_string())
        }
    }
}
