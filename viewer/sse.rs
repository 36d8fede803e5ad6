use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use tiny_http::Request;
use tracing::debug;

use crate::state::SharedState;

const POLL: Duration = Duration::from_millis(50);
const KEEPALIVE: Duration = Duration::from_secs(15);

/// Formats a named SSE event with a JSON data payload.
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// `GET /events` — Server-Sent Events handler.
///
/// Takes ownership of `request` to write the stream directly. Sends the
/// latest grid frame whenever the animation publishes a new one, a `: ping`
/// comment when idle, and a final `done` event once the animation ends.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();

    let header = "HTTP/1.1 200 OK\r\n\
                  Content-Type: text/event-stream\r\n\
                  Cache-Control: no-cache\r\n\
                  Connection: keep-alive\r\n\
                  X-Accel-Buffering: no\r\n\
                  \r\n";
    if write_all(&mut writer, header.as_bytes()).is_err() {
        return;
    }

    let mut last_sent: Option<u64> = None;
    let mut last_write = Instant::now();

    loop {
        let (frame_json, finished) = {
            let st = match state.lock() {
                Ok(st) => st,
                Err(_) => return,
            };
            let fresh = st.frame.as_ref().filter(|f| Some(f.index) != last_sent);
            let json = fresh.and_then(|f| serde_json::to_string(f).ok().map(|j| (f.index, j)));
            (json, st.finished)
        };

        if let Some((index, json)) = frame_json {
            if write_all(&mut writer, format_sse_event("frame", &json).as_bytes()).is_err() {
                debug!("event stream closed by client");
                return;
            }
            last_sent = Some(index);
            last_write = Instant::now();
        } else if finished {
            let _ = write_all(&mut writer, format_sse_event("done", "{}").as_bytes());
            return;
        } else if last_write.elapsed() >= KEEPALIVE {
            if write_all(&mut writer, b": ping\n\n").is_err() {
                return;
            }
            last_write = Instant::now();
        }

        thread::sleep(POLL);
    }
}

/// Writes all bytes to the writer, returning `Err` on any I/O failure.
fn write_all<W: Write + ?Sized>(w: &mut W, data: &[u8]) -> std::io::Result<()> {
    w.write_all(data)?;
    w.flush()
}
