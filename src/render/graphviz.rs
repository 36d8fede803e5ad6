use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{KvolveError, Result};
use crate::graph::check_syntax;

/// How to invoke the external Graphviz layout tool.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Executable called as `<program> -Tpng <in> -o <out>`.
    pub program: String,
    /// Per-attempt limit; the child is killed when it runs longer.
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub max_attempts: usize,
    /// Keep `<stem>.dot` next to the image after rendering.
    pub keep_dot_file: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            program: "dot".to_string(),
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(50),
            max_attempts: 8,
            keep_dot_file: false,
        }
    }
}

enum Attempt {
    Rendered,
    Missing,
    TimedOut,
}

/// Writes `graph` to `<stem>.dot` and renders it to `<stem>.png`.
///
/// The text is checked before anything touches the filesystem. A stale image
/// is removed first; the call succeeds as soon as a run leaves the image
/// behind. Returns the image path.
pub fn render_png(graph: &str, stem: &Path, options: &RenderOptions) -> Result<PathBuf> {
    check_syntax(graph)?;

    let dot_path = with_suffix(stem, "dot");
    let png_path = with_suffix(stem, "png");
    fs::write(&dot_path, graph)?;
    match fs::remove_file(&png_path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
        _ => {}
    }

    let result = run_attempts(&dot_path, &png_path, options);

    if !options.keep_dot_file {
        if let Err(e) = fs::remove_file(&dot_path) {
            warn!(path = %dot_path.display(), error = %e, "could not remove dot file");
        }
    }
    result.map(|_| png_path)
}

fn run_attempts(dot_path: &Path, png_path: &Path, options: &RenderOptions) -> Result<()> {
    let attempts = options.max_attempts.max(1);
    let mut last_timed_out = false;

    for attempt in 1..=attempts {
        match run_once(dot_path, png_path, options)? {
            Attempt::Rendered => {
                info!(path = %png_path.display(), attempt, "rendered graph");
                return Ok(());
            }
            Attempt::Missing => {
                last_timed_out = false;
                warn!(attempt, attempts, "renderer exited without an image");
            }
            Attempt::TimedOut => {
                last_timed_out = true;
                warn!(attempt, attempts, timeout = ?options.timeout, "renderer timed out");
            }
        }
    }

    if last_timed_out {
        Err(KvolveError::RenderTimeout { timeout: options.timeout })
    } else {
        Err(KvolveError::RenderFailed { attempts })
    }
}

fn run_once(dot_path: &Path, png_path: &Path, options: &RenderOptions) -> Result<Attempt> {
    let child = Command::new(&options.program)
        .arg("-Tpng")
        .arg(dot_path)
        .arg("-o")
        .arg(png_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(KvolveError::RenderUnavailable { program: options.program.clone() })
        }
        Err(e) => return Err(e.into()),
    };

    if !wait_with_deadline(&mut child, options)? {
        child.kill()?;
        child.wait()?;
        return Ok(Attempt::TimedOut);
    }
    Ok(if png_path.exists() { Attempt::Rendered } else { Attempt::Missing })
}

/// `true` once the child exits, `false` if the timeout elapses first.
fn wait_with_deadline(child: &mut Child, options: &RenderOptions) -> Result<bool> {
    let deadline = Instant::now() + options.timeout;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(options.poll_interval);
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
