//! Execution profiler for untrusted Python source
//!
//! The source text is written to a scratch file and executed to completion
//! by a fixed harness (`python -c ...`) in a child process. The harness
//! runs the program under `cProfile` in a fresh global namespace and
//! writes one tab-separated record per function to a result file; nothing
//! from the host leaks into the program and nothing the program defines
//! leaks back. Running out-of-process keeps a crashing or hanging program
//! from taking the host with it: a wall-clock deadline kills the child and
//! the run fails cleanly.
//!
//! Timings come from the interpreter's profiler clock and are inherently
//! non-deterministic across runs; consumers must tolerate jitter in the
//! values (the ordering and shape of the records are deterministic for a
//! given set of values).

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::stats::{RawFunctionStats, RawStats};

/// Harness executed via `python -c`. Argument 1 is the program path,
/// argument 2 the result path. It exits non-zero (with the traceback on
/// stderr) if the program fails to compile or raises, in which case no
/// result file is produced and no partial statistics survive.
const HARNESS: &str = r#"
import cProfile, sys

def _harness():
    src, out = sys.argv[1], sys.argv[2]
    with open(src) as f:
        source = f.read()
    code = compile(source, src, 'exec')
    prof = cProfile.Profile()
    prof.enable()
    try:
        exec(code, {'__name__': '__main__'})
    except SystemExit as exc:
        if exc.code not in (None, 0):
            raise
    finally:
        prof.disable()
    prof.create_stats()
    with open(out, 'w') as sink:
        for (filename, lineno, name), (cc, nc, tt, ct, callers) in prof.stats.items():
            if filename == '~':
                ident = name
            else:
                ident = '%s (%s:%d)' % (name, filename, lineno)
            sink.write('%d\t%.9f\t%.9f\t%s\n' % (nc, tt, ct, ident))

_harness()
"#;

/// How many trailing stderr lines to attach to an execution failure
const STDERR_TAIL_LINES: usize = 30;

/// Poll interval while waiting on the child
const WAIT_POLL: Duration = Duration::from_millis(10);

/// Failure modes of a profiling run
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The interpreter binary could not be started at all
    #[error("failed to launch `{python}`: {source}")]
    Spawn {
        python: String,
        #[source]
        source: std::io::Error,
    },
    /// The program failed to parse or raised during execution
    #[error("program failed:\n{0}")]
    Failed(String),
    /// The program ran past the wall-clock ceiling and was killed
    #[error("program exceeded the {0} s time limit")]
    Timeout(u64),
    /// The harness produced a record that does not parse
    #[error("malformed profile record: {0}")]
    MalformedStats(String),
    /// Scratch-file or pipe I/O failed
    #[error("profiling i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Profiler configuration
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    /// Interpreter binary used to run the program
    pub python: String,
    /// Wall-clock ceiling for the whole run
    pub timeout: Duration,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Runs source text under the subprocess profiling harness
#[derive(Debug)]
pub struct ExecutionProfiler {
    config: ProfilerConfig,
}

impl ExecutionProfiler {
    /// Create a profiler with the given configuration
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    /// Execute `source` to completion under the profiler.
    ///
    /// The program's stdout passes through to the caller's stdout (the
    /// program may print, write files or hit the network; that is
    /// accepted ambient behavior). Stderr is captured for the error
    /// message. On any failure the collected statistics are discarded.
    pub fn profile(&self, source: &str) -> Result<RawStats, ExecutionError> {
        let scratch = tempfile::tempdir()?;
        let src_path = scratch.path().join("program.py");
        let out_path = scratch.path().join("stats.tsv");
        std::fs::write(&src_path, source)?;

        debug!(python = %self.config.python, timeout_secs = self.config.timeout.as_secs(), "starting profiled run");
        let mut child = Command::new(&self.config.python)
            .arg("-c")
            .arg(HARNESS)
            .arg(&src_path)
            .arg(&out_path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                python: self.config.python.clone(),
                source,
            })?;

        // Drain stderr on a helper thread so a chatty program cannot
        // deadlock against a full pipe while we poll for exit.
        let stderr = child.stderr.take();
        let drain = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let status = match wait_with_deadline(&mut child, self.config.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = drain.join();
                return Err(ExecutionError::Timeout(self.config.timeout.as_secs()));
            }
        };
        let stderr_text = drain.join().unwrap_or_default();

        if !status.success() {
            debug!(code = ?status.code(), "profiled program failed");
            return Err(ExecutionError::Failed(tail(&stderr_text, STDERR_TAIL_LINES)));
        }

        let raw = std::fs::read_to_string(&out_path)?;
        let stats = parse_stats(&raw)?;
        debug!(functions = stats.len(), "profiled run complete");
        Ok(stats)
    }
}

/// Poll the child until it exits or the deadline passes.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(WAIT_POLL);
    }
}

/// Last `lines` lines of `text`, trimmed
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// Parse the harness's tab-separated records, preserving emission order.
fn parse_stats(raw: &str) -> Result<RawStats, ExecutionError> {
    let mut stats = Vec::new();
    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(4, '\t');
        let (calls, own, cum, name) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(calls), Some(own), Some(cum), Some(name)) => (calls, own, cum, name),
            _ => return Err(ExecutionError::MalformedStats(line.to_string())),
        };
        let call_count: u64 = calls
            .parse()
            .map_err(|_| ExecutionError::MalformedStats(line.to_string()))?;
        let own_secs: f64 = own
            .parse()
            .map_err(|_| ExecutionError::MalformedStats(line.to_string()))?;
        let cumulative_secs: f64 = cum
            .parse()
            .map_err(|_| ExecutionError::MalformedStats(line.to_string()))?;
        stats.push(RawFunctionStats {
            name: name.to_string(),
            call_count,
            own_secs,
            cumulative_secs,
        });
    }
    Ok(stats)
}
