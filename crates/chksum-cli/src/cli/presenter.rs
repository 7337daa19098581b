//! Console and JSON-lines rendering of command outcomes.

use chksum_core::config::OutputFormat;
use chksum_core::{Detail, Outcome, Presenter, Verdict};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build the presenter for the chosen output format.
pub fn for_format(format: OutputFormat, relative_paths: bool) -> Arc<dyn Presenter> {
    let paths = PathStyle::new(relative_paths);
    match format {
        OutputFormat::Text => Arc::new(ConsolePresenter { paths }),
        OutputFormat::Json => Arc::new(JsonPresenter { paths }),
    }
}

/// Shows paths relative to the working directory when they are below it.
#[derive(Debug, Clone)]
struct PathStyle {
    cwd: Option<PathBuf>,
}

impl PathStyle {
    fn new(relative: bool) -> Self {
        let cwd = if relative {
            std::env::current_dir().ok()
        } else {
            None
        };
        PathStyle { cwd }
    }

    fn show(&self, path: &Path) -> String {
        let shown = self
            .cwd
            .as_deref()
            .and_then(|cwd| path.strip_prefix(cwd).ok())
            .unwrap_or(path);
        shown.display().to_string()
    }
}

/// `Checksum OK<TAB>digest<TAB>path` on stdout for every file. The digest
/// column is `-` when none was computed; errors also get a message on stderr.
pub struct ConsolePresenter {
    paths: PathStyle,
}

fn verb(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Shown => "IS",
        Verdict::Ok => "OK",
        Verdict::Fail => "FAIL",
        Verdict::Added => "ADD",
        Verdict::Deleted => "DEL",
        Verdict::Unchanged => "SAME",
        Verdict::Nothing => "NONE",
        Verdict::Error => "ERROR",
    }
}

/// Stdout line plus, for errors, the stderr message.
struct ConsoleLines {
    out: String,
    err: Option<String>,
}

impl ConsolePresenter {
    fn lines(&self, outcome: &Outcome) -> ConsoleLines {
        let digest = outcome.digest().map_or("-", |d| d.as_str());
        let out = format!(
            "Checksum {}\t{}\t{}",
            verb(outcome.verdict),
            digest,
            self.paths.show(outcome.current_path())
        );
        let err = match &outcome.detail {
            Detail::Error(e) => Some(format!("chksum: {}", e)),
            Detail::Digest(_) | Detail::NameOnly => None,
        };
        ConsoleLines { out, err }
    }
}

impl Presenter for ConsolePresenter {
    fn present(&self, outcome: &Outcome) {
        let ConsoleLines { out, err } = self.lines(outcome);
        let _ = writeln!(io::stdout().lock(), "{}", out);
        if let Some(err) = err {
            let _ = writeln!(io::stderr().lock(), "{}", err);
        }
    }
}

#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    path: String,
    new_path: Option<String>,
    previous: Option<&'static str>,
    resulting: Option<&'static str>,
    verdict: &'static str,
    digest: Option<&'a str>,
    error: Option<String>,
}

/// One JSON object per outcome on stdout, errors included.
pub struct JsonPresenter {
    paths: PathStyle,
}

impl JsonPresenter {
    fn record<'a>(&self, outcome: &'a Outcome) -> OutcomeRecord<'a> {
        OutcomeRecord {
            path: self.paths.show(&outcome.path),
            new_path: outcome.new_path.as_deref().map(|p| self.paths.show(p)),
            previous: outcome.previous.map(|s| s.as_str()),
            resulting: outcome.resulting.map(|s| s.as_str()),
            verdict: outcome.verdict.as_str(),
            digest: outcome.digest().map(|d| d.as_str()),
            error: outcome.error().map(|e| e.to_string()),
        }
    }
}

impl Presenter for JsonPresenter {
    fn present(&self, outcome: &Outcome) {
        match serde_json::to_string(&self.record(outcome)) {
            Ok(json) => {
                let _ = writeln!(io::stdout().lock(), "{}", json);
            }
            Err(e) => tracing::error!("serialize outcome for {}: {}", outcome.path.display(), e),
        }
    }
}
