//! Progress reporting for the interactive shell.
//!
//! Fetch and merge stages emit events through a cloneable [`Reporter`]; a
//! spawned renderer task drains them into an indicatif display with an
//! overall step bar and a byte-level bar for the download in flight. Sends
//! are best-effort: a closed channel never aborts a download.

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One progress event from the pipeline.
#[derive(Debug)]
pub enum Event {
    /// A numbered pipeline step started; advances the step counter.
    Stage(String),
    /// Status line that does not advance the step counter.
    Note(String),
    /// Byte-level progress for the current download. `total` of zero means
    /// the size is unknown (CI artifact sizes are pre-compression and
    /// useless).
    Download { name: String, bytes: u64, total: u64 },
    /// The current download finished; resets the byte bar.
    DownloadDone,
}

/// Cloneable handle the pipeline reports through.
#[derive(Clone)]
pub struct Reporter {
    tx: Option<mpsc::UnboundedSender<Event>>,
}

impl Reporter {
    /// A reporter that drops every event; used by tests and quiet runs.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn stage(&self, message: impl Into<String>) {
        self.send(Event::Stage(message.into()));
    }

    pub fn note(&self, message: impl Into<String>) {
        self.send(Event::Note(message.into()));
    }

    pub fn download(&self, name: &str, bytes: u64, total: u64) {
        self.send(Event::Download {
            name: name.to_string(),
            bytes,
            total,
        });
    }

    pub fn download_done(&self) {
        self.send(Event::DownloadDone);
    }

    fn send(&self, event: Event) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Spawn the renderer task and hand back the reporter feeding it.
///
/// The task exits once every `Reporter` clone is dropped; await the handle
/// to make sure the final bar state is flushed before printing anything
/// else.
pub fn spawn_renderer(total_steps: u64) -> Result<(Reporter, JoinHandle<()>)> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let multi = MultiProgress::new();

    let pb_steps = multi.add(ProgressBar::new(total_steps));
    pb_steps.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} steps completed")
            .context("invalid step bar template")?
            .progress_chars("█▓░"),
    );

    let pb_download = multi.add(ProgressBar::new(0));
    pb_download.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.green/blue}] {bytes}/{total_bytes}  {msg}")
            .context("invalid download bar template")?
            .progress_chars("█▓░"),
    );

    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Event::Stage(message) => {
                    let _ = multi.println(&message);
                    pb_steps.inc(1);
                }
                Event::Note(message) => {
                    let _ = multi.println(&message);
                }
                Event::Download { name, bytes, total } => {
                    if total > 0 {
                        pb_download.set_length(total);
                    }
                    pb_download.set_position(bytes);
                    pb_download.set_message(name);
                }
                Event::DownloadDone => {
                    pb_download.set_position(0);
                    pb_download.set_length(0);
                    pb_download.set_message(String::new());
                }
            }
        }

        pb_download.finish_and_clear();
        pb_steps.finish();
    });

    Ok((Reporter { tx: Some(tx) }, handle))
}
