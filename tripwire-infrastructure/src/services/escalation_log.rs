use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::utils::sanitize_file_component;
use tripwire_domain::ports::{EscalationLog, EscalationSink};
use tripwire_domain::{EntityId, Escalation};

struct PendingLine {
    path: PathBuf,
    line: String,
}

/// Escalation reporter backed by one append-only file per entity per day.
///
/// `report` never touches the disk: lines are queued to a background writer task that
/// exits once every handle to the log has been dropped.
pub struct FileEscalationLog {
    log_dir: PathBuf,
    capacity: usize,
    recent: Mutex<VecDeque<Escalation>>,
    writer: mpsc::UnboundedSender<PendingLine>,
}

impl FileEscalationLog {
    /// Must be called inside a tokio runtime.
    pub fn spawn(log_dir: impl Into<PathBuf>, capacity: usize) -> (Self, JoinHandle<()>) {
        let log_dir = log_dir.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_loop(log_dir.clone(), rx));
        let log = Self {
            log_dir,
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::new()),
            writer: tx,
        };
        (log, handle)
    }

    pub fn log_path(&self, entity_name: &str, date: NaiveDate) -> PathBuf {
        self.log_dir.join(format!(
            "{}_{}.log",
            sanitize_file_component(entity_name),
            date.format("%Y-%m-%d")
        ))
    }
}

/// `[HH:MM:SS] <check> | Level <n> | Count: <n> | <reason>` in local time.
pub fn format_log_line(escalation: &Escalation) -> String {
    let local = escalation.reported_at.with_timezone(&Local);
    format!(
        "[{}] {} | Level {} | Count: {} | {}",
        local.format("%H:%M:%S"),
        escalation.check_name,
        escalation.severity.level(),
        escalation.cumulative_count,
        escalation.reason
    )
}

impl EscalationSink for FileEscalationLog {
    fn report(&self, escalation: &Escalation) {
        let line = format_log_line(escalation);
        info!("[VIOLATION] {}: {}", escalation.entity_name, line);

        {
            let mut recent = self.recent.lock();
            if recent.len() == self.capacity {
                recent.pop_front();
            }
            recent.push_back(escalation.clone());
        }

        let date = escalation.reported_at.with_timezone(&Local).date_naive();
        let pending = PendingLine {
            path: self.log_path(&escalation.entity_name, date),
            line,
        };
        if self.writer.send(pending).is_err() {
            error!("escalation writer stopped; dropped line for {}", escalation.entity_name);
        }
    }
}

#[async_trait]
impl EscalationLog for FileEscalationLog {
    async fn recent(&self, entity: Option<EntityId>, limit: usize) -> Vec<Escalation> {
        self.recent
            .lock()
            .iter()
            .rev()
            .filter(|escalation| entity.map_or(true, |id| escalation.entity_id == id))
            .take(limit)
            .cloned()
            .collect()
    }

    async fn read_day(&self, entity_name: &str, date: NaiveDate) -> Result<Vec<String>> {
        let path = self.log_path(entity_name, date);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content.lines().map(ToString::to_string).collect()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn ping(&self) -> Result<()> {
        fs::create_dir_all(&self.log_dir).await?;
        if self.writer.is_closed() {
            anyhow::bail!("escalation writer is not running");
        }
        Ok(())
    }
}

async fn write_loop(log_dir: PathBuf, mut rx: mpsc::UnboundedReceiver<PendingLine>) {
    if let Err(err) = fs::create_dir_all(&log_dir).await {
        error!("failed to create log dir {}: {}", log_dir.display(), err);
    }
    while let Some(pending) = rx.recv().await {
        if let Err(err) = append_line(&pending.path, &pending.line).await {
            error!("failed to write violation log {}: {}", pending.path.display(), err);
        }
    }
}

async fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{}\n", line).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
