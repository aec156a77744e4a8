//! Headless driver: reads [`UiEvent`]s as JSON lines on stdin and writes
//! notification sink events as JSON lines on stdout.

use std::io::{self, Write};
use std::sync::Arc;

use lightboard::config::{AppConfig, ConfigError, StoreBackend};
use lightboard::db;
use lightboard::layout::RowLayout;
use lightboard::notify::{Notification, NotificationSink, SinkEvent};
use lightboard::session::{Session, UiEvent};
use lightboard::store::{ConfigStore, MemoryStore, PgStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stdin read failed: {0}")]
    Io(#[from] io::Error),
}

/// Writes each sink event as one JSON line.
struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    fn emit(&mut self, event: &SinkEvent) {
        if let Err(err) = self.write_line(event) {
            warn!(%err, "failed to write sink event");
        }
    }

    fn write_line(&mut self, event: &SinkEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> NotificationSink for JsonLinesSink<W> {
    fn show(&mut self, notification: &Notification) {
        self.emit(&SinkEvent::Shown(notification.clone()));
    }

    fn retract(&mut self, id: &str) {
        self.emit(&SinkEvent::Retracted { id: id.to_owned() });
    }
}

async fn open_store(backend: &StoreBackend) -> Result<Arc<dyn ConfigStore>, DriverError> {
    match backend {
        StoreBackend::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres { database_url, max_connections } => {
            let pool = db::init_pool(database_url, *max_connections).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

fn handle_line<S: NotificationSink>(session: &mut Session<S>, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<UiEvent>(line) {
        Ok(event) => {
            if let Err(err) = session.dispatch(event) {
                warn!(%err, "event rejected");
            }
        }
        Err(err) => warn!(%err, line, "malformed event skipped"),
    }
}

#[tokio::main]
async fn main() -> Result<(), DriverError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    if let Err(err) = dotenv {
        debug!(%err, "no .env loaded");
    }

    let config = AppConfig::from_env()?;
    let store = open_store(&config.store).await?;
    let sink = JsonLinesSink { out: io::stdout() };
    let mut session = Session::new(config.session, store, Box::new(RowLayout::default()), sink);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&mut session, &line),
                None => break,
            },
            stepped = session.step() => {
                if stepped.is_err() {
                    break;
                }
            }
        }
    }

    session.drain().await;
    session.end();
    Ok(())
}
