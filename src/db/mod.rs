use crate::error::StoreError;
use crate::models::VoteRecord;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use uuid::Uuid;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification that the set of vote rows may have changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyChange {
    /// This process inserted the record.
    Inserted(VoteRecord),
    /// The watcher saw the table revision move (any client, any mutation).
    Revision(i64),
    /// The listener fell behind and missed notifications.
    Resync,
}

pub type ChangeListener = Box<dyn Fn(TallyChange) + Send + Sync + 'static>;

/// The shared table of votes every client writes to and reads from.
#[async_trait]
pub trait TallyStore: Send + Sync {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError>;

    async fn get_all_votes(&self) -> Result<Vec<VoteRecord>, StoreError>;

    /// Register `listener` for change notifications until the returned
    /// handle is dropped or unsubscribed.
    fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

/// A registered change listener. Delivery stops when this is dropped.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn listen(
        mut receiver: broadcast::Receiver<TallyChange>,
        listener: ChangeListener,
    ) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(change) => listener(change),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Tally listener lagged, skipped {} notification(s)", skipped);
                        listener(TallyChange::Resync);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn unsubscribe(mut self) {
        self.stop();
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Tally listener unsubscribed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct Database {
    pool: SqlitePool,
    changes: broadcast::Sender<TallyChange>,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self, StoreError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating vote database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Self::from_pool(pool).await
    }

    /// A private in-memory database. One connection that never expires,
    /// otherwise the data disappears with it.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        Self::init_schema(&pool).await?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self { pool, changes })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id TEXT PRIMARY KEY,
                fighter TEXT NOT NULL,
                round INTEGER,
                how TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Bumped on every row mutation so other processes' writes are visible
        // to the change watcher.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tally_revision (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                revision INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("INSERT OR IGNORE INTO tally_revision (id, revision) VALUES (1, 0)")
            .execute(pool)
            .await?;

        for event in ["INSERT", "UPDATE", "DELETE"] {
            let trigger = format!(
                r#"
                CREATE TRIGGER IF NOT EXISTS votes_after_{name} AFTER {event} ON votes
                BEGIN
                    UPDATE tally_revision SET revision = revision + 1 WHERE id = 1;
                END;
                "#,
                name = event.to_ascii_lowercase(),
                event = event,
            );
            sqlx::query(&trigger).execute(pool).await?;
        }

        Ok(())
    }

    /// Current revision of the votes table.
    pub async fn revision(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT revision FROM tally_revision WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("revision")?)
    }

    pub fn notify(&self, change: TallyChange) {
        if self.changes.send(change).is_err() {
            debug!("Tally changed with no listeners registered");
        }
    }
}

#[async_trait]
impl TallyStore for Database {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO votes (id, fighter, round, how, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(record.fighter.key())
        .bind(record.round.map(i64::from))
        .bind(record.how.map(|how| how.code()))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("Recorded vote for {}", record.fighter);
        self.notify(TallyChange::Inserted(record.clone()));
        Ok(())
    }

    async fn get_all_votes(&self) -> Result<Vec<VoteRecord>, StoreError> {
        let rows = sqlx::query("SELECT fighter, round, how FROM votes")
            .fetch_all(&self.pool)
            .await?;

        let mut votes = Vec::with_capacity(rows.len());
        for row in &rows {
            match parse_vote_row(row) {
                Ok(vote) => votes.push(vote),
                Err(e) => warn!("Skipping vote row: {}", e),
            }
        }

        debug!("Fetched {} of {} vote row(s)", votes.len(), rows.len());
        Ok(votes)
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        Subscription::listen(self.changes.subscribe(), listener)
    }
}

fn parse_vote_row(row: &SqliteRow) -> Result<VoteRecord, StoreError> {
    let fighter = row
        .try_get::<String, _>("fighter")?
        .parse()
        .map_err(StoreError::MalformedRow)?;

    let round = match row.try_get::<Option<i64>, _>("round")? {
        Some(round) => Some(
            u32::try_from(round)
                .map_err(|_| StoreError::MalformedRow(format!("Invalid round: {}", round)))?,
        ),
        None => None,
    };

    let how = match row.try_get::<Option<String>, _>("how")? {
        Some(how) if !how.is_empty() => Some(how.parse().map_err(StoreError::MalformedRow)?),
        _ => None,
    };

    Ok(VoteRecord { fighter, round, how })
}
