mod vote;

use crate::commands::{Command, HELP};
use crate::db::{Subscription, TallyChange, TallyStore};
use crate::error::AppError;
use crate::memory::{VoteMemory, VOTE_KEY};
use crate::models::VoteRecord;
use crate::toast::{self, Notification};
use crate::view;
use crate::voting::{calculate_stats, VoteStats, Wizard, WizardAction};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

const FETCH_FAILED: &str = "Failed to fetch votes. Please refresh the page.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    TallyChanged(TallyChange),
}

/// The voting page: wizard, derived stats, and the user's remembered vote.
pub struct App {
    store: Arc<dyn TallyStore>,
    memory: Box<dyn VoteMemory>,
    wizard: Wizard,
    stats: VoteStats,
    show_stats: bool,
    notifications: Vec<Notification>,
    subscription: Option<Subscription>,
}

impl App {
    pub fn new(store: Arc<dyn TallyStore>, memory: Box<dyn VoteMemory>) -> Self {
        Self {
            store,
            memory,
            wizard: Wizard::new(),
            stats: VoteStats::default(),
            show_stats: false,
            notifications: Vec::new(),
            subscription: None,
        }
    }

    /// Restore the remembered vote, start listening for changes and load the
    /// tally. Every change is forwarded to `events`.
    pub async fn mount(&mut self, events: UnboundedSender<AppEvent>) {
        self.restore_vote();

        // Subscribe before the first load so a write landing in between is
        // still announced.
        let subscription = self.store.subscribe(Box::new(move |change| {
            if events.send(AppEvent::TallyChanged(change)).is_err() {
                debug!("Dropping tally change, the page is gone");
            }
        }));
        self.subscription = Some(subscription);

        if let Err(e) = self.refresh().await {
            debug!("Initial tally load failed: {}", e);
        }
        info!("Voting page mounted");
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("Voting page unmounted");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    fn restore_vote(&mut self) {
        let remembered = match self.memory.get(VOTE_KEY) {
            Ok(Some(remembered)) => remembered,
            Ok(None) => return,
            Err(e) => {
                warn!("Could not read local vote memory: {}", e);
                return;
            }
        };

        match serde_json::from_str::<VoteRecord>(&remembered) {
            Ok(record) => {
                info!("Restoring earlier vote for {}", record.fighter);
                self.show_stats = true;
                if let Err(e) = self.wizard.update(WizardAction::Restore(record)) {
                    warn!("Could not restore earlier vote: {}", e);
                }
            }
            Err(e) => {
                warn!("Forgetting unreadable local vote: {}", e);
                if let Err(e) = self.memory.remove(VOTE_KEY) {
                    warn!("Could not clear local vote memory: {}", e);
                }
            }
        }
    }

    /// Recompute the stats from every vote in the tally. On failure the
    /// previous stats stay on screen.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        match self.store.get_all_votes().await {
            Ok(votes) => {
                self.stats = calculate_stats(&votes);
                debug!("Tally now at {} vote(s)", self.stats.total());
                Ok(())
            }
            Err(e) => {
                error!("Error fetching votes: {}", e);
                self.notify(Notification::error(FETCH_FAILED));
                Err(AppError::Fetch(e))
            }
        }
    }

    pub async fn handle_command(&mut self, command: Command) -> Result<(), AppError> {
        debug!("Received command: {:?}", command);
        match command {
            Command::Vote(fighter) => self.pick_fighter(fighter),
            Command::Round(round) => self.pick_round(round),
            Command::Method(how) => self.select_method(how).await,
            Command::VoteAgain => {
                self.reset_vote();
                Ok(())
            }
            Command::ToggleStats => {
                self.show_stats = !self.show_stats;
                Ok(())
            }
            Command::Smack(fighter) => {
                let quote = toast::pick_quote(fighter, &mut rand::rng());
                self.notify(Notification::info(quote).with_icon(toast::GLOVE));
                Ok(())
            }
            Command::Refresh => self.refresh().await,
            Command::Help => {
                self.notify(Notification::info(HELP));
                Ok(())
            }
            // The terminal loop owns quitting.
            Command::Quit => Ok(()),
        }
    }

    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TallyChanged(change) => {
                debug!("Tally changed: {:?}", change);
                if let Err(e) = self.refresh().await {
                    debug!("Refresh after tally change failed: {}", e);
                }
            }
        }
    }

    pub fn stats(&self) -> &VoteStats {
        &self.stats
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn show_stats(&self) -> bool {
        self.show_stats
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn render(&self) -> String {
        view::render_page(&self.stats, &self.wizard, self.show_stats)
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::StoreError;
    use crate::memory::InMemoryVoteMemory;
    use crate::models::{Fighter, WinMethod};
    use crate::toast::Level;
    use crate::voting::Step;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// A real database whose reads and writes can be made to fail.
    struct FlakyStore {
        inner: Database,
        fail_inserts: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl FlakyStore {
        async fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: Database::in_memory().await.unwrap(),
                fail_inserts: AtomicBool::new(false),
                fail_reads: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl TallyStore for FlakyStore {
        async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner.insert_vote(record).await
        }

        async fn get_all_votes(&self) -> Result<Vec<VoteRecord>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner.get_all_votes().await
        }

        fn subscribe(&self, listener: crate::db::ChangeListener) -> Subscription {
            self.inner.subscribe(listener)
        }
    }

    /// Lets another client write right after the first full read.
    struct RacingStore {
        inner: Database,
        raced: AtomicBool,
    }

    #[async_trait]
    impl TallyStore for RacingStore {
        async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError> {
            self.inner.insert_vote(record).await
        }

        async fn get_all_votes(&self) -> Result<Vec<VoteRecord>, StoreError> {
            let votes = self.inner.get_all_votes().await?;
            if !self.raced.swap(true, Ordering::SeqCst) {
                sqlx::query(
                    "INSERT INTO votes (id, fighter, round, how, created_at) \
                     VALUES ('late', 'paul', NULL, NULL, 'now')",
                )
                .execute(self.inner.pool())
                .await?;
                let revision = self.inner.revision().await?;
                self.inner.notify(TallyChange::Revision(revision));
            }
            Ok(votes)
        }

        fn subscribe(&self, listener: crate::db::ChangeListener) -> Subscription {
            self.inner.subscribe(listener)
        }
    }

    async fn mounted(
        store: Arc<dyn TallyStore>,
        memory: InMemoryVoteMemory,
    ) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::new(store, Box::new(memory));
        app.mount(tx).await;
        (app, rx)
    }

    async fn cast(
        app: &mut App,
        fighter: Fighter,
        round: u32,
        how: WinMethod,
    ) -> Result<(), AppError> {
        app.handle_command(Command::Vote(fighter)).await?;
        app.handle_command(Command::Round(round)).await?;
        app.handle_command(Command::Method(how)).await
    }

    #[tokio::test]
    async fn test_submit_records_one_vote_and_resets() {
        let store = FlakyStore::new().await;
        let (mut app, _rx) = mounted(Arc::<FlakyStore>::clone(&store), InMemoryVoteMemory::default()).await;
        assert_eq!(app.stats().total(), 0);
        assert!(!app.show_stats());

        cast(&mut app, Fighter::Tyson, 3, WinMethod::Ko).await.unwrap();

        let votes = store.get_all_votes().await.unwrap();
        assert_eq!(
            votes,
            vec![VoteRecord {
                fighter: Fighter::Tyson,
                round: Some(3),
                how: Some(WinMethod::Ko),
            }]
        );
        assert!(app.wizard().has_voted());
        assert_eq!(app.wizard().step(), Step::SelectFighter);
        assert!(app.show_stats());
        assert_eq!(app.stats().by_fighter.tyson, 1);
        assert_eq!(app.stats().by_round.get(&3), Some(&1));

        let remembered = app.memory.get(VOTE_KEY).unwrap().unwrap();
        assert_eq!(remembered, r#"{"fighter":"tyson","round":3,"how":"KO"}"#);

        let notifications = app.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, Level::Success);
        assert!(toast::quotes(Fighter::Tyson).contains(&notifications[0].message.as_str()));
    }

    #[tokio::test]
    async fn test_vote_again_keeps_earlier_record() {
        let store = FlakyStore::new().await;
        let (mut app, _rx) = mounted(Arc::<FlakyStore>::clone(&store), InMemoryVoteMemory::default()).await;
        cast(&mut app, Fighter::Paul, 5, WinMethod::Ud).await.unwrap();

        app.handle_command(Command::VoteAgain).await.unwrap();
        assert!(!app.wizard().has_voted());
        assert_eq!(app.memory.get(VOTE_KEY).unwrap(), None);

        app.handle_command(Command::Refresh).await.unwrap();
        assert_eq!(app.stats().by_fighter.paul, 1);

        // And the client may vote again.
        cast(&mut app, Fighter::Tyson, 1, WinMethod::Tko).await.unwrap();
        assert_eq!(app.stats().total(), 2);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_method_step() {
        let store = FlakyStore::new().await;
        let (mut app, _rx) = mounted(Arc::<FlakyStore>::clone(&store), InMemoryVoteMemory::default()).await;
        store.fail_inserts.store(true, Ordering::SeqCst);

        let result = cast(&mut app, Fighter::Tyson, 2, WinMethod::Dq).await;
        assert!(matches!(result, Err(AppError::Submit(_))));
        assert_eq!(app.wizard().step(), Step::SelectMethod);
        assert_eq!(app.wizard().draft().fighter, Some(Fighter::Tyson));
        assert_eq!(app.wizard().draft().round, Some(2));
        assert!(!app.wizard().has_voted());
        assert_eq!(app.memory.get(VOTE_KEY).unwrap(), None);

        let notifications = app.take_notifications();
        assert_eq!(
            notifications,
            vec![Notification::error("Failed to cast vote. Please try again.")]
        );

        // Retry with only the method.
        store.fail_inserts.store(false, Ordering::SeqCst);
        app.handle_command(Command::Method(WinMethod::Dq)).await.unwrap();
        assert!(app.wizard().has_voted());
        assert_eq!(store.get_all_votes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_stats() {
        let store = FlakyStore::new().await;
        store.insert_vote(&VoteRecord::new(Fighter::Paul)).await.unwrap();
        let (mut app, _rx) = mounted(Arc::<FlakyStore>::clone(&store), InMemoryVoteMemory::default()).await;
        assert_eq!(app.stats().total(), 1);

        store.fail_reads.store(true, Ordering::SeqCst);
        store.insert_vote(&VoteRecord::new(Fighter::Tyson)).await.unwrap();
        let result = app.handle_command(Command::Refresh).await;

        assert!(matches!(result, Err(AppError::Fetch(_))));
        assert_eq!(app.stats().total(), 1);
        assert_eq!(app.take_notifications(), vec![Notification::error(FETCH_FAILED)]);
    }

    #[tokio::test]
    async fn test_mount_restores_remembered_vote() {
        let store = FlakyStore::new().await;
        let mut memory = InMemoryVoteMemory::default();
        memory
            .set(VOTE_KEY, r#"{"fighter":"paul","round":8,"how":"SD"}"#.to_string())
            .unwrap();

        let (mut app, _rx) = mounted(store, memory).await;
        assert!(app.wizard().has_voted());
        assert!(app.show_stats());
        assert_eq!(app.wizard().draft().how, Some(WinMethod::Sd));

        let result = app.handle_command(Command::Vote(Fighter::Tyson)).await;
        assert!(matches!(result, Err(AppError::Wizard(_))));
    }

    #[tokio::test]
    async fn test_mount_forgets_garbage_memory() {
        let store = FlakyStore::new().await;
        let mut memory = InMemoryVoteMemory::default();
        memory.set(VOTE_KEY, "{not json".to_string()).unwrap();

        let (app, _rx) = mounted(store, memory).await;
        assert!(!app.wizard().has_voted());
        assert_eq!(app.memory.get(VOTE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_clients_votes_arrive_through_subscription() {
        let store = FlakyStore::new().await;
        let (mut app, mut rx) = mounted(Arc::<FlakyStore>::clone(&store), InMemoryVoteMemory::default()).await;
        assert!(app.is_subscribed());

        store.insert_vote(&VoteRecord::new(Fighter::Tyson)).await.unwrap();
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        app.handle_event(event).await;

        assert_eq!(app.stats().by_fighter.tyson, 1);
    }

    #[tokio::test]
    async fn test_write_during_first_load_is_announced() {
        let store = Arc::new(RacingStore {
            inner: Database::in_memory().await.unwrap(),
            raced: AtomicBool::new(false),
        });
        let (mut app, mut rx) = mounted(store, InMemoryVoteMemory::default()).await;
        assert_eq!(app.stats().total(), 0);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, AppEvent::TallyChanged(TallyChange::Revision(1)));
        app.handle_event(event).await;

        assert_eq!(app.stats().by_fighter.paul, 1);
    }

    #[tokio::test]
    async fn test_unmount_stops_change_events() {
        let store = FlakyStore::new().await;
        let (mut app, mut rx) = mounted(Arc::<FlakyStore>::clone(&store), InMemoryVoteMemory::default()).await;

        app.unmount();
        assert!(!app.is_subscribed());
        store.insert_vote(&VoteRecord::new(Fighter::Paul)).await.unwrap();

        let result = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(!matches!(result, Ok(Some(_))));
    }

    #[tokio::test]
    async fn test_toggle_and_smack() {
        let store = FlakyStore::new().await;
        let (mut app, _rx) = mounted(store, InMemoryVoteMemory::default()).await;

        app.handle_command(Command::ToggleStats).await.unwrap();
        assert!(app.show_stats());
        assert!(app.render().contains("Top Methods"));

        app.handle_command(Command::Smack(Fighter::Paul)).await.unwrap();
        let notifications = app.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert!(toast::quotes(Fighter::Paul).contains(&notifications[0].message.as_str()));
        assert_eq!(notifications[0].icon, Some(toast::GLOVE));

        app.handle_command(Command::Help).await.unwrap();
        let notifications = app.take_notifications();
        assert_eq!(notifications, vec![Notification::info(HELP)]);
        assert_eq!(notifications[0].icon, None);
    }
}
