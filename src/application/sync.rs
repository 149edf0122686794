//! Notification sync use case
//!
//! Polls the notification source on a fixed interval, reconciles each
//! result into the unread state and hands new top items to the delivery
//! channels. One fetch is in flight at a time: ticks missed during a slow
//! fetch are skipped, manual polls queue behind the running one.

use std::sync::{Arc, Mutex};

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::notification::{Badge, UnreadState};
use crate::domain::preferences::{encode_bool, UserPreferences, SIDEBAR_KEY, SOUND_KEY};
use crate::domain::schedule::Duration;

use super::delivery::{DeliveryChannels, DeliveryReport};
use super::ports::{
    FetchError, KeyValueStore, NotificationPresenter, NotificationSource, SoundPlayer, StoreError,
};

/// Handle for one running poll loop, returned by `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket(u64);

/// Result of one poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Reconciled into the unread state
    Applied {
        badge: Badge,
        delivery: Option<DeliveryReport>,
    },
    /// Fetch resolved after the loop that issued it was stopped
    Discarded,
}

#[derive(Default)]
struct SyncState {
    unread: UnreadState,
    active: Option<PollTicket>,
    next_ticket: u64,
}

struct Shared<S, A, P>
where
    S: NotificationSource,
    A: SoundPlayer,
    P: NotificationPresenter,
{
    source: S,
    delivery: DeliveryChannels<A, P>,
    state: Mutex<SyncState>,
    fetch_gate: AsyncMutex<()>,
    badge_tx: watch::Sender<Badge>,
}

impl<S, A, P> Shared<S, A, P>
where
    S: NotificationSource,
    A: SoundPlayer,
    P: NotificationPresenter,
{
    fn lock_state(&self) -> std::sync::MutexGuard<'_, SyncState> {
        // State is only touched in short synchronous sections
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_active(&self, ticket: PollTicket) -> bool {
        self.lock_state().active == Some(ticket)
    }

    /// Fetch, reconcile and deliver.
    ///
    /// With a ticket, the result is applied only if that loop is still the
    /// active one when the fetch resolves.
    async fn poll(&self, ticket: Option<PollTicket>) -> Result<PollOutcome, FetchError> {
        let _gate = self.fetch_gate.lock().await;

        let items = self.source.fetch_unread().await?;

        let reconciliation = {
            let mut state = self.lock_state();
            if let Some(ticket) = ticket {
                if state.active != Some(ticket) {
                    log::debug!("Discarding poll result from stopped loop");
                    return Ok(PollOutcome::Discarded);
                }
            }
            let reconciliation = state.unread.reconcile(&items);
            // Published under the state lock: the badge always equals the count
            self.badge_tx.send_replace(reconciliation.badge);
            reconciliation
        };

        // An aborted delivery leaves the item undelivered for the next poll
        let delivery = match reconciliation.deliver {
            Some(item) => {
                log::info!("New notification {} ({})", item.id, item.kind);
                let report = self.delivery.deliver(&item).await;
                self.lock_state().unread.mark_delivered(&item.id);
                Some(report)
            }
            None => None,
        };

        Ok(PollOutcome::Applied {
            badge: reconciliation.badge,
            delivery,
        })
    }

    async fn run(self: Arc<Self>, ticket: PollTicket, interval: Duration) {
        let mut ticker = tokio::time::interval(interval.as_std());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // First tick completes immediately
            ticker.tick().await;
            if !self.is_active(ticket) {
                break;
            }
            if let Err(e) = self.poll(Some(ticket)).await {
                log::warn!("Failed to fetch notifications: {}", e);
            }
        }
    }
}

/// Notification polling, reconciliation and delivery
pub struct NotificationSync<S, A, P, K>
where
    S: NotificationSource + 'static,
    A: SoundPlayer + 'static,
    P: NotificationPresenter + 'static,
    K: KeyValueStore,
{
    shared: Arc<Shared<S, A, P>>,
    store: K,
    preferences: Mutex<UserPreferences>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S, A, P, K> NotificationSync<S, A, P, K>
where
    S: NotificationSource + 'static,
    A: SoundPlayer + 'static,
    P: NotificationPresenter + 'static,
    K: KeyValueStore,
{
    /// Create a stopped sync with an empty unread state.
    ///
    /// Preferences are read from the store once here; unreadable
    /// preferences fall back to defaults.
    pub async fn create(source: S, delivery: DeliveryChannels<A, P>, store: K) -> Self {
        let preferences = load_preferences(&store).await;
        delivery.set_sound_enabled(preferences.sound_enabled);

        let (badge_tx, _) = watch::channel(Badge::Hidden);

        Self {
            shared: Arc::new(Shared {
                source,
                delivery,
                state: Mutex::new(SyncState::default()),
                fetch_gate: AsyncMutex::new(()),
                badge_tx,
            }),
            store,
            preferences: Mutex::new(preferences),
            task: Mutex::new(None),
        }
    }

    /// Start polling. The first poll runs immediately.
    ///
    /// Calling this while already running returns the current ticket and
    /// changes nothing.
    pub async fn start(&self, interval: Duration) -> PollTicket {
        if let Some(ticket) = self.shared.lock_state().active {
            return ticket;
        }

        self.shared.delivery.prepare_permission().await;

        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        let ticket = {
            let mut state = self.shared.lock_state();
            if let Some(ticket) = state.active {
                return ticket;
            }
            let ticket = PollTicket(state.next_ticket);
            state.next_ticket += 1;
            state.active = Some(ticket);
            ticket
        };

        log::debug!("Polling notifications every {}", interval);
        *task = Some(tokio::spawn(Arc::clone(&self.shared).run(ticket, interval)));
        ticket
    }

    /// Stop polling. Returns false when nothing was running.
    pub fn stop(&self) -> bool {
        let was_running = self.shared.lock_state().active.take().is_some();
        if let Some(handle) = self.task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
        was_running
    }

    /// Stop polling and release the component
    pub fn dispose(self) {
        self.stop();
        self.shared.badge_tx.send_replace(Badge::Hidden);
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock_state().active.is_some()
    }

    /// Poll once right now, queued behind any in-flight fetch
    pub async fn poll_now(&self) -> Result<PollOutcome, FetchError> {
        self.shared.poll(None).await
    }

    /// Acknowledge one notification locally, without a server round-trip
    pub fn acknowledge(&self) -> Badge {
        let mut state = self.shared.lock_state();
        let badge = state.unread.acknowledge();
        self.shared.badge_tx.send_replace(badge);
        badge
    }

    pub fn badge(&self) -> Badge {
        *self.shared.badge_tx.borrow()
    }

    /// Watch badge changes
    pub fn subscribe(&self) -> watch::Receiver<Badge> {
        self.shared.badge_tx.subscribe()
    }

    /// Snapshot of the unread state
    pub fn unread(&self) -> UnreadState {
        self.shared.lock_state().unread.clone()
    }

    pub fn preferences(&self) -> UserPreferences {
        *self.preferences.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Toggle the sound preference and persist it
    pub async fn set_sound_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.store.set(SOUND_KEY, encode_bool(enabled)).await?;
        self.shared.delivery.set_sound_enabled(enabled);
        self.preferences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sound_enabled = enabled;
        Ok(())
    }
}

impl<S, A, P, K> Drop for NotificationSync<S, A, P, K>
where
    S: NotificationSource + 'static,
    A: SoundPlayer + 'static,
    P: NotificationPresenter + 'static,
    K: KeyValueStore,
{
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

/// Read user preferences, falling back to defaults on storage errors
pub async fn load_preferences<K: KeyValueStore + ?Sized>(store: &K) -> UserPreferences {
    let sound = store.get(SOUND_KEY).await;
    let sidebar = store.get(SIDEBAR_KEY).await;

    match (sound, sidebar) {
        (Ok(sound), Ok(sidebar)) => {
            UserPreferences::from_stored(sound.as_deref(), sidebar.as_deref())
        }
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("Using default preferences: {}", e);
            UserPreferences::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::delivery::tests::{MockPresenter, MockSound};
    use crate::application::delivery::{ChannelOutcome, DeliveryConfig};
    use crate::application::ports::NotificationIcon;
    use crate::domain::notification::{
        NotificationId, NotificationItem, NotificationType, PermissionState,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    /// Source that replays scripted results, repeating the last one
    #[derive(Clone)]
    struct ScriptedSource {
        script: Arc<Mutex<VecDeque<Result<Vec<NotificationItem>, FetchError>>>>,
        last: Arc<Mutex<Result<Vec<NotificationItem>, FetchError>>>,
        calls: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        delay: Option<StdDuration>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Vec<NotificationItem>, FetchError>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                last: Arc::new(Mutex::new(Ok(Vec::new()))),
                calls: Arc::new(AtomicUsize::new(0)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
                delay: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationSource for ScriptedSource {
        async fn fetch_unread(&self) -> Result<Vec<NotificationItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(result) => {
                    *self.last.lock().unwrap() = result.clone();
                    result
                }
                None => self.last.lock().unwrap().clone(),
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
            let mut entries: Vec<_> = self
                .values
                .lock()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            entries.sort();
            Ok(entries)
        }
    }

    fn due_soon() -> NotificationItem {
        NotificationItem::new("5", "Due", "Task X due", NotificationType::DueSoon)
    }

    fn reminder(id: &str) -> NotificationItem {
        NotificationItem::new(id, "Reminder", "Check in", NotificationType::Reminder)
    }

    struct Fixture {
        source: ScriptedSource,
        sound: MockSound,
        presenter: MockPresenter,
    }

    impl Fixture {
        fn new(script: Vec<Result<Vec<NotificationItem>, FetchError>>) -> Self {
            Self {
                source: ScriptedSource::new(script),
                sound: MockSound::default(),
                presenter: MockPresenter::with_permission(PermissionState::Granted),
            }
        }

        async fn build(
            &self,
            store: MemoryStore,
        ) -> NotificationSync<ScriptedSource, MockSound, MockPresenter, MemoryStore> {
            let delivery = DeliveryChannels::new(
                self.sound.clone(),
                self.presenter.clone(),
                DeliveryConfig::default(),
            );
            NotificationSync::create(self.source.clone(), delivery, store).await
        }
    }

    #[tokio::test]
    async fn end_to_end_due_soon_flow() {
        let fx = Fixture::new(vec![Ok(vec![due_soon()]), Ok(vec![due_soon()]), Ok(vec![])]);
        let sync = fx.build(MemoryStore::default()).await;

        let first = sync.poll_now().await.unwrap();
        assert_eq!(sync.badge().to_string(), "1");
        assert_eq!(sync.unread().last_delivered_id(), Some(&NotificationId::from("5")));
        match first {
            PollOutcome::Applied { delivery, .. } => {
                assert_eq!(delivery.unwrap().desktop, ChannelOutcome::Delivered);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        {
            let shown = fx.presenter.shown.lock().unwrap();
            assert_eq!(shown.len(), 1);
            assert_eq!(shown[0].icon, NotificationIcon::DueSoon);
        }

        sync.poll_now().await.unwrap();
        assert_eq!(fx.presenter.shown_count(), 1);
        assert_eq!(fx.sound.plays.load(Ordering::SeqCst), 1);

        sync.poll_now().await.unwrap();
        assert!(sync.badge().is_hidden());
        assert_eq!(sync.unread().last_delivered_id(), Some(&NotificationId::from("5")));
    }

    #[tokio::test]
    async fn acknowledge_updates_badge_and_floors() {
        let fx = Fixture::new(vec![Ok(vec![reminder("2"), reminder("1")])]);
        let sync = fx.build(MemoryStore::default()).await;
        let mut badges = sync.subscribe();

        sync.poll_now().await.unwrap();
        assert_eq!(*badges.borrow_and_update(), Badge::Visible(2));

        assert_eq!(sync.acknowledge(), Badge::Visible(1));
        assert_eq!(sync.acknowledge(), Badge::Hidden);
        assert_eq!(sync.acknowledge(), Badge::Hidden);
        assert!(badges.has_changed().unwrap());
        assert_eq!(*badges.borrow_and_update(), Badge::Hidden);
    }

    #[tokio::test]
    async fn disabled_sound_preference_is_loaded_from_store() {
        let store = MemoryStore::default();
        store.set(SOUND_KEY, "false").await.unwrap();
        let fx = Fixture::new(vec![Ok(vec![reminder("1")]), Ok(vec![reminder("2")])]);
        let sync = fx.build(store).await;

        assert!(!sync.preferences().sound_enabled);
        sync.poll_now().await.unwrap();
        sync.poll_now().await.unwrap();

        assert_eq!(fx.sound.plays.load(Ordering::SeqCst), 0);
        assert_eq!(fx.presenter.shown_count(), 2);
    }

    #[tokio::test]
    async fn sound_toggle_is_persisted() {
        let fx = Fixture::new(vec![]);
        let sync = fx.build(MemoryStore::default()).await;

        sync.set_sound_enabled(false).await.unwrap();

        assert_eq!(sync.store.get(SOUND_KEY).await.unwrap().as_deref(), Some("false"));
        assert!(!sync.preferences().sound_enabled);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_untouched() {
        let fx = Fixture::new(vec![
            Ok(vec![reminder("1")]),
            Err(FetchError::Network("connection refused".to_string())),
        ]);
        let sync = fx.build(MemoryStore::default()).await;

        sync.poll_now().await.unwrap();
        let before = sync.unread();

        assert!(sync.poll_now().await.is_err());
        let after = sync.unread();
        assert_eq!(after.count(), before.count());
        assert_eq!(after.last_delivered_id(), before.last_delivered_id());
        assert_eq!(sync.badge(), Badge::Visible(1));
    }

    #[tokio::test(start_paused = true)]
    async fn first_poll_is_immediate_and_ticks_continue() {
        let fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        let sync = fx.build(MemoryStore::default()).await;

        sync.start(Duration::from_secs(30)).await;
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        assert_eq!(fx.source.calls(), 1);
        assert_eq!(sync.badge(), Badge::Visible(1));

        tokio::time::sleep(StdDuration::from_secs(30)).await;
        assert_eq!(fx.source.calls(), 2);
        // Same top item, no second alert
        assert_eq!(fx.presenter.shown_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_does_not_stop_timer() {
        let fx = Fixture::new(vec![
            Err(FetchError::Server { status: 500 }),
            Err(FetchError::MalformedPayload("expected value".to_string())),
            Ok(vec![reminder("9")]),
        ]);
        let sync = fx.build(MemoryStore::default()).await;

        sync.start(Duration::from_secs(30)).await;
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        assert_eq!(fx.source.calls(), 1);
        assert!(sync.badge().is_hidden());
        assert_eq!(sync.unread().count(), 0);

        tokio::time::sleep(StdDuration::from_secs(60)).await;
        assert_eq!(fx.source.calls(), 3);
        assert!(sync.is_running());
        assert_eq!(sync.badge(), Badge::Visible(1));
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        let sync = fx.build(MemoryStore::default()).await;

        let first = sync.start(Duration::from_secs(30)).await;
        let second = sync.start(Duration::from_secs(30)).await;
        assert_eq!(first, second);

        tokio::time::sleep(StdDuration::from_millis(10)).await;
        assert_eq!(fx.source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_timer_and_is_safe_when_stopped() {
        let fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        let sync = fx.build(MemoryStore::default()).await;

        assert!(!sync.stop());

        sync.start(Duration::from_secs(30)).await;
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        assert!(sync.stop());
        assert!(!sync.is_running());

        tokio::time::sleep(StdDuration::from_secs(120)).await;
        assert_eq!(fx.source.calls(), 1);
        assert!(!sync.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_issues_new_ticket() {
        let fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        let sync = fx.build(MemoryStore::default()).await;

        let first = sync.start(Duration::from_secs(30)).await;
        sync.stop();
        let second = sync.start(Duration::from_secs(30)).await;
        assert_ne!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn result_from_stopped_loop_is_discarded() {
        let mut fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        fx.source.delay = Some(StdDuration::from_secs(5));
        let sync = fx.build(MemoryStore::default()).await;

        sync.start(Duration::from_secs(30)).await;
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        assert_eq!(fx.source.calls(), 1);

        // Fetch is still in flight
        let ticket = PollTicket(0);
        sync.shared.lock_state().active = None;
        let outcome = sync.shared.poll(Some(ticket)).await.unwrap();
        assert_eq!(outcome, PollOutcome::Discarded);
        assert!(sync.badge().is_hidden());
        assert_eq!(fx.presenter.shown_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_never_overlaps_next_tick() {
        let mut fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        fx.source.delay = Some(StdDuration::from_secs(45));
        let sync = fx.build(MemoryStore::default()).await;

        sync.start(Duration::from_secs(30)).await;

        // The 30s tick elapses while the first fetch is still running
        tokio::time::sleep(StdDuration::from_secs(44)).await;
        assert_eq!(fx.source.calls(), 1);

        tokio::time::sleep(StdDuration::from_secs(150)).await;
        assert!(fx.source.calls() > 1);
        assert_eq!(fx.source.max_in_flight.load(Ordering::SeqCst), 1);
        sync.stop();
    }

    #[tokio::test]
    async fn permission_requested_at_start_only_from_default() {
        let mut fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        fx.presenter = MockPresenter::with_permission(PermissionState::Default);
        fx.presenter.answer = PermissionState::Denied;
        let sync = fx.build(MemoryStore::default()).await;

        sync.start(Duration::from_secs(30)).await;
        sync.stop();
        sync.start(Duration::from_secs(30)).await;
        sync.stop();

        assert_eq!(fx.presenter.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn badge_matches_count_when_acknowledge_races_poll() {
        let fx = Fixture::new(vec![Ok(vec![reminder("2"), reminder("1")])]);
        let sync = Arc::new(fx.build(MemoryStore::default()).await);

        for _ in 0..2_000 {
            let poller = Arc::clone(&sync);
            let poll = tokio::spawn(async move { poller.poll_now().await });
            let acker = Arc::clone(&sync);
            let ack = tokio::spawn(async move { acker.acknowledge() });

            poll.await.unwrap().unwrap();
            ack.await.unwrap();
            assert_eq!(sync.badge(), sync.unread().badge());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_delivery_alerts_again_after_restart() {
        let mut fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        fx.sound.delay = Some(StdDuration::from_secs(10));
        let sync = fx.build(MemoryStore::default()).await;

        sync.start(Duration::from_secs(30)).await;
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        // Chime still playing
        assert_eq!(fx.sound.plays.load(Ordering::SeqCst), 1);
        assert!(sync.unread().last_delivered_id().is_none());
        sync.stop();

        sync.start(Duration::from_secs(30)).await;
        tokio::time::sleep(StdDuration::from_secs(20)).await;

        assert_eq!(fx.sound.plays.load(Ordering::SeqCst), 2);
        assert_eq!(fx.presenter.shown_count(), 2);
        assert_eq!(sync.unread().last_delivered_id(), Some(&NotificationId::from("1")));
        sync.stop();
    }

    #[tokio::test]
    async fn dispose_hides_badge() {
        let fx = Fixture::new(vec![Ok(vec![reminder("1")])]);
        let sync = fx.build(MemoryStore::default()).await;
        let badges = sync.subscribe();

        sync.poll_now().await.unwrap();
        sync.dispose();
        assert_eq!(*badges.borrow(), Badge::Hidden);
    }
}
