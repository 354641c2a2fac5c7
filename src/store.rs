//! The client-side state container for the dashboard's remote data.
//!
//! The store holds one [Slice] per resource (user, wallet and transactions).
//! Every action publishes a new [StoreSnapshot] through a watch channel, so
//! readers always see a consistent, immutable copy and can subscribe to
//! changes instead of polling.
//!
//! Each slice numbers its requests. When two fetches of the same resource
//! overlap, only the response to the most recently issued request is kept,
//! whichever order the responses arrive in.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{
    gateway::{DataGateway, GatewayError},
    models::{Transaction, User, Wallet},
};

/// The state of one remote resource.
///
/// `is_loading` and a populated `error` are never set at the same time: a
/// new fetch clears the previous error before it starts loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    data: T,
    is_loading: bool,
    error: Option<GatewayError>,
    generation: u64,
    latest_request: u64,
}

impl<T> Slice<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
            generation: 0,
            latest_request: 0,
        }
    }

    /// The most recently loaded data, or the initial empty value.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Whether a request for this resource is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The error from the latest request, if it failed.
    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    /// How many times the data has been replaced by a successful fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the resource has never been requested.
    pub fn is_unloaded(&self) -> bool {
        self.latest_request == 0
    }
}

/// A point-in-time copy of everything the store holds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// The signed-in user.
    pub user: Slice<Option<User>>,
    /// The user's wallet.
    pub wallet: Slice<Option<Wallet>>,
    /// Every transaction, in the order the API returned them.
    pub transactions: Slice<Arc<[Transaction]>>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            user: Slice::new(None),
            wallet: Slice::new(None),
            transactions: Slice::new(Arc::from(Vec::new())),
        }
    }
}

impl StoreSnapshot {
    /// Whether any resource is loading.
    pub fn is_loading(&self) -> bool {
        self.user.is_loading || self.wallet.is_loading || self.transactions.is_loading
    }

    /// The first error found, checking the user, wallet and transactions in
    /// that order.
    pub fn first_error(&self) -> Option<&GatewayError> {
        self.user
            .error()
            .or(self.wallet.error())
            .or(self.transactions.error())
    }
}

fn user_slice(snapshot: &mut StoreSnapshot) -> &mut Slice<Option<User>> {
    &mut snapshot.user
}

fn wallet_slice(snapshot: &mut StoreSnapshot) -> &mut Slice<Option<Wallet>> {
    &mut snapshot.wallet
}

fn transactions_slice(snapshot: &mut StoreSnapshot) -> &mut Slice<Arc<[Transaction]>> {
    &mut snapshot.transactions
}

/// The dashboard's data store.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct DashboardStore {
    gateway: Arc<dyn DataGateway>,
    state: Arc<watch::Sender<StoreSnapshot>>,
}

impl DashboardStore {
    /// Create an empty store that loads data through `gateway`.
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());

        Self {
            gateway,
            state: Arc::new(state),
        }
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    /// A receiver that is notified every time a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    /// Wait until no resource is loading, or until `timeout` has passed.
    ///
    /// Returns the settled snapshot, or the latest snapshot (still loading)
    /// on timeout.
    pub async fn wait_until_settled(&self, timeout: Duration) -> StoreSnapshot {
        let mut receiver = self.subscribe();

        let settled = tokio::time::timeout(timeout, async {
            receiver
                .wait_for(|snapshot| !snapshot.is_loading())
                .await
                .map(|snapshot| snapshot.clone())
        })
        .await;

        match settled {
            Ok(Ok(snapshot)) => snapshot,
            // The sender lives as long as `self`, so the channel cannot close here.
            Ok(Err(_)) | Err(_) => self.snapshot(),
        }
    }

    /// Load the user.
    pub async fn fetch_user(&self) {
        let request_id = self.begin_request(user_slice);
        self.load_user(request_id).await
    }

    /// Load the wallet.
    pub async fn fetch_wallet(&self) {
        let request_id = self.begin_request(wallet_slice);
        self.load_wallet(request_id).await
    }

    /// Load every transaction, replacing the previous list wholesale.
    pub async fn fetch_transactions(&self) {
        let request_id = self.begin_request(transactions_slice);
        self.load_transactions(request_id).await
    }

    /// Load all three resources concurrently.
    ///
    /// The requests are independent: one failing does not stop the others.
    pub async fn fetch_all(&self) {
        tokio::join!(
            self.fetch_user(),
            self.fetch_wallet(),
            self.fetch_transactions()
        );
    }

    /// Start [DashboardStore::fetch_all] in the background.
    ///
    /// All three slices are marked as loading before this returns.
    pub fn spawn_fetch_all(&self) {
        let user_request = self.begin_request(user_slice);
        let wallet_request = self.begin_request(wallet_slice);
        let transactions_request = self.begin_request(transactions_slice);

        let store = self.clone();
        tokio::spawn(async move {
            tokio::join!(
                store.load_user(user_request),
                store.load_wallet(wallet_request),
                store.load_transactions(transactions_request)
            );
        });
    }

    async fn load_user(&self, request_id: u64) {
        let gateway = self.gateway.clone();
        self.finish_request("user", user_slice, request_id, async move {
            gateway.get_user().await.map(Some)
        })
        .await
    }

    async fn load_wallet(&self, request_id: u64) {
        let gateway = self.gateway.clone();
        self.finish_request("wallet", wallet_slice, request_id, async move {
            gateway.get_wallet().await.map(Some)
        })
        .await
    }

    async fn load_transactions(&self, request_id: u64) {
        let gateway = self.gateway.clone();
        self.finish_request("transactions", transactions_slice, request_id, async move {
            gateway.get_transactions().await.map(Arc::from)
        })
        .await
    }

    async fn finish_request<T, F>(
        &self,
        resource: &'static str,
        slice: fn(&mut StoreSnapshot) -> &mut Slice<T>,
        request_id: u64,
        request: F,
    ) where
        F: Future<Output = Result<T, GatewayError>>,
    {
        tracing::debug!("fetching {resource} (request {request_id})");

        let result = request.await;

        self.state.send_if_modified(|snapshot| {
            let slice = slice(snapshot);

            if slice.latest_request != request_id {
                tracing::debug!(
                    "discarding stale {resource} response (request {request_id}, latest {})",
                    slice.latest_request
                );
                return false;
            }

            slice.is_loading = false;

            match result {
                Ok(data) => {
                    slice.data = data;
                    slice.generation += 1;
                    tracing::debug!("loaded {resource} (request {request_id})");
                }
                Err(error) => {
                    tracing::warn!("could not load {resource}: {error}");
                    slice.error = Some(error);
                }
            }

            true
        });
    }

    fn begin_request<T>(&self, slice: fn(&mut StoreSnapshot) -> &mut Slice<T>) -> u64 {
        let mut request_id = 0;

        self.state.send_modify(|snapshot| {
            let slice = slice(snapshot);
            slice.latest_request += 1;
            slice.error = None;
            slice.is_loading = true;
            request_id = slice.latest_request;
        });

        request_id
    }
}


#[cfg(test)]
mod tests {
    use std::{sync::Arc, sync::atomic::Ordering, time::Duration};

    use crate::{
        gateway::GatewayError,
        models::{Transaction, TransactionStatus, User, Wallet},
    };

    use super::{DashboardStore, StoreSnapshot, test_gateway::StubGateway};

    fn test_user() -> User {
        User {
            first_name: "X".to_owned(),
            last_name: String::new(),
            email: "x@example.com".to_owned(),
        }
    }

    fn store_with(gateway: StubGateway) -> (DashboardStore, Arc<StubGateway>) {
        let gateway = Arc::new(gateway);
        (DashboardStore::new(gateway.clone()), gateway)
    }

    async fn wait_for_pending_requests(gateway: &StubGateway, count: usize) {
        for _ in 0..100 {
            if gateway.pending_transaction_requests() == count {
                return;
            }
            tokio::task::yield_now().await;
        }

        panic!(
            "want {count} pending requests, got {}",
            gateway.pending_transaction_requests()
        );
    }

    #[test]
    fn starts_unloaded() {
        let snapshot = StoreSnapshot::default();

        assert!(snapshot.user.is_unloaded());
        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.first_error(), None);
        assert!(snapshot.transactions.data().is_empty());
    }

    #[tokio::test]
    async fn fetch_user_stores_user() {
        let (store, gateway) = store_with(StubGateway::new(
            Ok(test_user()),
            Ok(Wallet::default()),
            Ok(vec![]),
        ));

        store.fetch_user().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.user.is_loading());
        assert_eq!(snapshot.user.error(), None);
        assert_eq!(snapshot.user.data(), &Some(test_user()));
        assert_eq!(gateway.user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_data() {
        let (store, gateway) = store_with(StubGateway::new(
            Ok(test_user()),
            Ok(Wallet::default()),
            Ok(vec![]),
        ));
        store.fetch_user().await;

        gateway.set_user(Err(GatewayError::Generic("boom".to_owned())));
        store.fetch_user().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.user.is_loading());
        assert_eq!(snapshot.user.error().unwrap().to_string(), "boom");
        assert_eq!(snapshot.user.data(), &Some(test_user()));
        assert_eq!(snapshot.user.generation(), 1);
    }

    #[tokio::test]
    async fn failed_first_fetch_leaves_data_empty() {
        let (store, _) = store_with(StubGateway::new(
            Err(GatewayError::Generic("boom".to_owned())),
            Ok(Wallet::default()),
            Ok(vec![]),
        ));

        store.fetch_user().await;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.user.data(), &None);
        assert_eq!(snapshot.user.error().unwrap().to_string(), "boom");
        assert!(!snapshot.user.is_loading());
    }

    #[tokio::test]
    async fn new_fetch_clears_error_while_loading() {
        let (store, gateway) = store_with(StubGateway::new(
            Ok(User::default()),
            Ok(Wallet::default()),
            Err(GatewayError::Network("connection refused".to_owned())),
        ));
        store.fetch_transactions().await;
        assert!(store.snapshot().transactions.error().is_some());

        gateway.hold_transactions();
        let background = store.clone();
        let task = tokio::spawn(async move { background.fetch_transactions().await });
        wait_for_pending_requests(&gateway, 1).await;

        let snapshot = store.snapshot();
        assert!(snapshot.transactions.is_loading());
        assert_eq!(snapshot.transactions.error(), None);

        gateway.respond(0, Ok(vec![Transaction::build(1.0, "deposit", "2023-01-01")]));
        task.await.unwrap();

        let snapshot = store.snapshot();
        assert!(!snapshot.transactions.is_loading());
        assert_eq!(snapshot.transactions.error(), None);
        assert_eq!(snapshot.transactions.data().len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_loads_every_slice() {
        let transactions = vec![
            Transaction::build(1000.0, "deposit", "2023-01-01"),
            Transaction::build(500.0, "withdrawal", "2023-01-02")
                .status(TransactionStatus::Pending),
        ];
        let (store, gateway) = store_with(StubGateway::with_transactions(transactions.clone()));

        store.fetch_all().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.first_error(), None);
        assert_eq!(snapshot.user.data(), &Some(User::default()));
        assert_eq!(snapshot.wallet.data(), &Some(Wallet::default()));
        assert_eq!(
            snapshot.transactions.data().as_ref(),
            transactions.as_slice()
        );
        assert_eq!(gateway.user_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.wallet_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.transaction_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_other_slices() {
        let (store, _) = store_with(StubGateway::new(
            Ok(test_user()),
            Err(GatewayError::Response {
                status: 500,
                body: "internal".to_owned(),
            }),
            Ok(vec![Transaction::build(1.0, "deposit", "2023-01-01")]),
        ));

        store.fetch_all().await;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.user.data(), &Some(test_user()));
        assert_eq!(snapshot.transactions.data().len(), 1);
        assert!(matches!(
            snapshot.first_error(),
            Some(GatewayError::Response { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn first_error_prefers_user_then_wallet() {
        let (store, _) = store_with(StubGateway::new(
            Ok(test_user()),
            Err(GatewayError::Generic("wallet".to_owned())),
            Err(GatewayError::Generic("transactions".to_owned())),
        ));

        store.fetch_all().await;

        assert_eq!(
            store.snapshot().first_error().unwrap().to_string(),
            "wallet"
        );
    }

    #[tokio::test]
    async fn latest_issued_request_wins_when_responses_arrive_out_of_order() {
        let (store, gateway) = store_with(StubGateway::default());
        gateway.hold_transactions();

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_transactions().await })
        };
        wait_for_pending_requests(&gateway, 1).await;
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_transactions().await })
        };
        wait_for_pending_requests(&gateway, 2).await;

        // Answer the newer request first, then the stale one.
        gateway.respond(1, Ok(vec![Transaction::build(2.0, "deposit", "2023-01-02")]));
        second.await.unwrap();
        gateway.respond(0, Ok(vec![Transaction::build(1.0, "deposit", "2023-01-01")]));
        first.await.unwrap();

        let snapshot = store.snapshot();
        assert!(!snapshot.transactions.is_loading());
        assert_eq!(snapshot.transactions.data().len(), 1);
        assert_eq!(snapshot.transactions.data()[0].amount, 2.0);
        assert_eq!(snapshot.transactions.generation(), 1);
    }

    #[tokio::test]
    async fn slice_stays_loading_until_latest_request_resolves() {
        let (store, gateway) = store_with(StubGateway::default());
        gateway.hold_transactions();

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_transactions().await })
        };
        wait_for_pending_requests(&gateway, 1).await;
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_transactions().await })
        };
        wait_for_pending_requests(&gateway, 2).await;

        gateway.respond(0, Err(GatewayError::Generic("stale failure".to_owned())));
        first.await.unwrap();

        let snapshot = store.snapshot();
        assert!(snapshot.transactions.is_loading());
        assert_eq!(snapshot.transactions.error(), None);

        gateway.respond(0, Ok(vec![]));
        second.await.unwrap();
        assert!(!store.snapshot().transactions.is_loading());
    }

    #[tokio::test]
    async fn subscribers_see_new_snapshots() {
        let (store, _) = store_with(StubGateway::with_transactions(vec![Transaction::build(
            1.0,
            "deposit",
            "2023-01-01",
        )]));
        let mut receiver = store.subscribe();

        store.fetch_transactions().await;

        assert!(receiver.has_changed().unwrap());
        let snapshot = receiver.borrow_and_update().clone();
        assert_eq!(snapshot.transactions.data().len(), 1);
    }

    #[tokio::test]
    async fn spawn_fetch_all_marks_slices_loading_immediately() {
        let (store, _) = store_with(StubGateway::with_transactions(vec![]));

        store.spawn_fetch_all();

        let snapshot = store.snapshot();
        assert!(snapshot.user.is_loading());
        assert!(snapshot.wallet.is_loading());
        assert!(snapshot.transactions.is_loading());
    }

    #[tokio::test]
    async fn wait_until_settled_returns_after_fetch_completes() {
        let (store, _) = store_with(StubGateway::with_transactions(vec![Transaction::build(
            1.0,
            "deposit",
            "2023-01-01",
        )]));
        store.spawn_fetch_all();

        let snapshot = store.wait_until_settled(Duration::from_secs(5)).await;

        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.transactions.data().len(), 1);
    }

    #[tokio::test]
    async fn wait_until_settled_gives_up_after_timeout() {
        let (store, gateway) = store_with(StubGateway::default());
        gateway.hold_transactions();
        store.spawn_fetch_all();
        wait_for_pending_requests(&gateway, 1).await;

        let snapshot = store.wait_until_settled(Duration::from_millis(10)).await;

        assert!(snapshot.transactions.is_loading());
    }
}
