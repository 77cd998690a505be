//! # Museum Chat Runtime
//!
//! Runtime implementation for the museum chat booking architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Event Loop**: Manages the action → reducer → effects → action feedback loop
//!
//! ## Example
//!
//! ```ignore
//! use museum_chat_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use museum_chat_core::effect::Effect;
use museum_chat_core::reducer::Reducer;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, RwLock, broadcast};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for a terminal action or effect completion
        ///
        /// Returned by `send_and_wait_for` and `EffectHandle::wait_with_timeout`
        /// when the timeout expires first.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// All store handles were dropped while an observer was still waiting.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// How often a waiting [`EffectHandle`] re-checks the pending-effect counter.
///
/// `Notify::notify_waiters` only wakes tasks that are already registered, so
/// the wait loop re-checks on a short interval to close the registration gap.
const EFFECT_WAIT_POLL: Duration = Duration::from_millis(10);

/// Handle for awaiting completion of in-flight effects
///
/// Returned by [`Store::send`]. Waiting on the handle blocks until the store
/// has no effects in flight - including effects spawned by fed-back actions,
/// and effects started by other `send` calls on the same store.
#[derive(Clone)]
pub struct EffectHandle {
    pending: Arc<AtomicUsize>,
    waker: Arc<Notify>,
}

impl EffectHandle {
    /// Wait until no effects are in flight
    pub async fn wait(&self) {
        loop {
            if self.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            let _ = tokio::time::timeout(EFFECT_WAIT_POLL, self.waker.notified()).await;
        }
    }

    /// Wait until no effects are in flight, up to `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when the
    /// timeout expires.
    pub async fn wait_with_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }

    /// Number of effects currently in flight
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

/// The Store - runtime for reducer-based state machines
///
/// The Store:
/// 1. Owns the state (behind an async `RwLock`)
/// 2. Serializes reducer execution (single writer)
/// 3. Executes effects asynchronously in spawned tasks
/// 4. Feeds effect-produced actions back into the reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(BookingState::new(config), BookingReducer::new(), environment);
///
/// store.send(BookingAction::UserMessage { text: "7".into() }).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    pending_effects: Arc<AtomicUsize>,
    effect_waker: Arc<Notify>,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// All actions produced by effects (e.g., from `Effect::Future`) are
    /// broadcast to observers. This enables request-response patterns over
    /// asynchronous boundaries such as a pending payment outcome.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses the default action broadcast capacity of 16; increase with
    /// [`Store::with_broadcast_capacity`] if observers frequently lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (a zero-capacity broadcast channel cannot
    /// hold any action).
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            pending_effects: Arc::new(AtomicUsize::new(0)),
            effect_waker: Arc::new(Notify::new()),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Spawns returned effects
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send` returns after the reducer has run and effect execution has
    /// started, not after effects complete. Use the returned [`EffectHandle`]
    /// to wait for quiescence, or [`Store::send_and_wait_for`] for
    /// request-response patterns.
    pub async fn send(&self, action: A) -> EffectHandle {
        self.dispatch(action).await;

        EffectHandle {
            pending: Arc::clone(&self.pending_effects),
            waker: Arc::clone(&self.effect_waker),
        }
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response over an asynchronous boundary: subscribe
    /// to the action broadcast BEFORE sending (no race), send the initial
    /// action, then wait for an effect-produced action matching the
    /// predicate.
    ///
    /// Only actions produced by effects are broadcast, not the initial
    /// action.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    ///
    /// # Example
    ///
    /// ```ignore
    /// let outcome = store
    ///     .send_and_wait_for(
    ///         BookingAction::PaymentMethodSelected { method },
    ///         |a| matches!(a,
    ///             BookingAction::PaymentSucceeded { .. } |
    ///             BookingAction::PaymentFailed { .. }
    ///         ),
    ///         Duration::from_secs(10),
    ///     )
    ///     .await?;
    /// ```
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut receiver = self.action_broadcast.subscribe();
        self.dispatch(action).await;

        let wait = async {
            loop {
                match receiver.recv().await {
                    Ok(candidate) if predicate(&candidate) => return Ok(candidate),
                    Ok(_) => {}
                    // Dropped actions are acceptable here: the timeout
                    // bounds the wait if the terminal action was among them.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "action broadcast lagged while waiting");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    }
                }
            }
        };

        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }

    /// Read state through an accessor function
    ///
    /// The accessor runs under the read lock; keep it short and return owned
    /// data.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let step = store.state(|s| s.step).await;
    /// ```
    pub async fn state<T>(&self, accessor: impl FnOnce(&S) -> T) -> T {
        let state = self.state.read().await;
        accessor(&state)
    }

    /// Subscribe to actions produced by effects
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Run the reducer for one action and start its effects
    ///
    /// Boxed so the effect feedback loop (effect task → dispatch → effect
    /// task) does not create a recursive future type.
    fn dispatch(&self, action: A) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let store = self.clone();
        Box::pin(async move {
            let effects = {
                let mut state = store.state.write().await;
                store.reducer.reduce(&mut state, action, &store.environment)
            };

            for effect in effects {
                store.spawn_effect(effect);
            }
        })
    }

    /// Start one effect in a background task
    fn spawn_effect(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {}
            Effect::Delay { duration, action } => {
                let store = self.clone();
                self.pending_effects.fetch_add(1, Ordering::AcqRel);
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    store.feed_back(*action).await;
                    store.finish_effect();
                });
            }
            Effect::Future(future) => {
                let store = self.clone();
                self.pending_effects.fetch_add(1, Ordering::AcqRel);
                tokio::spawn(async move {
                    if let Some(action) = future.await {
                        store.feed_back(action).await;
                    }
                    store.finish_effect();
                });
            }
        }
    }

    /// Broadcast an effect-produced action and run it through the reducer
    async fn feed_back(&self, action: A) {
        // Send errors only mean there are no subscribers right now.
        let _ = self.action_broadcast.send(action.clone());
        self.dispatch(action).await;
    }

    fn finish_effect(&self) {
        let previous = self.pending_effects.fetch_sub(1, Ordering::AcqRel);
        tracing::trace!(pending = previous.saturating_sub(1), "effect finished");
        self.effect_waker.notify_waiters();
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            pending_effects: Arc::clone(&self.pending_effects),
            effect_waker: Arc::clone(&self.effect_waker),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}
