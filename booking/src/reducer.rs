//! Reducer logic for the booking conversation.
//!
//! The whole transition table lives here. Text and selections are handled
//! synchronously; requesting a charge is the single asynchronous effect,
//! whose outcome feeds back as a `PaymentSucceeded` / `PaymentFailed`
//! action. Invalid input always re-prompts in place - the user can never
//! reach a step with no way forward short of an explicit cancellation.

use crate::actions::{BookingAction, Confirmation};
use crate::config::BookingConfig;
use crate::error::BookingError;
use crate::i18n::{Catalog, MessageKey, TemplateArg};
use crate::payment::{GatewayError, PaymentGateway, PaymentMethod, PaymentRequest};
use crate::state::{BookingState, Money, Step, TicketCount};
use crate::transcript::{MessageContent, Sender};
use museum_chat_core::effect::Effect;
use museum_chat_core::environment::Clock;
use museum_chat_core::reducer::Reducer;
use museum_chat_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Effects returned by one reducer run
type Effects = SmallVec<[Effect<BookingAction>; 4]>;

/// Environment dependencies for the booking reducer
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Payment capability
    pub gateway: Arc<dyn PaymentGateway>,
    /// Clock for message timestamps
    pub clock: Arc<dyn Clock>,
    /// Localized message catalog
    pub catalog: Arc<Catalog>,
    /// Fixed configuration (unit price, currency, timeout)
    pub config: BookingConfig,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
        catalog: Arc<Catalog>,
        config: BookingConfig,
    ) -> Self {
        Self {
            gateway,
            clock,
            catalog,
            config,
        }
    }
}

/// Reducer for the booking conversation
#[derive(Clone, Debug)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve a template and append it as a bot message
    ///
    /// A resolution failure is a deployment defect: it is recorded in
    /// `last_error` and logged, and no substitute text is appended.
    fn say(
        state: &mut BookingState,
        env: &BookingEnvironment,
        key: MessageKey,
        args: &[TemplateArg],
    ) {
        match env.catalog.resolve(state.language, key, args) {
            Ok(text) => {
                state
                    .transcript
                    .append(Sender::Bot, MessageContent::Text(text), env.clock.now());
            }
            Err(error) => {
                tracing::error!(%error, %key, language = %state.language, "translation failed");
                state.last_error = Some(error.into());
            }
        }
    }

    /// Total cost of the booking in progress
    fn total(env: &BookingEnvironment, tickets: TicketCount) -> Money {
        env.config.unit_price.saturating_mul(tickets.get())
    }

    /// Text submitted while awaiting a ticket count
    fn handle_ticket_count(state: &mut BookingState, env: &BookingEnvironment, text: &str) {
        match TicketCount::parse(text) {
            Ok(tickets) => {
                let total = Self::total(env, tickets);
                state.tickets = Some(tickets);
                state.last_error = None;
                Self::say(
                    state,
                    env,
                    MessageKey::SelectedTickets,
                    &[
                        TemplateArg::new("tickets", tickets.to_string()),
                        TemplateArg::new("totalCost", total.rupees().to_string()),
                    ],
                );
                state.step = Step::AwaitingConfirmation;
                tracing::info!(
                    tickets = tickets.get(),
                    total_rupees = total.rupees(),
                    "ticket count accepted"
                );
            }
            Err(error) => {
                tracing::debug!(%error, "ticket count rejected");
                state.last_error = Some(error);
                Self::say(state, env, MessageKey::InvalidTickets, &[]);
            }
        }
    }

    /// Text submitted while awaiting confirmation
    fn handle_confirmation(state: &mut BookingState, env: &BookingEnvironment, text: &str) {
        match Confirmation::parse(text) {
            Ok(Confirmation::Yes) => {
                let Some(tickets) = state.tickets else {
                    // Unreachable along the defined edges; recover by
                    // restarting the cycle rather than wedging the session.
                    tracing::warn!("confirmed without a ticket count, restarting cycle");
                    state.step = Step::AwaitingTicketCount;
                    Self::say(state, env, MessageKey::AskTickets, &[]);
                    return;
                };

                let total = Self::total(env, tickets);
                state.last_error = None;
                Self::say(
                    state,
                    env,
                    MessageKey::PaymentOptions,
                    &[
                        TemplateArg::new("totalCost", total.rupees().to_string()),
                        TemplateArg::new("provider", env.gateway.label().to_string()),
                    ],
                );
                state.transcript.append(
                    Sender::Bot,
                    MessageContent::PaymentPrompt {
                        total,
                        methods: env.gateway.methods(),
                    },
                    env.clock.now(),
                );
                state.step = Step::AwaitingPayment;
                tracing::info!(total_rupees = total.rupees(), "booking confirmed");
            }
            Ok(Confirmation::No) => {
                state.tickets = None;
                state.last_error = None;
                Self::say(state, env, MessageKey::BookingCanceled, &[]);
                state.step = Step::AwaitingTicketCount;
                tracing::info!("booking canceled");
            }
            Err(error) => {
                tracing::debug!(%error, "confirmation reply not recognized");
                state.last_error = Some(error);
                Self::say(state, env, MessageKey::ConfirmBooking, &[]);
            }
        }
    }

    /// A payment method button was activated
    fn handle_payment_method(
        state: &mut BookingState,
        env: &BookingEnvironment,
        method: PaymentMethod,
    ) -> Effects {
        if state.step != Step::AwaitingPayment {
            // Stale button from an earlier cycle's transcript
            tracing::warn!(%method, step = %state.step, "ignoring payment selection outside the payment step");
            return SmallVec::new();
        }
        let Some(tickets) = state.tickets else {
            tracing::warn!(%method, "no ticket count recorded for payment, ignoring");
            return SmallVec::new();
        };

        let total = Self::total(env, tickets);
        let request = PaymentRequest {
            amount: total,
            currency: env.config.currency.clone(),
            reference: format!("booking-{}", uuid::Uuid::new_v4()),
            display_name: env.config.display_name.clone(),
            description: env.config.description.clone(),
            theme: env.config.theme_color.clone(),
        };

        tracing::info!(
            amount_paise = total.paise(),
            %method,
            reference = %request.reference,
            "requesting charge"
        );

        let gateway = Arc::clone(&env.gateway);
        let timeout = env.config.payment_timeout;
        smallvec![Effect::future(async move {
            let outcome = tokio::time::timeout(timeout, gateway.charge(request, method.clone())).await;
            let action = match outcome {
                Ok(Ok(receipt)) => BookingAction::PaymentSucceeded {
                    method: receipt.method,
                    transaction_id: receipt.transaction_id,
                },
                Ok(Err(error)) => BookingAction::PaymentFailed { method, error },
                Err(_elapsed) => BookingAction::PaymentFailed {
                    method,
                    error: GatewayError::Timeout,
                },
            };
            Some(action)
        })]
    }
}

impl Default for BookingReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            BookingAction::SessionStarted => {
                Self::say(state, env, MessageKey::Greeting, &[]);
                SmallVec::new()
            }

            BookingAction::UserMessage { text } => {
                state.transcript.append(
                    Sender::User,
                    MessageContent::Text(text.clone()),
                    env.clock.now(),
                );

                match state.step {
                    Step::AwaitingTicketCount => Self::handle_ticket_count(state, env, &text),
                    Step::AwaitingConfirmation => Self::handle_confirmation(state, env, &text),
                    Step::AwaitingPayment => {
                        // Free text is inert once money is at stake; the
                        // payment prompt's buttons are the only way forward.
                        tracing::debug!("free text while payment pending, no reply");
                    }
                }
                SmallVec::new()
            }

            BookingAction::LanguageSelected { language } => {
                tracing::debug!(%language, "language selected");
                state.language = language;
                SmallVec::new()
            }

            BookingAction::RegionSelected { region } => {
                state.region = Some(region);
                if state.step == Step::AwaitingTicketCount {
                    Self::say(
                        state,
                        env,
                        MessageKey::RegionSelected,
                        &[TemplateArg::new("state", region.name())],
                    );
                }
                SmallVec::new()
            }

            BookingAction::PaymentMethodSelected { method } => {
                Self::handle_payment_method(state, env, method)
            }

            BookingAction::PaymentSucceeded {
                method,
                transaction_id,
            } => {
                tracing::info!(%method, %transaction_id, "payment confirmed");
                state.last_error = None;
                Self::say(
                    state,
                    env,
                    MessageKey::PaymentSuccess,
                    &[TemplateArg::new("method", method.to_string())],
                );
                state.tickets = None;
                state.step = Step::AwaitingTicketCount;
                // Open the next cycle
                Self::say(state, env, MessageKey::AskTickets, &[]);
                SmallVec::new()
            }

            BookingAction::PaymentFailed { method, error } => {
                tracing::warn!(%method, %error, "payment failed");
                match &error {
                    GatewayError::Unavailable { .. } => {
                        Self::say(state, env, MessageKey::PaymentUnavailable, &[]);
                    }
                    GatewayError::Declined { .. } | GatewayError::Timeout => {
                        Self::say(
                            state,
                            env,
                            MessageKey::PaymentFailed,
                            &[TemplateArg::new("reason", error.to_string())],
                        );
                    }
                }
                state.last_error = Some(BookingError::Payment(error));
                // Stay in AwaitingPayment so another method can be tried
                SmallVec::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)] // Test assertions may panic
mod tests {
    use super::*;
    use crate::payment::PaymentMethod;
    use crate::payment::mocks::MockGateway;
    use crate::state::Language;
    use crate::transcript::Message;
    use museum_chat_testing::mocks::FixedClock;
    use museum_chat_testing::{ReducerTest, assertions};
    use proptest::prelude::*;

    fn test_env() -> BookingEnvironment {
        env_with_gateway(MockGateway::new())
    }

    fn env_with_gateway(gateway: MockGateway) -> BookingEnvironment {
        BookingEnvironment::new(
            Arc::new(gateway),
            Arc::new(FixedClock::default()),
            Arc::new(Catalog::builtin()),
            BookingConfig::default(),
        )
    }

    fn user(text: &str) -> BookingAction {
        BookingAction::UserMessage {
            text: text.to_string(),
        }
    }

    fn last_bot_text(state: &BookingState) -> String {
        state
            .transcript
            .snapshot()
            .iter()
            .rev()
            .find(|message| message.sender == Sender::Bot)
            .and_then(|message| message.content.as_text())
            .map(ToString::to_string)
            .unwrap_or_else(|| panic!("no bot text message in transcript"))
    }

    #[test]
    fn greeting_opens_the_session() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::SessionStarted)
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingTicketCount);
                assert!(last_bot_text(state).contains("Welcome to the Museum"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn valid_count_advances_to_confirmation_with_total() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingConfirmation);
                assert_eq!(state.tickets.map(TicketCount::get), Some(7));
                assert!(state.last_error.is_none());
                assert!(last_bot_text(state).contains("1750"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn out_of_range_count_reprompts_in_place() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("150"))
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingTicketCount);
                assert!(state.tickets.is_none());
                assert!(matches!(
                    state.last_error,
                    Some(BookingError::InvalidTicketCount { .. })
                ));
                assert!(last_bot_text(state).contains("valid number"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn yes_presents_payment_options() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("YES"))
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingPayment);
                let prompt = state
                    .transcript
                    .last()
                    .unwrap_or_else(|| panic!("empty transcript"));
                match &prompt.content {
                    MessageContent::PaymentPrompt { total, methods } => {
                        assert_eq!(total.rupees(), 1750);
                        assert!(methods.contains(&PaymentMethod::new("UPI")));
                    }
                    other => panic!("expected a payment prompt, got {other:?}"),
                }
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn no_cancels_and_clears_the_count() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("no"))
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingTicketCount);
                assert!(state.tickets.is_none());
                assert!(last_bot_text(state).contains("canceled"));
            })
            .run();
    }

    #[test]
    fn unrecognized_confirmation_reprompts() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("maybe"))
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingConfirmation);
                assert_eq!(state.tickets.map(TicketCount::get), Some(7));
                assert!(last_bot_text(state).contains("\"yes\" or \"no\""));
            })
            .run();
    }

    #[test]
    fn method_selection_requests_a_charge() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("yes"))
            .when_action(BookingAction::PaymentMethodSelected {
                method: PaymentMethod::new("UPI"),
            })
            .then_state(|state| {
                // No outcome yet, nothing changes until the effect resolves
                assert_eq!(state.step, Step::AwaitingPayment);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn stale_method_selection_is_ignored() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::PaymentMethodSelected {
                method: PaymentMethod::new("UPI"),
            })
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingTicketCount);
                assert!(state.transcript.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn success_outcome_resets_the_cycle() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("yes"))
            .when_action(BookingAction::PaymentSucceeded {
                method: PaymentMethod::new("UPI"),
                transaction_id: crate::payment::TransactionId::new("txn_42"),
            })
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingTicketCount);
                assert!(state.tickets.is_none());
                let texts: Vec<&str> = state
                    .transcript
                    .snapshot()
                    .iter()
                    .filter_map(|m: &Message| m.content.as_text())
                    .collect();
                assert!(texts.iter().any(|t| t.contains("UPI")));
                assert!(last_bot_text(state).contains("How many tickets"));
            })
            .run();
    }

    #[test]
    fn declined_outcome_allows_retry() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("yes"))
            .when_action(BookingAction::PaymentFailed {
                method: PaymentMethod::new("Card"),
                error: GatewayError::Declined {
                    reason: "card expired".to_string(),
                },
            })
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingPayment);
                assert_eq!(state.tickets.map(TicketCount::get), Some(7));
                assert!(last_bot_text(state).contains("card expired"));
                assert!(matches!(
                    state.last_error,
                    Some(BookingError::Payment(GatewayError::Declined { .. }))
                ));
            })
            .run();
    }

    #[test]
    fn unavailable_outcome_uses_the_unavailable_message() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("yes"))
            .when_action(BookingAction::PaymentFailed {
                method: PaymentMethod::new("UPI"),
                error: GatewayError::Unavailable {
                    reason: "not configured".to_string(),
                },
            })
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingPayment);
                assert!(last_bot_text(state).contains("error loading the payment system"));
            })
            .run();
    }

    #[test]
    fn free_text_during_payment_gets_no_reply() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("yes"))
            .when_action(user("hello?"))
            .then_state(|state| {
                assert_eq!(state.step, Step::AwaitingPayment);
                let last = state
                    .transcript
                    .last()
                    .unwrap_or_else(|| panic!("empty transcript"));
                assert_eq!(last.sender, Sender::User);
            })
            .run();
    }

    #[test]
    fn language_switch_changes_subsequent_messages() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::LanguageSelected {
                language: Language::Hi,
            })
            .when_action(user("wat"))
            .then_state(|state| {
                assert_eq!(state.language, Language::Hi);
                assert!(last_bot_text(state).contains("कृपया"));
            })
            .run();
    }

    #[test]
    fn region_selection_acknowledges_in_first_step_only() {
        let kerala = crate::state::Region::parse("Kerala")
            .unwrap_or_else(|| panic!("Kerala is a known region"));

        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::RegionSelected { region: kerala })
            .then_state(|state| {
                assert_eq!(state.region.map(|r| r.name()), Some("Kerala"));
                assert!(last_bot_text(state).contains("Kerala"));
            })
            .run();

        // Mid-payment the selection is stored but not acknowledged
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(user("7"))
            .when_action(user("yes"))
            .when_action(BookingAction::RegionSelected { region: kerala })
            .then_state(|state| {
                assert_eq!(state.region.map(|r| r.name()), Some("Kerala"));
                let last = state
                    .transcript
                    .last()
                    .unwrap_or_else(|| panic!("empty transcript"));
                assert!(matches!(last.content, MessageContent::PaymentPrompt { .. }));
            })
            .run();
    }

    #[test]
    fn missing_translation_fails_fast_into_last_error() {
        // Catalog with English only; the session runs in Hindi
        let env = BookingEnvironment::new(
            Arc::new(MockGateway::new()),
            Arc::new(FixedClock::default()),
            Arc::new(Catalog::from_entries([(
                Language::En,
                MessageKey::Greeting,
                "Hello",
            )])),
            BookingConfig::default(),
        );

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(BookingState::with_language(Language::Hi))
            .when_action(BookingAction::SessionStarted)
            .then_state(|state| {
                assert!(matches!(
                    state.last_error,
                    Some(BookingError::Translation(_))
                ));
                // Nothing was silently substituted
                assert!(state.transcript.is_empty());
            })
            .run();
    }

    proptest! {
        #[test]
        fn every_count_in_range_advances(count in 1u32..=100) {
            let env = test_env();
            let reducer = BookingReducer::new();
            let mut state = BookingState::new();

            let effects = reducer.reduce(&mut state, user(&count.to_string()), &env);

            prop_assert!(effects.is_empty());
            prop_assert_eq!(state.step, Step::AwaitingConfirmation);
            prop_assert_eq!(state.tickets.map(TicketCount::get), Some(count));
            let expected_total = u64::from(count) * 250;
            prop_assert!(last_bot_text(&state).contains(&expected_total.to_string()));
        }

        #[test]
        fn every_count_out_of_range_reprompts(count in 101u32..100_000) {
            let env = test_env();
            let reducer = BookingReducer::new();
            let mut state = BookingState::new();

            let _ = reducer.reduce(&mut state, user(&count.to_string()), &env);

            prop_assert_eq!(state.step, Step::AwaitingTicketCount);
            prop_assert_eq!(state.tickets, None);
        }

        #[test]
        fn arbitrary_text_never_panics_or_derails(text in ".{0,40}") {
            let env = test_env();
            let reducer = BookingReducer::new();
            let mut state = BookingState::new();

            let _ = reducer.reduce(&mut state, user(&text), &env);

            prop_assert!(matches!(
                state.step,
                Step::AwaitingTicketCount | Step::AwaitingConfirmation
            ));
        }
    }
}
