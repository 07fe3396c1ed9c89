//! Given-When-Then harness for signup scenarios.

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::expect_used)] // Setup failures abort the test with a message
#![allow(clippy::missing_panics_doc)]

use crate::fixtures::{in_memory_hub, upcoming_draft};
use crate::mocks::test_clock;
use volunteer_hub_core::error::HubError;
use volunteer_hub_core::service::SignupReceipt;
use volunteer_hub_core::types::Event;

/// Type alias for result assertion functions
type ResultAssertion = Box<dyn FnOnce(&Result<SignupReceipt, HubError>)>;

/// Type alias for stored-event assertion functions
type EventAssertion = Box<dyn FnOnce(&Event)>;

/// Fluent API for testing one signup against a prepared event.
///
/// # Example
///
/// ```ignore
/// use volunteer_hub_testing::SignupScenario;
///
/// SignupScenario::new()
///     .given_role("Photographer", 1)
///     .given_signup(0, "Ada", "ada@example.com")
///     .when_signup(0, "Bob", "bob@example.com")
///     .then_result(|result| {
///         assert_eq!(result.as_ref().unwrap_err().kind(), ErrorKind::RoleFull);
///     })
///     .then_event(|event| assert_eq!(event.roles[0].volunteers.len(), 1))
///     .run()
///     .await;
/// ```
#[derive(Default)]
pub struct SignupScenario {
    roles: Vec<(String, i64)>,
    prior: Vec<(usize, String, String)>,
    action: Option<(usize, String, String)>,
    result_assertions: Vec<ResultAssertion>,
    event_assertions: Vec<EventAssertion>,
}

impl SignupScenario {
    /// Create an empty scenario
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role to the event
    #[must_use]
    pub fn given_role(mut self, name: &str, slots: i64) -> Self {
        self.roles.push((name.to_string(), slots));
        self
    }

    /// Sign someone up before the action under test
    #[must_use]
    pub fn given_signup(mut self, role_index: usize, name: &str, email: &str) -> Self {
        self.prior
            .push((role_index, name.to_string(), email.to_string()));
        self
    }

    /// The signup under test
    #[must_use]
    pub fn when_signup(mut self, role_index: usize, name: &str, email: &str) -> Self {
        self.action = Some((role_index, name.to_string(), email.to_string()));
        self
    }

    /// Assert on the signup's result
    #[must_use]
    pub fn then_result<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Result<SignupReceipt, HubError>) + 'static,
    {
        self.result_assertions.push(Box::new(assertion));
        self
    }

    /// Assert on the stored event after the signup
    #[must_use]
    pub fn then_event<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Event) + 'static,
    {
        self.event_assertions.push(Box::new(assertion));
        self
    }

    /// Build the event, replay the given signups, run the action and check
    /// every assertion.
    ///
    /// # Panics
    ///
    /// Panics if no action was set, setup fails, or an assertion fails.
    pub async fn run(self) {
        let (hub, store) = in_memory_hub(test_clock());
        let roles: Vec<(&str, i64)> = self
            .roles
            .iter()
            .map(|(name, slots)| (name.as_str(), *slots))
            .collect();

        let event = hub
            .create(upcoming_draft("Scenario Event", &roles))
            .await
            .expect("scenario event should be valid");

        for (role_index, name, email) in &self.prior {
            hub.sign_up(event.id, *role_index, name, email)
                .await
                .expect("given signups should succeed");
        }

        let (role_index, name, email) = self.action.expect("when_signup was not called");
        let result = hub.sign_up(event.id, role_index, &name, &email).await;

        for assertion in self.result_assertions {
            assertion(&result);
        }

        let stored = store
            .snapshot(event.id)
            .expect("scenario event should still exist")
            .event;
        for assertion in self.event_assertions {
            assertion(&stored);
        }
    }
}
