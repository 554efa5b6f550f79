//! Application state and core logic

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::config::TuiConfig;
use crate::quote::{
    QuoteError, QuoteReceipt, QuoteRequest, QuoteService, SimulatedQuoteService,
    DEFAULT_SUBMIT_DELAY_MS,
};
use crate::state::{Field, PropertyType, QuoteWizard, ServiceKind, Urgency, WizardStep};

/// Focusable fields for each wizard step, in display order
pub fn step_fields(step: WizardStep) -> &'static [Field] {
    match step {
        WizardStep::PersonalInfo => &[Field::Name, Field::Email, Field::Phone, Field::Address],
        WizardStep::ProjectDetails => &[
            Field::PropertyType,
            Field::Surface,
            Field::Description,
            Field::Services,
            Field::Urgency,
        ],
        WizardStep::Confirmation => &[Field::Photos, Field::Consent],
    }
}

/// Keyboard focus within the current step (presentation state, kept out of
/// the wizard itself)
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFocus {
    /// Index into `step_fields` for the current step
    pub index: usize,
    /// Highlighted entry of the service checkbox list
    pub service_cursor: usize,
}

impl FormFocus {
    pub fn next(&mut self, count: usize) {
        self.index = (self.index + 1) % count;
    }

    pub fn prev(&mut self, count: usize) {
        if self.index == 0 {
            self.index = count - 1;
        } else {
            self.index -= 1;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.service_cursor = 0;
    }
}

/// Main application struct
pub struct App {
    /// The quote-request wizard state machine
    pub wizard: QuoteWizard,
    /// Keyboard focus within the current step
    pub focus: FormFocus,
    /// Receipt of the last successful submission
    pub last_receipt: Option<QuoteReceipt>,
    /// Quote service used for submissions
    service: Arc<dyn QuoteService>,
    /// Completion channel for the in-flight submission
    submit_tx: mpsc::UnboundedSender<Result<QuoteReceipt, QuoteError>>,
    submit_rx: mpsc::UnboundedReceiver<Result<QuoteReceipt, QuoteError>>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance backed by the simulated quote service
    pub fn new(config: &TuiConfig) -> Self {
        let delay = std::time::Duration::from_millis(
            config.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS),
        );
        Self::with_service(Arc::new(SimulatedQuoteService::new(delay)))
    }

    /// Create an App with an explicit service implementation
    pub fn with_service(service: Arc<dyn QuoteService>) -> Self {
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        Self {
            wizard: QuoteWizard::new(),
            focus: FormFocus::default(),
            last_receipt: None,
            service,
            submit_tx,
            submit_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// The field currently holding keyboard focus
    pub fn active_field(&self) -> Field {
        let fields = step_fields(self.wizard.step);
        fields[self.focus.index.min(fields.len() - 1)]
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Submission failure dialog is modal
        if self.wizard.submit_error.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.wizard.dismiss_submit_error();
            }
            return;
        }

        // Success view: only "new request" is available
        if self.wizard.submit_success {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('n')) {
                self.wizard.reset();
                self.focus.reset();
            }
            return;
        }

        let field_count = step_fields(self.wizard.step).len();
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus.next(field_count),
            KeyCode::BackTab | KeyCode::Up => self.focus.prev(field_count),
            KeyCode::Enter => self.confirm(),
            KeyCode::Esc => {
                // Step navigation is frozen while a submission is in flight
                if !self.wizard.is_submitting && self.wizard.retreat() {
                    self.focus.reset();
                }
            }
            KeyCode::Left => self.cycle_choice(-1),
            KeyCode::Right => self.cycle_choice(1),
            KeyCode::Char(c) => self.input_char(c),
            KeyCode::Backspace => {
                let field = self.active_field();
                self.wizard.backspace(field);
            }
            _ => {}
        }
    }

    /// Enter: advance the wizard, or submit from the confirmation step
    fn confirm(&mut self) {
        if self.wizard.step == WizardStep::Confirmation {
            self.start_submission();
        } else if self.wizard.advance() {
            self.focus.reset();
        }
    }

    /// Route a typed character to the active field
    fn input_char(&mut self, c: char) {
        match self.active_field() {
            Field::Services => {
                if c == ' ' {
                    let service = ServiceKind::ALL[self.focus.service_cursor];
                    self.wizard.toggle_service(service);
                }
            }
            Field::Consent => {
                if c == ' ' {
                    let consent = !self.wizard.consent;
                    self.wizard.set_consent(consent);
                }
            }
            // Selects react to Left/Right only
            Field::PropertyType | Field::Urgency => {}
            field => self.wizard.input_char(field, c),
        }
    }

    /// Left/Right: cycle the active select or move the service cursor
    fn cycle_choice(&mut self, dir: i8) {
        match self.active_field() {
            Field::PropertyType => {
                let next = cycled(&PropertyType::ALL, self.wizard.property_type, dir);
                self.wizard.set_property_type(next);
            }
            Field::Urgency => {
                let next = cycled(&Urgency::ALL, self.wizard.urgency, dir);
                self.wizard.set_urgency(next);
            }
            Field::Services => {
                let count = ServiceKind::ALL.len();
                self.focus.service_cursor = if dir > 0 {
                    (self.focus.service_cursor + 1) % count
                } else {
                    (self.focus.service_cursor + count - 1) % count
                };
            }
            _ => {}
        }
    }

    /// Gate the submission through the wizard and dispatch it to the
    /// quote service. The completion is delivered through the channel
    /// and picked up by `poll_submission` on the next loop tick.
    fn start_submission(&mut self) {
        if !self.wizard.begin_submit() {
            return;
        }
        let Some(request) = QuoteRequest::from_wizard(&self.wizard) else {
            // The step gates make this unreachable; fail soft if it happens
            tracing::warn!("submission gate passed but the request could not be built");
            self.wizard.fail_submit("La demande est incomplète");
            return;
        };

        tracing::info!(step = self.wizard.step.number(), "quote submission started");
        let service = Arc::clone(&self.service);
        let tx = self.submit_tx.clone();
        tokio::spawn(async move {
            let outcome = service.submit_quote(request).await;
            let _ = tx.send(outcome);
        });
    }

    /// Drain submission completions. Called once per event-loop tick.
    pub fn poll_submission(&mut self) {
        while let Ok(outcome) = self.submit_rx.try_recv() {
            match outcome {
                Ok(receipt) => {
                    tracing::info!(reference = %receipt.reference, "quote request accepted");
                    self.last_receipt = Some(receipt);
                    self.wizard.complete_submit();
                    self.focus.reset();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "quote submission failed");
                    self.wizard.fail_submit(format!("L'envoi a échoué : {err}"));
                }
            }
        }
    }
}

/// Next (or previous) entry of a fixed catalog, starting from the first
/// when nothing is selected yet
fn cycled<T: Copy + PartialEq>(all: &[T], current: Option<T>, dir: i8) -> T {
    let Some(idx) = current.and_then(|c| all.iter().position(|x| *x == c)) else {
        return all[0];
    };
    let count = all.len();
    if dir > 0 {
        all[(idx + 1) % count]
    } else {
        all[(idx + count - 1) % count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::MockQuoteService;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app_with_mock(mock: MockQuoteService) -> App {
        App::with_service(Arc::new(mock))
    }

    /// Drive the wizard to a submit-ready confirmation step
    fn fill_to_confirmation(app: &mut App) {
        type_text(app, "Marie Dupont");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "marie@example.fr");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "0612345678");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "1 rue de la Paix");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.wizard.step, WizardStep::ProjectDetails);

        app.handle_key(key(KeyCode::Right)); // property type
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "45");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "Cave encombrée");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char(' '))); // first service
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right)); // urgency
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.wizard.step, WizardStep::Confirmation);

        app.handle_key(key(KeyCode::Tab)); // photos -> consent
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.wizard.consent);
    }

    mod focus {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn tab_cycles_step1_fields() {
            let mut app = app_with_mock(MockQuoteService::new());
            assert_eq!(app.active_field(), Field::Name);
            app.handle_key(key(KeyCode::Tab));
            assert_eq!(app.active_field(), Field::Email);
            for _ in 0..3 {
                app.handle_key(key(KeyCode::Tab));
            }
            assert_eq!(app.active_field(), Field::Name);
        }

        #[test]
        fn backtab_wraps_backwards() {
            let mut app = app_with_mock(MockQuoteService::new());
            app.handle_key(key(KeyCode::BackTab));
            assert_eq!(app.active_field(), Field::Address);
        }

        #[test]
        fn typing_lands_in_active_field() {
            let mut app = app_with_mock(MockQuoteService::new());
            type_text(&mut app, "Jean");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "j@d.fr");
            assert_eq!(app.wizard.name, "Jean");
            assert_eq!(app.wizard.email, "j@d.fr");
        }

        #[test]
        fn backspace_edits_active_field() {
            let mut app = app_with_mock(MockQuoteService::new());
            type_text(&mut app, "Jeanx");
            app.handle_key(key(KeyCode::Backspace));
            assert_eq!(app.wizard.name, "Jean");
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn enter_blocked_on_invalid_step() {
            let mut app = app_with_mock(MockQuoteService::new());
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.wizard.step, WizardStep::PersonalInfo);
            assert!(!app.wizard.errors.is_empty());
        }

        #[test]
        fn enter_advances_and_resets_focus() {
            let mut app = app_with_mock(MockQuoteService::new());
            type_text(&mut app, "Marie");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "m@d.fr");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "0612345678");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "1 rue x");
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.wizard.step, WizardStep::ProjectDetails);
            assert_eq!(app.focus.index, 0);
        }

        #[test]
        fn esc_retreats_to_previous_step() {
            let mut app = app_with_mock(MockQuoteService::new());
            app.wizard.step = WizardStep::ProjectDetails;
            app.handle_key(key(KeyCode::Esc));
            assert_eq!(app.wizard.step, WizardStep::PersonalInfo);
        }

        #[test]
        fn selects_cycle_with_arrows() {
            let mut app = app_with_mock(MockQuoteService::new());
            app.wizard.step = WizardStep::ProjectDetails;
            app.handle_key(key(KeyCode::Right));
            assert_eq!(app.wizard.property_type, Some(PropertyType::House));
            app.handle_key(key(KeyCode::Right));
            assert_eq!(app.wizard.property_type, Some(PropertyType::Apartment));
            app.handle_key(key(KeyCode::Left));
            assert_eq!(app.wizard.property_type, Some(PropertyType::House));
        }

        #[test]
        fn space_toggles_service_under_cursor() {
            let mut app = app_with_mock(MockQuoteService::new());
            app.wizard.step = WizardStep::ProjectDetails;
            app.focus.index = 3; // services
            app.handle_key(key(KeyCode::Right));
            app.handle_key(key(KeyCode::Char(' ')));
            assert!(app
                .wizard
                .is_service_selected(ServiceKind::PostClearanceCleaning));
            app.handle_key(key(KeyCode::Char(' ')));
            assert!(app.wizard.selected_services.is_empty());
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        fn receipt() -> QuoteReceipt {
            QuoteReceipt {
                reference: "ref-123".to_string(),
                received_at: Utc::now(),
            }
        }

        #[tokio::test]
        async fn successful_submission_resets_wizard() {
            let mut mock = MockQuoteService::new();
            mock.expect_submit_quote()
                .times(1)
                .returning(|_| Ok(receipt()));
            let mut app = app_with_mock(mock);
            fill_to_confirmation(&mut app);

            app.handle_key(key(KeyCode::Enter));
            assert!(app.wizard.is_submitting);

            // Let the spawned task deliver its outcome
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            app.poll_submission();

            assert!(app.wizard.submit_success);
            assert!(!app.wizard.is_submitting);
            assert_eq!(app.wizard.name, "");
            assert_eq!(
                app.last_receipt.as_ref().map(|r| r.reference.as_str()),
                Some("ref-123")
            );
        }

        #[tokio::test]
        async fn double_enter_submits_once() {
            let mut mock = MockQuoteService::new();
            mock.expect_submit_quote()
                .times(1)
                .returning(|_| Ok(receipt()));
            let mut app = app_with_mock(mock);
            fill_to_confirmation(&mut app);

            app.handle_key(key(KeyCode::Enter));
            app.handle_key(key(KeyCode::Enter));
            assert!(app.wizard.is_submitting);

            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            app.poll_submission();
            assert!(app.wizard.submit_success);
        }

        #[tokio::test]
        async fn navigation_frozen_while_in_flight() {
            let mut mock = MockQuoteService::new();
            mock.expect_submit_quote()
                .times(1)
                .returning(|_| Ok(receipt()));
            let mut app = app_with_mock(mock);
            fill_to_confirmation(&mut app);

            app.handle_key(key(KeyCode::Enter));
            assert!(app.wizard.is_submitting);

            app.handle_key(key(KeyCode::Esc));
            assert_eq!(app.wizard.step, WizardStep::Confirmation);

            // Field edits stay live
            app.handle_key(key(KeyCode::BackTab)); // consent -> photos
            type_text(&mut app, "cave.jpg");
            assert_eq!(app.wizard.photos, "cave.jpg");

            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            app.poll_submission();
            assert!(app.wizard.submit_success);
        }

        #[tokio::test]
        async fn failed_submission_keeps_values() {
            let mut mock = MockQuoteService::new();
            mock.expect_submit_quote()
                .times(1)
                .returning(|_| Err(QuoteError::Timeout));
            let mut app = app_with_mock(mock);
            fill_to_confirmation(&mut app);

            app.handle_key(key(KeyCode::Enter));
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            app.poll_submission();

            assert!(!app.wizard.submit_success);
            assert_eq!(app.wizard.step, WizardStep::Confirmation);
            assert_eq!(app.wizard.name, "Marie Dupont");
            assert!(app.wizard.submit_error.is_some());

            // Dismiss and retry
            app.handle_key(key(KeyCode::Enter));
            assert!(app.wizard.submit_error.is_none());
        }

        #[tokio::test]
        async fn submit_blocked_without_consent() {
            let mock = MockQuoteService::new(); // no call expected
            let mut app = app_with_mock(mock);
            fill_to_confirmation(&mut app);
            app.handle_key(key(KeyCode::Char(' '))); // withdraw consent

            app.handle_key(key(KeyCode::Enter));
            assert!(!app.wizard.is_submitting);
            assert!(app.wizard.errors.contains_key(&Field::Consent));
        }

        #[tokio::test]
        async fn success_view_starts_new_request() {
            let mut mock = MockQuoteService::new();
            mock.expect_submit_quote()
                .times(1)
                .returning(|_| Ok(receipt()));
            let mut app = app_with_mock(mock);
            fill_to_confirmation(&mut app);

            app.handle_key(key(KeyCode::Enter));
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            app.poll_submission();
            assert!(app.wizard.submit_success);

            app.handle_key(key(KeyCode::Enter));
            assert!(!app.wizard.submit_success);
            assert_eq!(app.wizard.step, WizardStep::PersonalInfo);
        }
    }

    mod cycling {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn cycled_starts_from_first_when_unset() {
            assert_eq!(cycled(&Urgency::ALL, None, 1), Urgency::Normal);
            assert_eq!(cycled(&Urgency::ALL, None, -1), Urgency::Normal);
        }

        #[test]
        fn cycled_wraps_both_ways() {
            assert_eq!(
                cycled(&Urgency::ALL, Some(Urgency::Flexible), 1),
                Urgency::Normal
            );
            assert_eq!(
                cycled(&Urgency::ALL, Some(Urgency::Normal), -1),
                Urgency::Flexible
            );
        }
    }
}
