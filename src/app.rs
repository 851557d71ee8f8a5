use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use std::time::{Duration, Instant};

use crate::callback::{CallbackField, CallbackForm, CallbackPhase};
use crate::catalog::{Catalog, Course, CourseId};
use crate::config::Config;
use crate::input::{map_key, Action, InputContext};
use crate::outbox::{Dispatcher, PendingDelivery, Receipt, SubmissionError};
use crate::registration::{DraftField, WizardEvent, WizardState, WizardStep};
use crate::testimonials::{builtin_testimonials, Carousel};
use crate::types::{FormCursor, Overlay, QuestionRow};
use crate::ui;
use crate::ui::footer::Footer;
use crate::validation::ContactPolicy;

const FRAME_POLL: Duration = Duration::from_millis(16);

type Delivery = Option<(u64, PendingDelivery)>;

pub struct App {
    pub config: Config,
    pub catalog: Catalog,
    pub carousel: Carousel,
    pub wizard: WizardState,
    pub callback: CallbackForm,
    pub show_help: bool,
    pub selected_course: usize,
    pub cursor: FormCursor,
    pub should_quit: bool,
    /// One-line notice in the banner
    pub status: Option<String>,
    dispatcher: Dispatcher,
    wizard_delivery: Delivery,
    callback_delivery: Delivery,
}

impl App {
    pub fn new(config: Config, catalog: Catalog, dispatcher: Dispatcher, now: Instant) -> Self {
        let testimonials = config
            .testimonials
            .clone()
            .unwrap_or_else(builtin_testimonials);
        let carousel = Carousel::new(
            testimonials,
            Duration::from_millis(config.carousel.interval_ms),
            now,
        );
        let wizard = WizardState::new(config.wizard.settings());
        let callback = CallbackForm::new(
            ContactPolicy::from_strict(config.wizard.strict_contact),
            Duration::from_millis(config.callback.auto_close_ms),
        );

        Self {
            config,
            catalog,
            carousel,
            wizard,
            callback,
            show_help: false,
            selected_course: 0,
            cursor: FormCursor::default(),
            should_quit: false,
            status: None,
            dispatcher,
            wizard_delivery: None,
            callback_delivery: None,
        }
    }

    /// Topmost modal. The wizard wins over the call-back form, which wins
    /// over help.
    pub fn overlay(&self) -> Overlay {
        if self.wizard.is_open() {
            Overlay::Wizard
        } else if self.callback.is_open() {
            Overlay::Callback
        } else if self.show_help {
            Overlay::Help
        } else {
            Overlay::None
        }
    }

    pub fn input_context(&self) -> InputContext {
        match self.overlay() {
            Overlay::None => InputContext::Landing,
            Overlay::Help => InputContext::Help,
            Overlay::Wizard => match self.wizard.step() {
                WizardStep::Contact => InputContext::TextEntry,
                WizardStep::Questions => {
                    match QuestionRow::from_cursor(self.cursor, self.wizard.questions().len()) {
                        QuestionRow::Question(_) => InputContext::ChoiceRow,
                        QuestionRow::Message => InputContext::TextEntry,
                    }
                }
                WizardStep::Submitting => InputContext::Pending,
                WizardStep::Submitted => InputContext::Passive,
            },
            Overlay::Callback => match self.callback.phase() {
                CallbackPhase::Editing => InputContext::TextEntry,
                CallbackPhase::Submitting => InputContext::Pending,
                CallbackPhase::Submitted => InputContext::Passive,
            },
        }
    }

    pub fn selected(&self) -> Option<&Course> {
        self.catalog.courses().get(self.selected_course)
    }

    /// Open the registration wizard. Unknown ids get a placeholder course
    /// with no questions.
    pub fn open_wizard_for(&mut self, id: &CourseId) {
        let course = self
            .catalog
            .find(id)
            .cloned()
            .unwrap_or_else(|| Course::placeholder(id.clone()));
        let questions = self.catalog.schema_for(id).to_vec();
        if let Some(index) = self.catalog.courses().iter().position(|c| &c.id == id) {
            self.selected_course = index;
        }
        self.callback.close();
        self.callback_delivery = None;
        self.show_help = false;
        self.wizard_delivery = None;
        self.cursor.reset();
        self.wizard.open(course, questions);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = map_key(key, self.input_context()) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        if action == Action::Quit {
            self.should_quit = true;
            return;
        }
        match self.overlay() {
            Overlay::None => self.handle_landing(action),
            Overlay::Help => {
                if action == Action::CloseOverlay {
                    self.show_help = false;
                }
            }
            Overlay::Wizard => self.handle_wizard(action),
            Overlay::Callback => self.handle_callback(action),
        }
        self.cursor.clamp(self.form_rows());
    }

    fn handle_landing(&mut self, action: Action) {
        let count = self.catalog.len();
        match action {
            Action::ShowHelp => self.show_help = true,
            Action::CursorDown if count > 0 => {
                self.selected_course = (self.selected_course + 1) % count;
            }
            Action::CursorUp if count > 0 => {
                self.selected_course = (self.selected_course + count - 1) % count;
            }
            Action::Confirm => {
                if let Some(id) = self.selected().map(|c| c.id.clone()) {
                    self.open_wizard_for(&id);
                }
            }
            Action::OpenCallback => {
                self.cursor.reset();
                self.callback_delivery = None;
                self.callback.open();
            }
            Action::NextSlide => self.carousel.next(),
            Action::PrevSlide => self.carousel.previous(),
            _ => {}
        }
    }

    /// Rows the cursor can visit in the active form
    fn form_rows(&self) -> usize {
        match self.overlay() {
            Overlay::Wizard => match self.wizard.step() {
                WizardStep::Contact => DraftField::contact_fields().len(),
                WizardStep::Questions => self.wizard.questions().len() + 1,
                _ => 1,
            },
            Overlay::Callback => CallbackField::all().len(),
            _ => 1,
        }
    }

    /// Text field under the cursor in the wizard, if any
    fn wizard_text_field(&self) -> Option<DraftField> {
        match self.wizard.step() {
            WizardStep::Contact => DraftField::contact_fields().get(self.cursor.row).copied(),
            WizardStep::Questions => {
                match QuestionRow::from_cursor(self.cursor, self.wizard.questions().len()) {
                    QuestionRow::Message => Some(DraftField::Message),
                    QuestionRow::Question(_) => None,
                }
            }
            _ => None,
        }
    }

    fn handle_wizard(&mut self, action: Action) {
        let rows = self.form_rows();
        match action {
            Action::CloseOverlay => {
                self.wizard.close();
                self.wizard_delivery = None;
                self.cursor.reset();
            }
            Action::CursorDown => self.cursor.down(rows),
            Action::CursorUp => self.cursor.up(rows),
            Action::OptionLeft | Action::OptionRight => {
                if let QuestionRow::Question(index) =
                    QuestionRow::from_cursor(self.cursor, self.wizard.questions().len())
                {
                    self.cycle_option(index, action == Action::OptionRight);
                }
            }
            Action::Insert(c) => {
                if let Some(field) = self.wizard_text_field() {
                    let mut value = self.wizard.draft().field(field).to_string();
                    value.push(c);
                    self.wizard.set_field(field, value);
                }
            }
            Action::DeleteChar => {
                if let Some(field) = self.wizard_text_field() {
                    let mut value = self.wizard.draft().field(field).to_string();
                    value.pop();
                    self.wizard.set_field(field, value);
                }
            }
            Action::Back => {
                if self.wizard.step() == WizardStep::Questions {
                    self.wizard.back();
                    self.cursor.reset();
                }
            }
            Action::Confirm => self.confirm_wizard(),
            _ => {}
        }
    }

    fn confirm_wizard(&mut self) {
        match self.wizard.step() {
            WizardStep::Contact => {
                if self.wizard.next() {
                    self.cursor.reset();
                } else if let Some(first) = self.wizard.missing_contact_fields().first() {
                    let fields = DraftField::contact_fields();
                    self.cursor.row = fields.iter().position(|f| f == first).unwrap_or(0);
                }
            }
            WizardStep::Questions => {
                if let Some(submission) = self.wizard.submit() {
                    let pending = self.dispatcher.dispatch(submission.envelope);
                    self.wizard_delivery = Some((submission.attempt, pending));
                } else {
                    let first = self.wizard.unanswered().first().map(|q| q.key.clone());
                    if let Some(key) = first {
                        self.cursor.row = self
                            .wizard
                            .questions()
                            .iter()
                            .position(|q| q.key == key)
                            .unwrap_or(0);
                    }
                }
            }
            WizardStep::Submitting | WizardStep::Submitted => {}
        }
    }

    /// Step through a question's options relative to the current answer
    fn cycle_option(&mut self, index: usize, forward: bool) {
        let Some(question) = self.wizard.questions().get(index) else {
            return;
        };
        let len = question.options.len();
        if len == 0 {
            return;
        }
        let current = self
            .wizard
            .draft()
            .answer(&question.key)
            .and_then(|a| question.options.iter().position(|o| o == a));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        let key = question.key.clone();
        let option = question.options[next].clone();
        self.wizard.select_option(&key, &option);
    }

    fn handle_callback(&mut self, action: Action) {
        let rows = self.form_rows();
        let field = CallbackField::all().get(self.cursor.row).copied();
        match action {
            Action::CloseOverlay => {
                self.callback.close();
                self.callback_delivery = None;
                self.cursor.reset();
            }
            Action::CursorDown => self.cursor.down(rows),
            Action::CursorUp => self.cursor.up(rows),
            Action::Insert(c) => {
                if let Some(field) = field {
                    let mut value = self.callback.field(field).to_string();
                    value.push(c);
                    self.callback.set_field(field, value);
                }
            }
            Action::DeleteChar => {
                if let Some(field) = field {
                    let mut value = self.callback.field(field).to_string();
                    value.pop();
                    self.callback.set_field(field, value);
                }
            }
            Action::Confirm => {
                if let Some(submission) = self.callback.submit() {
                    let pending = self.dispatcher.dispatch(submission.envelope);
                    self.callback_delivery = Some((submission.attempt, pending));
                } else if let Some(first) = self.callback.missing_fields().first() {
                    self.cursor.row = CallbackField::all().iter().position(|f| f == first).unwrap_or(0);
                }
            }
            _ => {}
        }
    }

    fn on_wizard_event(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::Submitted { course, receipt, .. } => {
                tracing::info!(%course, key = %receipt.idempotency_key, duplicate = receipt.duplicate, "registration accepted");
                let title = self.wizard.course().map(|c| c.title.clone()).unwrap_or_else(|| course.to_string());
                self.status = Some(format!("Registration for {} received", title));
            }
            WizardEvent::SubmissionFailed { reason, .. } => {
                self.status = Some(format!("Registration not sent: {}", reason));
            }
            WizardEvent::Closed { .. } => self.cursor.reset(),
        }
    }

    /// Advance timers and collect finished deliveries
    pub fn tick(&mut self, now: Instant) {
        self.carousel.tick(now);

        if let Some((attempt, outcome)) = poll_delivery(&mut self.wizard_delivery) {
            if let Some(event) = self.wizard.resolve(attempt, outcome, now) {
                self.on_wizard_event(event);
            }
        }
        if let Some((attempt, outcome)) = poll_delivery(&mut self.callback_delivery) {
            let failed = outcome.is_err();
            if self.callback.resolve(attempt, outcome, now) && !failed {
                self.status = Some("Call-back request received".to_string());
            }
        }

        if let Some(event) = self.wizard.tick(now) {
            self.on_wizard_event(event);
        }
        if self.callback.tick(now) {
            self.cursor.reset();
        }
    }

    /// Wait for deliveries still in flight when the app quits
    pub async fn finish_deliveries(&mut self) {
        let pending = [self.wizard_delivery.take(), self.callback_delivery.take()];
        for (attempt, delivery) in pending.into_iter().flatten() {
            match delivery.wait().await {
                Ok(receipt) => {
                    tracing::info!(attempt, key = %receipt.idempotency_key, "delivery finished after quit")
                }
                Err(e) => tracing::warn!(attempt, "delivery failed after quit: {}", e),
            }
        }
    }

    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(FRAME_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
            self.tick(Instant::now());
        }
        tracing::info!("exiting");
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let now = Instant::now();
        let (header, courses, detail, testimonials, footer) = ui::layout::compute_layout(frame.area());

        ui::landing::render_header(frame, header, &self.config.center, self.status.as_deref());
        ui::landing::render_courses(frame, courses, &self.catalog, self.selected_course);
        ui::landing::render_detail(frame, detail, &self.catalog, self.selected_course);
        ui::landing::render_testimonials(frame, testimonials, &self.carousel);
        frame.render_widget(
            Footer {
                overlay: self.overlay(),
                sink: self.dispatcher.sink_name(),
            },
            footer,
        );

        match self.overlay() {
            Overlay::Wizard => ui::wizard_ui::render(frame, frame.area(), &self.wizard, self.cursor, now),
            Overlay::Callback => ui::dialog::render_callback(frame, frame.area(), &self.callback, self.cursor),
            Overlay::Help => ui::help::render(frame, frame.area()),
            Overlay::None => {}
        }
    }
}

fn poll_delivery(slot: &mut Delivery) -> Option<(u64, Result<Receipt, SubmissionError>)> {
    let (attempt, pending) = slot.as_mut()?;
    let outcome = pending.poll()?;
    let attempt = *attempt;
    *slot = None;
    Some((attempt, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbox::{EnquirySink, Envelope, FileOutbox, LogSink};
    use crossterm::event::{KeyCode, KeyModifiers};
    use crate::ui::test_support::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct RejectingSink;

    impl EnquirySink for RejectingSink {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn deliver(&self, _envelope: &Envelope) -> Result<Receipt, SubmissionError> {
            Err(SubmissionError::Rejected("mailbox full".to_string()))
        }
    }

    fn app_with(sink: Arc<dyn EnquirySink>) -> App {
        let dispatcher = Dispatcher::new(sink, tokio::runtime::Handle::current());
        App::new(Config::default(), Catalog::builtin(), dispatcher, Instant::now())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    fn fill_contact(app: &mut App) {
        type_text(app, "Ana");
        app.handle_action(Action::CursorDown);
        type_text(app, "a@x.com");
        app.handle_action(Action::CursorDown);
        type_text(app, "123");
    }

    fn answer_all(app: &mut App) {
        for _ in 0..app.wizard.questions().len() {
            app.handle_action(Action::OptionRight);
            app.handle_action(Action::CursorDown);
        }
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.tick(Instant::now());
            if app.wizard_delivery.is_none() && app.callback_delivery.is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("delivery never finished");
    }

    #[tokio::test]
    async fn test_landing_navigation() {
        let mut app = app_with(Arc::new(LogSink));
        assert_eq!(app.input_context(), InputContext::Landing);

        app.handle_action(Action::CursorUp);
        assert_eq!(app.selected_course, app.catalog.len() - 1);
        app.handle_action(Action::CursorDown);
        assert_eq!(app.selected_course, 0);

        app.handle_action(Action::ShowHelp);
        assert_eq!(app.overlay(), Overlay::Help);
        app.handle_action(Action::CloseOverlay);
        assert_eq!(app.overlay(), Overlay::None);

        app.handle_action(Action::NextSlide);
        assert_eq!(app.carousel.index(), 1);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_enter_opens_selected_course() {
        let mut app = app_with(Arc::new(LogSink));
        app.handle_action(Action::CursorDown);
        let expected = app.catalog.courses()[1].id.clone();

        app.handle_action(Action::Confirm);
        assert_eq!(app.overlay(), Overlay::Wizard);
        assert_eq!(app.wizard.course().map(|c| c.id.clone()), Some(expected));
        assert_eq!(app.input_context(), InputContext::TextEntry);

        app.handle_action(Action::CloseOverlay);
        assert_eq!(app.overlay(), Overlay::None);
    }

    #[tokio::test]
    async fn test_blocked_next_focuses_missing_field() {
        let mut app = app_with(Arc::new(LogSink));
        app.open_wizard_for(&CourseId::PythonBasic);
        type_text(&mut app, "Ana");
        app.handle_action(Action::CursorDown);
        app.handle_action(Action::CursorDown);
        type_text(&mut app, "123");

        app.handle_action(Action::Confirm);
        assert_eq!(app.wizard.step(), WizardStep::Contact);
        assert_eq!(app.cursor.row, 1);
    }

    #[tokio::test]
    async fn test_option_cycling() {
        let mut app = app_with(Arc::new(LogSink));
        app.open_wizard_for(&CourseId::PythonBasic);
        fill_contact(&mut app);
        app.handle_action(Action::Confirm);
        assert_eq!(app.wizard.step(), WizardStep::Questions);
        assert_eq!(app.input_context(), InputContext::ChoiceRow);

        let question = app.wizard.questions()[0].clone();
        app.handle_action(Action::OptionLeft);
        assert_eq!(
            app.wizard.draft().answer(&question.key),
            question.options.last().map(String::as_str)
        );
        app.handle_action(Action::OptionRight);
        assert_eq!(
            app.wizard.draft().answer(&question.key),
            Some(question.options[0].as_str())
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registration_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = Arc::new(FileOutbox::new(dir.path().join("outbox.jsonl")));
        let mut app = app_with(outbox.clone());

        app.open_wizard_for(&CourseId::PythonBasic);
        fill_contact(&mut app);
        app.handle_action(Action::Confirm);
        answer_all(&mut app);
        assert_eq!(app.input_context(), InputContext::TextEntry);
        type_text(&mut app, "Evenings only");

        app.handle_action(Action::Confirm);
        assert_eq!(app.wizard.step(), WizardStep::Submitting);
        assert_eq!(app.input_context(), InputContext::Pending);

        settle(&mut app).await;
        assert!(app.wizard.is_submitted());
        assert_eq!(app.status.as_deref(), Some("Registration for Python Basic received"));

        let written = std::fs::read_to_string(outbox.path()).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("Evenings only"));

        app.tick(Instant::now() + Duration::from_millis(3100));
        assert_eq!(app.overlay(), Overlay::None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_repeated_enter_keeps_submission() {
        let mut app = app_with(Arc::new(LogSink));
        app.open_wizard_for(&CourseId::PythonBasic);
        fill_contact(&mut app);
        app.handle_action(Action::Confirm);
        answer_all(&mut app);

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        app.handle_key(enter);
        app.handle_key(enter);
        assert!(app.wizard.is_open());
        assert_eq!(app.wizard.step(), WizardStep::Submitting);

        settle(&mut app).await;
        assert!(app.wizard.is_submitted());
        assert_eq!(app.status.as_deref(), Some("Registration for Python Basic received"));

        // Enter dismisses the success screen
        app.handle_key(enter);
        assert_eq!(app.overlay(), Overlay::None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_quit_waits_for_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = Arc::new(FileOutbox::new(dir.path().join("outbox.jsonl")));
        let mut app = app_with(outbox.clone());

        app.open_wizard_for(&CourseId::GraphicDesign);
        fill_contact(&mut app);
        app.handle_action(Action::Confirm);
        answer_all(&mut app);
        app.handle_action(Action::Confirm);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);

        app.finish_deliveries().await;
        assert!(app.wizard_delivery.is_none());
        let written = std::fs::read_to_string(outbox.path()).unwrap();
        assert_eq!(written.lines().count(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_delivery_keeps_draft() {
        let mut app = app_with(Arc::new(RejectingSink));
        app.open_wizard_for(&CourseId::WebDevelopmentNative);
        fill_contact(&mut app);
        app.handle_action(Action::Confirm);
        answer_all(&mut app);
        app.handle_action(Action::Confirm);

        settle(&mut app).await;
        assert_eq!(app.wizard.step(), WizardStep::Questions);
        assert_eq!(app.wizard.last_error(), Some("enquiry rejected: mailbox full"));
        assert_eq!(app.wizard.draft().contact.name, "Ana");
        assert!(app.status.as_deref().unwrap_or("").contains("mailbox full"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_callback_flow() {
        let mut app = app_with(Arc::new(LogSink));
        app.handle_action(Action::OpenCallback);
        assert_eq!(app.overlay(), Overlay::Callback);

        app.handle_action(Action::Confirm);
        assert_eq!(app.callback.phase(), CallbackPhase::Editing);
        assert_eq!(app.cursor.row, 0);

        type_text(&mut app, "Ana");
        app.handle_action(Action::CursorDown);
        type_text(&mut app, "555 0100");
        app.handle_action(Action::Confirm);
        assert_eq!(app.callback.phase(), CallbackPhase::Editing);
        assert_eq!(app.cursor.row, 2);
        type_text(&mut app, "Weekend classes");
        app.handle_action(Action::Confirm);
        settle(&mut app).await;
        assert_eq!(app.callback.phase(), CallbackPhase::Submitted);

        app.tick(Instant::now() + Duration::from_millis(2100));
        assert_eq!(app.overlay(), Overlay::None);
    }

    #[tokio::test]
    async fn test_draw_landing_and_wizard() {
        let mut app = app_with(Arc::new(LogSink));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Training Center"));
        assert!(text.contains("Our Courses"));

        app.open_wizard_for(&CourseId::parse("underwater-basket-weaving"));
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Step 1/2"));
    }
}
