//! Application State and Logic
//!
//! This module defines the application state for the collateral analyzer.
//! It manages:
//!
//! - The ledger under analysis (property fields and liens)
//! - User input handling and navigation between tabs
//! - The lien form shown when adding or editing a lien
//! - Summary export and the transient "Copied!" feedback
//!
//! The `App` struct is the central state container, and `run_app` is the
//! main event loop that feeds key presses into it and redraws the UI.

use crate::clipboard::{self, ClipboardSink};
use crate::ledger::format::{pop_digit, push_digit};
use crate::ledger::{priority_label, priority_rank, Ledger, Lien, LienDraft, MAX_PRIORITY};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, widgets::TableState, Terminal};
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

pub type AppResult<T> = Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Property,
    Liens,
    Summary,
}

impl View {
    pub fn all() -> Vec<View> {
        vec![View::Property, View::Liens, View::Summary]
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Property => "Property",
            View::Liens => "Liens",
            View::Summary => "Summary",
        }
    }
}

pub const PROPERTY_FIELDS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct PropertyForm {
    pub selected_field: usize,
}

pub const LIEN_FIELDS: usize = 6;
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct LienForm {
    /// Id of the lien being edited; `None` when adding.
    pub editing: Option<u64>,
    pub draft: LienDraft,
    pub selected_field: usize,
}

impl LienForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(lien: &Lien) -> Self {
        Self {
            editing: Some(lien.id),
            draft: lien.to_draft(),
            selected_field: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Lien"
        } else {
            "Add New Lien"
        }
    }

    fn shift_priority(&mut self, step: i64) {
        let rank = priority_rank(&self.draft.priority).unwrap_or(1) as i64;
        let rank = (rank + step).clamp(1, MAX_PRIORITY as i64) as u32;
        self.draft.priority = priority_label(rank);
    }

    fn handle_char(&mut self, c: char) {
        match self.selected_field {
            1 if c == ' ' => self.draft.kind = self.draft.kind.toggle(),
            2 => self.draft.institution.push(c),
            3 => push_date_char(&mut self.draft.issued_on, c),
            4 => push_date_char(&mut self.draft.due_on, c),
            5 if c.is_ascii_digit() => self.draft.amount = push_digit(self.draft.amount, c),
            _ => {}
        }
    }

    fn handle_backspace(&mut self) {
        match self.selected_field {
            2 => {
                self.draft.institution.pop();
            }
            3 => {
                self.draft.issued_on.pop();
            }
            4 => {
                self.draft.due_on.pop();
            }
            5 => self.draft.amount = pop_digit(self.draft.amount),
            _ => {}
        }
    }

    fn handle_horizontal(&mut self, step: i64) {
        match self.selected_field {
            0 => self.shift_priority(step),
            1 => self.draft.kind = self.draft.kind.toggle(),
            _ => {}
        }
    }
}

fn push_date_char(field: &mut String, c: char) {
    if (c.is_ascii_digit() || c == '-') && field.len() < DATE_LEN {
        field.push(c);
    }
}

/// Label of the copy control, swapped to a confirmation for a short while
/// after a successful copy.
#[derive(Debug, Clone, Default)]
pub struct CopyFeedback {
    until: Option<Instant>,
}

impl CopyFeedback {
    pub const DURATION: Duration = Duration::from_secs(2);
    pub const IDLE_LABEL: &'static str = "Copy Summary";
    pub const DONE_LABEL: &'static str = "Copied!";

    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + Self::DURATION);
    }

    pub fn tick(&mut self, now: Instant) {
        if self.until.is_some_and(|deadline| now >= deadline) {
            self.until = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.until.is_some()
    }

    pub fn label(&self) -> &'static str {
        if self.is_active() {
            Self::DONE_LABEL
        } else {
            Self::IDLE_LABEL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// Follow-up the event loop has to run after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    CopySummary,
}

pub struct App {
    pub ledger: Ledger,
    pub current_view: View,
    pub running: bool,

    // Property view
    pub property_form: PropertyForm,

    // Liens view
    pub lien_state: TableState,
    pub lien_form: Option<LienForm>,

    // Export
    pub copy_feedback: CopyFeedback,
    clipboard: Arc<dyn ClipboardSink>,

    pub status: Option<Status>,
}

impl App {
    pub fn new(ledger: Ledger, clipboard: Arc<dyn ClipboardSink>) -> Self {
        let mut lien_state = TableState::default();
        if !ledger.is_empty() {
            lien_state.select(Some(0));
        }

        Self {
            ledger,
            current_view: View::Property,
            running: true,
            property_form: PropertyForm::default(),
            lien_state,
            lien_form: None,
            copy_feedback: CopyFeedback::default(),
            clipboard,
            status: None,
        }
    }

    pub fn next_view(&mut self) {
        let views = View::all();
        let idx = views
            .iter()
            .position(|v| *v == self.current_view)
            .unwrap_or(0);
        self.current_view = views[(idx + 1) % views.len()];
    }

    pub fn prev_view(&mut self) {
        let views = View::all();
        let idx = views
            .iter()
            .position(|v| *v == self.current_view)
            .unwrap_or(0);
        self.current_view = views[(idx + views.len() - 1) % views.len()];
    }

    pub fn goto_view(&mut self, index: usize) {
        let views = View::all();
        if index < views.len() {
            self.current_view = views[index];
        }
    }

    pub fn selected_lien_id(&self) -> Option<u64> {
        self.lien_state
            .selected()
            .and_then(|i| self.ledger.liens().get(i))
            .map(|l| l.id)
    }

    pub fn select_next(&mut self) {
        if let Some(form) = self.lien_form.as_mut() {
            form.selected_field = (form.selected_field + 1) % LIEN_FIELDS;
            return;
        }
        match self.current_view {
            View::Property => {
                self.property_form.selected_field =
                    (self.property_form.selected_field + 1) % PROPERTY_FIELDS;
            }
            View::Liens => {
                let i = self.lien_state.selected().unwrap_or(0);
                if i < self.ledger.len().saturating_sub(1) {
                    self.lien_state.select(Some(i + 1));
                }
            }
            View::Summary => {}
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(form) = self.lien_form.as_mut() {
            form.selected_field = (form.selected_field + LIEN_FIELDS - 1) % LIEN_FIELDS;
            return;
        }
        match self.current_view {
            View::Property => {
                self.property_form.selected_field =
                    (self.property_form.selected_field + PROPERTY_FIELDS - 1) % PROPERTY_FIELDS;
            }
            View::Liens => {
                let i = self.lien_state.selected().unwrap_or(0);
                if i > 0 {
                    self.lien_state.select(Some(i - 1));
                }
            }
            View::Summary => {}
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(form) = self.lien_form.as_mut() {
            form.handle_char(c);
            return;
        }
        if self.current_view == View::Property {
            match self.property_form.selected_field {
                0 => self.ledger.registration_id.push(c),
                1 if c.is_ascii_digit() => {
                    self.ledger.appraisal_value = push_digit(self.ledger.appraisal_value, c)
                }
                2 if c.is_ascii_digit() => {
                    self.ledger.new_risk_amount = push_digit(self.ledger.new_risk_amount, c)
                }
                _ => {}
            }
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(form) = self.lien_form.as_mut() {
            form.handle_backspace();
            return;
        }
        if self.current_view == View::Property {
            match self.property_form.selected_field {
                0 => {
                    self.ledger.registration_id.pop();
                }
                1 => self.ledger.appraisal_value = pop_digit(self.ledger.appraisal_value),
                2 => self.ledger.new_risk_amount = pop_digit(self.ledger.new_risk_amount),
                _ => {}
            }
        }
    }

    pub fn open_new_lien(&mut self) {
        self.lien_form = Some(LienForm::new());
    }

    pub fn open_edit_lien(&mut self) {
        let form = self
            .selected_lien_id()
            .and_then(|id| self.ledger.lien(id))
            .map(LienForm::edit);
        if form.is_some() {
            self.lien_form = form;
        }
    }

    pub fn save_lien_form(&mut self) {
        let Some(form) = self.lien_form.take() else {
            return;
        };
        let id = match form.editing {
            Some(id) => {
                self.ledger.update_lien(Lien::from_draft(id, form.draft));
                id
            }
            None => self.ledger.add_lien(form.draft),
        };
        self.lien_state.select(self.ledger.position(id));
        self.status = Some(Status::Info("Lien saved".to_string()));
    }

    pub fn cancel_lien_form(&mut self) {
        self.lien_form = None;
    }

    pub fn remove_selected_lien(&mut self) {
        let Some(id) = self.selected_lien_id() else {
            return;
        };
        if self.ledger.remove_lien(id).is_some() {
            let len = self.ledger.len();
            let selected = self.lien_state.selected().unwrap_or(0);
            self.lien_state
                .select(if len == 0 { None } else { Some(selected.min(len - 1)) });
            self.status = Some(Status::Info("Lien removed".to_string()));
        }
    }

    pub fn clear_analysis(&mut self) {
        self.ledger.reset();
        self.lien_form = None;
        self.lien_state.select(None);
        self.property_form = PropertyForm::default();
        self.status = Some(Status::Info("Analysis cleared".to_string()));
        info!("analysis cleared");
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.copy_feedback.tick(now);
    }

    pub async fn copy_summary(&mut self) {
        let text = self.ledger.summary_text();
        match clipboard::export(Arc::clone(&self.clipboard), text).await {
            Ok(()) => {
                self.copy_feedback.trigger(Instant::now());
                self.status = None;
            }
            Err(e) => {
                self.status = Some(Status::Error(format!("Copy failed: {}", e)));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Command::Quit,
                KeyCode::Char('r') => {
                    self.clear_analysis();
                    Command::None
                }
                _ => Command::None,
            };
        }

        if self.lien_form.is_some() {
            self.handle_form_key(key);
            return Command::None;
        }

        match key.code {
            // Leaves the property fields without dropping the session
            KeyCode::Esc if self.current_view == View::Property => self.goto_view(1),
            KeyCode::Esc => return Command::Quit,
            KeyCode::Tab | KeyCode::Right => self.next_view(),
            KeyCode::BackTab | KeyCode::Left => self.prev_view(),
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_prev(),
            KeyCode::Backspace => self.handle_backspace(),
            // Text input for the property fields
            KeyCode::Char(c) if self.current_view == View::Property => self.handle_char(c),
            KeyCode::Char('q') => return Command::Quit,
            KeyCode::Char('1') => self.goto_view(0),
            KeyCode::Char('2') => self.goto_view(1),
            KeyCode::Char('3') => self.goto_view(2),
            KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home if self.current_view == View::Liens && !self.ledger.is_empty() => {
                self.lien_state.select(Some(0));
            }
            KeyCode::End if self.current_view == View::Liens && !self.ledger.is_empty() => {
                self.lien_state.select(Some(self.ledger.len() - 1));
            }
            KeyCode::Char('a') if self.current_view == View::Liens => self.open_new_lien(),
            KeyCode::Enter if self.current_view == View::Property => self.select_next(),
            KeyCode::Enter | KeyCode::Char('e') if self.current_view == View::Liens => {
                self.open_edit_lien()
            }
            KeyCode::Delete | KeyCode::Char('d') if self.current_view == View::Liens => {
                self.remove_selected_lien()
            }
            KeyCode::Char('c') => {
                if self.ledger.is_empty() {
                    self.status = Some(Status::Info("No liens to copy".to_string()));
                } else {
                    return Command::CopySummary;
                }
            }
            _ => {}
        }
        Command::None
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.lien_form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.cancel_lien_form(),
            KeyCode::Enter => self.save_lien_form(),
            KeyCode::Down | KeyCode::Tab => self.select_next(),
            KeyCode::Up | KeyCode::BackTab => self.select_prev(),
            KeyCode::Left => form.handle_horizontal(-1),
            KeyCode::Right => form.handle_horizontal(1),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
    }
}

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
) -> AppResult<()> {
    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| super::views::draw(f, &mut app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        Command::Quit => app.running = false,
                        Command::CopySummary => app.copy_summary().await,
                        Command::None => {}
                    }
                }
            }
        }

        if !app.running {
            return Ok(());
        }
    }
}
