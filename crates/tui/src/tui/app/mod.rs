use std::future::Future;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::constants::*;
use super::helpers::plural;
use crate::core::{BulkOutcome, FilterMode, ListController, ListError, RenameOutcome};

mod input;
mod render;

/// Startup state applied before the first frame.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub filter: FilterMode,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    List,
}

/// Outcome of a dialog-backed operation, delivered back to the UI loop.
#[derive(Debug)]
pub(crate) enum OpReport {
    Renamed(Result<RenameOutcome, ListError>),
    Deleted(Result<bool, ListError>),
    DeletedDone(Result<BulkOutcome, ListError>),
    DeletedAll(Result<BulkOutcome, ListError>),
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

/// Screen regions of the open dialog, recorded while drawing for mouse hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DialogHitboxes {
    popup: Rect,
    primary: Rect,
    secondary: Rect,
}

pub(crate) struct App {
    controller: ListController,
    reports: UnboundedSender<OpReport>,
    focus: Focus,
    selected: usize,
    list_state: ListState,
    in_flight: bool,
    status: Option<StatusMessage>,
    show_help: bool,
    hitboxes: Option<DialogHitboxes>,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(
        controller: ListController,
        options: SessionOptions,
        reports: UnboundedSender<OpReport>,
    ) -> Self {
        let mut app = Self {
            controller,
            reports,
            focus: Focus::Input,
            selected: 0,
            list_state: ListState::default(),
            in_flight: false,
            status: None,
            show_help: false,
            hitboxes: None,
            should_quit: false,
        };
        app.controller.set_filter(options.filter);
        app.seed(options.tasks);
        app.clamp_selection();
        app
    }

    fn seed(&mut self, tasks: Vec<String>) {
        let mut skipped = Vec::new();
        for task in tasks {
            self.controller.set_input(task.as_str());
            if let Err(err) = self.controller.add() {
                warn!(task = task.as_str(), error = %err, "skipping seed task");
                skipped.push(format!("'{task}': {err}"));
            }
        }
        self.controller.set_input(String::new());

        if skipped.is_empty() {
            self.set_status_info(STATUS_INPUT);
        } else {
            self.set_status_error(format!(
                "Skipped {} invalid task{}: {}",
                skipped.len(),
                plural(skipped.len()),
                skipped.join("; ")
            ));
        }
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Row index of the current selection among the visible rows.
    fn selected_row(&self) -> Option<usize> {
        self.controller
            .snapshot()
            .visible()
            .nth(self.selected)
            .map(|row| row.index)
    }

    fn clamp_selection(&mut self) {
        let visible = self.controller.snapshot().visible_count();
        if visible == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(visible - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_next(&mut self) {
        self.selected = self.selected.saturating_add(1);
        self.clamp_selection();
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.clamp_selection();
    }

    fn select_first(&mut self) {
        self.selected = 0;
        self.clamp_selection();
    }

    fn select_last(&mut self) {
        self.selected = usize::MAX;
        self.clamp_selection();
    }

    /// Move the selection onto row `index` if the current filter shows it.
    fn select_row(&mut self, index: usize) {
        if let Some(position) = self
            .controller
            .snapshot()
            .visible()
            .position(|row| row.index == index)
        {
            self.selected = position;
        }
        self.clamp_selection();
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.set_status_info(STATUS_INPUT);
    }

    fn focus_list(&mut self) {
        self.focus = Focus::List;
        self.set_status_info(STATUS_LIST);
    }

    fn add_task(&mut self) {
        match self.controller.add() {
            Ok(index) => {
                let text = self
                    .controller
                    .snapshot()
                    .rows
                    .get(index)
                    .map(|row| row.text.clone())
                    .unwrap_or_default();
                self.select_row(index);
                self.set_status_info(format!("Added '{text}'"));
            }
            Err(err) => {
                // Shown inline under the input.
                debug!(error = %err, "add rejected");
                self.status = None;
            }
        }
    }

    fn toggle_selected(&mut self) {
        let Some(index) = self.selected_row() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        match self.controller.toggle_done(index) {
            Ok(true) => self.set_status_info("Marked task as done"),
            Ok(false) => self.set_status_info("Marked task as active"),
            Err(err) => self.set_status_error(err.to_string()),
        }
        self.clamp_selection();
    }

    fn set_filter(&mut self, mode: FilterMode) {
        self.controller.set_filter(mode);
        self.clamp_selection();
        self.set_status_info(format!("Showing {} tasks", mode.as_str()));
    }

    fn rename_selected(&mut self) {
        let Some(index) = self.selected_row() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        let controller = self.controller.clone();
        self.spawn_operation(async move { OpReport::Renamed(controller.rename(index).await) });
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.selected_row() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        let controller = self.controller.clone();
        self.spawn_operation(async move { OpReport::Deleted(controller.delete(index).await) });
    }

    fn delete_done(&mut self) {
        let controller = self.controller.clone();
        self.spawn_operation(async move { OpReport::DeletedDone(controller.delete_done().await) });
    }

    fn delete_all(&mut self) {
        let controller = self.controller.clone();
        self.spawn_operation(async move { OpReport::DeletedAll(controller.delete_all().await) });
    }

    /// Run a dialog-backed operation; list commands are refused until it reports back.
    fn spawn_operation<F>(&mut self, operation: F)
    where
        F: Future<Output = OpReport> + Send + 'static,
    {
        self.in_flight = true;
        self.status = None;
        let reports = self.reports.clone();
        tokio::spawn(async move {
            // The receiver only disappears when the UI loop has exited.
            let _ = reports.send(operation.await);
        });
    }

    pub(crate) fn on_report(&mut self, report: OpReport) {
        self.in_flight = false;
        match report {
            OpReport::Renamed(Ok(RenameOutcome::Renamed(text))) => {
                self.set_status_info(format!("Renamed to '{text}'"));
            }
            OpReport::Deleted(Ok(true)) => self.set_status_info("Deleted task 🗑️"),
            OpReport::DeletedDone(Ok(BulkOutcome::Deleted(count))) => {
                self.set_status_info(format!(
                    "Deleted {count} completed task{}",
                    plural(count)
                ));
            }
            OpReport::DeletedAll(Ok(BulkOutcome::Deleted(count))) => {
                self.set_status_info(format!("Deleted {count} task{}", plural(count)));
            }
            OpReport::Renamed(Ok(RenameOutcome::Cancelled))
            | OpReport::Deleted(Ok(false))
            | OpReport::DeletedDone(Ok(BulkOutcome::Cancelled | BulkOutcome::NothingToDelete))
            | OpReport::DeletedAll(Ok(BulkOutcome::Cancelled | BulkOutcome::NothingToDelete)) => {
                self.status = None;
            }
            OpReport::Renamed(Err(err))
            | OpReport::Deleted(Err(err))
            | OpReport::DeletedDone(Err(err))
            | OpReport::DeletedAll(Err(err)) => {
                warn!(error = %err, "operation failed");
                self.set_status_error(err.to_string());
            }
        }
        self.clamp_selection();
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}
