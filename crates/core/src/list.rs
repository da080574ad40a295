use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use clap::ValueEnum;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use crate::buffer::{FieldEdit, TextBuffer};
use crate::dialog::{ConfirmRequest, DialogError, ModalLayer, PromptRequest};
use crate::validate::{validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Done,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Active, FilterMode::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Active => "Active",
            FilterMode::Done => "Done",
        }
    }

    pub fn index(self) -> usize {
        match self {
            FilterMode::All => 0,
            FilterMode::Active => 1,
            FilterMode::Done => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn shows(&self, row: &TaskRow) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !row.done,
            FilterMode::Done => row.done,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "done" => Ok(FilterMode::Done),
            other => Err(anyhow!(
                "Unknown filter '{}': expected all|active|done",
                other
            )),
        }
    }
}

impl ValueEnum for FilterMode {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub text: String,
    pub done: bool,
}

impl TaskRow {
    fn new(text: String) -> Self {
        Self { text, done: false }
    }
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("no task at position {0}")]
    NoSuchRow(usize),
    #[error(transparent)]
    Dialog(#[from] DialogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(String),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    /// Nothing matched; the user was shown an informational dialog.
    NothingToDelete,
    Cancelled,
    Deleted(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub text: String,
    pub done: bool,
    pub visible: bool,
}

/// Immutable copy of the list state for rendering and assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub rows: Vec<RowView>,
    pub filter: FilterMode,
    pub input: String,
    pub input_cursor: usize,
    pub input_error: Option<ValidationError>,
    pub empty_state: bool,
}

impl ListSnapshot {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn done_count(&self) -> usize {
        self.rows.iter().filter(|row| row.done).count()
    }

    pub fn visible(&self) -> impl Iterator<Item = &RowView> {
        self.rows.iter().filter(|row| row.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}

#[derive(Debug, Default)]
struct ListState {
    rows: Vec<TaskRow>,
    filter: FilterMode,
    input: TextBuffer,
    input_error: Option<ValidationError>,
    empty_state: bool,
}

impl ListState {
    fn refresh_empty_state(&mut self) {
        self.empty_state = self.rows.is_empty();
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut TaskRow, ListError> {
        self.rows.get_mut(index).ok_or(ListError::NoSuchRow(index))
    }
}

/// Owns the task rows, the filter mode and the main input, and routes
/// destructive actions through the [`ModalLayer`].
#[derive(Clone)]
pub struct ListController {
    state: Arc<Mutex<ListState>>,
    modal: ModalLayer,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new()
    }
}

impl ListController {
    pub fn new() -> Self {
        Self::with_modal(ModalLayer::new())
    }

    pub fn with_modal(modal: ModalLayer) -> Self {
        let mut state = ListState::default();
        state.refresh_empty_state();
        Self {
            state: Arc::new(Mutex::new(state)),
            modal,
        }
    }

    pub fn modal(&self) -> &ModalLayer {
        &self.modal
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state.lock();
        let rows = state
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                index,
                text: row.text.clone(),
                done: row.done,
                visible: state.filter.shows(row),
            })
            .collect();
        ListSnapshot {
            rows,
            filter: state.filter,
            input: state.input.as_str().to_string(),
            input_cursor: state.input.cursor_column(),
            input_error: state.input_error,
            empty_state: state.empty_state,
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().rows.is_empty()
    }

    /// Edit the main input. Edits that change the text clear the inline error.
    pub fn edit_input(&self, edit: FieldEdit) {
        let mut state = self.state.lock();
        if edit.changes_text() {
            state.input_error = None;
        }
        state.input.apply(edit);
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.edit_input(FieldEdit::Replace(text.into()));
    }

    /// Validate the main input and append it as a new row.
    pub fn add(&self) -> Result<usize, ValidationError> {
        let mut state = self.state.lock();
        let validated = validate(state.input.as_str()).map(str::to_string);
        let text = match validated {
            Ok(text) => text,
            Err(err) => {
                debug!(error = %err, "add rejected");
                state.input_error = Some(err);
                return Err(err);
            }
        };

        state.rows.push(TaskRow::new(text));
        state.input.clear();
        state.input_error = None;
        state.refresh_empty_state();
        let index = state.rows.len() - 1;
        info!(index, "task added");
        Ok(index)
    }

    /// Flip the done flag of the row at `index` and return the new value.
    pub fn toggle_done(&self, index: usize) -> Result<bool, ListError> {
        let mut state = self.state.lock();
        let row = state.row_mut(index)?;
        row.done = !row.done;
        let done = row.done;
        debug!(index, done, "task toggled");
        Ok(done)
    }

    pub fn set_filter(&self, mode: FilterMode) {
        let mut state = self.state.lock();
        if state.filter != mode {
            debug!(filter = mode.as_str(), "filter changed");
        }
        state.filter = mode;
    }

    pub fn filter(&self) -> FilterMode {
        self.state.lock().filter
    }

    pub async fn rename(&self, index: usize) -> Result<RenameOutcome, ListError> {
        let current = self.row_text(index)?;
        let pending = self.modal.prompt(
            PromptRequest::new("Rename Task", current.as_str()).labels("Save", "Cancel"),
        )?;

        let Some(next) = pending.await else {
            return Ok(RenameOutcome::Cancelled);
        };

        let mut state = self.state.lock();
        let row = state.row_mut(index)?;
        row.text = next.trim().to_string();
        info!(index, "task renamed");
        Ok(RenameOutcome::Renamed(row.text.clone()))
    }

    /// Delete the row at `index` after confirmation. Returns whether it was removed.
    pub async fn delete(&self, index: usize) -> Result<bool, ListError> {
        self.row_text(index)?;
        let confirmed = self
            .modal
            .confirm(
                ConfirmRequest::new("Delete Task", "Are you sure you want to delete this task?")
                    .labels("Confirm", "Cancel"),
            )?
            .await;
        if !confirmed {
            return Ok(false);
        }

        let mut state = self.state.lock();
        if index >= state.rows.len() {
            return Err(ListError::NoSuchRow(index));
        }
        state.rows.remove(index);
        state.refresh_empty_state();
        info!(index, "task deleted");
        Ok(true)
    }

    pub async fn delete_done(&self) -> Result<BulkOutcome, ListError> {
        let has_done = self.state.lock().rows.iter().any(|row| row.done);
        if !has_done {
            self.inform("There are no completed tasks.").await?;
            return Ok(BulkOutcome::NothingToDelete);
        }

        self.bulk_delete(
            ConfirmRequest::new(
                "Delete Done Tasks",
                "Are you sure you want to delete all completed tasks?",
            ),
            |row| row.done,
        )
        .await
    }

    pub async fn delete_all(&self) -> Result<BulkOutcome, ListError> {
        if self.is_empty() {
            self.inform("No tasks to delete.").await?;
            return Ok(BulkOutcome::NothingToDelete);
        }

        self.bulk_delete(
            ConfirmRequest::new("Delete All Tasks", "Are you sure you want to delete all tasks?"),
            |_| true,
        )
        .await
    }

    async fn bulk_delete<F>(
        &self,
        request: ConfirmRequest,
        doomed: F,
    ) -> Result<BulkOutcome, ListError>
    where
        F: Fn(&TaskRow) -> bool,
    {
        let confirmed = self
            .modal
            .confirm(request.labels("Confirm", "Cancel"))?
            .await;
        if !confirmed {
            return Ok(BulkOutcome::Cancelled);
        }

        let mut state = self.state.lock();
        let before = state.rows.len();
        state.rows.retain(|row| !doomed(row));
        let removed = before - state.rows.len();
        state.refresh_empty_state();
        info!(removed, "tasks deleted");
        Ok(BulkOutcome::Deleted(removed))
    }

    async fn inform(&self, message: &str) -> Result<(), ListError> {
        self.modal
            .confirm(ConfirmRequest::new("Info", message).labels("OK", "Close"))?
            .await;
        Ok(())
    }

    fn row_text(&self, index: usize) -> Result<String, ListError> {
        let state = self.state.lock();
        state
            .rows
            .get(index)
            .map(|row| row.text.clone())
            .ok_or(ListError::NoSuchRow(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{DialogBody, DialogEvent, DialogInput};
    use pretty_assertions::assert_eq;

    fn controller_with(tasks: &[&str]) -> ListController {
        let controller = ListController::new();
        for task in tasks {
            controller.set_input(*task);
            controller.add().expect("valid seed task");
        }
        controller
    }

    /// Let spawned operations reach their dialog.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn add_appends_row_and_clears_input() {
        let controller = ListController::new();
        controller.set_input("  buy oat milk ");

        assert_eq!(controller.add(), Ok(0));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total(), 1);
        assert_eq!(snapshot.rows[0].text, "buy oat milk");
        assert!(!snapshot.rows[0].done);
        assert_eq!(snapshot.input, "");
        assert_eq!(snapshot.input_error, None);
    }

    #[test]
    fn add_rejects_invalid_input_and_keeps_it() {
        let controller = controller_with(&["water plants"]);
        controller.set_input("abc");

        assert_eq!(controller.add(), Err(ValidationError::TooShort));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total(), 1);
        assert_eq!(snapshot.input, "abc");
        assert_eq!(snapshot.input_error, Some(ValidationError::TooShort));

        controller.set_input("9 lives");
        assert_eq!(controller.add(), Err(ValidationError::StartsWithDigit));
        assert_eq!(
            controller.snapshot().input_error,
            Some(ValidationError::StartsWithDigit)
        );
    }

    #[test]
    fn typing_clears_inline_error() {
        let controller = ListController::new();
        assert_eq!(controller.add(), Err(ValidationError::Empty));

        controller.edit_input(FieldEdit::Insert('a'));
        assert_eq!(controller.snapshot().input_error, None);
    }

    #[test]
    fn cursor_moves_keep_inline_error() {
        let controller = ListController::new();
        controller.set_input("abc");
        assert_eq!(controller.add(), Err(ValidationError::TooShort));

        for edit in [FieldEdit::Left, FieldEdit::Home, FieldEdit::Right, FieldEdit::End] {
            controller.edit_input(edit);
        }
        assert_eq!(
            controller.snapshot().input_error,
            Some(ValidationError::TooShort)
        );

        controller.edit_input(FieldEdit::Backspace);
        assert_eq!(controller.snapshot().input_error, None);
        assert_eq!(controller.snapshot().input, "ab");
    }

    #[test]
    fn empty_state_tracks_row_count() {
        let controller = ListController::new();
        assert!(controller.snapshot().empty_state);

        controller.set_input("call the bank");
        controller.add().expect("valid");
        assert!(!controller.snapshot().empty_state);
    }

    #[test]
    fn toggle_twice_restores_row() {
        let controller = controller_with(&["stretch legs", "read a book"]);
        let before = controller.snapshot();

        assert!(controller.toggle_done(1).expect("row"));
        assert!(!controller.toggle_done(1).expect("row"));
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn toggle_unknown_row_is_an_error() {
        let controller = ListController::new();
        assert!(matches!(
            controller.toggle_done(3),
            Err(ListError::NoSuchRow(3))
        ));
    }

    #[test]
    fn filter_controls_visibility_only() {
        let controller = controller_with(&["first task", "second task", "third task"]);
        controller.toggle_done(1).expect("row");

        controller.set_filter(FilterMode::Done);
        let snapshot = controller.snapshot();
        let visible: Vec<_> = snapshot.visible().map(|row| row.index).collect();
        assert_eq!(visible, vec![1]);

        controller.set_filter(FilterMode::Active);
        let snapshot = controller.snapshot();
        let visible: Vec<_> = snapshot.visible().map(|row| row.index).collect();
        assert_eq!(visible, vec![0, 2]);

        controller.set_filter(FilterMode::All);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.visible_count(), 3);
        assert_eq!(snapshot.done_count(), 1);
        assert!(snapshot.rows[1].done);
    }

    #[test]
    fn toggling_under_active_filter_hides_row() {
        let controller = controller_with(&["first task", "second task"]);
        controller.set_filter(FilterMode::Active);

        controller.toggle_done(0).expect("row");
        let snapshot = controller.snapshot();
        assert!(!snapshot.rows[0].visible);
        assert!(snapshot.rows[1].visible);
    }

    #[test]
    fn filter_mode_parses_and_cycles() {
        assert_eq!("Done".parse::<FilterMode>().expect("parse"), FilterMode::Done);
        assert!("later".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::Done.next(), FilterMode::All);
        assert_eq!(FilterMode::All.prev(), FilterMode::Done);
    }

    #[tokio::test]
    async fn rename_cancel_keeps_text() {
        let controller = controller_with(&["walk the dog"]);
        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.rename(0).await }
        });
        settle().await;

        let view = controller.modal().current().expect("prompt open");
        assert_eq!(view.title, "Rename Task");
        assert!(matches!(
            view.body,
            DialogBody::Field { ref value, .. } if value == "walk the dog"
        ));

        controller.modal().dispatch(DialogInput::Escape);
        let outcome = task.await.expect("join").expect("rename");
        assert_eq!(outcome, RenameOutcome::Cancelled);
        assert_eq!(controller.snapshot().rows[0].text, "walk the dog");
    }

    #[tokio::test]
    async fn rename_saves_trimmed_valid_text() {
        let controller = controller_with(&["walk the dog"]);
        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.rename(0).await }
        });
        settle().await;

        let modal = controller.modal();
        modal.dispatch(DialogInput::Edit(FieldEdit::Replace(String::from("cat"))));
        assert_eq!(
            modal.dispatch(DialogInput::Enter),
            DialogEvent::Rejected(ValidationError::TooShort)
        );
        modal.dispatch(DialogInput::Edit(FieldEdit::Replace(String::from(
            " walk the cat ",
        ))));
        assert_eq!(modal.dispatch(DialogInput::Enter), DialogEvent::Resolved);

        let outcome = task.await.expect("join").expect("rename");
        assert_eq!(outcome, RenameOutcome::Renamed(String::from("walk the cat")));
        assert_eq!(controller.snapshot().rows[0].text, "walk the cat");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let controller = controller_with(&["only task here"]);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete(0).await }
        });
        settle().await;
        controller.modal().dispatch(DialogInput::OutsideClick);
        assert!(!task.await.expect("join").expect("delete"));
        assert_eq!(controller.len(), 1);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete(0).await }
        });
        settle().await;
        controller.modal().dispatch(DialogInput::Confirm);
        assert!(task.await.expect("join").expect("delete"));
        assert!(controller.is_empty());
        assert!(controller.snapshot().empty_state);
    }

    #[tokio::test]
    async fn delete_done_without_done_rows_only_informs() {
        let controller = controller_with(&["first task"]);
        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete_done().await }
        });
        settle().await;

        let view = controller.modal().current().expect("info open");
        assert_eq!(view.title, "Info");
        assert_eq!(
            view.body,
            DialogBody::Message(String::from("There are no completed tasks."))
        );
        controller.modal().dispatch(DialogInput::Confirm);

        let outcome = task.await.expect("join").expect("delete done");
        assert_eq!(outcome, BulkOutcome::NothingToDelete);
        assert_eq!(controller.len(), 1);
    }

    #[tokio::test]
    async fn delete_done_removes_only_done_rows() {
        let controller = controller_with(&["first task", "second task", "third task"]);
        controller.toggle_done(0).expect("row");
        controller.toggle_done(2).expect("row");

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete_done().await }
        });
        settle().await;
        assert_eq!(
            controller.modal().current().map(|view| view.title),
            Some(String::from("Delete Done Tasks"))
        );
        controller.modal().dispatch(DialogInput::Confirm);

        let outcome = task.await.expect("join").expect("delete done");
        assert_eq!(outcome, BulkOutcome::Deleted(2));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total(), 1);
        assert_eq!(snapshot.rows[0].text, "second task");
    }

    #[tokio::test]
    async fn delete_all_on_empty_list_shows_info() {
        let controller = ListController::new();
        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete_all().await }
        });
        settle().await;

        let view = controller.modal().current().expect("info open");
        assert_eq!(
            view.body,
            DialogBody::Message(String::from("No tasks to delete."))
        );
        controller.modal().dispatch(DialogInput::Escape);

        let outcome = task.await.expect("join").expect("delete all");
        assert_eq!(outcome, BulkOutcome::NothingToDelete);
        assert_eq!(controller.len(), 0);
        assert!(controller.snapshot().empty_state);
    }

    #[tokio::test]
    async fn delete_all_cancel_then_confirm() {
        let controller = controller_with(&["first task", "second task"]);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete_all().await }
        });
        settle().await;
        controller.modal().dispatch(DialogInput::Cancel);
        assert_eq!(
            task.await.expect("join").expect("delete all"),
            BulkOutcome::Cancelled
        );
        assert_eq!(controller.len(), 2);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.delete_all().await }
        });
        settle().await;
        controller.modal().dispatch(DialogInput::Confirm);
        assert_eq!(
            task.await.expect("join").expect("delete all"),
            BulkOutcome::Deleted(2)
        );
        assert!(controller.snapshot().empty_state);

        controller.set_input("fresh start");
        controller.add().expect("valid");
        assert!(!controller.snapshot().empty_state);
    }

    #[tokio::test]
    async fn operations_refuse_to_stack_dialogs() {
        let controller = controller_with(&["first task"]);
        let pending = controller
            .modal()
            .confirm(ConfirmRequest::new("Busy", "already open"))
            .expect("open");

        let err = controller.delete(0).await.expect_err("busy");
        assert!(matches!(err, ListError::Dialog(DialogError::Busy)));
        assert_eq!(controller.len(), 1);
        drop(pending);
    }
}
