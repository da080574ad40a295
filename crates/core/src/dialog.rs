//! Modal confirmation and prompt dialogs.
//!
//! A [`ModalLayer`] owns a single dialog slot. Opening a dialog returns a
//! [`PendingDialog`] future that yields exactly one outcome; the front end
//! feeds user input through [`ModalLayer::dispatch`] and renders
//! [`ModalLayer::current`]. Resolution removes the dialog from the slot
//! before the outcome is delivered, so later input is ignored.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::buffer::{FieldEdit, TextBuffer};
use crate::validate::{validate, ValidationError};

pub type DialogId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("another dialog is already open")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: String::from("Confirm"),
            cancel_label: String::from("Cancel"),
        }
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: String,
    pub initial_value: String,
    pub save_label: String,
    pub cancel_label: String,
}

impl PromptRequest {
    pub fn new(title: impl Into<String>, initial_value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            initial_value: initial_value.into(),
            save_label: String::from("Save"),
            cancel_label: String::from("Cancel"),
        }
    }

    pub fn labels(mut self, save: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.save_label = save.into();
        self.cancel_label = cancel.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    /// Confirm / save.
    Primary,
    /// Cancel / close.
    Secondary,
}

impl DialogButton {
    pub fn toggle(self) -> Self {
        match self {
            DialogButton::Primary => DialogButton::Secondary,
            DialogButton::Secondary => DialogButton::Primary,
        }
    }
}

/// User input routed to the open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogInput {
    Confirm,
    Cancel,
    OutsideClick,
    Escape,
    /// Activates the focused button of a confirm dialog; saves a prompt.
    Enter,
    FocusNext,
    Edit(FieldEdit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// No dialog was open or the input does not apply to it.
    Ignored,
    Updated,
    /// The prompt refused to save; the dialog stays open showing the error.
    Rejected(ValidationError),
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogBody {
    Message(String),
    Field {
        value: String,
        cursor_column: usize,
        selected_all: bool,
        error: Option<ValidationError>,
    },
}

/// Render snapshot of the open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub id: DialogId,
    pub title: String,
    pub body: DialogBody,
    pub confirm_label: String,
    pub cancel_label: String,
    pub focus: DialogButton,
}

impl DialogView {
    pub fn is_prompt(&self) -> bool {
        matches!(self.body, DialogBody::Field { .. })
    }
}

enum Resolution {
    Accept(Option<String>),
    Dismiss,
}

enum Step {
    Ignored,
    Updated,
    Rejected(ValidationError),
    Resolve(Resolution),
}

enum DialogKind {
    Confirm {
        message: String,
        resolver: oneshot::Sender<bool>,
    },
    Prompt {
        field: TextBuffer,
        error: Option<ValidationError>,
        resolver: oneshot::Sender<Option<String>>,
    },
}

struct ActiveDialog {
    id: DialogId,
    title: String,
    confirm_label: String,
    cancel_label: String,
    focus: DialogButton,
    kind: DialogKind,
}

impl ActiveDialog {
    fn handle(&mut self, input: DialogInput) -> Step {
        match &mut self.kind {
            DialogKind::Confirm { .. } => match input {
                DialogInput::Confirm => Step::Resolve(Resolution::Accept(None)),
                DialogInput::Cancel | DialogInput::OutsideClick | DialogInput::Escape => {
                    Step::Resolve(Resolution::Dismiss)
                }
                DialogInput::Enter => match self.focus {
                    DialogButton::Primary => Step::Resolve(Resolution::Accept(None)),
                    DialogButton::Secondary => Step::Resolve(Resolution::Dismiss),
                },
                DialogInput::FocusNext => {
                    self.focus = self.focus.toggle();
                    Step::Updated
                }
                DialogInput::Edit(_) => Step::Ignored,
            },
            DialogKind::Prompt { field, error, .. } => match input {
                DialogInput::Confirm | DialogInput::Enter => match validate(field.as_str()) {
                    Ok(value) => Step::Resolve(Resolution::Accept(Some(value.to_string()))),
                    Err(err) => {
                        *error = Some(err);
                        Step::Rejected(err)
                    }
                },
                DialogInput::Cancel | DialogInput::OutsideClick | DialogInput::Escape => {
                    Step::Resolve(Resolution::Dismiss)
                }
                DialogInput::Edit(edit) => {
                    if edit.changes_text() {
                        *error = None;
                    }
                    field.apply(edit);
                    Step::Updated
                }
                DialogInput::FocusNext => Step::Ignored,
            },
        }
    }

    fn resolve(self, resolution: Resolution) {
        // A send error means the waiting side went away; nothing left to notify.
        match (self.kind, resolution) {
            (DialogKind::Confirm { resolver, .. }, Resolution::Accept(_)) => {
                let _ = resolver.send(true);
            }
            (DialogKind::Confirm { resolver, .. }, Resolution::Dismiss) => {
                let _ = resolver.send(false);
            }
            (DialogKind::Prompt { resolver, .. }, Resolution::Accept(value)) => {
                let _ = resolver.send(value);
            }
            (DialogKind::Prompt { resolver, .. }, Resolution::Dismiss) => {
                let _ = resolver.send(None);
            }
        }
    }

    fn view(&self) -> DialogView {
        let body = match &self.kind {
            DialogKind::Confirm { message, .. } => DialogBody::Message(message.clone()),
            DialogKind::Prompt { field, error, .. } => DialogBody::Field {
                value: field.as_str().to_string(),
                cursor_column: field.cursor_column(),
                selected_all: field.is_selected_all(),
                error: *error,
            },
        };
        DialogView {
            id: self.id,
            title: self.title.clone(),
            body,
            confirm_label: self.confirm_label.clone(),
            cancel_label: self.cancel_label.clone(),
            focus: self.focus,
        }
    }
}

#[derive(Default)]
struct Slot {
    active: Option<ActiveDialog>,
    next_id: DialogId,
}

/// Cloneable handle over the single dialog slot.
#[derive(Clone, Default)]
pub struct ModalLayer {
    slot: Arc<Mutex<Slot>>,
}

impl ModalLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a confirmation dialog. Resolves `true` only on confirm.
    pub fn confirm(&self, request: ConfirmRequest) -> Result<PendingDialog<bool>, DialogError> {
        let (resolver, receiver) = oneshot::channel();
        let id = self.open(request.title, |id, title| ActiveDialog {
            id,
            title,
            confirm_label: request.confirm_label,
            cancel_label: request.cancel_label,
            focus: DialogButton::Secondary,
            kind: DialogKind::Confirm {
                message: request.message,
                resolver,
            },
        })?;
        Ok(PendingDialog::new(id, receiver, self.clone()))
    }

    /// Open a prompt dialog. Resolves with the trimmed, validated value or `None`.
    pub fn prompt(
        &self,
        request: PromptRequest,
    ) -> Result<PendingDialog<Option<String>>, DialogError> {
        let (resolver, receiver) = oneshot::channel();
        let id = self.open(request.title, |id, title| ActiveDialog {
            id,
            title,
            confirm_label: request.save_label,
            cancel_label: request.cancel_label,
            focus: DialogButton::Primary,
            kind: DialogKind::Prompt {
                field: TextBuffer::seeded(request.initial_value),
                error: None,
                resolver,
            },
        })?;
        Ok(PendingDialog::new(id, receiver, self.clone()))
    }

    pub fn dispatch(&self, input: DialogInput) -> DialogEvent {
        let mut slot = self.slot.lock();
        let Some(active) = slot.active.as_mut() else {
            return DialogEvent::Ignored;
        };

        match active.handle(input) {
            Step::Ignored => DialogEvent::Ignored,
            Step::Updated => DialogEvent::Updated,
            Step::Rejected(err) => {
                debug!(dialog = active.id, error = %err, "dialog rejected input");
                DialogEvent::Rejected(err)
            }
            Step::Resolve(resolution) => {
                let Some(dialog) = slot.active.take() else {
                    return DialogEvent::Ignored;
                };
                drop(slot);
                debug!(
                    dialog = dialog.id,
                    accepted = matches!(resolution, Resolution::Accept(_)),
                    "dialog resolved"
                );
                dialog.resolve(resolution);
                DialogEvent::Resolved
            }
        }
    }

    pub fn current(&self) -> Option<DialogView> {
        self.slot.lock().active.as_ref().map(ActiveDialog::view)
    }

    pub fn is_open(&self) -> bool {
        self.slot.lock().active.is_some()
    }

    fn open<F>(&self, title: String, build: F) -> Result<DialogId, DialogError>
    where
        F: FnOnce(DialogId, String) -> ActiveDialog,
    {
        let mut slot = self.slot.lock();
        if slot.active.is_some() {
            debug!(title = title.as_str(), "dialog refused while another is open");
            return Err(DialogError::Busy);
        }
        let id = slot.next_id;
        slot.next_id += 1;
        debug!(dialog = id, title = title.as_str(), "dialog opened");
        slot.active = Some(build(id, title));
        Ok(id)
    }

    /// Drop the dialog with `id` if it is still open, without an outcome.
    fn dismiss(&self, id: DialogId) {
        let mut slot = self.slot.lock();
        if slot.active.as_ref().is_some_and(|active| active.id == id) {
            slot.active = None;
            debug!(dialog = id, "dialog abandoned by its caller");
        }
    }
}

/// Outcome of an open dialog.
///
/// Yields the dialog's result once the user decides. If the dialog is torn
/// down without a decision the cancel outcome (`T::default()`) is produced.
/// Dropping an unfinished `PendingDialog` closes its dialog.
pub struct PendingDialog<T> {
    id: DialogId,
    receiver: oneshot::Receiver<T>,
    layer: ModalLayer,
    finished: bool,
}

impl<T> PendingDialog<T> {
    fn new(id: DialogId, receiver: oneshot::Receiver<T>, layer: ModalLayer) -> Self {
        Self {
            id,
            receiver,
            layer,
            finished: false,
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl<T: Default> Future for PendingDialog<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(outcome) => {
                this.finished = true;
                Poll::Ready(outcome.unwrap_or_default())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for PendingDialog<T> {
    fn drop(&mut self) {
        if !self.finished {
            self.layer.dismiss(self.id);
        }
    }
}
