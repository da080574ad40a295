pub mod buffer;
pub mod config;
pub mod dialog;
pub mod list;
pub mod logging;
pub mod validate;

pub use buffer::{FieldEdit, TextBuffer};
pub use config::AppConfig;
pub use dialog::{
    ConfirmRequest, DialogBody, DialogButton, DialogError, DialogEvent, DialogId, DialogInput,
    DialogView, ModalLayer, PendingDialog, PromptRequest,
};
pub use list::{
    BulkOutcome, FilterMode, ListController, ListError, ListSnapshot, RenameOutcome, RowView,
    TaskRow,
};
pub use validate::{validate, ValidationError, MIN_TASK_CHARS};
