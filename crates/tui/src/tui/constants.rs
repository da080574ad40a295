use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const STATUS_INPUT: &str = "Type a task and press Enter to add it (Esc for the list)";
pub(crate) const STATUS_LIST: &str = "Working with the list, press h for keys";
pub(crate) const STATUS_BUSY: &str = "Finish the open dialog first";
pub(crate) const STATUS_NOTHING_SELECTED: &str = "No task selected";
pub(crate) const STATUS_HELP: &str = "Keyboard reference (Enter/Esc to close)";
pub(crate) const EMPTY_STATE: &str = "No tasks.";
