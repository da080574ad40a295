pub use tasklet_tui::cli;
pub use tasklet_tui::commands;
pub use tasklet_tui::config;
pub use tasklet_tui::tui;
pub use tasklet_tui::AppConfig;

pub use tasklet_core as core;
pub use tasklet_core::dialog;
pub use tasklet_core::list;
pub use tasklet_core::validate;
