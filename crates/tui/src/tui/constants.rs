use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);

pub(crate) const HELP_INPUT: &str =
    "Enter add ✚ • Esc to list • Ctrl+/ focus input • ? help • Ctrl+C quit";
pub(crate) const HELP_LIST: &str = "j/k move | space toggle ✅ | e edit ✏️ | x delete 🗑️ | 1/2/3 filter 🔍 | C clear completed | X clear all | a add ✚ | ? help | q quit";
pub(crate) const HELP_CONFIRM: &str = "←/→ choose • y/n answer • Enter confirm • Esc cancel";
pub(crate) const HELP_EDIT: &str = "Enter to save ✏️ • Esc to cancel";
pub(crate) const HELP_OVERLAY: &str = "Enter/Esc to close ❔";
