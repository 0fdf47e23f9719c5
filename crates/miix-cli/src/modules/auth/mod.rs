mod actions;
pub(crate) mod args;
mod notifier;

pub(crate) use actions::{handle_login, handle_logout, handle_status, handle_token, handle_whoami};
