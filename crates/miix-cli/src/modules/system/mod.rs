pub(crate) mod config;
pub(crate) mod types;

pub(crate) use config::{build_profile, CliSettings};
