use std::path::{Path, PathBuf};

use miix_core::{ClientConfig, Profile, ShortCodeClient, DEFAULT_CLIENT_ID, PROFILE_FILE_NAME};
use tracing::debug;

use super::types::CliProfile;
use crate::cli_args::Cli;

/// Where credentials live and which host they are for.
pub(crate) struct CliSettings {
    pub profile_path: PathBuf,
    pub client: ClientConfig,
}

impl CliSettings {
    pub(crate) fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let profile_path = match cli.profile.clone() {
            Some(path) => path,
            None => profile_path()?,
        };
        let mut client = ClientConfig::default();
        if let Some(api) = cli.api.as_deref() {
            client.host = normalize_host(api);
        }
        client.client_id = cli
            .client_id
            .clone()
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());
        Ok(Self {
            profile_path,
            client,
        })
    }
}

pub(crate) fn profile_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("HOME is not set"))?;
    Ok(Path::new(&home).join(PROFILE_FILE_NAME))
}

pub(crate) fn normalize_host(addr: &str) -> String {
    addr.trim_end_matches('/').to_string()
}

pub(crate) fn build_profile(
    settings: CliSettings,
    http: reqwest::Client,
) -> CliProfile {
    debug!(
        profile = %settings.profile_path.display(),
        host = %settings.client.host,
        "using profile"
    );
    let host = settings.client.host.clone();
    Profile::new(
        settings.profile_path,
        host,
        ShortCodeClient::new(http, settings.client),
    )
}
