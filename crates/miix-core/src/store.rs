use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::token::Token;

/// Minimal identity of the user a host's credentials belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub channel: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    pub tokens: Token,
    pub userdata: User,
}

/// Everything persisted in the profile file, keyed by API host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default)]
    pub hosts: BTreeMap<String, HostProfile>,
}

impl ProfileStore {
    /// Reads the store from `path`. A missing or blank file is an empty store;
    /// a file that does not parse is an error.
    pub fn load(path: &Path) -> AuthResult<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no profile file");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| AuthError::MalformedProfile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces the file at `path` with the full store contents.
    pub fn save(&self, path: &Path) -> AuthResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        if let Err(err) = write_private(&temp_path, contents.as_bytes())
            .and_then(|()| fs::rename(&temp_path, path))
        {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        debug!(path = %path.display(), hosts = self.hosts.len(), "saved profile");
        Ok(())
    }

    pub fn get(&self, host: &str) -> Option<&HostProfile> {
        self.hosts.get(host)
    }

    pub fn insert(&mut self, host: impl Into<String>, profile: HostProfile) {
        self.hosts.insert(host.into(), profile);
    }

    pub fn remove(&mut self, host: &str) -> Option<HostProfile> {
        self.hosts.remove(host)
    }
}

/// Creates `path` readable by the owner only and fills it with `contents`.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()
}
