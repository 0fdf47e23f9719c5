use std::time::Duration;

/// API base used when no host is configured.
pub const DEFAULT_HOST: &str = "https://mixer.com/api/v1";

/// OAuth client registered for the miix tool.
pub const DEFAULT_CLIENT_ID: &str = "9789aae60656644524be9530889ba8884c0095834ae75f50";

/// Scopes every stored credential must cover to be usable.
pub const REQUIRED_SCOPES: &[&str] = &[
    "interactive:manage:self",
    "interactive:play",
    "channel:teststream:view:self",
];

/// Poll interval for short code checks when the service does not advertise one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub const PROFILE_FILE_NAME: &str = ".miixrc";
