use miix_core::{Profile, ShortCodeClient};

pub(crate) type CliProfile = Profile<ShortCodeClient>;
