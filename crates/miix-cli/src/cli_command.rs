use miix_core::{GrantApi, Profile};

use crate::cli_args::Command;
use crate::modules::auth::{handle_login, handle_logout, handle_status, handle_token, handle_whoami};

pub(crate) async fn handle_command<C: GrantApi>(
    command: Command,
    profile: &mut Profile<C>,
) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => handle_login(args, profile).await?,
        Command::Logout => handle_logout(profile)?,
        Command::Whoami => handle_whoami(profile).await?,
        Command::Token(args) => handle_token(args, profile).await?,
        Command::Status => handle_status(profile)?,
    }

    Ok(())
}
