use miix_core::{AuthError, GrantApi, Profile};
use serde::Serialize;
use tracing::debug;

use crate::cli_args::{LoginArgs, TokenArgs};
use crate::modules::auth::notifier::TerminalNotifier;

pub(crate) async fn handle_login<C: GrantApi>(
    args: LoginArgs,
    profile: &mut Profile<C>,
) -> anyhow::Result<()> {
    if !args.force {
        match profile.user().await {
            Ok(user) => {
                println!("Already logged in as {}", user.username);
                return Ok(());
            }
            Err(AuthError::NoAuthentication | AuthError::MissingRefreshToken) => {
                debug!(host = %profile.host(), "no usable credentials; granting anew");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let notifier = TerminalNotifier::new(profile.host(), args.max_codes);
    match profile.grant(&notifier).await {
        Ok(_) => {}
        Err(AuthError::GrantCancelled) => anyhow::bail!("login cancelled"),
        Err(err) => return Err(err.into()),
    }
    let user = profile.user().await?;
    println!("Logged in as {}", user.username);
    Ok(())
}

pub(crate) fn handle_logout<C: GrantApi>(profile: &mut Profile<C>) -> anyhow::Result<()> {
    profile.logout()?;
    println!("Logged out");
    Ok(())
}

pub(crate) async fn handle_whoami<C: GrantApi>(profile: &mut Profile<C>) -> anyhow::Result<()> {
    let user = profile.user().await?;
    print_json(&user)
}

pub(crate) async fn handle_token<C: GrantApi>(
    args: TokenArgs,
    profile: &mut Profile<C>,
) -> anyhow::Result<()> {
    let token = profile.tokens().await?;
    if args.json {
        return print_json(&token);
    }
    println!("{}", token.access_token);
    Ok(())
}

pub(crate) fn handle_status<C: GrantApi>(profile: &mut Profile<C>) -> anyhow::Result<()> {
    if profile.has_authenticated()? {
        println!("Authenticated with {}", profile.host());
    } else {
        println!("Not authenticated with {}", profile.host());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
