use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub use crate::modules::auth::args::*;

#[derive(Parser)]
#[command(name = "miix")]
#[command(about = "Manage miix credentials")]
pub struct Cli {
    #[arg(long, env = "MIIX_PROFILE", help = "Profile file (default: ~/.miixrc)")]
    pub profile: Option<PathBuf>,
    #[arg(long, env = "MIIX_API", help = "API base URL to authenticate against")]
    pub api: Option<String>,
    #[arg(long, env = "MIIX_CLIENT_ID")]
    pub client_id: Option<String>,
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Grant access with a short code")]
    Login(LoginArgs),
    #[command(about = "Forget the credentials for the API host")]
    Logout,
    #[command(about = "Print the authenticated user")]
    Whoami,
    #[command(about = "Print a valid access token, refreshing it if needed")]
    Token(TokenArgs),
    #[command(about = "Report whether unexpired credentials exist")]
    Status,
}
