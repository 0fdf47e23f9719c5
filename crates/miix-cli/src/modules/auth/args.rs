use clap::Args;

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long, help = "Give up after showing this many codes")]
    pub max_codes: Option<u32>,
    #[arg(long, help = "Grant new access even if already logged in")]
    pub force: bool,
}

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Print the full token as JSON")]
    pub json: bool,
}
