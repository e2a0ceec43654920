use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "User account service")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
