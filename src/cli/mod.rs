pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pmd")]
#[command(about = "PayMyDine CLI - tenant directory tools for the ordering API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, conflicts_with = "json", help = "Output in human-readable text format (default)")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Inspect the tenant directory and host resolution")]
    Tenant {
        #[command(subcommand)]
        cmd: commands::tenant::TenantCommands,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        match (cli.text, cli.json) {
            (true, _) => OutputFormat::Text,
            (false, true) => OutputFormat::Json,
            (false, false) => OutputFormat::Text,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Tenant { cmd } => commands::tenant::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_of(args: &[&str]) -> OutputFormat {
        OutputFormat::from_cli(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn output_flags_select_format() {
        assert_eq!(format_of(&["pmd", "tenant", "list"]), OutputFormat::Text);
        assert_eq!(format_of(&["pmd", "--text", "tenant", "list"]), OutputFormat::Text);
        assert_eq!(format_of(&["pmd", "tenant", "list", "--json"]), OutputFormat::Json);
    }

    #[test]
    fn text_and_json_are_exclusive() {
        assert!(Cli::try_parse_from(["pmd", "--text", "--json", "tenant", "list"]).is_err());
    }
}
