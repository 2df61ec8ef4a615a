use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "catalog",
    about = "Catalog backend: product feed, operator dashboard, and image uploads",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML settings file; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create the product document and upload directory if missing
    Init,
    /// Print the current product collection
    List(ListArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["catalog", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_bind() {
        let cli = Cli::try_parse_from(["catalog", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_init_with_config() {
        let cli = Cli::try_parse_from(["catalog", "init", "--config", "shop.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert_eq!(cli.config, Some(PathBuf::from("shop.toml")));
    }

    #[test]
    fn parse_list_json() {
        let cli = Cli::try_parse_from(["catalog", "list", "--format", "json"]).unwrap();
        if let Command::List(args) = cli.command {
            assert!(matches!(args.format, OutputFormat::Json));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["catalog", "--verbose", "list"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_command_fails() {
        assert!(Cli::try_parse_from(["catalog", "push"]).is_err());
    }
}
