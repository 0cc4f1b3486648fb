//! CLI definitions for Pagesmith.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, Secret};

/// Pagesmith CLI
#[derive(Parser, Debug)]
#[command(name = "pagesmith", version, about = "Chat your way to a single-file website")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server for the chat UI
    Serve(ServeArgs),
    /// Generate a website once and write it to a file
    Generate(GenerateArgs),
}

/// Options shared by every command; each one overrides its environment variable.
#[derive(Parser, Debug, Default)]
pub struct ModelArgs {
    /// Model ID (PAGESMITH_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Provider base URL (OPENAI_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Max tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

impl ModelArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(key) = self.api_key.clone().and_then(Secret::new) {
            config.credential = Some(key);
        }
        if let Some(ref url) = self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(t) = self.temperature {
            config.temperature = t;
        }
        if let Some(max) = self.max_tokens {
            config.max_tokens = max;
        }
    }
}

/// Arguments for `pagesmith serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind (HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Report reload mode (RELOAD)
    #[arg(long)]
    pub reload: bool,

    /// Frontend page served at / (PAGESMITH_INDEX)
    #[arg(long)]
    pub index: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.reload {
            config.reload = true;
        }
        if let Some(ref index) = self.index {
            config.index_path = index.clone();
        }
        self.model.apply(config);
    }
}

/// Arguments for `pagesmith generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Description of the website
    pub prompt: String,

    /// Where to write the generated document
    #[arg(short, long, default_value = "output/website.html")]
    pub output: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_serve_with_defaults() {
        let cli = Cli::try_parse_from(["pagesmith", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert!(args.host.is_none());
                assert!(args.port.is_none());
                assert!(!args.reload);
                assert!(args.model.model.is_none());
            }
            other => panic!("expected Serve, got {other:?}"),
        }
    }

    #[test]
    fn serve_flags_override_config() {
        let cli = Cli::try_parse_from([
            "pagesmith",
            "serve",
            "--host",
            "0.0.0.0",
            "-p",
            "3000",
            "--reload",
            "-m",
            "gpt-4o-mini",
            "--api-key",
            "sk-flag",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected Serve");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.reload);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.credential.as_ref().map(Secret::expose), Some("sk-flag"));
    }

    #[test]
    fn parse_generate_with_output() {
        let cli = Cli::try_parse_from([
            "pagesmith",
            "generate",
            "A coffee shop landing page",
            "-o",
            "site/index.html",
            "--max-tokens",
            "2048",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.prompt, "A coffee shop landing page");
                assert_eq!(args.output, PathBuf::from("site/index.html"));
                assert_eq!(args.model.max_tokens, Some(2048));
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn generate_defaults_output_path() {
        let cli = Cli::try_parse_from(["pagesmith", "generate", "hi"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate");
        };
        assert_eq!(args.output, PathBuf::from("output/website.html"));
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["pagesmith"]).is_err());
    }

    #[test]
    fn parse_generate_missing_prompt_is_error() {
        assert!(Cli::try_parse_from(["pagesmith", "generate"]).is_err());
    }
}
