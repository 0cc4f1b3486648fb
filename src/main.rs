//! Pagesmith binary entry point.

use std::sync::Arc;

use clap::Parser;
use pagesmith::agent::SiteAgent;
use pagesmith::cli::{Cli, Commands, GenerateArgs, ServeArgs};
use pagesmith::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Generate(args) => handle_generate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    args.apply(&mut config);

    if config.credential.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; clients must send an api_key with each chat");
    }
    tracing::info!(
        model = %config.model,
        reload = config.reload,
        "Starting Pagesmith server"
    );

    let agent = Arc::new(SiteAgent::from_config(&config)?);
    pagesmith::server::serve(&config, agent).await?;
    Ok(())
}

async fn handle_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    args.model.apply(&mut config);

    let agent = SiteAgent::from_config(&config)?;
    let result = agent.generate(&args.prompt, None).await;

    if result.error.is_some() {
        return Err(result.explanation.into());
    }

    println!("{}", result.explanation);
    if !result.verified {
        eprintln!("Warning: the response did not contain a complete HTML document");
    }

    let export = agent.export_document()?;
    export.write_to(&args.output).await?;
    println!(
        "Saved {} characters to {}",
        export.content.len(),
        args.output.display()
    );
    Ok(())
}
