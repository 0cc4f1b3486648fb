//! Pagesmith: a conversational website builder.
//!
//! Sends chat messages to a language model, pulls a single self-contained HTML
//! document out of each reply, and keeps the conversation so later messages
//! refine the current document instead of starting over.
//!
//! # Quick Start
//!
//! ```no_run
//! use pagesmith::prelude::*;
//!
//! # async fn example() -> pagesmith::error::Result<()> {
//! let config = AppConfig::from_env()?;
//! let agent = SiteAgent::from_config(&config)?;
//! let result = agent.generate("A landing page for a coffee shop", None).await;
//! if let Some(document) = result.document {
//!     println!("{document}");
//! } else {
//!     eprintln!("{}", result.explanation);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod extract;
pub mod prelude;
pub mod provider;
pub mod types;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;
