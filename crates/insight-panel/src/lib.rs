//! Company detail panel with generative business analysis
//!
//! This crate holds the UI-independent logic of a company detail panel:
//!
//! - Company records and a directory to select them from
//! - Derived metrics (operating margin, PER/ROE, 3-bar financial chart)
//! - The analysis request cycle as a state machine with a stale-result guard
//! - A business analysis client that asks an injected LLM provider for a
//!   summary, strengths and risks in a fixed JSON shape
//! - Text and JSON renderers for the derived view
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_llm::providers::GeminiProvider;
//! use insight_panel::{BusinessAnalyzer, CompanyDirectory, PanelConfig, PanelController};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PanelConfig::from_env()?;
//!     let provider = Arc::new(GeminiProvider::with_config(config.gemini_config())?);
//!     let analyzer = BusinessAnalyzer::new(provider, &config)?;
//!
//!     let directory = CompanyDirectory::from_path("companies.json")?;
//!     let mut panel = PanelController::new(config.language);
//!     panel.select(directory.get("005930").cloned());
//!     panel.set_credential(std::env::var("GEMINI_API_KEY")?);
//!
//!     panel.request_analysis(&analyzer).await?;
//!     println!("{:?}", panel.analysis());
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod directory;
pub mod error;
pub mod formatter;
pub mod language;
pub mod metrics;
pub mod model;
pub mod panel;
pub mod prompt;
pub mod view;

// Re-export main types for convenience
pub use analyzer::BusinessAnalyzer;
pub use config::PanelConfig;
pub use directory::CompanyDirectory;
pub use error::{PanelError, Result};
pub use formatter::{Formatter, FormatterFactory, OutputFormat};
pub use language::Language;
pub use model::{AnalysisResult, CompanyRecord};
pub use panel::{AnalysisTicket, PanelController, SettleOutcome};
pub use prompt::PromptTemplate;
pub use view::{AnalysisPhase, PanelView};

pub use insight_llm::Credential;
