//! Company insight panel in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! insight --data companies.json --code 005930
//!
//! # One-shot analysis as JSON
//! GEMINI_API_KEY=... insight --data companies.json --code 005930 --analyze --json
//! ```

mod app;
mod commands;

use anyhow::Context;
use app::{App, Reply};
use clap::Parser;
use commands::Command;
use insight_llm::providers::GeminiProvider;
use insight_panel::{BusinessAnalyzer, CompanyDirectory, Language, OutputFormat, PanelConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "insight")]
#[command(about = "Company detail panel with Gemini business analysis", long_about = None)]
struct Args {
    /// JSON file with an array of company records
    #[arg(short, long)]
    data: PathBuf,

    /// Stock code to show on start
    #[arg(short, long)]
    code: Option<String>,

    /// Gemini API key (kept in memory only)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Label and prompt language (ko, en)
    #[arg(short, long, env = "INSIGHT_LANGUAGE")]
    language: Option<Language>,

    /// Model identifier
    #[arg(short, long, env = "INSIGHT_MODEL")]
    model: Option<String>,

    /// Prompt template file; must reference {{ description }}
    #[arg(short, long, env = "INSIGHT_PROMPT_PATH")]
    prompt: Option<PathBuf>,

    /// Request timeout in seconds (unbounded when unset)
    #[arg(long, env = "INSIGHT_REQUEST_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Analyze the --code company once and exit
    #[arg(long, requires = "code")]
    analyze: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn build_config(args: &Args) -> anyhow::Result<PanelConfig> {
    let mut builder = PanelConfig::builder();
    if let Some(language) = args.language {
        builder = builder.language(language);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    if let Some(prompt) = &args.prompt {
        builder = builder.prompt_path(prompt.clone());
    }
    if let Some(secs) = args.timeout {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    Ok(builder.with_env().build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    insight_utils::init_tracing_with_default("warn,insight_panel=info");

    let args = Args::parse();
    let config = build_config(&args)?;
    info!(model = %config.model, language = %config.language, "Starting insight");

    let directory = CompanyDirectory::from_path(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;

    let provider = Arc::new(GeminiProvider::with_config(config.gemini_config())?);
    let analyzer = BusinessAnalyzer::new(provider, &config)?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut app = App::new(directory, analyzer, config.language, format);

    if let Some(key) = args.api_key.as_deref() {
        app.set_credential(key);
    }

    if let Some(code) = args.code.as_deref() {
        app.select(code)?;
    }

    if args.analyze {
        println!("{}", app.analyze().await);
        return Ok(());
    }

    if app.panel().is_visible() {
        println!("{}\n", app.render());
    }
    println!("{}\n", Command::help());

    run_repl(&mut app).await
}

async fn run_repl(app: &mut App) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", app.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        if input.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}\n");
                continue;
            }
        };

        match app.handle(command).await {
            Reply::Output(text) => println!("{text}\n"),
            Reply::ReadCredential => {
                let key = rpassword::prompt_password("Gemini API key: ")?;
                app.set_credential(key);
                println!();
            }
            Reply::Exit => break,
        }
    }

    Ok(())
}
