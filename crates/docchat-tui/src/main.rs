use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use docchat_core::{Config, DocChatClient, Session, UploadFile};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "docchat", version)]
#[command(about = "Upload a PDF and ask questions about its content")]
struct Cli {
    /// Backend base URL (overrides DOCCHAT_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// PDF to upload as soon as the UI opens
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat UI (the default)
    Chat {
        /// PDF to upload as soon as the UI opens
        file: Option<PathBuf>,
    },
    /// Upload a PDF and print the document reference
    Upload {
        file: PathBuf,
    },
    /// Ask one question about the document the backend currently holds
    Ask {
        question: String,
    },
    /// Clear the backend's document store
    Reset,
    /// Check that the backend is up
    Health,
    /// Show or change the saved configuration
    Config {
        /// Save this backend URL to the config file
        #[arg(long, value_name = "URL")]
        set_api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A .env in the working directory may set DOCCHAT_API_URL
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat { file: cli.file });

    if matches!(command, Commands::Chat { .. }) {
        logging::init_file()?;
    } else {
        logging::init_stderr();
    }

    let config = Config::load()?;
    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    let client = DocChatClient::new(&api_url);
    tracing::info!(%api_url, "using backend");

    match command {
        Commands::Chat { file } => {
            run_tui(client, file).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Upload { file } => upload_once(&client, &file).await,
        Commands::Ask { question } => ask_once(&client, &question).await,
        Commands::Reset => report(client.reset().await, "Reset failed"),
        Commands::Health => {
            let failure = format!("Backend at {} is not healthy", api_url);
            report(client.health().await, &failure)
        }
        Commands::Config { set_api_url } => configure(config, set_api_url, &api_url),
    }
}

async fn run_tui(client: DocChatClient, file: Option<PathBuf>) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(client);
    if let Some(path) = file {
        app.start_upload(&path.to_string_lossy());
    }

    let mut events = EventHandler::new();
    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }

        app.poll_tasks().await;
    }
    Ok(())
}

async fn upload_once(client: &DocChatClient, file: &Path) -> Result<ExitCode> {
    let upload = match UploadFile::from_path(file).await {
        Ok(upload) => upload,
        Err(e) => {
            eprintln!("{}: {}", "Upload Failed".red().bold(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{} {} ({} bytes)", "Processing".blue(), upload.name().bold(), upload.len());

    let mut session = Session::new();
    session.upload(client, &upload).await?;

    match (session.document(), session.upload_error()) {
        (Some(doc), _) => {
            if let Some(welcome) = session.messages().first() {
                println!("{}", welcome.content.green());
            }
            println!("{}", doc);
            Ok(ExitCode::SUCCESS)
        }
        (None, error) => {
            eprintln!(
                "{}: {}",
                "Upload Failed".red().bold(),
                error.unwrap_or(docchat_core::api::UNKNOWN_ERROR)
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn ask_once(client: &DocChatClient, question: &str) -> Result<ExitCode> {
    if question.trim().is_empty() {
        eprintln!("{}", "Question is empty".red());
        return Ok(ExitCode::FAILURE);
    }

    report(client.ask(question).await, "Sorry, I ran into an error")
}

fn report(outcome: Result<String, docchat_core::ApiError>, failure: &str) -> Result<ExitCode> {
    match outcome {
        Ok(text) => {
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}: {}", failure.red(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn configure(mut config: Config, set_api_url: Option<String>, effective: &str) -> Result<ExitCode> {
    if let Some(url) = set_api_url {
        config.api_url = Some(url.trim().trim_end_matches('/').to_string());
        let path = config.save()?;
        println!("Saved {} to {}", "api_url".bold(), path.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Config file:".bold(), Config::get_config_path()?.display());
    println!(
        "{} {}",
        "Saved api_url:".bold(),
        config.api_url.as_deref().unwrap_or("(not set)")
    );
    println!("{} {}", "Effective backend:".bold(), effective);
    if let Ok(path) = logging::log_file_path() {
        println!("{} {}", "UI log file:".bold(), path.display());
    }
    Ok(ExitCode::SUCCESS)
}
