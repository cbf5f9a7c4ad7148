use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sermoncard::app::{SermonApp, Step, Tab};
use sermoncard::config::Config;
use sermoncard::error::{user_message, SermonError};
use sermoncard::export::COPY_CONFIRMATION;
use sermoncard::llm::GeminiGenerator;
use sermoncard::models::ACCEPTED_EXTENSIONS;
use sermoncard::processing::FileExtractor;
use sermoncard::views;

type App = SermonApp<FileExtractor, GeminiGenerator>;

#[derive(Parser)]
#[command(name = "sermoncard")]
#[command(about = "Turn a sermon document into a summary card and an infographic")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a sermon file (.pdf, .docx, .txt, .hwp)
    Analyze {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze sermon text read from stdin
    Text {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Reopen a shared result link
    Open {
        location: String,
        #[arg(long, default_value = "card", value_parser = parse_tab)]
        view: Tab,
    },
    /// Interactive session driving the landing/uploading/results flow
    Session {
        /// Start from this location, restoring a shared result if it carries one
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(ClapArgs)]
struct OutputArgs {
    /// Which view to print
    #[arg(long, default_value = "card", value_parser = parse_tab)]
    view: Tab,
    /// Write the card's clipboard text to this file ("-" for stdout)
    #[arg(long)]
    copy_to: Option<PathBuf>,
    /// Print a share link for the result
    #[arg(long)]
    share: bool,
}

fn parse_tab(s: &str) -> Result<Tab, String> {
    s.parse().map_err(|e: SermonError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sermoncard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    tracing::info!("Initializing generator: {}...", config.gemini.model);
    let generator = GeminiGenerator::new(&config.gemini);
    if !generator.is_available() {
        tracing::warn!("GEMINI_API_KEY is not set - analysis requests will fail");
    }
    let mut app = App::new(FileExtractor::new(), generator, &config.app);

    match args.command {
        Command::Analyze { file, output } => {
            let result = app.upload_path(&file).await;
            finish_one_shot(&mut app, result, &output).await
        }
        Command::Text { output } => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            let result = app.submit_text(&text).await;
            finish_one_shot(&mut app, result, &output).await
        }
        Command::Open { location, view } => {
            if !app.restore_from_location(&location) {
                anyhow::bail!("The link does not carry a readable result");
            }
            app.select_tab(view)?;
            print_view(&app);
            Ok(())
        }
        Command::Session { location } => run_session(&mut app, location).await,
    }
}

async fn finish_one_shot(
    app: &mut App,
    result: sermoncard::error::Result<()>,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    if let Err(e) = result {
        eprintln!("⚠️ {}", user_message(&e));
        return Err(e.into());
    }

    app.select_tab(output.view)?;
    print_view(app);

    if let Some(path) = &output.copy_to {
        let text = app.clipboard_text()?;
        write_copy(path, &text).await?;
    }
    if output.share {
        println!("{}", app.share_link()?);
    }
    Ok(())
}

async fn write_copy(path: &Path, text: &str) -> anyhow::Result<()> {
    if path == Path::new("-") {
        println!("{text}");
    } else {
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    eprintln!("{COPY_CONFIRMATION}");
    Ok(())
}

fn print_view(app: &App) {
    if let Some(output) = app.state().result() {
        println!("{}", views::render(output, app.state().active_tab()));
    }
}

fn print_status(app: &App) {
    match app.state().step() {
        Step::Landing => {
            println!("[landing] upload a file ({})", ACCEPTED_EXTENSIONS.join(", "));
        }
        Step::Uploading => println!("[uploading] 말씀의 핵심을 분석 중..."),
        Step::Results { active_tab, .. } => {
            println!("[results] view: {active_tab}");
            print_view(app);
        }
    }
    if let Some(error) = app.state().error() {
        eprintln!("⚠️ {error}");
    }
}

const SESSION_HELP: &str = "commands: upload <path> | text <sermon text> | tab card|info | home | copy [path] | share | show | help | quit";

async fn run_session(app: &mut App, location: Option<String>) -> anyhow::Result<()> {
    if let Some(location) = location {
        app.restore_from_location(&location);
    }
    println!("{SESSION_HELP}");
    print_status(app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        app.state_mut().clear_expired_notice();

        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{SESSION_HELP}"),
            "show" => {}
            "upload" => {
                if rest.is_empty() {
                    eprintln!("usage: upload <path>");
                    continue;
                }
                println!("[uploading] 말씀의 핵심을 분석 중...");
                // Failure is recorded in the state and shown below
                let _ = app.upload_path(rest).await;
            }
            "text" => {
                println!("[uploading] 말씀의 핵심을 분석 중...");
                let _ = app.submit_text(rest).await;
            }
            "tab" => match rest.parse::<Tab>() {
                Ok(tab) => {
                    let _ = app.select_tab(tab);
                }
                Err(e) => eprintln!("{e}"),
            },
            "home" => {
                if let Some(location) = app.go_home() {
                    println!("location: {location}");
                }
            }
            "copy" => {
                if let Ok(text) = app.clipboard_text() {
                    let path = if rest.is_empty() { "-" } else { rest };
                    if let Err(e) = write_copy(Path::new(path), &text).await {
                        eprintln!("⚠️ {e}");
                    }
                }
            }
            "share" => match app.share_link() {
                Ok(link) => println!("{link}"),
                Err(SermonError::Validation(_)) => {}
                Err(e) => eprintln!("⚠️ {e}"),
            },
            other => {
                eprintln!("unknown command: {other}");
                println!("{SESSION_HELP}");
                continue;
            }
        }

        print_status(app);
    }

    Ok(())
}
