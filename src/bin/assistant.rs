use std::path::PathBuf;

use assistant_relay::history::{AssistantSession, BackendError, FileStore, HttpBackend, StoreError};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("relay error: {0}")]
    Backend(#[from] BackendError),
    #[error("history store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "assistant", about = "Chat and code-generation client for assistant-relay")]
struct Cli {
    #[arg(long, env = "ASSISTANT_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server_url: String,

    #[arg(long, env = "ASSISTANT_HISTORY_FILE", default_value = ".assistant-history.json")]
    history_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a chat message with the saved transcript.
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Generate code and record it in the code history.
    Code {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Print a saved history as JSON.
    History {
        #[arg(value_enum, default_value_t = Pane::Chat)]
        pane: Pane,
    },
    /// Remove a saved history.
    Clear {
        #[arg(value_enum, default_value_t = Pane::All)]
        pane: Pane,
    },
    Ping,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Chat,
    Code,
    All,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let backend = HttpBackend::new(&cli.server_url)?;

    if matches!(cli.command, Command::Ping) {
        return run_ping(&backend).await;
    }

    let store = FileStore::new(cli.history_file);
    let mut session = AssistantSession::load(backend, store);

    match cli.command {
        Command::Chat { message } => run_chat(&mut session, &message.join(" ")).await,
        Command::Code { prompt } => run_code(&mut session, &prompt.join(" ")).await,
        Command::History { pane } => run_history(&session, pane),
        Command::Clear { pane } => run_clear(&mut session, pane),
        Command::Ping => Ok(()),
    }
}

type Session = AssistantSession<HttpBackend, FileStore>;

async fn run_ping(backend: &HttpBackend) -> Result<(), CliError> {
    backend.health().await?;
    println!("ok");
    Ok(())
}

async fn run_chat(session: &mut Session, message: &str) -> Result<(), CliError> {
    let Some(reply) = session.send_chat(message).await else {
        eprintln!("nothing to send");
        return Ok(());
    };
    println!("{}", reply.content);
    eprintln!(
        "[{} / {}] status={}",
        reply.source.as_deref().unwrap_or("-"),
        reply.model.as_deref().unwrap_or("-"),
        session.status().as_str()
    );
    Ok(())
}

async fn run_code(session: &mut Session, prompt: &str) -> Result<(), CliError> {
    let Some(record) = session.generate_code(prompt).await else {
        eprintln!("nothing to send");
        return Ok(());
    };
    println!("{}", record.code);
    eprintln!("language={} history={}", record.language, session.code_history().len());
    Ok(())
}

fn run_history(session: &Session, pane: Pane) -> Result<(), CliError> {
    match pane {
        Pane::Chat => print_json(&session.chat_messages()),
        Pane::Code => print_json(&session.code_history()),
        Pane::All => print_json(&serde_json::json!({
            "chat": session.chat_messages(),
            "code": session.code_history(),
        })),
    }
}

fn run_clear(session: &mut Session, pane: Pane) -> Result<(), CliError> {
    if matches!(pane, Pane::Chat | Pane::All) {
        session.clear_chat()?;
    }
    if matches!(pane, Pane::Code | Pane::All) {
        session.clear_code()?;
    }
    eprintln!("cleared {pane:?}");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
