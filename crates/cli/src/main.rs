use std::sync::Arc;

use anyhow::Context;
use bookshelf_app::{books::repository::InMemoryBookRepository, Application};
use bookshelf_kernel::settings::{Settings, StorageBackend};
use clap::{Parser, Subcommand};

/// Book catalogue service
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
        /// Keep books in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the merged OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, in_memory } => {
            let mut settings = load_settings()?;
            if let Some(port) = port {
                settings.server.port = port;
            }
            if in_memory {
                settings.storage = StorageBackend::Memory;
            }
            bookshelf_app::bootstrap::run(settings).await
        }
        Command::Migrate => {
            let settings = load_settings()?;
            let app = Application::assemble(&settings).await?;
            let migrated = app.migrate().await;
            app.close().await;

            let applied = migrated?;
            tracing::info!(applied, "migrations finished");
            Ok(())
        }
        Command::Openapi => {
            // Document generation needs no storage.
            let app = Application::with_repository(Arc::new(InMemoryBookRepository::new()));
            let document = bookshelf_http::router::openapi_document(app.registry());
            let rendered = serde_json::to_string_pretty(&document)
                .context("failed to render OpenAPI document")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;
    Ok(settings)
}
