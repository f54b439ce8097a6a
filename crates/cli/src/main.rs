use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "Library lending service")]
struct Cli {
    /// Directory holding `base.toml` and `{env}.toml`
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Deployment environment (local, staging, production); defaults to `LIBRIS_ENV`
    #[arg(long, global = true)]
    env: Option<String>,

    /// Override `database.url`
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run migrations, then serve HTTP until Ctrl-C
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending migrations and list what has been applied
    Migrate,
    /// Print the effective configuration
    Config,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match (&self.config_dir, &self.env) {
            (None, None) => Settings::load(),
            (config_dir, env) => {
                let config_dir = config_dir.clone().unwrap_or_else(|| PathBuf::from("config"));
                let env = env
                    .clone()
                    .or_else(|| std::env::var("LIBRIS_ENV").ok())
                    .unwrap_or_else(|| "local".to_string());
                Settings::load_from(config_dir, &env)
            }
        }
        .with_context(|| "failed to load libris settings")?;

        if let Some(url) = &self.database_url {
            settings.database.url = url.clone();
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = cli.settings()?;
    libris_telemetry::init(&settings.telemetry).ok();

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            libris_app::bootstrap::serve(settings).await
        }
        Command::Migrate => {
            let db = libris_db::connect(&settings.database).await?;
            let registry = libris_app::bootstrap::build_registry(&db, &settings);
            let applied = libris_app::bootstrap::migrate(&db, &registry).await?;
            println!("applied {applied} migrations");
            for migration in libris_db::applied_migrations(&db).await? {
                println!("  {}/{}  {}", migration.module, migration.id, migration.applied_at);
            }
            db.close().await;
            Ok(())
        }
        Command::Config => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}
