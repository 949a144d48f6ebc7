use anyhow::Result;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use tracksmith::database::migrations::Migrator;
use tracksmith::database::{establish_connection, setup_database};
use tracksmith::errors::ImportError;
use tracksmith::importer::{import_project, ImportOptions};
use tracksmith::services::users::{create_user, get_user_by_email};
use tracksmith::storage::FileStore;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a project dump on behalf of an existing user
    LoadDump {
        /// Path to the dump file
        dump: String,
        /// Email of the user who will own the imported project
        owner: String,
        #[clap(short, long, default_value = "tracksmith.db")]
        database: String,
        #[clap(short, long, default_value = "media")]
        storage: String,
        /// Skip the owner's project-slot quota check
        #[clap(long)]
        skip_quota_check: bool,
    },
    /// Create a user account
    CreateUser {
        email: String,
        full_name: String,
        #[clap(short, long, default_value = "tracksmith.db")]
        database: String,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = "tracksmith.db")]
        database: String,
    },
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
        #[clap(short, long, default_value = "tracksmith.db")]
        database: String,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateDirection {
    Up,
    Down,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::LoadDump {
            dump,
            owner,
            database,
            storage,
            skip_quota_check,
        } => {
            let code = load_dump(&dump, &owner, &database, &storage, skip_quota_check).await?;
            std::process::exit(code);
        }
        Commands::CreateUser {
            email,
            full_name,
            database,
        } => {
            let db = establish_connection(&database).await?;
            setup_database(&db).await?;
            let user = create_user(&db, &email, &full_name).await?;
            info!("Created user {} ({})", user.email, user.id);
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                info!("Initializing database: {}", database);
                let db = establish_connection(&database).await?;
                setup_database(&db).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                info!("Running database migration: {:?}", direction);
                let db = establish_connection(&database).await?;
                match direction {
                    MigrateDirection::Up => Migrator::up(&db, None).await?,
                    MigrateDirection::Down => Migrator::down(&db, None).await?,
                }
            }
        },
    }

    Ok(())
}

/// Run an import and map the outcome onto the process exit code: 0 on
/// success, 1 on a rejected dump, 2 on a quota denial.
async fn load_dump(
    dump_path: &str,
    owner_email: &str,
    database: &str,
    storage: &str,
    skip_quota_check: bool,
) -> Result<i32> {
    let db = establish_connection(database).await?;
    setup_database(&db).await?;
    let files = FileStore::new(storage)?;

    let Some(owner) = get_user_by_email(&db, owner_email).await? else {
        eprintln!("error: user \"{owner_email}\" not found");
        return Ok(1);
    };

    let content = std::fs::read_to_string(dump_path)?;
    let dump: serde_json::Value = serde_json::from_str(&content)?;

    let options = ImportOptions {
        check_quota: !skip_quota_check,
    };
    match import_project(&db, &files, &owner, &dump, &options).await {
        Ok(project) => {
            println!("Imported project \"{}\" as {}", project.name, project.slug);
            Ok(0)
        }
        Err(err) if err.is_quota_error() => {
            eprintln!("{}: {err}", err.error_code());
            Ok(2)
        }
        Err(ImportError::Unexpected { source, .. }) => {
            eprintln!("UNEXPECTED_ERROR: {source:#}");
            Ok(1)
        }
        Err(err) => {
            eprintln!("{}: {err}", err.error_code());
            if let Some(sections) = err.section_errors() {
                eprintln!("{}", serde_json::to_string_pretty(sections)?);
            }
            Ok(1)
        }
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
