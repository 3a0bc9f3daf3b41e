use clap::Parser;
use todo_engine::cli::{Cli, Commands};
use todo_engine::cli_handlers::{
    handle_add, handle_clear_completed, handle_done, handle_hide_completed, handle_list, handle_rm,
    handle_seed, handle_sort, handle_watch,
};
use todo_engine::db;
use todo_engine::error::Result;
use todo_engine::logging::LoggingConfig;
use todo_engine::prefs::PreferencesManager;
use todo_engine::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = LoggingConfig::from_args(cli.quiet, cli.verbose > 0, cli.json);
    if let Err(e) = todo_engine::logging::init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli).await {
        let error_response = e.to_error_response();
        eprintln!("{}", serde_json::to_string_pretty(&error_response).unwrap());
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(db::default_db_path);
    let pool = db::open(&db_path).await?;
    let store = TaskStore::new(pool.clone());
    let prefs = PreferencesManager::open(pool).await;

    match cli.command.clone() {
        Commands::Add { name, important } => handle_add(&store, &name, important).await?,

        Commands::List { search, format } => handle_list(&store, &prefs, &search, &format).await?,

        Commands::Done { id } => handle_done(&store, id, true).await?,

        Commands::Undone { id } => handle_done(&store, id, false).await?,

        Commands::Rm { id } => handle_rm(&store, id).await?,

        Commands::ClearCompleted => handle_clear_completed(&store).await?,

        Commands::Sort { order } => handle_sort(&prefs, order.into()).await?,

        Commands::HideCompleted { hidden } => handle_hide_completed(&prefs, hidden).await?,

        Commands::Seed => handle_seed(&store).await?,

        Commands::Watch { search } => handle_watch(store, prefs, &search).await?,
    }

    Ok(())
}
