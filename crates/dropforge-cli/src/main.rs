use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dropforge_import::{run_import, ImportRequest, PipelineOptions};
use dropforge_supplier::RateLimitGovernor;

#[derive(Debug, Parser)]
#[command(name = "dropforge-cli")]
#[command(about = "Dropforge catalog operations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Import a batch of supplier products into a category.
    Import(ImportArgs),
}

#[derive(Debug, Args)]
struct ImportArgs {
    /// Supplier record id (UUID).
    #[arg(long)]
    supplier: String,
    /// Target category id (UUID).
    #[arg(long)]
    category: String,
    /// Comma-separated raw product identifiers.
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<String>,
    /// Fractional markup over cost, e.g. 0.3 for 30%.
    #[arg(long)]
    markup: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = dropforge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = dropforge_db::PoolConfig::from_app_config(&config);
    let pool = dropforge_db::connect_pool(&config.database_url, pool_config).await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Migrate => {
            let applied = dropforge_db::run_migrations(&pool).await?;
            println!("applied {applied} migrations");
        }
        Commands::Import(args) => {
            let request = ImportRequest {
                supplier_id: args.supplier,
                category_id: args.category,
                product_ids: args.ids,
                markup: args.markup.map(|m| serde_json::json!(m)),
            };
            let summary = run_import(
                &pool,
                &RateLimitGovernor::new(),
                &PipelineOptions::from_app_config(&config),
                &request,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_args_split_comma_separated_ids() {
        let cli = Cli::try_parse_from([
            "dropforge-cli",
            "import",
            "--supplier",
            "s-id",
            "--category",
            "c-id",
            "--ids",
            "1,2,3",
            "--markup",
            "0.35",
        ])
        .expect("parse");

        let Commands::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.ids, vec!["1", "2", "3"]);
        assert_eq!(args.markup, Some(0.35));
    }

    #[test]
    fn import_requires_ids() {
        let result = Cli::try_parse_from([
            "dropforge-cli",
            "import",
            "--supplier",
            "s-id",
            "--category",
            "c-id",
        ]);
        assert!(result.is_err());
    }
}
