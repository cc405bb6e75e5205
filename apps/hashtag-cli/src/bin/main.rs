use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use hashtag_category::CategoryHashtagDataSource;
use hashtag_core::catalog::Catalog;
use hashtag_core::config::{resolve_with_base, Config, HashtagSettings};
use hashtag_core::guardian::Guardian;
use hashtag_core::registry::RegistryBuilder;
use hashtag_core::types::HashtagType;
use hashtag_engine::api::{self, RequestDefaults};
use hashtag_engine::HashtagAutocompleteService;
use hashtag_tag::TagHashtagDataSource;

#[derive(Parser)]
#[command(name = "hashtag-cli", about = "Resolve and autocomplete forum hashtags")]
struct Cli {
    /// Config file; defaults to config.toml + config.<RUST_ENV>.toml in the working directory.
    #[arg(long, env = "HASHTAG_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides `hashtags.catalog_path`.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    user: Option<u64>,
    #[arg(long)]
    staff: bool,
    /// Group memberships for read-restricted categories.
    #[arg(long = "group")]
    groups: Vec<u64>,
    #[arg(long = "muted-tag")]
    muted_tags: Vec<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve hashtags exactly as typed, e.g. `general` or `general::tag`.
    Lookup {
        slugs: Vec<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,
    },
    /// Ranked suggestions for a partial hashtag.
    Search {
        term: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,
    },
    /// Type order per context and the icon of each type.
    Contexts,
    /// Run a raw JSON request the way the web endpoints receive it.
    Request { endpoint: Endpoint, params: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Endpoint {
    Lookup,
    Search,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (config, base_dir) = match &cli.config {
        Some(path) => (Config::from_file(path)?, path.parent().map(Path::to_path_buf).unwrap_or_default()),
        None => (Config::load()?, std::env::current_dir()?),
    };
    let settings = config.hashtag_settings()?;
    let catalog_path = match &cli.catalog {
        Some(path) => path.clone(),
        None => resolve_with_base(&base_dir, &settings.catalog_path),
    };
    let service = build_service(&settings, &catalog_path)?;
    let guardian = guardian(&cli);
    let defaults = RequestDefaults::from(&settings);

    let output = match cli.command {
        Command::Lookup { slugs, context, order } => {
            let order = resolve_order(&service, order, context.as_deref().unwrap_or(&defaults.context));
            serde_json::to_value(service.lookup(&guardian, &slugs, &order)?)?
        }
        Command::Search { term, limit, context, order } => {
            let order = resolve_order(&service, order, context.as_deref().unwrap_or(&defaults.context));
            let limit = limit.unwrap_or(defaults.search_limit);
            let results = service.search(&guardian, term.as_deref().unwrap_or(""), &order, limit)?;
            serde_json::json!({ "results": results })
        }
        Command::Contexts => serde_json::json!({
            "contexts": service.contexts_with_ordered_types(),
            "icons": service.data_source_icon_map(),
        }),
        Command::Request { endpoint, params } => {
            let params: serde_json::Value = serde_json::from_str(&params)?;
            match endpoint {
                Endpoint::Lookup => serde_json::to_value(api::lookup(&service, &guardian, &params, &defaults)?)?,
                Endpoint::Search => serde_json::to_value(api::search(&service, &guardian, &params, &defaults)?)?,
            }
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_service(settings: &HashtagSettings, catalog_path: &Path) -> anyhow::Result<HashtagAutocompleteService> {
    let catalog = Arc::new(Catalog::load(catalog_path)?);
    let mut builder = RegistryBuilder::new(
        CategoryHashtagDataSource::new(Arc::clone(&catalog)),
        TagHashtagDataSource::new(catalog, settings.tagging_enabled),
    );
    for p in &settings.priorities {
        builder = builder.register_type_priority(p.kind.clone(), p.context.clone(), p.priority);
    }
    tracing::info!(catalog = %catalog_path.display(), tagging = settings.tagging_enabled, "hashtag service ready");
    Ok(HashtagAutocompleteService::new(builder.build()))
}

fn guardian(cli: &Cli) -> Guardian {
    let guardian = match (cli.staff, cli.user) {
        (true, user) => Guardian::staff(user.unwrap_or(1)),
        (false, Some(user)) => Guardian::for_user(user, cli.groups.clone()),
        (false, None) => Guardian::anonymous(),
    };
    guardian.with_muted_tags(cli.muted_tags.clone())
}

fn resolve_order(service: &HashtagAutocompleteService, order: Vec<String>, context: &str) -> Vec<HashtagType> {
    if order.is_empty() {
        service.ordered_types_for_context(context)
    } else {
        order.into_iter().map(HashtagType::from).collect()
    }
}
