use anyhow::Result;
use clap::Parser;
use pkgadmin::{
    api::{CategoryFilter, PackageId, PackageQuery},
    commands::{
        self,
        config::{Config, DEFAULT_TIMEOUT, Settings},
    },
    page::{DEFAULT_STALE_AFTER, Mutation, form::PackageForm},
    runtime::RealRuntime,
};
use std::path::PathBuf;
use std::time::Duration;

/// pkgadmin - package marketplace admin console
///
/// List, search, approve, feature and delete packages through the
/// marketplace admin API.
///
/// If the PKGADMIN_TOKEN environment variable is set, it is sent as a bearer
/// token on every request.
///
/// Examples:
///   pkgadmin list --search auth          # Packages matching "auth"
///   pkgadmin approve 42                  # Approve a pending package
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGADMIN_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Admin API base URL (defaults to http://localhost:3000)
    #[arg(long = "api-url", env = "PKGADMIN_API_URL", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Read the admin token from a file instead of PKGADMIN_TOKEN
    #[arg(long = "token-file", value_name = "PATH", global = true)]
    token_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List packages
    List(ListArgs),

    /// Show the whole package management page
    Dashboard(FilterArgs),

    /// Show one package in full
    Show(ShowArgs),

    /// Approve a pending package
    Approve(IdArgs),

    /// Mark a package as featured
    Feature(IdArgs),

    /// Delete a package
    Delete(DeleteArgs),

    /// Fill in the "Add Package" dialog
    Create(CreateArgs),

    /// Interactive package page
    Shell(ShellArgs),
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Search text
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Category: all, frontend, backend, fullstack, utility, plugin
    #[arg(long, short, default_value = "all")]
    pub category: CategoryFilter,
}

impl FilterArgs {
    fn query(self) -> PackageQuery {
        PackageQuery::new(self.search, self.category)
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print the packages as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Package id
    pub id: PackageId,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Package id
    pub id: PackageId,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Package id
    pub id: PackageId,

    /// Skip confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Package name
    #[arg(long)]
    pub name: String,

    /// Package category
    #[arg(long)]
    pub category: String,

    /// Price in dollars
    #[arg(long)]
    pub price: String,

    /// Package description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Preview image file
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Package files (ZIP)
    #[arg(long, value_name = "PATH")]
    pub archive: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ShellArgs {
    /// Seconds a loaded list is reused before it is fetched again
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_STALE_AFTER.as_secs())]
    pub stale_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let mut settings = Settings {
        api_url: cli.api_url,
        token_file: cli.token_file,
        timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    };

    match cli.command {
        Commands::Create(args) => {
            let form = PackageForm {
                name: args.name,
                category: args.category,
                price: args.price,
                description: args.description,
                image: args.image,
                archive: args.archive,
            };
            commands::create(&runtime, &form)?
        }
        Commands::List(args) => {
            let config = Config::new(runtime, settings)?;
            commands::list(config, args.filter.query(), args.json).await?
        }
        Commands::Dashboard(args) => {
            let config = Config::new(runtime, settings)?;
            commands::dashboard(config, args.query()).await?
        }
        Commands::Show(args) => {
            let config = Config::new(runtime, settings)?;
            commands::show(config, args.filter.query(), &args.id).await?
        }
        Commands::Approve(args) => {
            let config = Config::new(runtime, settings)?;
            commands::mutate(config, Mutation::Approve, &args.id, false).await?
        }
        Commands::Feature(args) => {
            let config = Config::new(runtime, settings)?;
            commands::mutate(config, Mutation::Feature, &args.id, false).await?
        }
        Commands::Delete(args) => {
            let config = Config::new(runtime, settings)?;
            commands::mutate(config, Mutation::Delete, &args.id, args.yes).await?
        }
        Commands::Shell(args) => {
            settings.stale_after = Duration::from_secs(args.stale_secs);
            let config = Config::new(runtime, settings)?;
            commands::shell(config).await?
        }
    }
    Ok(())
}
