use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::runtime::{run, RunOptions, ShutdownOptions};
use modkit::ModuleRegistry;
use runtime::{AppConfig, AppConfigProvider, CliArgs, ConfigProvider};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// Contacts Server - contact list with search, favorites and edit forms
#[derive(Parser)]
#[command(name = "contacts-server")]
#[command(about = "Contacts Server - contact list with search, favorites and edit forms")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep contacts in memory instead of the data file
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    apply_module_overrides(&mut config, &args)?;

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Contacts Server starting");
    tracing::debug!("Effective server configuration: {:?}", config.server);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn module_section<'a>(
    config: &'a mut AppConfig,
    name: &str,
) -> Result<&'a mut serde_json::Map<String, serde_json::Value>> {
    config
        .modules
        .entry(name.to_string())
        .or_insert_with(|| serde_json::json!({}))
        .as_object_mut()
        .with_context(|| format!("modules.{name} must be a mapping"))
}

/// Fold server-level settings and CLI flags into the module config bag.
fn apply_module_overrides(config: &mut AppConfig, args: &CliArgs) -> Result<()> {
    let bind_addr = config.server.bind_addr();
    let timeout_sec = config.server.timeout_sec;

    let ingress = module_section(config, api_ingress::MODULE_NAME)?;
    // An explicit --port wins over a configured bind address.
    if args.port.is_some() || !ingress.contains_key("bind_addr") {
        ingress.insert("bind_addr".into(), bind_addr.into());
    }
    if timeout_sec > 0 && !ingress.contains_key("request_timeout_sec") {
        ingress.insert("request_timeout_sec".into(), timeout_sec.into());
    }

    if args.mock {
        module_section(config, contacts::MODULE_NAME)?
            .insert("storage".into(), "memory".into());
    }
    Ok(())
}

fn build_registry() -> Result<ModuleRegistry> {
    let contacts = Arc::new(contacts::Contacts::new());
    let ingress = Arc::new(api_ingress::ApiIngress::default());

    Ok(ModuleRegistry::builder()
        .register_core(contacts::MODULE_NAME, contacts.clone())
        .register_rest(contacts::MODULE_NAME, contacts)
        .register_core(api_ingress::MODULE_NAME, ingress.clone())
        .register_rest_host(api_ingress::MODULE_NAME, ingress.clone())
        .register_stateful(api_ingress::MODULE_NAME, ingress)
        .build()?)
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let home_dir = PathBuf::from(&config.server.home_dir);
    let config_provider = Arc::new(ModkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config,
    ))));

    run(RunOptions {
        modules_cfg: config_provider,
        home_dir,
        registry: build_registry()?,
        shutdown: ShutdownOptions::Signals,
    })
    .await
}

/// Parse every module section without opening stores or sockets.
fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let ingress: api_ingress::ApiIngressConfig = section(config, api_ingress::MODULE_NAME)?;
    ingress
        .bind_addr
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid bind address '{}'", ingress.bind_addr))?;
    let contacts_cfg: contacts::config::ContactsConfig = section(config, contacts::MODULE_NAME)?;
    build_registry()?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Listening address: {}", ingress.bind_addr);
    println!("Contact storage: {:?}", contacts_cfg.storage);
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn section<T>(config: &AppConfig, name: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match config.modules.get(name) {
        Some(v) => serde_json::from_value(v.clone())
            .with_context(|| format!("invalid {name} config")),
        None => Ok(T::default()),
    }
}
