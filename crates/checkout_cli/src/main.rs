use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use checkout_api::CheckoutApiClient;
use checkout_core::address::{
    AddressPage, AddressPageConfig, LookupClearPolicy, SaveOutcome, CODE_FIELD, COLONY_FIELD,
    EMAIL_FIELD, LAST_NAME_FIELD, NAME_FIELD, POLICY_FIELD, STREET_FIELD, TELEPHONE_FIELD,
};
use checkout_core::collaborators::LocalityLookup;
use checkout_core::config::{ApiConfig, API_TIMEOUT_ENV, API_URL_ENV, DEFAULT_API_URL};
use checkout_core::error::SaveError;
use checkout_core::form::FieldChangeEvent;
use checkout_core::order_summary::OrderSummary;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

mod render;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "checkout",
    about = "Checkout page flows from the terminal",
    long_about = "Shows the order summary, resolves postal codes and fills\n\
                  and saves the shipping address form against the checkout backend."
)]
struct Cli {
    /// Base URL of the checkout backend
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    /// Request timeout in seconds
    #[arg(long, env = API_TIMEOUT_ENV, default_value_t = 10, global = true)]
    timeout_secs: u64,
    /// Log filter, e.g. `debug` or `checkout_core=trace`; falls back to RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the order summary and its total
    Summary,
    /// Resolve a postal code to city, town, state and colonies
    Lookup {
        /// Postal code to resolve
        code: String,
    },
    /// Fill the shipping address form and save it
    Save(SaveArgs),
}

#[derive(clap::Args)]
struct SaveArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    telephone: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Postal code; city, town and state are filled from it
    #[arg(long, default_value = "")]
    code: String,
    #[arg(long, default_value = "")]
    street: String,
    /// Colony; defaults to the first one the lookup returns
    #[arg(long)]
    colony: Option<String>,
    /// Do not use this address for billing
    #[arg(long)]
    no_policy: bool,
    /// Which error markers a postal-code lookup clears
    #[arg(value_enum, long, default_value_t = ClearPolicyArg::All)]
    clear_policy: ClearPolicyArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClearPolicyArg {
    /// Every field
    All,
    /// Postal code and locality fields only
    Locality,
}

impl From<ClearPolicyArg> for LookupClearPolicy {
    fn from(arg: ClearPolicyArg) -> Self {
        match arg {
            ClearPolicyArg::All => LookupClearPolicy::AllFields,
            ClearPolicyArg::Locality => LookupClearPolicy::LocalityFields,
        }
    }
}

// ── Entry point ────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = ApiConfig {
        timeout: Duration::from_secs(cli.timeout_secs.max(1)),
        ..ApiConfig::default()
    }
    .with_base_url(&cli.api_url);
    let client = CheckoutApiClient::new(config).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Summary => {
            let summary = OrderSummary::load(&client)
                .await
                .context("failed to load products")?;
            print!("{}", render::summary(&summary));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lookup { code } => {
            match client
                .fetch_localities(&code)
                .await
                .with_context(|| format!("failed to look up postal code {code}"))?
            {
                Some(locality) => print!("{}", render::locality(&locality)),
                None => println!("no locality found for {code}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Save(args) => save(client, args).await,
    }
}

async fn save(client: CheckoutApiClient, args: SaveArgs) -> Result<ExitCode> {
    let config = AddressPageConfig {
        clear_policy: args.clear_policy.into(),
        ..AddressPageConfig::default()
    };
    let page = AddressPage::with_config(client.clone(), client, config)?;

    for (field, value) in [
        (NAME_FIELD, &args.name),
        (LAST_NAME_FIELD, &args.last_name),
        (TELEPHONE_FIELD, &args.telephone),
        (EMAIL_FIELD, &args.email),
        (STREET_FIELD, &args.street),
        (CODE_FIELD, &args.code),
    ] {
        page.change(FieldChangeEvent::new(field, value.as_str()))?;
    }
    page.wait_for_lookup().await;

    let colony = args
        .colony
        .clone()
        .or_else(|| page.colonies().into_iter().next())
        .unwrap_or_default();
    page.change(FieldChangeEvent::new(COLONY_FIELD, colony))?;
    page.toggle(FieldChangeEvent::new(POLICY_FIELD, !args.no_policy))?;

    match page.save().await {
        Ok(SaveOutcome::Submitted { record, response }) => {
            print!("{}", render::contact(&record));
            println!("backend response: {response}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(SaveOutcome::Invalid { missing }) => {
            print!("{}", render::missing_fields(&page, &missing));
            Ok(ExitCode::from(2))
        }
        Err(SaveError::Submit { display, source }) => {
            tracing::debug!(error = ?source, "submit error detail");
            eprintln!("{display}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}
