use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use offsite_feedback::application::gateway::{NotifyAck, OffsiteGateway, ReturnPage};
use offsite_feedback::config::GatewayConfig;
use offsite_feedback::domain::feedback::Feedback;
use offsite_feedback::domain::payment::PaymentRecord;
use offsite_feedback::domain::ports::PaymentStoreBox;
use offsite_feedback::domain::signature::AllParametersComposer;
use offsite_feedback::infrastructure::clock::SystemClock;
use offsite_feedback::infrastructure::in_memory::InMemoryPaymentStore;
use offsite_feedback::infrastructure::json_file::JsonFilePaymentStore;
use offsite_feedback::interfaces::http::{decode_pairs, request_from_raw};
use offsite_feedback::interfaces::settings_text::{
    format_brands, format_locale_map, parse_brands, parse_locale_map,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding payment records. Records are kept in memory when omitted.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Gateway configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log the raw feedback of every callback
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a pending payment record, as done before the redirect
    Create { payment_id: String },
    /// Process a buyer return (GET) with the given query string
    Return {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Process a processor notification (POST) with the given form body
    Notify {
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Print the signature the processor would attach to the given fields
    Sign {
        #[arg(long)]
        fields: String,
    },
    /// Print a stored payment record
    Show { payment_id: String },
    /// Normalize a locale map file (site_locale|processor_locale per line)
    Locales { file: PathBuf },
    /// Normalize a brand list file (title|PM|BRAND per line)
    Brands { file: PathBuf },
}

fn open_store(path: Option<PathBuf>) -> PaymentStoreBox {
    match path {
        Some(path) => Box::new(JsonFilePaymentStore::open(path)),
        None => {
            eprintln!(
                "WARNING: No --store given. Payment records are kept in memory and discarded on exit."
            );
            Box::new(InMemoryPaymentStore::new())
        }
    }
}

fn load_config(path: Option<PathBuf>, verbose: bool) -> Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => GatewayConfig::from_path(path)?,
        None => GatewayConfig::default(),
    }
    .with_env_overrides();
    config.log_feedback |= verbose;
    config.validate()?;
    Ok(config)
}

fn print_record(record: &PaymentRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record).into_diagnostic()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Create { payment_id } => {
            let store = open_store(cli.store);
            let record = store.create(PaymentRecord::new(payment_id)).await?;
            print_record(&record)?;
        }
        Command::Show { payment_id } => {
            let store = open_store(cli.store);
            match store.load(&payment_id).await? {
                Some(record) => print_record(&record)?,
                None => miette::bail!("No payment record found for {payment_id}"),
            }
        }
        Command::Return { query } => {
            let config = load_config(cli.config, cli.verbose)?;
            let gateway =
                OffsiteGateway::from_config(&config, open_store(cli.store), Box::new(SystemClock));
            let result = gateway.on_return(&request_from_raw("GET", &query, "")).await;
            if let Err(e) = &result {
                eprintln!("Return callback rejected: {e}");
            }
            // The buyer gets a page either way.
            println!("{}", ReturnPage::for_result(&result).message());
        }
        Command::Notify { body } => {
            let config = load_config(cli.config, cli.verbose)?;
            let gateway =
                OffsiteGateway::from_config(&config, open_store(cli.store), Box::new(SystemClock));
            let result = gateway.on_notify(&request_from_raw("POST", "", &body)).await;
            let ack = NotifyAck::for_result(&result);
            println!("{}", serde_json::to_string(&ack).into_diagnostic()?);
            let record = result?;
            print_record(&record)?;
        }
        Command::Sign { fields } => {
            let config = load_config(cli.config, cli.verbose)?;
            let composer = AllParametersComposer::new(config.sha_out, config.sha_algorithm);
            let feedback = Feedback::new(decode_pairs(&fields));
            println!("{}", composer.sign(&feedback).to_uppercase());
        }
        Command::Locales { file } => {
            let text = fs::read_to_string(file).into_diagnostic()?;
            println!("{}", format_locale_map(&parse_locale_map(&text)));
        }
        Command::Brands { file } => {
            let text = fs::read_to_string(file).into_diagnostic()?;
            println!("{}", format_brands(&parse_brands(&text)));
        }
    }

    Ok(())
}
