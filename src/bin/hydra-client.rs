//! Hydra Client CLI
//!
//! Command-line interface for resolving Hydra resources into pages and forms.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use hydra_client::{
    build_form_model, build_page, load_document_auto, route, ApiDocumentation, Expander,
    FormSessionStore, HydraError, Navigation, NavigationContext, PreExpanded, RouteTable,
    UiStyling,
};

#[derive(Parser)]
#[command(name = "hydra-client")]
#[command(about = "Resolve Hydra hypermedia resources into pages and forms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the page for an expanded resource
    Page {
        /// Resource source: file path or URL (http:// or https://)
        resource: String,

        /// API documentation source: file path or URL
        #[arg(long)]
        api_doc: String,

        /// UI styling document source: file path or URL
        #[arg(long)]
        styling: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Load the API entry point over HTTP and print its page
    #[cfg(feature = "remote")]
    Browse {
        /// Entry point IRI (overrides the configuration file)
        #[arg(long, env = "HYDRA_ENTRY_POINT")]
        entry_point: Option<String>,

        /// Configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Build the form for a write operation
    Form {
        /// API documentation source: file path or URL
        #[arg(long)]
        api_doc: String,

        /// IRI of the POST or PUT operation
        #[arg(long)]
        operation: String,

        /// Target URL of the request
        #[arg(long)]
        url: String,

        /// Current state of the resource, pre-filling the form
        #[arg(long)]
        existing: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hydra_client=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Page {
            resource,
            api_doc,
            styling,
            pretty,
        } => run_page(&resource, &api_doc, styling.as_deref(), pretty),

        #[cfg(feature = "remote")]
        Commands::Browse {
            entry_point,
            config,
            pretty,
        } => run_browse(entry_point, config, pretty),

        Commands::Form {
            api_doc,
            operation,
            url,
            existing,
            pretty,
        } => run_form(&api_doc, &operation, &url, existing.as_deref(), pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn fail(e: HydraError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn load_expanded(source: &str) -> Result<Value, u8> {
    load_document_auto(source)
        .and_then(|document| PreExpanded.expand(document))
        .map_err(fail)
}

fn load_api_doc(source: &str) -> Result<ApiDocumentation, u8> {
    ApiDocumentation::from_expanded(&load_expanded(source)?).map_err(fail)
}

fn print_json(value: &impl Serialize, pretty: bool) -> Result<(), u8> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    println!("{}", output);
    Ok(())
}

fn run_page(
    resource_source: &str,
    api_doc_source: &str,
    styling_source: Option<&str>,
    pretty: bool,
) -> Result<(), u8> {
    let resource = load_expanded(resource_source)?;
    let api_doc = load_api_doc(api_doc_source)?;
    let styling = match styling_source {
        Some(source) => Some(UiStyling::from_expanded(&load_expanded(source)?).map_err(fail)?),
        None => None,
    };

    let routes = RouteTable::new();
    let mut sessions = FormSessionStore::new();
    let mut ctx =
        NavigationContext::new(&api_doc, &routes, &mut sessions).with_styling(styling.as_ref());
    let page = build_page(&resource, &mut ctx).map_err(fail)?;

    print_json(&page, pretty)
}

#[cfg(feature = "remote")]
fn run_browse(
    entry_point: Option<String>,
    config_path: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    use hydra_client::{ClientConfig, HttpFetcher, HydraBrowser};

    let mut config = match config_path {
        Some(path) => ClientConfig::load(&path).map_err(fail)?,
        None => ClientConfig::new(),
    };
    if let Some(entry_point) = entry_point {
        config = config.entry_point(entry_point);
    }

    let fetcher = HttpFetcher::new(&config).map_err(fail)?;
    let mut browser = HydraBrowser::new(fetcher, config).map_err(fail)?;
    let loaded = browser.open_entry_point().map_err(fail)?;

    print_json(&loaded.page, pretty)
}

fn run_form(
    api_doc_source: &str,
    operation: &str,
    url: &str,
    existing_source: Option<&str>,
    pretty: bool,
) -> Result<(), u8> {
    let api_doc = load_api_doc(api_doc_source)?;
    let existing = existing_source.map(load_expanded).transpose()?;

    let (class, op) = api_doc.find_operation(operation).ok_or_else(|| {
        fail(HydraError::UnknownOperation {
            operation: operation.to_string(),
        })
    })?;

    let routes = RouteTable::new();
    let mut sessions = FormSessionStore::new();
    let mut ctx = NavigationContext::new(&api_doc, &routes, &mut sessions);
    let navigation = route(&mut ctx, &class.iri, op, url, existing.as_ref()).map_err(fail)?;

    let Navigation::Form { session } = navigation else {
        return Err(fail(HydraError::UnsupportedOperationMethod {
            operation: operation.to_string(),
            method: op.method.clone(),
        }));
    };
    let model = build_form_model(&mut sessions, &session, &api_doc).map_err(fail)?;

    print_json(&model, pretty)
}
