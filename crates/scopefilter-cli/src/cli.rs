use clap::{Args, Parser, Subcommand};
use scopefilter_core::{FilterResult, FilterValue};
use scopefilter_domain::FilterRequest;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SCOPEFILTER_COMMIT"),
    ")"
);

#[derive(Parser)]
#[command(name = "scopefilter")]
#[command(about = "Apply declarative filters to JSON records", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Path to the filter config (or set SCOPEFILTER_CONFIG)
    #[arg(long, short, value_name = "FILE", env = "SCOPEFILTER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter records and return one page of the result
    Apply(ApplyArgs),
    /// Keep only the filters the config recognizes
    Valid(FilterArgs),
    /// List the configured filters
    Describe,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    /// Filters as KEY=VALUE; repeating a key builds a list
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Filters as a URL query string, e.g. "name=Jo&status=active"
    #[arg(long, short)]
    pub query: Option<String>,
}

impl FilterArgs {
    /// Merge the query string and KEY=VALUE pairs into one request.
    pub fn to_request(&self) -> FilterResult<FilterRequest> {
        let mut request = match &self.query {
            Some(query) => FilterRequest::from_query_string(query)?,
            None => FilterRequest::new(),
        };
        for (key, value) in &self.filters {
            request.append(key.as_str(), FilterValue::parse_loose(value));
        }
        Ok(request)
    }
}

#[derive(Args)]
pub struct ApplyArgs {
    /// JSON file holding an array of records (or set SCOPEFILTER_DATA)
    #[arg(long, short, value_name = "FILE", env = "SCOPEFILTER_DATA")]
    pub data: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Page to return, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Records per page; overrides the config
    #[arg(long)]
    pub per_page: Option<usize>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))?;
    if key.is_empty() {
        return Err(format!("missing key in {:?}", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
