use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rillow::{
    ChartDuration, ChartOptions, ChildType, ClientConfig, DemographicsOptions, Document,
    MonthlyPaymentOptions, Query, RegionChartOptions, RegionChildrenOptions, ResponseConfig,
    Rillow, SimplifyOptions, UnitType,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "rillow",
    version,
    about = "Query the Zillow web service and search its responses"
)]
struct Cli {
    /// Zillow web service id
    #[arg(long, env = "RILLOW_ZWSID", hide_env_values = true, global = true)]
    zws_id: Option<String>,
    /// Service root URL
    #[arg(long, env = "RILLOW_BASE_URL", global = true)]
    base_url: Option<String>,
    /// Print only the first value stored under NAME
    #[arg(long, value_name = "NAME", global = true)]
    find: Option<String>,
    /// Keep the response's root element as the top-level key
    #[arg(long, global = true)]
    keep_root: bool,
    /// Wrap every element value in a list
    #[arg(long, global = true)]
    force_array: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find a property by address
    Search {
        address: String,
        /// City and state, or ZIP code
        citystatezip: String,
    },
    /// Find a property by address, with full property data
    DeepSearch { address: String, citystatezip: String },
    /// Zestimate of a property
    Zestimate { zpid: String },
    /// Historical value chart of a property
    Chart {
        zpid: String,
        #[arg(value_enum)]
        unit_type: UnitArg,
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Historical value chart of a region
    RegionChart {
        #[arg(value_enum)]
        unit_type: UnitArg,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Demographics of a region
    Demographics {
        #[arg(long)]
        rid: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        neighborhood: Option<String>,
    },
    /// Subregions of a region
    RegionChildren {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        rid: Option<String>,
        #[arg(long, value_enum)]
        childtype: Option<ChildArg>,
    },
    /// Recent comparable sales
    Comps { zpid: String, count: u32 },
    /// Recent comparable sales, with full property data
    DeepComps { zpid: String, count: u32 },
    /// Monthly mortgage payment estimate
    MonthlyPayments {
        price: u64,
        /// Down payment in percent
        #[arg(long)]
        down: Option<u32>,
        /// Down payment in dollars
        #[arg(long)]
        dollars_down: Option<u64>,
        #[arg(long)]
        zip: Option<String>,
    },
    /// Current mortgage rates
    RateSummary,
    /// Parse a saved response instead of calling the service
    Inspect {
        /// Response file (defaults to stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct ChartArgs {
    /// Image width, 200 to 600
    #[arg(long)]
    width: Option<u32>,
    /// Image height, 100 to 300
    #[arg(long)]
    height: Option<u32>,
    #[arg(long, value_enum)]
    duration: Option<DurationArg>,
}

#[derive(Clone, Debug, ValueEnum)]
enum UnitArg {
    Percent,
    Dollar,
}

#[derive(Clone, Debug, ValueEnum)]
enum DurationArg {
    #[value(name = "1year")]
    OneYear,
    #[value(name = "5years")]
    FiveYears,
    #[value(name = "10years")]
    TenYears,
}

#[derive(Clone, Debug, ValueEnum)]
enum ChildArg {
    State,
    County,
    City,
    Zipcode,
    Neighborhood,
}

impl From<UnitArg> for UnitType {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Percent => UnitType::Percent,
            UnitArg::Dollar => UnitType::Dollar,
        }
    }
}

impl From<DurationArg> for ChartDuration {
    fn from(value: DurationArg) -> Self {
        match value {
            DurationArg::OneYear => ChartDuration::OneYear,
            DurationArg::FiveYears => ChartDuration::FiveYears,
            DurationArg::TenYears => ChartDuration::TenYears,
        }
    }
}

impl From<ChildArg> for ChildType {
    fn from(value: ChildArg) -> Self {
        match value {
            ChildArg::State => ChildType::State,
            ChildArg::County => ChildType::County,
            ChildArg::City => ChildType::City,
            ChildArg::Zipcode => ChildType::Zipcode,
            ChildArg::Neighborhood => ChildType::Neighborhood,
        }
    }
}

impl From<ChartArgs> for ChartOptions {
    fn from(args: ChartArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            duration: args.duration.map(Into::into),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            let _ = writeln!(io::stderr(), "error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns false when `--find` matched nothing
fn run(args: Cli) -> Result<bool> {
    let response = ResponseConfig {
        simplify: SimplifyOptions {
            keep_root: args.keep_root,
            force_array: args.force_array,
            ..SimplifyOptions::default()
        },
        ..ResponseConfig::default()
    };

    let doc = match args.command {
        Command::Inspect { input } => {
            let body = read_input(input.as_ref())?;
            rillow::from_xml_str_with_config(&body, &response)
                .context("failed to parse response")?
        }
        command => {
            let query = to_query(command)?;
            let config = client_config(args.zws_id, args.base_url.as_deref())?
                .with_response(response);
            let rillow = Rillow::with_config(config)?;
            debug!(endpoint = query.endpoint(), "calling service");
            rillow
                .execute(&query)
                .with_context(|| format!("{} failed", query.endpoint()))?
        }
    };

    print_result(&doc, args.find.as_deref())
}

fn client_config(zws_id: Option<String>, base_url: Option<&str>) -> Result<ClientConfig> {
    let Some(zws_id) = zws_id else {
        bail!("missing web service id; pass --zws-id or set RILLOW_ZWSID");
    };
    let config = ClientConfig::new(zws_id)?;
    match base_url {
        Some(base_url) => Ok(config.with_base_url(base_url)?),
        None => Ok(config),
    }
}

fn to_query(command: Command) -> Result<Query> {
    let query = match command {
        Command::Search {
            address,
            citystatezip,
        } => Query::SearchResults {
            address,
            citystatezip,
        },
        Command::DeepSearch {
            address,
            citystatezip,
        } => Query::DeepSearchResults {
            address,
            citystatezip,
        },
        Command::Zestimate { zpid } => Query::Zestimate { zpid },
        Command::Chart {
            zpid,
            unit_type,
            chart,
        } => Query::Chart {
            zpid,
            unit_type: unit_type.into(),
            options: chart.into(),
        },
        Command::RegionChart {
            unit_type,
            city,
            state,
            zip,
            chart,
        } => Query::RegionChart {
            unit_type: unit_type.into(),
            options: RegionChartOptions {
                city,
                state,
                zip,
                chart: chart.into(),
            },
        },
        Command::Demographics {
            rid,
            state,
            city,
            neighborhood,
        } => Query::Demographics(DemographicsOptions {
            rid,
            state,
            city,
            neighborhood,
        }),
        Command::RegionChildren {
            city,
            state,
            country,
            rid,
            childtype,
        } => Query::RegionChildren(RegionChildrenOptions {
            city,
            state,
            country,
            rid,
            childtype: childtype.map(Into::into),
        }),
        Command::Comps { zpid, count } => Query::Comps { zpid, count },
        Command::DeepComps { zpid, count } => Query::DeepComps { zpid, count },
        Command::MonthlyPayments {
            price,
            down,
            dollars_down,
            zip,
        } => Query::MonthlyPayments {
            price,
            options: MonthlyPaymentOptions {
                down,
                dollars_down,
                zip,
            },
        },
        Command::RateSummary => Query::RateSummary,
        Command::Inspect { .. } => bail!("inspect does not call the service"),
    };
    Ok(query)
}

fn print_result(doc: &Document, find: Option<&str>) -> Result<bool> {
    let node = match find {
        Some(name) => match doc.find_attribute(name) {
            Some(node) => node,
            None => {
                let mut stderr = io::stderr();
                writeln!(stderr, "no value for {name}").context("failed to write stderr")?;
                return Ok(false);
            }
        },
        None => doc.to_plain_structure(),
    };

    let mut output = serde_json::to_string_pretty(node).context("failed to encode result")?;
    output.push('\n');
    io::stdout()
        .write_all(output.as_bytes())
        .context("failed to write stdout")?;
    Ok(true)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}
