use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tangible::error::{ErrorCode, ErrorReport};
use tangible::llm::config::LlmConfig;
use tangible::llm::types::LlmError;
use tangible::tangible::{Column, InteractionOptions, ReasoningStrategy, TangibleClient, TangibleError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Tangible(#[from] TangibleError),
    #[error("invalid column `{0}`; expected name:text|boolean|number|enum=a|b")]
    InvalidColumn(String),
    #[error("invalid JSON output: {0}")]
    Output(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Llm(e) => e.error_code(),
            Self::Tangible(e) => e.error_code(),
            Self::InvalidColumn(_) => "E_INVALID_COLUMN",
            Self::Output(_) => "E_OUTPUT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::Tangible(e) => e.retryable(),
            _ => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tangible", about = "Typed questions to a chat-completion model")]
struct Cli {
    /// Model name; overrides LLM_MODEL.
    #[arg(long)]
    model: Option<String>,

    /// simple, step-by-step or pick-one.
    #[arg(long, default_value = "simple")]
    reasoning: ReasoningStrategy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Free-form answer.
    Text(PromptArgs),
    /// Yes or no.
    Boolean(PromptArgs),
    Number(PromptArgs),
    /// One item per line.
    Items(PromptArgs),
    /// Exactly one of the given options.
    Choose(ChooseArgs),
    Sort(SortArgs),
    Filter(FilterArgs),
    Extend(ExtendArgs),
    Group(GroupArgs),
    Table(TableArgs),
}

#[derive(Args, Debug)]
struct PromptArgs {
    prompt: String,
    /// Allow the model to answer "I don't know".
    #[arg(long)]
    optional: bool,
}

#[derive(Args, Debug)]
struct ChooseArgs {
    prompt: String,
    #[arg(long, value_delimiter = ',', required = true)]
    options: Vec<String>,
    /// Pick every option that applies instead of exactly one.
    #[arg(long)]
    many: bool,
}

#[derive(Args, Debug)]
struct SortArgs {
    #[arg(required = true)]
    items: Vec<String>,
    #[arg(long)]
    by: Option<String>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(required = true)]
    items: Vec<String>,
    #[arg(long = "where")]
    predicate: String,
}

#[derive(Args, Debug)]
struct ExtendArgs {
    #[arg(required = true)]
    items: Vec<String>,
    #[arg(long, default_value_t = 1)]
    count: usize,
}

#[derive(Args, Debug)]
struct GroupArgs {
    #[arg(required = true)]
    items: Vec<String>,
    /// Fixed group names; the model names the groups when omitted.
    #[arg(long, value_delimiter = ',')]
    groups: Option<Vec<String>>,
    #[arg(long)]
    by: Option<String>,
}

#[derive(Args, Debug)]
struct TableArgs {
    prompt: String,
    /// Column specs, e.g. `name:text,age:number,color:enum=red|green`.
    #[arg(long, value_delimiter = ',', required = true)]
    columns: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = ErrorReport::from_error(&e);
            match serde_json::to_string_pretty(&report) {
                Ok(rendered) => eprintln!("{rendered}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = LlmConfig::from_env()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    let client = TangibleClient::from_config(&config)?;
    let options = InteractionOptions::new().with_reasoning(cli.reasoning);

    match cli.command {
        Command::Text(args) if args.optional => {
            print_json(&client.expect_plain_text_option(&args.prompt, &options).await?)
        }
        Command::Text(args) => print_json(&client.expect_plain_text(&args.prompt, &options).await?),
        Command::Boolean(args) if args.optional => {
            print_json(&client.expect_boolean_option(&args.prompt, &options).await?)
        }
        Command::Boolean(args) => print_json(&client.expect_boolean(&args.prompt, &options).await?),
        Command::Number(args) if args.optional => {
            print_json(&client.expect_number_option(&args.prompt, &options).await?)
        }
        Command::Number(args) => print_json(&client.expect_number(&args.prompt, &options).await?),
        Command::Items(args) => print_json(&client.expect_items(&args.prompt, &options).await?),
        Command::Choose(args) if args.many => print_json(
            &client
                .expect_enum_cases(&args.prompt, &args.options, &options)
                .await?,
        ),
        Command::Choose(args) => print_json(
            &client
                .expect_enum_case(&args.prompt, &args.options, &options)
                .await?,
        ),
        Command::Sort(args) => print_json(
            &client
                .expect_sorted(&args.items, args.by.as_deref(), &options)
                .await?,
        ),
        Command::Filter(args) => print_json(
            &client
                .expect_filtered(&args.items, &args.predicate, &options)
                .await?,
        ),
        Command::Extend(args) => print_json(
            &client
                .expect_extended_items(&args.items, args.count, &options)
                .await?,
        ),
        Command::Group(args) => print_json(
            &client
                .expect_groups(&args.items, args.groups.as_deref(), args.by.as_deref(), &options)
                .await?,
        ),
        Command::Table(args) => {
            let columns = args
                .columns
                .iter()
                .map(|spec| parse_column(spec))
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&client.expect_table(&args.prompt, &columns, &options).await?)
        }
    }
}

fn parse_column(spec: &str) -> Result<Column, CliError> {
    let invalid = || CliError::InvalidColumn(spec.to_string());
    let (name, kind) = spec.split_once(':').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    match kind.trim() {
        "text" => Ok(Column::text(name)),
        "boolean" => Ok(Column::boolean(name)),
        "number" => Ok(Column::number(name)),
        other => {
            let options = other.strip_prefix("enum=").ok_or_else(invalid)?;
            Ok(Column::enumeration(name, options.split('|').map(str::trim)))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
