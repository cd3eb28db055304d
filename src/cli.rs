//! Command line argument parsing for the `dataspot` binary

use crate::config::config::AnalysisConfig;
use crate::models::{
    CompareOptions, DiscoverOptions, FindOptions, Query, QueryValue, SortField, TreeOptions,
};
use crate::preprocessors::{self, Preprocessors};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Find,
    Analyze,
    Tree,
    Discover,
    Compare,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "find" => Ok(Command::Find),
            "analyze" => Ok(Command::Analyze),
            "tree" => Ok(Command::Tree),
            "discover" => Ok(Command::Discover),
            "compare" => Ok(Command::Compare),
            other => Err(anyhow!(
                "Unknown command '{}'; expected find, analyze, tree, discover or compare",
                other
            )),
        }
    }
}

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Help,
    Version,
    GenerateConfig,
    Run(Box<CliArgs>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: Command,
    pub file: PathBuf,
    pub fields: Vec<String>,
    pub query: Query,
    pub min_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
    pub min_count: Option<usize>,
    pub max_count: Option<usize>,
    pub min_depth: Option<usize>,
    pub max_depth: Option<usize>,
    pub contains: Option<String>,
    pub exclude: Vec<String>,
    pub regex: Option<String>,
    pub limit: Option<usize>,
    pub sort_by: Option<SortField>,
    pub ascending: bool,
    pub top: Option<usize>,
    pub max_fields: Option<usize>,
    pub max_combinations: Option<usize>,
    pub baseline: Option<PathBuf>,
    pub change_threshold: Option<f64>,
    pub stats: bool,
    pub json: bool,
    pub export: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// `(field, built-in name)` pairs
    pub preprocess: Vec<(String, String)>,
    pub no_color: bool,
    pub log_file: bool,
}

impl CliArgs {
    fn new(command: Command, file: PathBuf) -> Self {
        Self {
            command,
            file,
            fields: Vec::new(),
            query: Query::new(),
            min_percentage: None,
            max_percentage: None,
            min_count: None,
            max_count: None,
            min_depth: None,
            max_depth: None,
            contains: None,
            exclude: Vec::new(),
            regex: None,
            limit: None,
            sort_by: None,
            ascending: false,
            top: None,
            max_fields: None,
            max_combinations: None,
            baseline: None,
            change_threshold: None,
            stats: false,
            json: false,
            export: None,
            config: None,
            preprocess: Vec::new(),
            no_color: false,
            log_file: false,
        }
    }

    /// Query to pass along, `None` when no `--query` was given
    pub fn query(&self) -> Option<Query> {
        (!self.query.is_empty()).then(|| self.query.clone())
    }

    /// Pattern filters from flags, falling back to configured defaults
    pub fn find_options(&self, defaults: &AnalysisConfig) -> FindOptions {
        FindOptions {
            min_percentage: self.min_percentage.or(defaults.min_percentage),
            max_percentage: self.max_percentage,
            min_count: self.min_count,
            max_count: self.max_count,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            contains: self.contains.clone(),
            exclude: self.exclude.clone(),
            regex: self.regex.clone(),
            limit: self.limit.or(defaults.limit),
            sort_by: self.sort_by.unwrap_or_default(),
            reverse: !self.ascending,
        }
    }

    pub fn tree_options(&self, defaults: &AnalysisConfig) -> TreeOptions {
        let find = self.find_options(defaults);
        TreeOptions {
            top: self.top.unwrap_or(defaults.top),
            min_value: find.min_count,
            max_value: find.max_count,
            min_percentage: find.min_percentage,
            max_percentage: find.max_percentage,
            min_depth: find.min_depth,
            max_depth: find.max_depth,
            contains: find.contains,
            exclude: find.exclude,
            regex: find.regex,
        }
    }

    pub fn discover_options(&self, defaults: &AnalysisConfig) -> DiscoverOptions {
        let base = DiscoverOptions::default();
        let mut filters = self.find_options(defaults);
        filters.min_percentage = filters.min_percentage.or(base.filters.min_percentage);
        DiscoverOptions {
            max_fields: self.max_fields.unwrap_or(defaults.max_fields),
            max_combinations: self.max_combinations.unwrap_or(defaults.max_combinations),
            filters,
        }
    }

    pub fn compare_options(&self, defaults: &AnalysisConfig) -> CompareOptions {
        CompareOptions {
            change_threshold: self.change_threshold.unwrap_or(defaults.change_threshold),
            statistical_significance: self.stats,
            filters: self.find_options(defaults),
        }
    }

    /// Registry built from `--preprocess field=name` flags
    pub fn preprocessors(&self) -> Result<Preprocessors> {
        let mut registry = Preprocessors::new();
        for (field, name) in &self.preprocess {
            match name.as_str() {
                "email_tokens" | "email" => registry.insert(field.clone(), preprocessors::email_tokens),
                "lowercase" => registry.insert(field.clone(), preprocessors::lowercase),
                "trim" => registry.insert(field.clone(), preprocessors::trim),
                other => bail!(
                    "Unknown preprocessor '{}'; expected email_tokens, lowercase or trim",
                    other
                ),
            }
        }
        Ok(registry)
    }
}

/// Parse `args` (without the program name)
pub fn parse_args<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let Some(first) = args.next() else {
        return Ok(Invocation::Help);
    };
    match first.as_str() {
        "-h" | "--help" | "help" => return Ok(Invocation::Help),
        "-V" | "--version" => return Ok(Invocation::Version),
        "--generate-config" => return Ok(Invocation::GenerateConfig),
        _ => {}
    }

    let command: Command = first.parse()?;
    let mut file: Option<PathBuf> = None;
    let mut parsed = CliArgs::new(command, PathBuf::new());

    while let Some(arg) = args.next() {
        // --flag=value and --flag value are both accepted
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String> {
            match inline.clone() {
                Some(v) => Ok(v),
                None => args
                    .next()
                    .ok_or_else(|| anyhow!("{} requires a value", name)),
            }
        };

        match flag.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-f" | "--fields" => parsed.fields.extend(split_list(&value(&flag)?)),
            "-q" | "--query" => {
                let (field, accepted) = parse_query_arg(&value(&flag)?)?;
                parsed.query.insert(field, accepted);
            }
            "--min-percentage" => parsed.min_percentage = Some(parse_number(&flag, &value(&flag)?)?),
            "--max-percentage" => parsed.max_percentage = Some(parse_number(&flag, &value(&flag)?)?),
            "--min-count" => parsed.min_count = Some(parse_number(&flag, &value(&flag)?)?),
            "--max-count" => parsed.max_count = Some(parse_number(&flag, &value(&flag)?)?),
            "--min-depth" => parsed.min_depth = Some(parse_number(&flag, &value(&flag)?)?),
            "--max-depth" => parsed.max_depth = Some(parse_number(&flag, &value(&flag)?)?),
            "--contains" => parsed.contains = Some(value(&flag)?),
            "--exclude" => parsed.exclude.extend(split_list(&value(&flag)?)),
            "--regex" => parsed.regex = Some(value(&flag)?),
            "-n" | "--limit" => parsed.limit = Some(parse_number(&flag, &value(&flag)?)?),
            "--sort-by" => parsed.sort_by = Some(value(&flag)?.parse()?),
            "--ascending" => parsed.ascending = true,
            "--top" => parsed.top = Some(parse_number(&flag, &value(&flag)?)?),
            "--max-fields" => parsed.max_fields = Some(parse_number(&flag, &value(&flag)?)?),
            "--max-combinations" => {
                parsed.max_combinations = Some(parse_number(&flag, &value(&flag)?)?)
            }
            "-b" | "--baseline" => parsed.baseline = Some(PathBuf::from(value(&flag)?)),
            "--change-threshold" => {
                parsed.change_threshold = Some(parse_number(&flag, &value(&flag)?)?)
            }
            "--stats" => parsed.stats = true,
            "--json" => parsed.json = true,
            "--export" => parsed.export = Some(PathBuf::from(value(&flag)?)),
            "--config" => parsed.config = Some(PathBuf::from(value(&flag)?)),
            "--preprocess" => {
                let raw = value(&flag)?;
                let (field, name) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--preprocess expects FIELD=NAME, got '{}'", raw))?;
                parsed
                    .preprocess
                    .push((field.trim().to_string(), name.trim().to_string()));
            }
            "--no-color" => parsed.no_color = true,
            "--log-file" => parsed.log_file = true,
            other if other.starts_with('-') => bail!("Unknown option '{}'", other),
            _ if file.is_none() => file = Some(PathBuf::from(&arg)),
            _ => bail!("Unexpected argument '{}'", arg),
        }
    }

    parsed.file = file.ok_or_else(|| anyhow!("{:?} requires an input FILE", command))?;
    if parsed.fields.is_empty() && command != Command::Discover {
        bail!("--fields is required for this command");
    }
    if command == Command::Compare && parsed.baseline.is_none() {
        bail!("compare requires --baseline FILE");
    }
    Ok(Invocation::Run(Box::new(parsed)))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: FromStr>(flag: &str, raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value '{}' for {}", raw, flag))
}

/// `field=value` or `field=a|b|c`
fn parse_query_arg(raw: &str) -> Result<(String, QueryValue)> {
    let (field, values) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("--query expects FIELD=VALUE, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        bail!("--query field name is empty in '{}'", raw);
    }

    let accepted: Vec<Value> = values
        .split('|')
        .map(|v| Value::String(v.to_string()))
        .collect();
    let value = match <[Value; 1]>::try_from(accepted) {
        Ok([single]) => QueryValue::One(single),
        Err(many) => QueryValue::Any(many),
    };
    Ok((field.to_string(), value))
}

pub fn usage() -> &'static str {
    r#"dataspot - find where your data concentrates

Usage:
  dataspot <COMMAND> FILE [OPTIONS]

Commands:
  find       List concentration patterns over --fields
  analyze    Patterns plus statistics, field distributions and insights
  tree       Hierarchical view of the patterns
  discover   Pick the most concentrated fields automatically
  compare    Compare FILE against --baseline FILE

Input files: .csv (with header row), .json (array of objects), .jsonl

Options:
  -f, --fields a,b,c          Fields to analyze, in hierarchy order
  -q, --query FIELD=V1|V2     Keep records whose FIELD is one of the values (repeatable)
      --min-percentage N      Minimum pattern percentage
      --max-percentage N      Maximum pattern percentage
      --min-count N           Minimum records per pattern
      --max-count N           Maximum records per pattern
      --min-depth N           Minimum pattern depth
      --max-depth N           Maximum pattern depth
      --contains TEXT         Keep patterns whose path contains TEXT
      --exclude A,B           Drop patterns whose path contains any term
      --regex RE              Keep patterns whose path matches RE
  -n, --limit N               Maximum number of patterns
      --sort-by FIELD         percentage (default), count or depth
      --ascending             Sort ascending instead of descending
      --top N                 Children per tree level
      --max-fields N          Largest combination tried by discover
      --max-combinations N    Combinations per size tried by discover
  -b, --baseline FILE         Baseline dataset for compare
      --change-threshold X    Relative change counted as significant (0.15 = 15%)
      --stats                 Add chi-square analysis to compare
      --preprocess FIELD=NAME Apply email_tokens, lowercase or trim to FIELD
      --json                  Print JSON instead of tables
      --export FILE           Write patterns to FILE (.csv or .json)
      --config FILE           Read settings from FILE
      --no-color              Disable colours
      --log-file              Also write logs to the data directory
      --generate-config       Print a commented default config
  -h, --help                  Show this help
  -V, --version               Show version

Logging: set DATASPOT_LOG (e.g. DATASPOT_LOG=debug)."#
}
