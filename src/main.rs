use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dataspot::cli::{self, CliArgs, Command, Invocation};
use dataspot::config::config::OutputFormat;
use dataspot::config::Config;
use dataspot::data::data_exporter::DataExporter;
use dataspot::data::loaders::load_records;
use dataspot::table_display::{self, DisplaySettings};
use dataspot::utils::logging::init_tracing;
use dataspot::{
    AnalyzeInput, CompareInput, Dataspot, DiscoverInput, FindInput, Pattern, TreeInput,
};
use serde::Serialize;
use tracing::info;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let invocation = match cli::parse_args(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            eprintln!("Run 'dataspot --help' for usage.");
            std::process::exit(2);
        }
    };

    let outcome = match invocation {
        Invocation::Help => {
            println!("{}", cli::usage());
            Ok(())
        }
        Invocation::Version => {
            println!("dataspot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Invocation::GenerateConfig => {
            println!("{}", Config::create_default_with_comments());
            Ok(())
        }
        Invocation::Run(args) => run(*args),
    };

    if let Err(e) = outcome {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if args.log_file {
        config.logging.log_to_file = true;
    }
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    if args.no_color {
        config.output.colors = false;
    }

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("{}", format!("Warning: logging disabled: {:#}", e).yellow());
    }

    let records = load_records(&args.file)?;
    info!("Loaded {} records from {:?}", records.len(), args.file);

    let dataspot = Dataspot::with_preprocessors(args.preprocessors()?);
    let defaults = &config.analysis;
    let settings = DisplaySettings::from(&config.output);
    let json = config.output.format == OutputFormat::Json;

    let exported: Option<Vec<Pattern>> = match args.command {
        Command::Find => {
            let mut input = FindInput::new(&records, &args.fields);
            input.query = args.query();
            let output = dataspot.find(&input, &args.find_options(defaults))?;
            emit(json, &output, || table_display::render_find(&output, &settings))?;
            Some(output.patterns)
        }
        Command::Analyze => {
            let mut input = AnalyzeInput::new(&records, &args.fields);
            input.query = args.query();
            let output = dataspot.analyze(&input, &args.find_options(defaults))?;
            emit(json, &output, || table_display::render_analysis(&output, &settings))?;
            Some(output.patterns)
        }
        Command::Tree => {
            let mut input = TreeInput::new(&records, &args.fields);
            input.query = args.query();
            let output = dataspot.tree(&input, &args.tree_options(defaults))?;
            emit(json, &output, || table_display::render_tree(&output, &settings))?;
            None
        }
        Command::Discover => {
            let input = DiscoverInput {
                data: &records,
                query: args.query(),
            };
            let output = dataspot.discover(&input, &args.discover_options(defaults))?;
            emit(json, &output, || table_display::render_discovery(&output, &settings))?;
            Some(output.top_patterns)
        }
        Command::Compare => {
            let baseline_path = args
                .baseline
                .as_ref()
                .context("compare requires --baseline FILE")?;
            let baseline = load_records(baseline_path)?;
            info!("Loaded {} baseline records from {:?}", baseline.len(), baseline_path);

            let mut input = CompareInput::new(&records, &baseline, &args.fields);
            input.query = args.query();
            let output = dataspot.compare(&input, &args.compare_options(defaults))?;
            emit(json, &output, || table_display::render_comparison(&output, &settings))?;
            None
        }
    };

    if let Some(path) = &args.export {
        let patterns = exported.context("--export is only supported for find, analyze and discover")?;
        let message = DataExporter::export_patterns(&patterns, path)?;
        eprintln!("{}", message.green());
    }
    Ok(())
}

fn emit<T: Serialize>(json: bool, output: &T, render: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        println!("{}", render());
    }
    Ok(())
}
