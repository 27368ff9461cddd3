mod config;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use scalpel::{ParseError, ParserOptions, Summary};
use scalpel_export::{Exporter, OutputKind, Strategy};

use crate::config::Config;

const SUBCOMMANDS: &[&str] = &["extract", "check", "show", "test", "help"];
/// Flags that take a separate value, for locating the first positional argument.
const VALUE_FLAGS: &[&str] = &[
    "--log-level",
    "--config",
    "-s",
    "--strategy",
    "-o",
    "--output-path",
    "-t",
    "--output-types",
];

#[derive(Parser)]
#[command(
    name = "scalpel",
    version,
    about = "Extract annotated code blocks from Markdown documents"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Configuration file (defaults to ./scalpel.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract sequences and files into an output directory
    Extract(ExtractArgs),

    /// Parse documents and report errors without writing anything
    Check(CheckArgs),

    /// Print what a document yields
    Show(ShowArgs),

    /// Run .test.md fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Markdown documents to process, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Layout for sequences: full or blocks
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Base directory; output goes to <PATH>/scalpel_output
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Outputs to produce: text, json (repeat the flag or separate with commas)
    #[arg(short = 't', long, value_delimiter = ',')]
    output_types: Vec<OutputKind>,

    /// Also print the summary report to stdout
    #[arg(long)]
    print: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Markdown documents to check
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Markdown document to inspect
    file: PathBuf,

    /// Print only the flattened script of this sequence
    #[arg(short, long, conflicts_with = "json")]
    sequence: Option<String>,

    /// Print sequences and files as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or a directory containing them
    path: PathBuf,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "extract" so `scalpel doc.md` works like
    // `scalpel extract doc.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = first_positional(&args) {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "extract".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    };

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let mut reporter = Reporter::new(color_choice, config.parser_options());

    let exit_code = match cli.command {
        Command::Extract(args) => run_or_report(do_extract(&mut reporter, &config, args)),
        Command::Check(args) => do_check(&mut reporter, args),
        Command::Show(args) => run_or_report(do_show(&mut reporter, args)),
        Command::Test(args) => test_runner::run_tests(&args.path, cli.no_color),
    };
    process::exit(exit_code);
}

/// Index of the first argument that is neither a flag nor a flag's value.
fn first_positional(args: &[String]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if VALUE_FLAGS.contains(&arg) {
            i += 2;
        } else if arg.starts_with('-') {
            i += 1;
        } else {
            return Some(i);
        }
    }
    None
}

/// Outcome of a command that can fail after reporting its own diagnostics.
enum Outcome {
    Done,
    /// A parse error was already rendered to stderr.
    Reported,
}

fn run_or_report(result: Result<Outcome>) -> i32 {
    match result {
        Ok(Outcome::Done) => 0,
        Ok(Outcome::Reported) => 1,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}

/// Reads documents into a codespan file database, parses them, and renders
/// parse errors as diagnostics.
struct Reporter {
    files: SimpleFiles<String, String>,
    color_choice: ColorChoice,
    options: ParserOptions,
}

impl Reporter {
    fn new(color_choice: ColorChoice, options: ParserOptions) -> Self {
        Reporter {
            files: SimpleFiles::new(),
            color_choice,
            options,
        }
    }

    /// Parse one document. `Ok(None)` means a parse error was reported.
    fn parse(&mut self, path: &Path) -> Result<Option<Summary>> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        let file_id = self.files.add(path.display().to_string(), source.clone());

        let parser = scalpel::Parser::new(source, file_id).with_options(self.options.clone());
        match parser.parse() {
            Ok(summary) => Ok(Some(summary)),
            Err(error) => {
                self.emit(&error);
                Ok(None)
            }
        }
    }

    fn emit(&self, error: &ParseError) {
        let writer = StandardStream::stderr(self.color_choice);
        let config = term::Config::default();
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &self.files, &diagnostic);
    }
}

fn do_extract(reporter: &mut Reporter, config: &Config, args: ExtractArgs) -> Result<Outcome> {
    let strategy = args.strategy.unwrap_or(config.output.strategy);
    let base = args
        .output_path
        .unwrap_or_else(|| config.output.path.clone());
    let output_types = if args.output_types.is_empty() {
        config.output.types.clone()
    } else {
        args.output_types
    };
    let exporter = Exporter::new(&base, strategy);

    for file in &args.files {
        let Some(summary) = reporter.parse(file)? else {
            return Ok(Outcome::Reported);
        };
        log::info!(
            "{}: {} sequence(s), {} file(s)",
            file.display(),
            summary.sequences().len(),
            summary.files().len()
        );

        if args.print {
            print!("{}", summary);
        }
        if output_types.contains(&OutputKind::Text) {
            exporter.write_text(&summary).with_context(|| {
                format!("exporting '{}' ({} strategy)", file.display(), strategy)
            })?;
        }
        if output_types.contains(&OutputKind::Json) {
            exporter
                .write_json(&summary)
                .with_context(|| format!("exporting '{}' as JSON", file.display()))?;
        }
    }

    eprintln!(
        "ok: extracted {} document(s) into {}",
        args.files.len(),
        exporter.root().display()
    );
    Ok(Outcome::Done)
}

fn do_check(reporter: &mut Reporter, args: CheckArgs) -> i32 {
    let mut failed = false;
    for file in &args.files {
        match reporter.parse(file) {
            Ok(Some(_)) => eprintln!("ok: {} parsed successfully", file.display()),
            Ok(None) => failed = true,
            Err(e) => {
                eprintln!("error: {:#}", e);
                failed = true;
            }
        }
    }
    if failed { 1 } else { 0 }
}

fn do_show(reporter: &mut Reporter, args: ShowArgs) -> Result<Outcome> {
    let Some(summary) = reporter.parse(&args.file)? else {
        return Ok(Outcome::Reported);
    };

    if let Some(name) = &args.sequence {
        print!("{}", summary.full_sequence(name)?);
    } else if args.json {
        println!("{:#}", summary.to_dict());
    } else {
        print!("{}", summary);
    }
    Ok(Outcome::Done)
}
