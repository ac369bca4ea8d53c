use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use jdoc_config::{init_tracing, JdocConfig, OutputFormat};
use jdoc_javadoc::{parse_class_page, ConstantTable};
use jdoc_model::ClassRegistry;
use jdoc_workspace::{output_for, Extractor, ModelOutput, SummaryOutput};

#[derive(Parser)]
#[command(name = "jdoc", version, about = "Extract a Java API model from javadoc HTML pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract and merge the model of every documentation root
    Extract(ExtractArgs),
    /// Parse a single class page and print its model
    Parse(ParseArgs),
    /// Parse a constants page and print its values
    Constants(ConstantsArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Documentation roots, in merge order (replaces `doc_roots` from the config)
    roots: Vec<PathBuf>,
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format: json or summary
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Write the model here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Parser threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,
    /// Only print this class (simple or fully qualified name)
    #[arg(long)]
    class: Option<String>,
    /// Print the run report as JSON on stderr
    #[arg(long)]
    report_json: bool,
}

#[derive(Args)]
struct ParseArgs {
    /// Class page to parse
    file: PathBuf,
    /// Emit JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConstantsArgs {
    /// Constants page to parse
    file: PathBuf,
    /// Emit JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Extract(args) => extract(args),
        Command::Parse(args) => {
            let html = read_page(&args.file)?;
            let proto = match parse_class_page(&html) {
                Ok(proto) => proto,
                Err(err) => {
                    eprintln!("{}: {err}", args.file.display());
                    return Ok(1);
                }
            };
            let model = proto.freeze(Some(args.file.clone()));
            let mut stdout = io::stdout().lock();
            if args.json {
                serde_json::to_writer_pretty(&mut stdout, &model)?;
                writeln!(stdout)?;
            } else {
                let registry: ClassRegistry = [model].into_iter().collect();
                SummaryOutput.write(&registry, &mut stdout)?;
            }
            Ok(0)
        }
        Command::Constants(args) => {
            let html = read_page(&args.file)?;
            let table = match ConstantTable::parse(&html) {
                Ok(table) => table,
                Err(err) => {
                    eprintln!("{}: {err}", args.file.display());
                    return Ok(1);
                }
            };
            let mut stdout = io::stdout().lock();
            if args.json {
                serde_json::to_writer_pretty(&mut stdout, &table)?;
                writeln!(stdout)?;
            } else {
                for (class, values) in table.iter() {
                    for (name, value) in values {
                        writeln!(stdout, "{class}.{name} = {value}")?;
                    }
                }
            }
            Ok(0)
        }
    }
}

fn extract(args: ExtractArgs) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => JdocConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => JdocConfig::default(),
    };
    if !args.roots.is_empty() {
        config.doc_roots = args.roots.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(out) = &args.out {
        config.output.path = Some(out.clone());
    }
    if let Some(threads) = args.threads {
        config.extraction.threads = threads;
    }

    init_tracing(&config.logging);
    let diagnostics = config.validate();
    for warning in &diagnostics.warnings {
        tracing::warn!(target: "jdoc.config", "{warning}");
    }
    if !diagnostics.is_ok() {
        let errors: Vec<String> = diagnostics.errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration: {}", errors.join("; "));
    }

    let extraction = Extractor::new(config.clone()).run()?;
    let registry = match &args.class {
        Some(name) => select_class(&extraction.registry, name)?,
        None => extraction.registry,
    };

    let output = output_for(config.output.format);
    match &config.output.path {
        Some(path) => write_to_file(output.as_ref(), &registry, path)?,
        None => {
            let mut stdout = io::stdout().lock();
            output.write(&registry, &mut stdout)?;
        }
    }

    let report = &extraction.report;
    if args.report_json {
        eprintln!("{}", serde_json::to_string_pretty(report)?);
    } else {
        eprint!("{report}");
    }
    Ok(if report.has_errors() { 1 } else { 0 })
}

fn select_class(registry: &ClassRegistry, name: &str) -> Result<ClassRegistry> {
    let Some(full_name) = registry.resolve_simple_name(name) else {
        bail!("no single class named {name}");
    };
    Ok(registry.get(full_name).cloned().into_iter().collect())
}

fn write_to_file(output: &dyn ModelOutput, registry: &ClassRegistry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    output.write(registry, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn read_page(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
