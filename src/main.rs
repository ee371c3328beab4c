use clap::{Parser, Subcommand, ValueEnum};
use qsar_report::{ReportConfig, ReportError, view};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Create, validate and render QMRF and QPRF reports.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file selecting templates and schema
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blank report
    New {
        #[arg(value_enum)]
        kind: ReportKind,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a QMRF document against the schema
    Validate { file: PathBuf },
    /// Render a QMRF (.xml) or QPRF (.json) report to HTML
    Html {
        file: PathBuf,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportKind {
    Qmrf,
    Qprf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, ReportError> {
    let config = match &args.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::new(),
    };

    match args.command {
        Command::New { kind, output } => {
            let today = chrono::Local::now();
            let text = match kind {
                ReportKind::Qmrf => {
                    let mut report = config.qmrf_report()?;
                    report.set_value("qmrf_date", &today.format("%d %B %Y").to_string())?;
                    report.to_xml()?
                }
                ReportKind::Qprf => {
                    let mut report = config.qprf_report()?;
                    report.set_date(&today.format("%Y/%m/%d").to_string());
                    report.pretty_json()?
                }
            };
            write_output(output.as_deref(), &text)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { file } => {
            let report = config.open_qmrf(&file)?;
            let problems = report.validate();
            if problems.is_empty() {
                println!("{}: valid", file.display());
                return Ok(ExitCode::SUCCESS);
            }
            for problem in &problems {
                println!("{}: {problem}", file.display());
            }
            log::info!("{} problems in {}", problems.len(), file.display());
            Ok(ExitCode::FAILURE)
        }
        Command::Html { file, output } => {
            let extension = file.extension().and_then(|s| s.to_str()).unwrap_or("");
            let html = match extension {
                "xml" => {
                    let report = config.open_qmrf(&file)?;
                    view::qmrf_html(&report, &config.qmrf_html_template()?)?
                }
                "json" => config.open_qprf(&file)?.to_html()?,
                _ => return Err(ReportError::UnknownFormat(file.display().to_string())),
            };
            write_output(output.as_deref(), &html)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), ReportError> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
