//! unoutline CLI - PDF title and outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoutline::batch::{find_pdf_files, process_files, BatchStatus};
use unoutline::outline::{AggregatorConfig, RegionDetectorConfig, TitleConfig};
use unoutline::{ExtractOptions, LopdfProvider, OutlineExtractor};

#[derive(Parser)]
#[command(name = "unoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract PDF titles and heading outlines to JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory, writing one JSON file per PDF
    Batch {
        /// Input directory
        #[arg(value_name = "INPUT", default_value = "input")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT", default_value = "output")]
        output: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Extract the outline of one PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Show font statistics and excluded regions of a PDF
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Show version information
    Version,
}

/// Heuristic thresholds exposed on the command line.
#[derive(Args, Clone, Default)]
struct Tuning {
    /// Fraction of the first page searched for a title
    #[arg(long, value_name = "FRACTION")]
    title_band: Option<f32>,

    /// Maximum vertical gap between lines of one heading
    #[arg(long, value_name = "UNITS")]
    max_gap: Option<f32>,

    /// Distance under which excluded regions are merged
    #[arg(long, value_name = "UNITS")]
    merge_margin: Option<f32>,
}

impl Tuning {
    fn options(&self) -> ExtractOptions {
        let mut title = TitleConfig::default();
        if let Some(band) = self.title_band {
            title.top_band = band;
        }

        let mut aggregator = AggregatorConfig::default();
        if let Some(gap) = self.max_gap {
            aggregator.max_gap = gap;
        }

        let mut regions = RegionDetectorConfig::default();
        if let Some(margin) = self.merge_margin {
            regions.merge_margin = margin;
        }

        ExtractOptions::new()
            .with_title(title)
            .with_aggregator(aggregator)
            .with_regions(regions)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Batch {
            input,
            output,
            tuning,
        } => cmd_batch(&input, &output, &tuning),
        Commands::Extract {
            input,
            output,
            compact,
            tuning,
        } => cmd_extract(&input, output.as_deref(), compact, &tuning),
        Commands::Inspect {
            input,
            json,
            tuning,
        } => cmd_inspect(&input, json, &tuning),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(input: &Path, output: &Path, tuning: &Tuning) -> Result<(), Box<dyn std::error::Error>> {
    let files = find_pdf_files(input)?;
    println!(
        "{} {} PDF(s) in {}",
        "Found".cyan(),
        files.len(),
        input.display()
    );

    let options = tuning.options();
    log::debug!("Batch options: {:?}", options);
    let extractor = OutlineExtractor::with_options(options);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = process_files(&files, output, |path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name);
        let result = extractor.extract_path(path);
        pb.inc(1);
        result
    })?;

    pb.finish_with_message("Done!");

    println!();
    for entry in &report.entries {
        let name = entry
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &entry.status {
            BatchStatus::Success { title, headings } => println!(
                "  {} {} ({} headings, title: '{}')",
                "✓".green(),
                name,
                headings,
                title
            ),
            BatchStatus::Failed { reason } => {
                println!("  {} {} ({})", "✗".red(), name, reason.dimmed())
            }
        }
    }

    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Successful".bold(), report.successful.to_string().green());
    println!("{}: {}", "Failed".bold(), report.failed.to_string().red());
    println!("{}: {}", "Total".bold(), report.total());
    println!("{}: {}", "Output".bold(), output.display());

    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = OutlineExtractor::with_options(tuning.options());
    let result = extractor.extract_path(input)?;

    let json = if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_inspect(input: &Path, json: bool, tuning: &Tuning) -> Result<(), Box<dyn std::error::Error>> {
    let provider = LopdfProvider::open(input)?;
    let extractor = OutlineExtractor::with_options(tuning.options());
    let inspection = extractor.inspect(&provider)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("{}", "Document".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), provider.version());
    println!("{}: {}", "Pages".bold(), inspection.page_count);
    println!(
        "{}: {}",
        "Scanned".bold(),
        if inspection.scanned { "Yes" } else { "No" }
    );
    if let Some(ref languages) = inspection.ocr_languages {
        println!("{}: {}", "OCR languages".bold(), languages);
    }

    println!();
    println!("{}", "Font Sizes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (size, count) in &inspection.font_histogram {
        println!("  {:>4}pt  {}", size, count);
    }

    match &inspection.levels {
        Some(levels) => {
            println!("{}: {}pt", "Body size".bold(), levels.body_size);
            for (i, size) in levels.heading_sizes.iter().enumerate() {
                println!("  {} {}pt", format!("H{}", i + 1).green(), size);
            }
        }
        None => println!("{}", "No sized text found".yellow()),
    }

    println!();
    println!("{}", "Excluded Regions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, regions) in inspection.regions.iter().enumerate() {
        if regions.is_empty() {
            continue;
        }
        println!("{} {}", "Page".bold(), i + 1);
        for region in regions {
            let b = region.bbox;
            println!(
                "  {:?} ({:.1}, {:.1}) - ({:.1}, {:.1})",
                region.kind, b.x0, b.y0, b.x1, b.y1
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and outline extraction tool");
    println!();
    println!("License: MIT");
}
