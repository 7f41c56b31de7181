//! pdfregions CLI - page model extraction from PDF layout dumps

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfregions::{
    extract_file_with_options, ContentSource, ExtractOptions, JsonFormat, LayoutDump,
    LayoutQuery, PageSelection, Rect, RegionClusterer, Tolerance,
};

#[derive(Parser)]
#[command(name = "pdfregions")]
#[command(version)]
#[command(about = "Build geometry-aware page models from PDF layout dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit page records as JSON
    Json {
        /// Input layout dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Emit block text, pages separated by blank lines
    Text {
        /// Input layout dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Print the clustered regions of each page
    Regions {
        /// Input layout dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Horizontal tolerance
        #[arg(long, default_value = "0")]
        x_tolerance: f64,

        /// Vertical tolerance
        #[arg(long, default_value = "0")]
        y_tolerance: f64,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Print regions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show layout dump information
    Info {
        /// Input layout dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Flags shared by the extracting subcommands.
#[derive(Args)]
struct ExtractArgs {
    /// Merge neighboring text blocks
    #[arg(long)]
    clustered: bool,

    /// Horizontal clustering tolerance
    #[arg(long, value_name = "PT")]
    x_tolerance: Option<f64>,

    /// Vertical clustering tolerance
    #[arg(long, value_name = "PT")]
    y_tolerance: Option<f64>,

    /// Maximum number of pages to extract
    #[arg(long, default_value_t = pdfregions::DEFAULT_MAX_PAGES, conflicts_with = "all_pages")]
    max_pages: u32,

    /// Extract every page (no page cap)
    #[arg(long)]
    all_pages: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Skip failing pages instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Build pages in parallel
    #[arg(long)]
    parallel: bool,
}

impl ExtractArgs {
    fn to_options(&self) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
        let mut options = ExtractOptions::new()
            .with_clustered_blocks(self.clustered)
            .with_pages(parse_pages(self.pages.as_deref())?)
            .with_max_pages((!self.all_pages).then_some(self.max_pages))
            .with_parallel(self.parallel);
        options.x_tolerance = self.x_tolerance;
        options.y_tolerance = self.y_tolerance;
        if self.lenient {
            options = options.lenient();
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Json {
            input,
            output,
            compact,
            extract,
        } => cmd_json(&input, output.as_deref(), compact, &extract),
        Commands::Text {
            input,
            output,
            extract,
        } => cmd_text(&input, output.as_deref(), &extract),
        Commands::Regions {
            input,
            x_tolerance,
            y_tolerance,
            pages,
            json,
        } => cmd_regions(
            &input,
            Tolerance::new(x_tolerance, y_tolerance),
            pages.as_deref(),
            json,
        ),
        Commands::Info { input } => cmd_info(&input),
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

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn report_failures(doc: &pdfregions::DocumentRecord) {
    for failure in &doc.failures {
        eprintln!(
            "{} page {}: {}",
            "Skipped".yellow(),
            failure.page_number,
            failure.message
        );
    }
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = extract_file_with_options(input, extract.to_options()?)?;
    report_failures(&doc);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pdfregions::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = extract_file_with_options(input, extract.to_options()?)?;
    report_failures(&doc);

    let text = pdfregions::render::to_text(&doc);
    write_output(output, &text)
}

fn cmd_regions(
    input: &Path,
    tolerance: Tolerance,
    pages: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = parse_pages(pages)?;
    ExtractOptions::new()
        .with_x_tolerance(tolerance.dx)
        .with_y_tolerance(tolerance.dy)
        .validate()?;

    let dump = LayoutDump::open(input)?;
    let query = LayoutQuery::default();
    let plan: Vec<u32> = (1..=dump.page_count())
        .filter(|p| selection.includes(*p))
        .collect();

    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages")?
            .progress_chars("#>-"),
    );

    let mut per_page: Vec<(u32, Vec<Rect>)> = Vec::with_capacity(plan.len());
    for page in plan {
        let (width, height) = dump.page_size(page)?;
        let rects: Vec<Rect> = dump
            .layout(page, &query)?
            .iter()
            .filter(|f| f.is_text())
            .map(|f| f.rect)
            .collect();
        log::debug!("Page {}: clustering {} text blocks", page, rects.len());
        let regions = RegionClusterer::new(tolerance)
            .with_clip(Rect::new(0.0, 0.0, width, height))
            .cluster(&rects);
        per_page.push((page, regions));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if json {
        let value: Vec<serde_json::Value> = per_page
            .iter()
            .map(|(page, regions)| serde_json::json!({ "page_number": page, "regions": regions }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (page, regions) in &per_page {
        println!(
            "{} {} ({} regions)",
            "Page".cyan().bold(),
            page,
            regions.len()
        );
        for region in regions {
            println!(
                "  {} [{:.2}, {:.2}, {:.2}, {:.2}]",
                "─".dimmed(),
                region.x0,
                region.y0,
                region.x1,
                region.y1
            );
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let dump = LayoutDump::open(input)?;

    println!("{}", "Layout Dump Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), dump.page_count());

    println!();
    println!("{}", "Page Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (i, page) in dump.pages().iter().enumerate() {
        let text = page.fragments.iter().filter(|f| f.is_text()).count();
        let other = page.fragments.len() - text;
        println!(
            "{} {}: {:.1} x {:.1} pt, {} text blocks, {} other blocks, {} images",
            "Page".bold(),
            i + 1,
            page.width,
            page.height,
            text,
            other,
            page.images.len()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfregions".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Geometry-aware page models from PDF layout dumps");
    println!();
    println!("License: MIT");
}
