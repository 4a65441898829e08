use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process;

// Import from typograf-core
use typograf_core::{DocumentFormatter, FormatConfig, RunReport};

// Import CLI utilities
use typograf::derive_output_path;

#[derive(Parser)]
#[command(name = "typograf")]
#[command(about = "Bring a Word document to canonical Russian typographic form")]
struct Args {
    /// Path to the .docx file to format
    input: PathBuf,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output file path (default: <input>_formatted.docx next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Print a per-stage timing summary after the run
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🦀 Typograf Document Formatter");

    let is_docx = args
        .input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false);
    if !is_docx {
        eprintln!("⚠️  Input must be a .docx file: {}", args.input.display());
        process::exit(1);
    }

    let config = FormatConfig::load_with_fallback(args.config.as_deref());
    print_plan(&config);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&args.input));

    let formatter = DocumentFormatter::new(config);
    match formatter.format_file(&args.input, &output) {
        Ok(report) => {
            if args.profile {
                print_profile(&report);
            }
            if let Some(path) = &args.report_json {
                std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
                println!("📊 Run report written to: {}", path.display());
            }
            println!("🎉 Done in {}ms", report.total_elapsed_ms());
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {err}");
            process::exit(1);
        }
    }
}

fn print_plan(config: &FormatConfig) {
    println!("Steps:");
    println!(
        "  1. Page margins: top/bottom {:.1} cm, left/right {:.1} cm",
        config.margins.top_cm, config.margins.left_cm
    );
    println!("  2. Formatting reset (bold emphasis preserved)");
    println!(
        "  3. Uniform style: {}, {:.0} pt, line spacing {:.1}",
        config.baseline.font_name, config.baseline.font_size_pt, config.baseline.line_spacing
    );
    println!("  4. Justified paragraph alignment");
    println!("  5. Whitespace cleanup (special spaces, double spaces)");
    println!("  6. Quotes converted to « »");
    println!("  7. Dates canonicalized to \"12 марта 2024 г.\"");
    println!("  8. Decimal separator: dot to comma");
    println!("  9. Space before the percent sign");
    println!(" 10. \"станица\" abbreviated to \"ст-ца\"");
    println!(" 11. Thousands grouped with spaces");
    println!(" 12. Numbers bolded (dates, years and case numbers excluded)");
}

fn print_profile(report: &RunReport) {
    println!("\n📊 Performance Summary:");
    for stage in &report.stages {
        println!(
            "   {:.<25} {}ms ({} blocks changed)",
            stage.stage, stage.elapsed_ms, stage.blocks_changed
        );
    }
    println!("   {:.<25} {}ms", "Total", report.total_elapsed_ms());
}
