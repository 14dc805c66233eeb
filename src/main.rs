use anyhow::{Context, Result};
use clap::Parser;
use img_compressor::cli::Args;
use img_compressor::progress::ConsoleReporter;
use img_compressor::utils::format_file_size;
use img_compressor::{BatchConfig, BatchOrchestrator, BatchResult, Logger};

fn main() -> Result<()> {
    let args = Args::parse();
    let logger = Logger::from_flags(args.quiet, args.verbose);

    logger.plain("🚀 Starting batch compression...");
    logger.plain(format!("📁 Input: {}", args.input_dir.display()));
    logger.plain(format!("📁 Output: {}", args.output_dir.display()));

    let config = BatchConfig::new(
        &args.input_dir,
        &args.output_dir,
        args.quality,
        args.keep_originals,
    )?
    .with_execution(args.execution_mode());

    let orchestrator = BatchOrchestrator::new(config, logger);
    let mut reporter = ConsoleReporter::new(logger);
    let result = orchestrator
        .run(&mut reporter)
        .with_context(|| format!("Batch compression of {} failed", args.input_dir.display()))?;

    print_summary(&logger, &result);
    Ok(())
}

fn print_summary(logger: &Logger, result: &BatchResult) {
    if result.total() == 0 {
        logger.warn("No image files found in the input directory");
        return;
    }

    logger.plain("\n📊 Batch Compression Summary:");
    logger.plain(format!("  📁 Files compressed: {}", result.processed.len()));
    if result.skipped > 0 {
        logger.plain(format!("  ⏭️  Files skipped: {}", result.skipped));
    }
    logger.plain(format!(
        "  📊 Total original size: {}",
        format_file_size(result.original_bytes)
    ));
    logger.plain(format!(
        "  📊 Total compressed size: {}",
        format_file_size(result.compressed_bytes)
    ));
    logger.plain(format!(
        "  🎯 Overall compression ratio: {:.1}%",
        result.compression_ratio()
    ));
    logger.plain(format!("  ⏱️  Total time: {:.2?}", result.elapsed));
    logger.plain(format!(
        "  ⚡ Average speed: {:.2} files/second",
        result.files_per_second()
    ));

    if result.failed > 0 {
        logger.warn(format!("Failed files: {}", result.failed));
    }
}
