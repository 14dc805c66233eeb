use crate::batch::ExecutionMode;
use crate::constants::DEFAULT_QUALITY;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-compressor",
    about = "Compress every image in a directory tree into JPEG copies",
    long_about = "img-compressor walks an input directory, re-encodes every PNG and JPEG it finds \
                  as a JPEG at the chosen quality, and writes the result to a mirrored tree under \
                  the output directory as compressed_<name>.jpg. Existing outputs are never \
                  overwritten, so re-running a batch only picks up new files.",
    version,
    after_help = "EXAMPLES:\n  \
    img-compressor -i ./photos -o ./compressed\n  \
    img-compressor -i ./photos -o ./compressed -q 80 --keep-originals\n  \
    img-compressor -i ./photos -o ./compressed --sequential -v"
)]
pub struct Args {
    #[arg(short = 'i', long, help = "The directory containing images to compress")]
    pub input_dir: PathBuf,

    #[arg(
        short = 'o',
        long,
        help = "The directory where compressed images will be saved"
    )]
    pub output_dir: PathBuf,

    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
        help = "Compression quality (1-100)",
        long_help = "JPEG quality from 1 (smallest) to 100 (best). Applied to every image in the batch."
    )]
    pub quality: u8,

    #[arg(
        long,
        help = "Keep original files after compression",
        long_help = "If set, original files are left untouched. Otherwise each original is deleted \
                     once its compressed copy has been written successfully."
    )]
    pub keep_originals: bool,

    #[arg(
        short = 'j',
        long,
        help = "Number of parallel threads (default: auto)",
        long_help = "Number of worker threads, at least 1. If not specified, uses number of CPU cores.",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        conflicts_with = "sequential"
    )]
    pub threads: Option<usize>,

    #[arg(long, help = "Process files one at a time on the main thread")]
    pub sequential: bool,

    #[arg(short = 'v', long, help = "Print every file as it is processed")]
    pub verbose: bool,

    #[arg(long, help = "Only print errors", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel {
                threads: self.threads,
            }
        }
    }
}
