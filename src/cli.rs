use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "unarc")]
#[command(version)]
#[command(about = "Extract AFS/DAR/GMP game-asset containers", long_about = None)]
#[command(after_help = "Examples:\n  \
  unarc stage.afs                extract every entry of stage.afs\n  \
  unarc -i voices.dar            print the descriptor table and exit\n  \
  unarc -d out -e 3 -b 1 map.gmp extract entry 3 (1-based) of map.gmp into out/")]
pub struct Cli {
    /// Container file (AFS, DAR or GMP)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print container info and exit
    #[arg(short = 'i', long)]
    pub info: bool,

    /// Extract only these entry indices (default: all)
    #[arg(short = 'e', long = "entry", value_name = "INDEX", num_args = 1..)]
    pub entries: Vec<i64>,

    /// Index base for --entry (e.g. 1 when quoting a 1-based listing)
    #[arg(short = 'b', long = "base", value_name = "N", default_value_t = 0)]
    pub base: i64,

    /// Extract files into DIR (default: per-format naming policy)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Force the container format: afs, dar or gmp
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Prefix output names with the 8-hex-digit data offset
    #[arg(long, overrides_with = "no_prefix")]
    pub prefix: bool,

    /// Never prefix output names with the data offset
    #[arg(long = "no-prefix")]
    pub no_prefix: bool,

    /// Per-entry status lines
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Quiet mode (suppress the extraction summary)
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Offset-prefix override from the flags, if either was given.
    pub fn prefix_override(&self) -> Option<bool> {
        if self.prefix {
            Some(true)
        } else if self.no_prefix {
            Some(false)
        } else {
            None
        }
    }
}
