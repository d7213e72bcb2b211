use clap::Parser;
use std::path::PathBuf;

use crate::logging::LogTarget;

#[derive(Parser, Debug, Default)]
#[command(name = "collateral")]
#[command(about = "TUI for analysing lien coverage on a property title", long_about = None)]
pub struct Args {
    /// Print the summary of the starting ledger and exit without the TUI
    #[arg(long, env = "COLLATERAL_PRINT")]
    pub print: bool,

    /// Start with an empty ledger instead of the example title
    #[arg(long, env = "COLLATERAL_EMPTY")]
    pub empty: bool,

    /// Write copied summaries to this file instead of the terminal clipboard
    #[arg(long, env = "COLLATERAL_CLIPBOARD_FILE")]
    pub clipboard_file: Option<PathBuf>,

    /// Append logs to this file (filter with COLLATERAL_LOG)
    #[arg(long, env = "COLLATERAL_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn log_target(&self) -> LogTarget<'_> {
        match (&self.log_file, self.print) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Stderr,
            (None, false) => LogTarget::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["collateral"]).unwrap();
        assert!(!args.print);
        assert!(!args.empty);
        assert!(args.clipboard_file.is_none());
        assert!(matches!(args.log_target(), LogTarget::Off));
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "collateral",
            "--print",
            "--empty",
            "--clipboard-file",
            "/tmp/summary.txt",
        ])
        .unwrap();
        assert!(args.print);
        assert!(args.empty);
        assert_eq!(args.clipboard_file, Some(PathBuf::from("/tmp/summary.txt")));
        assert!(matches!(args.log_target(), LogTarget::Stderr));
    }

    #[test]
    fn test_log_file_wins() {
        let args = Args::try_parse_from(["collateral", "--print", "--log-file", "x.log"]).unwrap();
        assert!(matches!(args.log_target(), LogTarget::File(_)));
    }
}
