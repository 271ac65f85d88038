use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mcquiz",
    version,
    about = "Generate a multiple-choice quiz from a PDF and take it in the terminal"
)]
pub struct Cli {
    /// PDF to upload and quiz yourself on
    #[arg(required_unless_present = "stats")]
    pub file: Option<PathBuf>,

    /// Quiz server base URL [default: http://127.0.0.1:8000]
    #[arg(long, value_name = "url")]
    pub server: Option<String>,

    /// Config file [default: <config dir>/mcquiz/config.yaml]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Report each answer to the server under this user id
    #[arg(long, value_name = "id")]
    pub user: Option<String>,

    /// Write the scored report to this file once the quiz is scored
    #[arg(long, value_name = "path")]
    pub export: Option<PathBuf>,

    /// Print answer statistics for the configured user and exit
    #[arg(long)]
    pub stats: bool,

    /// Request timeout in seconds for upload and reporting
    #[arg(long, value_name = "secs")]
    pub timeout: Option<u64>,

    /// Log file [default: <data dir>/mcquiz/mcquiz.log]
    #[arg(long, value_name = "path")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_required_without_stats() {
        assert!(Cli::try_parse_from(["mcquiz"]).is_err());
        assert!(Cli::try_parse_from(["mcquiz", "--stats", "--user", "u1"]).is_ok());
    }

    #[test]
    fn test_export_path() {
        let cli = Cli::try_parse_from(["mcquiz", "notes.pdf", "--export", "out.yaml"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out.yaml")));
        assert_eq!(cli.file, Some(PathBuf::from("notes.pdf")));
    }
}
