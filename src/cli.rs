use std::path::PathBuf;

use clap::Parser;

/// Stylesync - keep compiled stylesheets in sync with their sources
#[derive(Parser, Debug)]
#[command(name = "stylesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./stylesync.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep watching source trees after the initial compile
    #[arg(short, long)]
    pub watch: bool,

    /// Output events as NDJSON for CI
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["stylesync", "-w", "-vv", "--config", "build.toml"]).unwrap();
        assert!(cli.watch);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("build.toml")));
    }

    #[test]
    fn defaults_to_one_shot() {
        let cli = Cli::try_parse_from(["stylesync"]).unwrap();
        assert!(!cli.watch);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }
}
