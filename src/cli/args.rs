use std::{ffi::OsString, path::PathBuf};

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::cli::color_when::ColorWhen;

/// Replay a recorded collaboration session against an in-memory editor and
/// print what would be sent back to the remote session
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(index = 1)]
    pub config_path: Option<OsString>,

    /// YAML file with the remote messages and editor actions to replay
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[arg(
            long,
            value_name = "WHEN",
            default_value_t = ColorWhen::Auto,
            default_missing_value = "always",
            value_enum
        )]
    pub color: ColorWhen,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_arguments_are_consistent() { Args::command().debug_assert(); }

    #[test]
    fn test_parse() {
        let args = Args::parse_from(["buffer-sync", "custom.yml", "--script", "session.yml", "-v"]);

        assert_eq!(args.config_path, Some(OsString::from("custom.yml")));
        assert_eq!(args.script, PathBuf::from("session.yml"));
        assert_eq!(args.color, ColorWhen::Auto);
        assert_eq!(args.verbose.log_level_filter(), log::LevelFilter::Debug);
    }
}
