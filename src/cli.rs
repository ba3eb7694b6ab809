use std::path::PathBuf;

use assetry::config::CONFIG_FILE;
use assetry::Variant;
use clap::{Parser, Subcommand, ValueEnum};

/// Assetry - multi-application front-end asset build orchestrator
#[derive(Parser, Debug)]
#[command(name = "assetry")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'assetry' without a command to build the concat variant.")]
pub struct Cli {
    /// Output format for CI (NDJSON events)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Output directory for the concat and dist variants
    #[arg(long, global = true, env = "ASSETRY_DEST")]
    pub dest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Delete every configured output directory
    Clean,

    /// Build one variant, or the dev+debug+e2e+concat aggregate
    Build {
        /// Variant to build
        #[arg(value_enum, default_value_t = BuildTarget::All)]
        variant: BuildTarget,

        /// Only build this application
        app: Option<String>,
    },

    /// Concatenated, minified and fingerprinted distribution builds
    Dist {
        /// Only build this application
        app: Option<String>,
    },

    /// Build, then rebuild on every change under the source root
    Watch {
        /// Variant to rebuild
        #[arg(value_enum, default_value_t = BuildTarget::All)]
        variant: BuildTarget,
    },

    /// List the (application, variant) task table
    Tasks,
}

/// Variant selection accepted by `build` and `watch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildTarget {
    Dev,
    Debug,
    E2e,
    Concat,
    All,
}

impl BuildTarget {
    pub fn variants(self) -> Vec<Variant> {
        match self {
            BuildTarget::Dev => vec![Variant::Development],
            BuildTarget::Debug => vec![Variant::Debug],
            BuildTarget::E2e => vec![Variant::EndToEnd],
            BuildTarget::Concat => vec![Variant::Concatenated],
            BuildTarget::All => Variant::BUILD.to_vec(),
        }
    }
}

impl Cli {
    /// The command to run; `build concat` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Build {
            variant: BuildTarget::Concat,
            app: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("assetry").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_command_builds_concat() {
        let cli = parse(&[]);
        assert_eq!(cli.command, None);
        assert_eq!(
            cli.command(),
            Commands::Build {
                variant: BuildTarget::Concat,
                app: None
            }
        );
        assert_eq!(cli.config, PathBuf::from("assetry.toml"));
    }

    #[test]
    fn build_defaults_to_aggregate() {
        let cli = parse(&["build"]);
        assert_eq!(
            cli.command(),
            Commands::Build {
                variant: BuildTarget::All,
                app: None
            }
        );
        assert_eq!(BuildTarget::All.variants(), Variant::BUILD.to_vec());
    }

    #[test]
    fn build_variant_and_app() {
        let cli = parse(&["build", "debug", "beta"]);
        assert_eq!(
            cli.command(),
            Commands::Build {
                variant: BuildTarget::Debug,
                app: Some("beta".to_string())
            }
        );
    }

    #[test]
    fn global_flags_after_command() {
        let cli = parse(&["dist", "alpha", "--json", "-vv", "--dest", "/srv/www"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.dest, Some(PathBuf::from("/srv/www")));
        assert_eq!(
            cli.command(),
            Commands::Dist {
                app: Some("alpha".to_string())
            }
        );
    }

    #[test]
    fn dist_is_not_a_build_variant() {
        let err = Cli::try_parse_from(["assetry", "build", "dist"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn watch_variant() {
        let cli = parse(&["watch", "e2e"]);
        assert_eq!(
            cli.command(),
            Commands::Watch {
                variant: BuildTarget::E2e
            }
        );
        assert_eq!(BuildTarget::E2e.variants(), vec![Variant::EndToEnd]);
    }
}
