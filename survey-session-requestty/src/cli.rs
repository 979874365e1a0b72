//! CLI argument definitions for `take-survey`.

use clap::{Args, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use survey_session_requestty::logging::LogFormat;
use url::Url;

#[derive(Parser)]
#[command(
    name = "take-survey",
    version,
    about = "Answer a survey from the terminal",
    long_about = "Answer a survey from the terminal.\n\n\
                  Start a fresh response with --survey, or resume a recorded\n\
                  response with --slug. Owners can preview unpublished surveys\n\
                  with --preview and a token."
)]
pub struct Cli {
    #[command(flatten)]
    pub target: Target,

    /// Base URL of the survey backend API.
    #[arg(long = "api-url", env = "SURVEY_API_URL", value_name = "URL")]
    pub api_url: Url,

    /// Public address of the survey site, used for the shareable response link.
    #[arg(
        long = "public-url",
        env = "SURVEY_PUBLIC_URL",
        value_name = "URL",
        default_value = "http://localhost:3000/"
    )]
    pub public_url: Url,

    /// Preview the survey as its owner. Nothing is submitted.
    #[arg(long, requires = "token")]
    pub preview: bool,

    /// Owner token used in preview mode.
    #[arg(long, env = "SURVEY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

/// Which survey to open.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Start a fresh response to the survey with this id.
    #[arg(long = "survey", value_name = "ID")]
    pub survey: Option<String>,

    /// Resume the recorded response with this slug.
    #[arg(long = "slug", value_name = "SLUG")]
    pub slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn survey_and_slug_are_exclusive() {
        let result = Cli::try_parse_from([
            "take-survey",
            "--api-url",
            "http://api.test/",
            "--survey",
            "S1",
            "--slug",
            "R9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn slug_parses() {
        let cli = Cli::try_parse_from([
            "take-survey",
            "--api-url",
            "http://api.test/",
            "--slug",
            "R9",
        ])
        .unwrap();
        assert_eq!(cli.target.slug.as_deref(), Some("R9"));
        assert!(cli.target.survey.is_none());
        assert!(!cli.preview);
    }
}
