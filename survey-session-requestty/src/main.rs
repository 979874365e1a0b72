//! `take-survey`: answer a survey from the terminal.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use survey_session::{
    HttpConfig, HttpSurveyApi, LoadRequest, MemoryLocation, Session, SessionConfig,
    SessionContext, StaticCredentials,
};
use survey_session_requestty::logging::{LogConfig, init_logging};
use survey_session_requestty::{RequesttyRenderer, RespondOutcome, respond};
use url::Url;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start runtime: {error}");
            std::process::exit(1);
        }
    };

    let exit_code = match runtime.block_on(run(cli)) {
        Ok(RespondOutcome::Recorded(_) | RespondOutcome::Previewed) => 0,
        Ok(RespondOutcome::Abandoned) => 2,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: cli.log_format,
        with_ansi: io::stderr().is_terminal(),
    }
}

async fn run(cli: Cli) -> Result<RespondOutcome> {
    let request = match (cli.target.survey, cli.target.slug) {
        (Some(survey), _) => LoadRequest::by_id(survey),
        (None, Some(slug)) => LoadRequest::by_slug(slug),
        (None, None) => anyhow::bail!("either --survey or --slug is required"),
    };

    let config = if cli.preview {
        SessionConfig::preview()
    } else {
        SessionConfig::default()
    };

    let location = Arc::new(MemoryLocation::new(initial_location(
        &cli.public_url,
        &request,
        &config,
    )?));
    let api = Arc::new(HttpSurveyApi::new(HttpConfig::new(cli.api_url))?);

    let mut context = SessionContext::new(api, location).with_config(config);
    if let Some(token) = cli.token {
        context = context.with_credentials(Arc::new(StaticCredentials::bearer(token)));
    }

    let session = Session::new(context, request);
    session.load().await?;

    respond(&session, &RequesttyRenderer::new()).await
}

/// The page address a browser would be on when opening `request`.
fn initial_location(
    public_url: &Url,
    request: &LoadRequest,
    config: &SessionConfig,
) -> Result<Url> {
    let path = match request {
        LoadRequest::ById(survey_id) => format!("/survey/{survey_id}"),
        LoadRequest::BySlug(slug) => config.response_address(slug),
    };
    public_url
        .join(&path)
        .with_context(|| format!("Invalid public URL: {public_url}"))
}
