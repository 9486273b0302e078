use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    HttpQuestionBank, SessionLauncher, TutorApiConfig, TutorClient, WallClock,
};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    launcher: Arc<SessionLauncher>,
}

impl UiApp for DesktopApp {
    fn launcher(&self) -> Arc<SessionLauncher> {
        Arc::clone(&self.launcher)
    }
}

struct Args {
    api_config: TutorApiConfig,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <base_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://localhost:8000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_API_BASE_URL, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    let config = TutorApiConfig::new(&value)
                        .map_err(|_| ArgsError::InvalidApiUrl { raw: value })?;
                    api_config = Some(config);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let api_config = match api_config {
            Some(config) => config,
            None => TutorApiConfig::from_env().map_err(|err| ArgsError::InvalidApiUrl {
                raw: err.to_string(),
            })?,
        };

        Ok(Self { api_config })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing::info!(base_url = %parsed.api_config.base_url, "starting tutor client");

    // The evaluator and the question bank live behind the same server in the
    // default deployment, so one base URL configures both.
    let base_url = parsed.api_config.base_url.clone();
    let client = Arc::new(TutorClient::new(parsed.api_config));
    let bank = Arc::new(HttpQuestionBank::new(base_url));
    let launcher = Arc::new(SessionLauncher::new(
        WallClock::default_clock(),
        client,
        bank,
    ));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { launcher });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("SQL Tutor")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
