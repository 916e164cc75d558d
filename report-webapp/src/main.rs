//! Terminal driver for the report mini-app
//!
//! Loads the page with an in-memory form, fills it from the command line and
//! presses whichever submit control the bootstrap activated.

use clap::Parser;
use report_webapp::ui::{LogSurface, MemoryPage};
use report_webapp::{
    FsLoader, InitDataHost, ReqwestTransport, SelectedFile, StatusEntry, StatusReporter, UiEvent,
    Verbosity, WebApp, WebAppConfig,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "report-webapp", about = "Submit an incident report as a Telegram mini-app would")]
struct Args {
    /// Telegram launch init data (`user=...&auth_date=...&hash=...`)
    #[arg(long, env = "TELEGRAM_INIT_DATA")]
    init_data: Option<String>,

    /// Report endpoint; overrides REPORT_ENDPOINT_URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Form field as NAME=VALUE; repeatable
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Image to attach
    #[arg(long)]
    image: Option<PathBuf>,

    /// Show request diagnostics in the status log
    #[arg(long)]
    verbose: bool,

    /// Tag prefixed to status messages
    #[arg(long)]
    script_version: Option<String>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", raw))?;
    if name.trim().is_empty() {
        return Err(format!("empty field name in `{}`", raw));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

/// Prints each new status entry as it is reported
struct TerminalLog;

impl LogSurface for TerminalLog {
    fn render(&self, entries: &[StatusEntry]) {
        if let Some(latest) = entries.first() {
            println!("{}", latest.render());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables first so .env RUST_LOG is available to tracing
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the report was accepted
async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = WebAppConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }
    if args.verbose {
        config.verbosity = Verbosity::Verbose;
    }
    if args.script_version.is_some() {
        config.script_version = args.script_version;
    }

    let page = MemoryPage::complete();
    if let Some(form) = page.memory_form() {
        for (name, value) in &args.fields {
            form.set_field(name, value);
        }
    }

    let reporter = StatusReporter::new(Some(Box::new(TerminalLog)))
        .with_script_version(config.script_version.as_deref());
    let transport = ReqwestTransport::new(config.request_timeout)?;
    let host = InitDataHost::new(args.init_data);

    let app = WebApp::launch(config, host, page, reporter, transport, FsLoader);
    if let Some(text) = app.page().user_info_text().filter(|t| !t.is_empty()) {
        println!("{}", text);
    }

    if let Some(image) = args.image {
        app.handle(UiEvent::AttachmentChanged(Some(SelectedFile::from_path(image))))
            .await;
    }

    let handled = app.handle(app.submit_event()).await;
    Ok(matches!(handled.submission, Some(Ok(_))))
}
