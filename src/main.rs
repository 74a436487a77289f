use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use qtdl::cli::{Cli, OutputFormat};
use qtdl::config::ConfigManager;
use qtdl::discovery::{Constraints, Outcome, Resolver};
use qtdl::error::{QtdlError, QtdlResult};
use qtdl::install::{self, Installer};
use qtdl::remote::HttpFetcher;
use qtdl::ui::{self, UiContext};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // First Ctrl-C asks the download loop to stop; a second one hard-exits.
    let handler = ctrlc::set_handler(|| {
        if install::interrupted() {
            std::process::exit(130);
        }
        install::request_interrupt();
    });
    if let Err(e) = handler {
        tracing::warn!("Failed to install Ctrl-C handler: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let QtdlError::NotFound {
                level,
                alternatives,
                ..
            } = &e
            {
                if !alternatives.is_empty() {
                    eprintln!(
                        "{} {}",
                        style(format!("Available {level}s:")).yellow(),
                        alternatives.join(", ")
                    );
                }
            } else if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "qtdl=warn",
        1 => "qtdl=info",
        _ => "qtdl=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> QtdlResult<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = manager.load()?;
    if let Some(url) = &cli.base_url {
        config.remote.base_url = url.clone();
    }
    if let Some(output) = &cli.output {
        config.install.output_dir = output.clone();
    }

    let timeout = Duration::from_secs(config.remote.timeout_secs);
    let constraints = Constraints::parse(&cli.os, &cli.target, &cli.version, &cli.toolchain);

    let mut resolver = Resolver::new(HttpFetcher::new(timeout), config.remote.base_url.clone());
    let resolution = resolver.discover(&constraints, cli.all)?;

    match resolution.outcome {
        Outcome::Partial(level) => {
            match cli.format {
                OutputFormat::Json => {
                    let rendered = serde_json::to_string_pretty(&resolution.tree)
                        .map_err(|e| QtdlError::Internal(e.to_string()))?;
                    println!("{rendered}");
                }
                OutputFormat::Text if cli.all => print!("{}", ui::render_tree(&resolution.tree)),
                OutputFormat::Text => println!("{}", ui::render_level(&resolution.tree, level)),
            }
            Ok(())
        }
        Outcome::Resolved(selection) => {
            let ctx = UiContext::detect();
            ui::key_value(&ctx, "OS", &selection.os_alias);
            ui::key_value(&ctx, "Target", &selection.target);
            ui::key_value(&ctx, "Version", &selection.version.to_string());
            ui::key_value(&ctx, "Toolchain", &selection.toolchain);

            let fetcher = HttpFetcher::new(timeout);
            let installer = Installer::new(&fetcher, &config, &ctx);
            installer.install(&selection, &cli.modules)?;

            ui::step_ok(
                &ctx,
                &format!(
                    "Qt {} installed to {}",
                    selection.version,
                    config.install.output_dir.display()
                ),
            );
            Ok(())
        }
    }
}
