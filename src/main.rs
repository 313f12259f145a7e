//! # tocspy
//!
//! Drive the table-of-contents scroll-spy from the command line.
//!
//! ## Usage
//!
//! Scroll through a layout and print the active link per step:
//! ```sh
//! tocspy simulate page.toml --scroll 0,250,900
//! ```
//!
//! Find links that can never become active:
//! ```sh
//! tocspy check page.toml
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, Command, LayoutWatcher, OutputFormat};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use log::{LevelFilter, info};
use std::path::Path;
use std::process;
use tocspy::sim::{Layout, SimDocument, StepReport};
use tocspy::{Config, ScrollSpyController};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Handle dynamic shell completions
    clap_complete::CompleteEnv::with_factory(|| {
        use clap::CommandFactory;
        Cli::command()
    })
    .complete();

    let args = Cli::parse();
    init_logging(args.verbose);

    // `config --init` must work before the file exists
    let config = match (&args.command, args.config.as_deref()) {
        (Command::Config { init: true, .. }, _) => Config::default(),
        (_, Some(path)) => Config::load_from(path)?,
        (_, None) => Config::load(),
    };

    match args.command {
        Command::Simulate {
            ref layout,
            ref scroll,
            output,
            watch,
        } => simulate(&config, layout, scroll.as_deref(), output, watch),
        Command::Check { ref layout, output } => check(layout, output),
        Command::Config { path, init } => {
            show_config(&config, args.config.as_deref(), path, init)
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    match verbose {
        0 => {}
        1 => {
            builder.filter_module("tocspy", LevelFilter::Debug);
        }
        _ => {
            builder.filter_module("tocspy", LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
}

fn simulate(
    config: &Config,
    layout_path: &Path,
    scroll: Option<&[f64]>,
    output: OutputFormat,
    watch: bool,
) -> Result<()> {
    let layout = Layout::from_path(layout_path)?;
    let doc = SimDocument::new(layout.clone());
    let mut spy = ScrollSpyController::with_config(doc.clone(), &config.spy)
        .wrap_err("invalid scroll-spy configuration")?;

    spy.initialize();
    print_steps(&doc, &layout, scroll, &config.spy.active_class, output)?;

    if !watch {
        return Ok(());
    }

    let mut watcher = LayoutWatcher::new(layout_path)
        .wrap_err_with(|| format!("cannot watch {}", layout_path.display()))?;
    eprintln!("Watching {} for changes (Ctrl+C to stop)", layout_path.display());

    while watcher.wait_for_change() {
        let layout = match Layout::from_path(layout_path) {
            Ok(layout) => layout,
            Err(e) => {
                // Half-written files are common while editing; wait for the next save
                eprintln!("Error reloading layout: {}", e);
                continue;
            }
        };
        info!("layout changed, re-binding scroll-spy");
        doc.replace_layout(layout.clone());
        spy.initialize();
        print_steps(&doc, &layout, scroll, &config.spy.active_class, output)?;
    }

    Ok(())
}

fn print_steps(
    doc: &SimDocument,
    layout: &Layout,
    scroll: Option<&[f64]>,
    active_class: &str,
    output: OutputFormat,
) -> Result<()> {
    let steps = scroll.unwrap_or(&layout.steps);
    let steps: &[f64] = if steps.is_empty() { &[0.0] } else { steps };
    let report = doc.run(steps, active_class);

    match output {
        OutputFormat::Plain => {
            for step in &report {
                println!("{}", format_step(step));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn format_step(step: &StepReport) -> String {
    let active = step.active.first().map(String::as_str).unwrap_or("-");
    format!(
        "y={:<8} active={:<24} nav=({}, {})",
        step.scroll_y, active, step.nav_top, step.nav_left
    )
}

fn check(layout_path: &Path, output: OutputFormat) -> Result<()> {
    let layout = Layout::from_path(layout_path)?;
    let findings = layout.lint();

    match output {
        OutputFormat::Plain => {
            if findings.is_empty() {
                println!(
                    "{}: {} links, {} headings, no problems",
                    layout_path.display(),
                    layout.links.len(),
                    layout.headings.len()
                );
            }
            for finding in &findings {
                println!("{}: {}", layout_path.display(), finding);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&findings)?);
        }
    }

    if !findings.is_empty() {
        process::exit(1);
    }
    Ok(())
}

fn show_config(config: &Config, explicit: Option<&Path>, path: bool, init: bool) -> Result<()> {
    let config_path = explicit
        .map(Path::to_path_buf)
        .or_else(Config::config_path)
        .ok_or_else(|| eyre!("could not determine config directory"))?;

    if path {
        println!("{}", config_path.display());
    } else if init {
        if config_path.exists() {
            eprintln!("{} already exists, leaving it untouched", config_path.display());
            process::exit(1);
        }
        Config::default().save_to(&config_path)?;
        println!("Wrote {}", config_path.display());
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
