use clap::{Parser, ValueEnum};
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate, ValueCompleter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tocspy")]
#[command(version)]
#[command(about = "Simulate and check a table-of-contents scroll-spy")]
#[command(
    long_about = "tocspy - drive the TOC scroll-spy against a layout file.\n\n\
    A layout describes the viewport, the navigation panel and its links, and the\n\
    position of every heading. tocspy binds the scroll-spy to it, scrolls through\n\
    the requested offsets and reports which link is active after each step.\n\n\
    Examples:\n  \
    tocspy simulate page.toml                 # Scroll through the layout's steps\n  \
    tocspy simulate page.toml --scroll 0,600  # Explicit scroll offsets\n  \
    tocspy simulate page.toml --watch         # Re-bind on every file change\n  \
    tocspy check page.toml                    # Report orphan and duplicate slugs\n  \
    tocspy config                             # Show the effective configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file to use instead of the platform default
    ///
    /// Defaults to ~/.config/tocspy/config.toml (or the platform equivalent).
    /// A missing default file is not an error; a missing explicit file is.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    ///
    /// Overrides RUST_LOG for the tocspy crate.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Bind the scroll-spy to a layout and scroll through it
    ///
    /// Prints the active link and the navigation panel's scroll offset after
    /// every step.
    Simulate {
        /// Layout file (.toml or .json)
        #[arg(add = layout_file_completer())]
        layout: PathBuf,

        /// Comma-separated scroll offsets, overriding the layout's steps
        ///
        /// Example: --scroll 0,250,900
        #[arg(long = "scroll", value_name = "Y,...", value_delimiter = ',')]
        scroll: Option<Vec<f64>>,

        /// Output format
        ///
        ///   plain - One line per step (default)
        ///   json  - Array of step records
        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,

        /// Keep running and re-bind whenever the layout file changes
        ///
        /// Each change is treated like a client-side navigation: the layout is
        /// replaced and the same scroll-spy is initialized again.
        #[arg(long = "watch")]
        watch: bool,
    },

    /// Report links that can never become active
    ///
    /// Lists orphan slugs, duplicate slugs, hrefs that are not anchors and
    /// duplicate heading ids. Exits with status 1 when anything is found.
    Check {
        /// Layout file (.toml or .json)
        #[arg(add = layout_file_completer())]
        layout: PathBuf,

        /// Output format
        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,
    },

    /// Show the effective configuration
    Config {
        /// Print the config file path instead of its contents
        #[arg(long = "path")]
        path: bool,

        /// Write the default configuration to the config path
        #[arg(long = "init", conflicts_with = "path")]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// JSON output
    Json,
}

fn layout_file_completer() -> ArgValueCompleter {
    use std::ffi::OsStr;
    use std::path::Path;

    struct LayoutCompleter;

    impl ValueCompleter for LayoutCompleter {
        fn complete(&self, current: &OsStr) -> Vec<CompletionCandidate> {
            let input_str = current.to_string_lossy();
            let input_path = Path::new(input_str.as_ref());

            let (search_dir, prefix) = if input_str.is_empty() {
                (Path::new("."), String::new())
            } else if input_str.ends_with('/') || input_str.ends_with('\\') {
                (input_path, String::new())
            } else {
                // parent() returns Some("") for bare file names
                let parent = input_path.parent().unwrap_or(Path::new("."));
                let dir = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
                let prefix = input_path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                (dir, prefix)
            };

            let entries = match std::fs::read_dir(search_dir) {
                Ok(entries) => entries,
                Err(_) => return vec![],
            };

            entries
                .filter_map(Result::ok)
                .filter_map(|entry| {
                    let path = entry.path();
                    let file_name = path.file_name()?.to_string_lossy().to_string();

                    if !prefix.is_empty()
                        && !file_name.to_lowercase().starts_with(&prefix.to_lowercase())
                    {
                        return None;
                    }

                    let value = if search_dir == Path::new(".") {
                        file_name
                    } else {
                        search_dir.join(&file_name).to_string_lossy().to_string()
                    };

                    if path.is_dir() {
                        let value = if value.ends_with('/') {
                            value
                        } else {
                            format!("{}/", value)
                        };
                        return Some(CompletionCandidate::new(value).help(Some("directory".into())));
                    }

                    let ext = path.extension()?.to_string_lossy().to_lowercase();
                    (ext == "toml" || ext == "json").then(|| CompletionCandidate::new(value))
                })
                .collect()
        }
    }

    ArgValueCompleter::new(LayoutCompleter)
}
