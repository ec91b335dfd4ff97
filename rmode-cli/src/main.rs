//! Command-line interface for rmode
//! Tokenizes an R Markdown or R HTML file and prints what the mode controller sees.
//!
//! Usage:
//!   rmode `<path>` [--mode `<mode>`] [--format `<format>`] [--row `<n>`] [--config `<file>`]
//!         [--tab-size `<n>`] [--verbose]
//!
//! Without --config, an `rmode.toml` in the working directory is layered over the
//! defaults when present.

mod formats;

use clap::{value_parser, Arg, ArgAction, Command};
use rmode::modes::ModeKind;
use rmode_config::{Loader, RmodeConfig};
use std::path::Path;
use tracing::Level;

const LOCAL_CONFIG: &str = "rmode.toml";

fn main() {
    let matches = Command::new("rmode")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect multi-language tokenization of R Markdown and R HTML files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the document")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Mode to use: auto (by file extension), rmarkdown or rhtml")
                .default_value("auto"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help(format!("Output format ({})", formats::AVAILABLE_FORMATS.join(", ")))
                .default_value("token-simple"),
        )
        .arg(
            Arg::new("row")
                .long("row")
                .short('r')
                .help("Zero-based row for the indent format (default: every row)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("tab-size")
                .long("tab-size")
                .help("Width of one soft-tab indentation level")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log mode construction and state transitions to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("verbose") {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = load_config(
        matches.get_one::<String>("config"),
        matches.get_one::<usize>("tab-size").copied(),
    );
    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("A document path is required");
        std::process::exit(1);
    };
    let mode = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("auto");
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("token-simple");
    let row = matches.get_one::<usize>("row").copied();

    handle_render_command(path, mode, format, row, &config);
}

fn load_config(path: Option<&String>, tab_size: Option<usize>) -> RmodeConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    let loader = match tab_size {
        Some(size) => loader.set_override("editor.tab_size", size as i64),
        None => Ok(loader),
    };
    loader.and_then(Loader::build).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

/// Pick the mode from the flag, or from the file extension for `auto`
fn resolve_mode(path: &str, mode: &str, config: &RmodeConfig) -> Result<ModeKind, String> {
    if mode != "auto" {
        return mode.parse().map_err(|e| format!("{}", e));
    }
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    ModeKind::from_extension(
        extension,
        &config.modes.markdown_extensions,
        &config.modes.html_extensions,
    )
    .ok_or_else(|| {
        format!(
            "Cannot pick a mode for '{}'; pass --mode rmarkdown or --mode rhtml",
            path
        )
    })
}

/// Handle the render command
fn handle_render_command(
    path: &str,
    mode: &str,
    format: &str,
    row: Option<usize>,
    config: &RmodeConfig,
) {
    let kind = resolve_mode(path, mode, config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        std::process::exit(1);
    });

    let controller = kind.build().unwrap_or_else(|e| {
        eprintln!("Error building mode '{}': {}", kind, e);
        std::process::exit(1);
    });

    let output = formats::render(&controller, &source, format, row, config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    print!("{}", output);
}
