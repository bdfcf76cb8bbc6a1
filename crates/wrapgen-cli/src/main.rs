use clap::Parser;
use miette::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wrapgen_decl::ParserToolConfig;
use wrapgen_driver::WrapperGenerator;

#[derive(Parser)]
#[command(name = "wrapgen")]
#[command(author, version, about = "Generate pybind11 wrappers for a C++ library")]
struct Cli {
    /// Root directory of the C++ sources to wrap
    source_root: PathBuf,

    /// Where to write the wrappers (default: <SOURCE_ROOT>/wrapgen_wrappers)
    #[arg(short, long)]
    wrapper_root: Option<PathBuf>,

    /// Package info file (default: ./package_info.toml if present)
    #[arg(short, long)]
    package_info: Option<PathBuf>,

    /// Include directories passed to the parser (default: SOURCE_ROOT)
    #[arg(short, long, num_args = 1..)]
    includes: Vec<PathBuf>,

    /// Declaration parser binary (default: searched on PATH)
    #[arg(long)]
    parser: Option<PathBuf>,

    /// Extra compiler flags passed to the parser, e.g. --cflags=-std=c++17
    #[arg(long, allow_hyphen_values = true)]
    cflags: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::new("warn"),
        (false, 1) => EnvFilter::new("info"),
        (false, 2) => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut generator = WrapperGenerator::new(&cli.source_root)?;

    let mut parser = ParserToolConfig::new();
    if let Some(tool) = &cli.parser {
        parser = parser.tool(tool);
    }
    if cli.includes.is_empty() {
        parser = parser.include_dir(generator.source_root());
    }
    for include in &cli.includes {
        parser = parser.include_dir(include);
    }
    for flag in &cli.cflags {
        parser = parser.cflag(flag.as_str());
    }
    tracing::debug!("Parser configuration: {:?}", parser);
    generator = generator.parser(parser);

    if let Some(wrapper_root) = &cli.wrapper_root {
        generator = generator.wrapper_root(wrapper_root);
    }
    if let Some(package_info) = &cli.package_info {
        generator = generator.package_info(package_info);
    }

    let summary = generator.generate()?;
    println!(
        "Wrapped {} classes into {} files ({} unknown classes)",
        summary.classes,
        summary.files.len(),
        summary.unknown_classes
    );
    Ok(())
}
