use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use shm_meta::{generate, AstMode, GeneratorConfig, MetaError, RenderOptions, Warning};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("shm-meta")
        .about("Generate shm_migrate struct metadata from a C++ header")
        .arg(
            Arg::new("input")
                .long("input")
                .help("Input header containing structs")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("Output generated header")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("clang")
                .long("clang")
                .help("Clang binary path")
                .env("SHM_META_CLANG")
                .default_value(shm_meta::config::DEFAULT_CLANG),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .help("AST dump format to read")
                .value_parser(clap::value_parser!(AstMode))
                .default_value("auto"),
        )
        .arg(
            Arg::new("ast-file")
                .long("ast-file")
                .help("Read a pre-dumped AST instead of running clang")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("support-header")
                .long("support-header")
                .help("Header providing StructMeta and the field macros")
                .default_value(shm_meta::config::DEFAULT_SUPPORT_HEADER),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .help("Namespace for the generated specializations")
                .default_value(shm_meta::config::DEFAULT_NAMESPACE),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more (repeat for debug output)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("clang-args")
                .long("clang-args")
                .help("Extra args passed to clang (give last)")
                .num_args(1..)
                .action(ArgAction::Append)
                .allow_hyphen_values(true),
        )
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_from_matches(matches: &clap::ArgMatches) -> Result<GeneratorConfig> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing --input")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .context("missing --output")?;

    let mut config = GeneratorConfig::new(input, output)
        .with_mode(matches.get_one::<AstMode>("mode").copied().unwrap_or_default())
        .with_render_options(RenderOptions {
            support_header: matches
                .get_one::<String>("support-header")
                .cloned()
                .unwrap_or_default(),
            namespace: matches
                .get_one::<String>("namespace")
                .cloned()
                .unwrap_or_default(),
        });
    if let Some(clang) = matches.get_one::<String>("clang") {
        config = config.with_clang(clang.clone());
    }
    if let Some(args) = matches.get_many::<String>("clang-args") {
        config = config.with_clang_args(args.cloned().collect());
    }
    if let Some(ast_file) = matches.get_one::<PathBuf>("ast-file") {
        config = config.with_ast_file(ast_file);
    }
    Ok(config)
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;
    let generated = generate(&config)
        .with_context(|| format!("generating metadata for {}", config.input.display()))?;

    report_warnings(&generated.warnings);
    Ok(())
}

fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        warn!("{}", warning);
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let meta = err.downcast_ref::<MetaError>();
            if let Some(meta) = meta {
                report_warnings(meta.warnings());
            }
            error!("{:#}", err);
            ExitCode::from(meta.map(MetaError::exit_code).unwrap_or(1))
        }
    }
}
