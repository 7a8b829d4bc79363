mod cli;

use clap::Parser;
use decide::config;
use decide::elicit::{Console, Elicit};
use decide::error::DecideError;
use decide::model::decision::{Decision, EditContext};
use decide::report;
use decide::types::config::{DecideConfig, ReportFormatSetting};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_format(args: &cli::ReportArgs, cfg: &DecideConfig) -> report::OutputFormat {
    match (args.format, cfg.report_format()) {
        (Some(cli::ReportFormat::Json), _) => report::OutputFormat::Json,
        (Some(cli::ReportFormat::Md), _) => report::OutputFormat::Md,
        (None, Some(ReportFormatSetting::Json)) => report::OutputFormat::Json,
        (None, _) => report::OutputFormat::Md,
    }
}

fn edit(
    decision: &mut Decision,
    args: &cli::ReportArgs,
    ctx: &mut EditContext<'_>,
) -> Result<(), DecideError> {
    if !args.keep.is_empty() {
        decision.feature_list_keep(&args.keep, ctx)?;
        tracing::info!(features = ?decision.features(), "feature list narrowed");
    }
    for feature in &args.toggle_feature {
        let outcome = decision.toggle_feature(feature, ctx)?;
        tracing::info!(%feature, ?outcome, "feature toggled");
    }
    for option in &args.toggle_option {
        let outcome = decision.toggle_option(option, ctx)?;
        tracing::info!(%option, ?outcome, "option toggled");
    }
    Ok(())
}

fn execute(args: &cli::ReportArgs, interactive: bool) -> Result<i32, DecideError> {
    let cfg = config::load_config(&args.config)?;
    let settings = cfg.settings();
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stderr());

    let mut ctx = EditContext {
        elicit: &mut console,
        rng: &mut rng,
        settings,
    };
    let mut decision = if interactive {
        Decision::build(&mut ctx)?
    } else {
        Decision::example()
    };
    edit(&mut decision, args, &mut ctx)?;

    let radar = if interactive && args.options.is_empty() {
        Some(ctx.elicit.request_radar_selection(decision.options())?)
    } else {
        None
    };
    let request = report::ReportRequest {
        options: args.options.clone(),
        radar,
        venn3: args.venn3,
        style: settings.score_style,
    };
    let decision_report = report::build_report(&decision, &request)?;
    let rendered = report::render(&decision_report, output_format(args, &cfg))?;
    println!("{rendered}");
    Ok(exit_code::SUCCESS)
}

fn run() -> Result<i32, DecideError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "decide starting");
    match cli.command {
        cli::Commands::New(cmd) => execute(&cmd.report, true),
        cli::Commands::Example(cmd) => execute(&cmd.report, false),
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
