use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use tle_fluence::io::trace::{TraceReader, TraceRecord};
use tle_fluence::{FluenceConfig, RunController, StoppingPower};

use crate::cli::ScoreArgs;
use crate::config::{build_fluence_config, load_stopping_power};
use crate::display::{Context as DisplayContext, Progress, print_run_summary, print_spectra};
use crate::io::{TraceSource, open_trace, stdin_is_tty};

const TOTAL_STEPS: u8 = 3;

/// Steps between progress message refreshes.
const REPORT_INTERVAL: u64 = 50_000;

#[derive(Debug, Default)]
struct ReplayStats {
    steps: u64,
    events: u64,
    trailing_event: bool,
}

pub fn run_score(args: ScoreArgs, ctx: DisplayContext) -> Result<()> {
    if args.io.input.is_none() && stdin_is_tty() {
        bail!(
            "No step trace specified and stdin is a terminal.\n\nUsage: tlef score -i <TRACE> or pipe a trace via stdin."
        );
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Configuring run");
    let config = build_fluence_config(&args)?;
    let stopping = load_stopping_power(&args.stopping)?;
    let config_substeps = build_config_substeps(&config, &args, stopping.materials());
    let mut run =
        RunController::new(config, stopping).context("Failed to configure the fluence run")?;
    progress.complete_step("Configuring run", &as_refs(&config_substeps));

    progress.step("Scoring steps");
    let source = open_trace(args.io.input.as_deref())?;
    run.begin_run()?;
    let stats = replay(&mut run, source, &mut progress)?;
    progress.complete_step("Scoring steps", &as_refs(&build_replay_substeps(&stats)));

    progress.step("Writing output");
    run.end_run().context("Failed to finalize the fluence run")?;
    let write_substeps: Vec<String> = run.sinks().map(|s| s.describe()).collect();
    progress.complete_step("Writing output", &as_refs(&write_substeps));

    if ctx.interactive {
        print_run_summary(run.spectra());
        print_spectra(run.spectra());
    }

    progress.finish();
    Ok(())
}

fn replay<S: StoppingPower>(
    run: &mut RunController<S>,
    source: TraceSource,
    progress: &mut Progress,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();
    let mut in_event = false;
    let mut reader = TraceReader::new(source);

    while let Some(record) = reader.next() {
        let record = record.context("Failed to read step trace")?;
        match record {
            TraceRecord::Step(step) => {
                if !in_event {
                    run.begin_event()?;
                    in_event = true;
                }
                run.process_step(&step.as_step())
                    .with_context(|| format!("Step at line {} was rejected", reader.line_no()))?;
                stats.steps += 1;
                if stats.steps % REPORT_INTERVAL == 0 {
                    progress.update(&format!(
                        "{} steps, {} events",
                        stats.steps, stats.events
                    ));
                }
            }
            TraceRecord::EndEvent => {
                if !in_event {
                    run.begin_event()?;
                }
                run.end_event()?;
                in_event = false;
                stats.events += 1;
            }
        }
    }

    if in_event {
        debug!(
            line = reader.line_no(),
            "trace ended inside an event; closing it"
        );
        run.end_event()?;
        stats.events += 1;
        stats.trailing_event = true;
    }

    info!(steps = stats.steps, events = stats.events, "step trace replayed");
    Ok(stats)
}

fn build_config_substeps(
    config: &FluenceConfig,
    args: &ScoreArgs,
    materials: Vec<&str>,
) -> Vec<String> {
    let spacing = if config.log_scale {
        "logarithmic"
    } else {
        "linear"
    };
    let source = if args.stopping.tables.is_some() {
        "custom tables"
    } else {
        "embedded tables"
    };

    vec![
        format!(
            "{} {} bins, {} to {} MeV",
            config.bin_count, spacing, config.min_energy, config.max_energy
        ),
        format!("Stopping power: {} ({})", source, materials.join(", ")),
    ]
}

fn build_replay_substeps(stats: &ReplayStats) -> Vec<String> {
    let mut steps = vec![
        format!("Scored {} steps", stats.steps),
        format!("Closed {} events", stats.events),
    ];
    if stats.trailing_event {
        steps.push("Closed the unterminated last event".to_string());
    }
    steps
}

fn as_refs(items: &[String]) -> Vec<&str> {
    items.iter().map(|s| s.as_str()).collect()
}
