use std::time::Duration;

use clap::Subcommand;
use mindfocus_core::stress::{
    BreathingExercise, BreathingPattern, SessionTag, StressProbe, SyntheticProbe, PATTERNS,
};
use mindfocus_core::{FocusContext, TimerMode, TimerState};
use serde_json::json;

use super::common::{backend_client, open_context, print_event, runtime, CliError};

#[derive(Subcommand)]
pub enum StressAction {
    /// Feed one or more readings, print the assessment and forward them
    Sample {
        /// Fixed score instead of the synthetic probe
        #[arg(long)]
        score: Option<f64>,
        /// How many readings to feed
        #[arg(long, default_value = "1")]
        count: u32,
        /// Skip the best-effort /emotion-log forwarding
        #[arg(long)]
        no_forward: bool,
    },
    /// Probe a burst of readings and summarize the window
    Status {
        /// How many synthetic readings to take
        #[arg(long, default_value = "5")]
        count: u32,
    },
    /// List available breathing patterns
    Patterns,
    /// Run a guided breathing exercise
    Breathe {
        /// Pattern id (box, relaxing, simple)
        #[arg(long, default_value = "box")]
        pattern: String,
        /// Cycles to run
        #[arg(long, default_value = "3")]
        cycles: u32,
        /// Print the schedule without waiting between phases
        #[arg(long)]
        no_wait: bool,
    },
}

fn make_probe(ctx: &FocusContext) -> SyntheticProbe {
    match ctx.config().stress.seed {
        Some(seed) => SyntheticProbe::seeded(seed),
        None => SyntheticProbe::new(),
    }
}

fn session_type(ctx: &FocusContext) -> &'static str {
    if ctx.engine().state() == TimerState::Idle {
        "idle"
    } else if ctx.engine().mode() == TimerMode::Focus {
        "focus"
    } else {
        "break"
    }
}

pub fn run(action: StressAction) -> Result<(), CliError> {
    match action {
        StressAction::Sample {
            score,
            count,
            no_forward,
        } => {
            let mut ctx = open_context()?;
            let mut probe = make_probe(&ctx);
            let mut last = None;
            let mut scores = Vec::new();
            for _ in 0..count.max(1) {
                let value = score.unwrap_or_else(|| probe.produce_reading());
                let (assessment, event) = ctx.observe_stress(value);
                if let Some(event) = event {
                    print_event(&event)?;
                }
                scores.push(assessment.score);
                last = Some(assessment);
            }
            if let Some(assessment) = last {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            }
            if !no_forward {
                let kind = session_type(&ctx);
                let category = ctx
                    .tasks()
                    .selected()
                    .map(|t| t.category.as_str().to_string());
                let client = backend_client(&ctx);
                let rt = runtime()?;
                rt.block_on(async {
                    for value in scores {
                        if let Err(e) = client.log_emotion(value, kind, category.as_deref()).await
                        {
                            eprintln!("emotion log failed: {e}");
                            break;
                        }
                    }
                });
            }
        }
        StressAction::Status { count } => {
            let mut ctx = open_context()?;
            let mut probe = make_probe(&ctx);
            let mut last = None;
            for _ in 0..count.max(3) {
                let (assessment, _) = ctx.observe_stress(probe.produce_reading());
                last = Some(assessment);
            }
            let monitor = ctx.stress();
            let out = json!({
                "assessment": last,
                "readings": monitor.readings().len(),
                "breathing_suggested": monitor.breathing_suggested(),
                "focus_average": monitor.session_average(SessionTag::Focus),
                "break_average": monitor.session_average(SessionTag::Break),
                "idle_average": monitor.session_average(SessionTag::Idle),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StressAction::Patterns => {
            for pattern in PATTERNS {
                let steps: Vec<String> = pattern
                    .steps
                    .iter()
                    .map(|s| format!("{}s", s.secs))
                    .collect();
                println!(
                    "{:<10} {}  ({}, {}s/cycle)",
                    pattern.id,
                    pattern.name,
                    steps.join("-"),
                    pattern.cycle_secs(),
                );
            }
        }
        StressAction::Breathe {
            pattern,
            cycles,
            no_wait,
        } => {
            let pattern = BreathingPattern::by_id(&pattern)
                .ok_or_else(|| format!("unknown pattern: {pattern}"))?;
            println!("{} - {} cycles", pattern.name, cycles);
            let mut exercise = BreathingExercise::new(pattern);
            while exercise.cycles_done() < cycles {
                let step = exercise.current_step();
                if exercise.remaining_in_step() == step.secs {
                    println!("{} ({}s)", step.instruction, step.secs);
                }
                if !no_wait {
                    std::thread::sleep(Duration::from_secs(1));
                }
                exercise.tick();
            }
            println!("done");
        }
    }
    Ok(())
}
