use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use mindfocus_core::notify::Notifier;
use mindfocus_core::stress::{StressProbe, SyntheticProbe};
use mindfocus_core::timer::TimerSettings;
use mindfocus_core::{Event, FocusContext, TimerMode, TimerState};

use super::common::{backend_client, open_context, print_event, print_events, runtime, CliError};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Reset to idle with a full countdown
    Reset,
    /// Switch mode (focus, short_break, long_break)
    Mode {
        mode: String,
    },
    /// Print current timer state as JSON
    Status,
    /// Show or change timer settings
    Settings {
        /// Focus length in minutes
        #[arg(long)]
        focus: Option<u64>,
        /// Short break length in minutes
        #[arg(long)]
        short_break: Option<u64>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<u64>,
        /// Focus sessions before a long break
        #[arg(long)]
        interval: Option<u32>,
        /// Automatically start breaks after focus (true/false)
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        /// Automatically start focus after breaks (true/false)
        #[arg(long)]
        auto_start_focus: Option<bool>,
    },
    /// Run the timer in the foreground, ticking once per second
    Run {
        /// Keep running across completions instead of exiting after the
        /// first one
        #[arg(long)]
        follow: bool,
    },
}

/// Terminal bell + stderr line. The core stays silent; this is the CLI's
/// delivery of notifications.
struct TerminalNotifier {
    sound: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) {
        if self.sound {
            print!("\x07");
            let _ = std::io::stdout().flush();
        }
        eprintln!("[{title}] {body}");
    }
}

pub fn run(action: TimerAction) -> Result<(), CliError> {
    let mut ctx = open_context()?;

    match action {
        TimerAction::Start | TimerAction::Resume => {
            match ctx.start_timer()? {
                Some(event) => print_event(&event)?,
                None => println!("{}", serde_json::to_string_pretty(&ctx.engine().snapshot())?),
            }
        }
        TimerAction::Pause => match ctx.pause_timer()? {
            Some(event) => print_event(&event)?,
            None => println!("{}", serde_json::to_string_pretty(&ctx.engine().snapshot())?),
        },
        TimerAction::Reset => {
            let event = ctx.reset_timer()?;
            print_event(&event)?;
        }
        TimerAction::Mode { mode } => {
            let mode: TimerMode = mode.parse()?;
            let event = ctx.switch_mode(mode)?;
            print_event(&event)?;
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&ctx.engine().snapshot())?);
        }
        TimerAction::Settings {
            focus,
            short_break,
            long_break,
            interval,
            auto_start_breaks,
            auto_start_focus,
        } => {
            let mut settings = ctx.engine().settings().clone();
            let mut changed = false;
            if let Some(min) = focus {
                settings.focus_min = min;
                changed = true;
            }
            if let Some(min) = short_break {
                settings.short_break_min = min;
                changed = true;
            }
            if let Some(min) = long_break {
                settings.long_break_min = min;
                changed = true;
            }
            if let Some(n) = interval {
                settings.long_break_interval = n;
                changed = true;
            }
            if let Some(flag) = auto_start_breaks {
                settings.auto_start_breaks = flag;
                changed = true;
            }
            if let Some(flag) = auto_start_focus {
                settings.auto_start_focus = flag;
                changed = true;
            }
            if changed {
                validate(&settings)?;
                ctx.update_settings(settings)?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(ctx.engine().settings())?
            );
        }
        TimerAction::Run { follow } => {
            run_foreground(&mut ctx, follow)?;
        }
    }
    Ok(())
}

fn validate(settings: &TimerSettings) -> Result<(), CliError> {
    if settings.focus_min == 0 || settings.short_break_min == 0 || settings.long_break_min == 0 {
        return Err("durations must be at least 1 minute".into());
    }
    if settings.long_break_interval == 0 {
        return Err("interval must be at least 1".into());
    }
    Ok(())
}

/// Foreground loop: one engine tick per second, a stress reading on the
/// configured cadence, notifications on completion. Stress telemetry goes to
/// the backend best-effort; a dead backend never interrupts the timer.
fn run_foreground(ctx: &mut FocusContext, follow: bool) -> Result<(), CliError> {
    if ctx.engine().state() == TimerState::Idle {
        if let Some(event) = ctx.start_timer()? {
            print_event(&event)?;
        }
    }

    let notifier = TerminalNotifier {
        sound: ctx.engine().settings().sound_enabled,
    };
    let notifications = ctx.engine().settings().notifications_enabled;

    let mut probe = match ctx.config().stress.seed {
        Some(seed) => SyntheticProbe::seeded(seed),
        None => SyntheticProbe::new(),
    };
    let probe_every = ctx.config().stress.probe_interval_secs.max(1);
    let client = backend_client(ctx);

    let rt = runtime()?;
    rt.block_on(async {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut probe_tick = tokio::time::interval(Duration::from_secs(probe_every));
        probe_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let events = ctx.tick()?;
                    let mut completed = false;
                    for event in &events {
                        if let Event::TimerCompleted { mode, .. } = event {
                            completed = true;
                            if notifications {
                                notifier.notify(mode.label(), "Session complete");
                            }
                        }
                    }
                    print_events(&events)?;
                    if completed && !follow {
                        return Ok(());
                    }
                }
                _ = probe_tick.tick() => {
                    let session_type = if ctx.engine().state() == TimerState::Idle {
                        "idle"
                    } else if ctx.engine().mode() == TimerMode::Focus {
                        "focus"
                    } else {
                        "break"
                    };
                    let category = ctx
                        .tasks()
                        .selected()
                        .map(|t| t.category.as_str().to_string());
                    let score = probe.produce_reading();
                    let (_, event) = ctx.observe_stress(score);
                    if let Some(event) = event {
                        print_event(&event)?;
                    }

                    let client = client.clone();
                    tokio::spawn(async move {
                        if let Err(e) = client
                            .log_emotion(score, session_type, category.as_deref())
                            .await
                        {
                            eprintln!("emotion log failed: {e}");
                        }
                    });
                }
            }
        }
    })
}
