use std::io::Write;

use clap::Args;
use pomoquest_core::{format_duration, Database, Event, PhaseDurations, Session, Ticker};
use tracing::info;

use super::{open_session, CmdResult};

#[derive(Args)]
pub struct PlayArgs {
    /// Focus length in minutes (1-180)
    #[arg(long)]
    focus: Option<u32>,
    /// Short break length in minutes (1-60)
    #[arg(long)]
    short: Option<u32>,
    /// Long break length in minutes (1-120)
    #[arg(long)]
    long: Option<u32>,
    /// Every Nth break is a long break
    #[arg(long)]
    every: Option<u32>,
    /// Tick interval in milliseconds (defaults to timer.tick_ms)
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Stop after this many completed phases
    #[arg(long)]
    phases: Option<u32>,
}

pub fn run(args: PlayArgs) -> CmdResult {
    let (mut session, config) = open_session()?;
    if session.continue_session().is_none() {
        return Err("no active session; pick a character first with `pomoquest-cli character <name>`".into());
    }

    let current = session.durations();
    session.set_durations(PhaseDurations::new(
        args.focus.unwrap_or(current.focus),
        args.short.unwrap_or(current.brk),
        args.long.unwrap_or(current.long),
    ));
    if let Some(every) = args.every {
        session.set_long_break_every(every);
    }
    let ticker = match args.tick_ms {
        Some(ms) => Ticker::new(std::time::Duration::from_millis(ms)),
        None => Ticker::new(config.tick_interval()),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(&mut session, ticker, args.phases))
}

async fn drive(session: &mut Session<Database>, ticker: Ticker, limit: Option<u32>) -> CmdResult {
    let character = session.character().unwrap_or("Adventurer").to_string();
    info!(%character, durations = ?session.durations(), "play started");

    session.start();
    let mut ticks = ticker.spawn();
    let mut completed = 0u32;
    render(session)?;

    loop {
        tokio::select! {
            tick = ticks.recv() => {
                if tick.is_none() {
                    break;
                }
                if let Some(event) = session.tick() {
                    println!();
                    if let Event::PhaseCompleted { title, .. } = &event {
                        println!("{character}: {title} begins");
                    }
                    completed += 1;
                    if limit.is_some_and(|n| completed >= n) {
                        session.pause();
                        ticks.cancel();
                        break;
                    }
                }
                render(session)?;
            }
            _ = tokio::signal::ctrl_c() => {
                session.pause();
                ticks.cancel();
                println!();
                break;
            }
        }
    }

    info!(completed, breaks = session.cycle().completed_breaks(), "play stopped");
    Ok(())
}

fn render(session: &Session<Database>) -> CmdResult {
    let cycle = session.cycle();
    let countdown = cycle.countdown();
    let mut out = std::io::stdout().lock();
    write!(
        out,
        "\r{:<10} {:>8}  {:<8}",
        cycle.title(),
        format_duration(countdown.remaining_secs()),
        countdown.status_label()
    )?;
    out.flush()?;
    Ok(())
}
