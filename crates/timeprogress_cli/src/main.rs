//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `timeprogress_core` linkage.
//! - Print progress for an ad-hoc window: `timeprogress_cli START END [NOW]`.
//!
//! Dates are RFC 3339 timestamps or `YYYY-MM-DD` (midnight UTC).

use chrono::{DateTime, NaiveDate};
use std::process::ExitCode;
use timeprogress_core::timeline::calendar::now_epoch_ms;
use timeprogress_core::{
    elapsed_summary, reached_milestones, time_left, EpochMs, TimeRange, DEFAULT_MILESTONES,
};

fn main() -> ExitCode {
    println!("timeprogress_core ping={}", timeprogress_core::ping());
    println!("timeprogress_core version={}", timeprogress_core::core_version());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("usage: timeprogress_cli START END [NOW]");
            ExitCode::from(2)
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let (start, end, now) = match args {
        [start, end] => (parse_instant(start)?, parse_instant(end)?, now_epoch_ms()),
        [start, end, now] => (parse_instant(start)?, parse_instant(end)?, parse_instant(now)?),
        _ => return Err(format!("expected 2 or 3 arguments, got {}", args.len())),
    };

    let range = TimeRange::new(start, end);
    let remaining = time_left(end, now);
    let milestones = reached_milestones(range, now, &DEFAULT_MILESTONES);

    println!("progress={:.2}", range.progress(now));
    println!("status={}", range.status(now));
    println!("elapsed={}", elapsed_summary(range, now));
    println!(
        "time_left={}d {}h {}m {}s",
        remaining.days, remaining.hours, remaining.minutes, remaining.seconds
    );
    println!("milestones={milestones:?}");
    Ok(())
}

fn parse_instant(raw: &str) -> Result<EpochMs, String> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
        .ok_or_else(|| format!("cannot parse `{raw}` as RFC 3339 or YYYY-MM-DD"))
}
