use chrono::{DateTime, Utc};
use clap::Subcommand;

use chime_core::TimerUpdate;

use crate::common::{print_event, print_json, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Create a timer (countdown with --minutes/--seconds, or
    /// count-to-date with --to-date)
    Create {
        title: String,
        /// Countdown duration in minutes
        #[arg(long, conflicts_with = "to_date")]
        minutes: Option<u64>,
        /// Countdown duration in seconds (added to --minutes)
        #[arg(long, conflicts_with = "to_date")]
        seconds: Option<u64>,
        /// Absolute target date (RFC 3339) for a count-to-date timer
        #[arg(long)]
        to_date: Option<String>,
        #[arg(long)]
        sound: Option<String>,
        #[arg(long)]
        section: Option<String>,
    },
    /// List timers as JSON
    List,
    /// Start a timer
    Start { id: String },
    /// Pause a running timer
    Pause { id: String },
    /// Reset a timer to its original duration
    Reset { id: String },
    /// Update timer fields
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// New countdown duration in minutes
        #[arg(long)]
        minutes: Option<u64>,
        #[arg(long)]
        sound: Option<String>,
        #[arg(long)]
        section: Option<String>,
    },
    /// Delete a user timer
    Delete { id: String },
    /// Dismiss a ringing timer
    Dismiss { id: String },
    /// Restart a ringing timer at its original duration
    Restart { id: String },
    /// Pin a timer to the primary display slot
    Pin { id: String },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    match action {
        TimerAction::Create {
            title,
            minutes,
            seconds,
            to_date,
            sound,
            section,
        } => {
            let event = if let Some(to_date) = to_date {
                let target = DateTime::parse_from_rfc3339(&to_date)?
                    .with_timezone(&Utc)
                    .timestamp_millis()
                    .max(0) as u64;
                session
                    .controller
                    .create_count_to_date_timer(title, target, sound, section)?
            } else {
                let duration_ms = minutes.unwrap_or(0) * 60_000 + seconds.unwrap_or(0) * 1_000;
                if duration_ms == 0 {
                    return Err("provide --minutes/--seconds or --to-date".into());
                }
                session
                    .controller
                    .create_countdown_timer(title, duration_ms, sound, section)?
            };
            print_event(&event)?;
        }
        TimerAction::List => {
            let timers: Vec<_> = session.controller.timers().collect();
            print_json(&timers)?;
        }
        TimerAction::Start { id } => {
            let event = session.controller.start_timer(&id)?;
            print_event(&event)?;
        }
        TimerAction::Pause { id } => {
            let event = session.controller.pause_timer(&id)?;
            print_event(&event)?;
        }
        TimerAction::Reset { id } => {
            let event = session.controller.reset_timer(&id)?;
            print_event(&event)?;
        }
        TimerAction::Update {
            id,
            title,
            minutes,
            sound,
            section,
        } => {
            let event = session.controller.update_timer(
                &id,
                TimerUpdate {
                    title,
                    duration_ms: minutes.map(|m| m * 60_000),
                    sound,
                    section_id: section,
                },
            )?;
            print_event(&event)?;
        }
        TimerAction::Delete { id } => {
            let event = session.controller.delete_timer(&id)?;
            print_event(&event)?;
        }
        TimerAction::Dismiss { id } => {
            let event = session.controller.dismiss_timer(&id)?;
            print_event(&event)?;
        }
        TimerAction::Restart { id } => {
            let event = session.controller.restart_timer(&id)?;
            print_event(&event)?;
        }
        TimerAction::Pin { id } => {
            let event = session.controller.pin_timer(&id)?;
            print_event(&event)?;
        }
    }
    session.finish()
}
