use clap::Subcommand;

use crate::common::{print_event, print_json, Session};

#[derive(Subcommand)]
pub enum StopwatchAction {
    /// Start (or resume) the stopwatch
    Start,
    /// Pause the stopwatch
    Pause,
    /// Record a lap
    Lap,
    /// Reset the stopwatch
    Reset,
    /// Print the stopwatch state as JSON
    Show,
}

pub fn run(action: StopwatchAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    match action {
        StopwatchAction::Start => {
            let event = session.controller.stopwatch_start();
            print_event(&event)?;
        }
        StopwatchAction::Pause => {
            let event = session.controller.stopwatch_pause();
            print_event(&event)?;
        }
        StopwatchAction::Lap => {
            let event = session.controller.stopwatch_lap();
            print_event(&event)?;
        }
        StopwatchAction::Reset => {
            let event = session.controller.stopwatch_reset();
            print_event(&event)?;
        }
        StopwatchAction::Show => {
            print_json(session.controller.stopwatch())?;
        }
    }
    session.finish()
}
