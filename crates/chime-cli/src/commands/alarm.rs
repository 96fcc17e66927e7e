use clap::Subcommand;

use chime_core::AlarmUpdate;

use crate::common::{print_event, print_json, Session};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Create an alarm
    Create {
        title: String,
        #[arg(long)]
        hour: u32,
        #[arg(long)]
        minute: u32,
        /// Sound id (defaults to the configured default sound)
        #[arg(long)]
        sound: Option<String>,
        /// Section id
        #[arg(long)]
        section: Option<String>,
    },
    /// List alarms as JSON
    List,
    /// Enable or disable an alarm
    Toggle { id: String },
    /// Update alarm fields
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        hour: Option<u32>,
        #[arg(long)]
        minute: Option<u32>,
        #[arg(long)]
        sound: Option<String>,
        #[arg(long)]
        section: Option<String>,
    },
    /// Delete a user alarm
    Delete { id: String },
    /// Dismiss a ringing alarm
    Dismiss { id: String },
    /// Snooze a ringing alarm
    Snooze { id: String },
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    match action {
        AlarmAction::Create {
            title,
            hour,
            minute,
            sound,
            section,
        } => {
            let event = session
                .controller
                .create_alarm(title, hour, minute, sound, section)?;
            print_event(&event)?;
        }
        AlarmAction::List => {
            let alarms: Vec<_> = session.controller.alarms().collect();
            print_json(&alarms)?;
        }
        AlarmAction::Toggle { id } => {
            let event = session.controller.toggle_alarm(&id)?;
            print_event(&event)?;
        }
        AlarmAction::Update {
            id,
            title,
            hour,
            minute,
            sound,
            section,
        } => {
            let event = session.controller.update_alarm(
                &id,
                AlarmUpdate {
                    title,
                    hour,
                    minute,
                    sound,
                    section_id: section,
                },
            )?;
            print_event(&event)?;
        }
        AlarmAction::Delete { id } => {
            let event = session.controller.delete_alarm(&id)?;
            print_event(&event)?;
        }
        AlarmAction::Dismiss { id } => {
            let event = session.controller.dismiss_alarm(&id)?;
            print_event(&event)?;
        }
        AlarmAction::Snooze { id } => {
            let event = session.controller.snooze_alarm(&id)?;
            print_event(&event)?;
        }
    }
    session.finish()
}
