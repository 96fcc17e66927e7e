use serde_json::json;

use chime_core::Domain;

use crate::common::{print_json, Session};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let controller = &session.controller;
    let status = json!({
        "alarms": {
            "count": controller.alarms().count(),
            "ringing": controller.ringing_ids(Domain::Alarm),
            "active": controller.active_ringing(Domain::Alarm),
        },
        "timers": {
            "count": controller.timers().count(),
            "ringing": controller.ringing_ids(Domain::Timer),
            "active": controller.active_ringing(Domain::Timer),
            "pinned": controller.pinned_timer().map(|t| t.id.clone()),
        },
        "stopwatch": controller.stopwatch(),
    });
    print_json(&status)?;
    session.finish()
}
