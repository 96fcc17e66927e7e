use crate::common::{print_event, Session};

/// Run one pass of the tick driver: completions and alarm fires since the
/// last invocation surface here (hosts embedding the core call tick on
/// every frame instead).
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    let events = session.controller.tick();
    for event in &events {
        print_event(event)?;
    }
    session.finish()
}
