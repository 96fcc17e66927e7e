use clap::{Subcommand, ValueEnum};

use chime_core::Domain;

use crate::common::{print_event, print_json, Session};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DomainArg {
    Alarm,
    Timer,
}

impl From<DomainArg> for Domain {
    fn from(value: DomainArg) -> Self {
        match value {
            DomainArg::Alarm => Domain::Alarm,
            DomainArg::Timer => Domain::Timer,
        }
    }
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Create a section
    Create {
        #[arg(value_enum)]
        domain: DomainArg,
        name: String,
    },
    /// List sections as JSON
    List {
        #[arg(value_enum)]
        domain: DomainArg,
    },
    /// Rename a section
    Rename {
        #[arg(value_enum)]
        domain: DomainArg,
        id: String,
        name: String,
    },
    /// Delete a section, moving its entities to the default section
    Delete {
        #[arg(value_enum)]
        domain: DomainArg,
        id: String,
    },
}

pub fn run(action: SectionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    match action {
        SectionAction::Create { domain, name } => {
            let event = session.controller.create_section(domain.into(), name)?;
            print_event(&event)?;
        }
        SectionAction::List { domain } => {
            print_json(&session.controller.sections(domain.into()))?;
        }
        SectionAction::Rename { domain, id, name } => {
            let event = session.controller.rename_section(domain.into(), &id, name)?;
            print_event(&event)?;
        }
        SectionAction::Delete { domain, id } => {
            let event = session.controller.delete_section(domain.into(), &id)?;
            print_event(&event)?;
        }
    }
    session.finish()
}
