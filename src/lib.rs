//! Seminar speaker scheduling.
//!
//! Reads this year's roster and last year's talk order, gives each student a
//! normal distribution over "how early should they speak", pairs junior
//! students, and orders the resulting weeks by one random draw each.

pub mod error;
pub mod matcher;
pub mod models;
pub mod parser;
pub mod report;
pub mod scheduler;

pub use error::{Error, Result};
pub use models::{Config, Student, Week};
pub use parser::{PriorYearIndex, Roster};

use rand::Rng;
use std::path::Path;

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct Outcome {
    pub roster: Roster,
    pub schedule: Vec<Week>,
}

/// Read both inputs, then group and order the weeks.
///
/// Both files are read in full before any scheduling happens; a missing file
/// fails before anything is parsed.
pub fn run<R: Rng + ?Sized>(
    roster_path: &Path,
    prior_year_path: &Path,
    config: &Config,
    rng: &mut R,
) -> Result<Outcome> {
    let roster_bytes = read_input(roster_path)?;
    let prior_bytes = read_input(prior_year_path)?;

    let index = PriorYearIndex::from_reader(prior_bytes.as_slice())?;
    let roster = Roster::from_reader(roster_bytes.as_slice(), &index, config)?;
    let weeks = scheduler::group_weeks(&roster, config, rng);
    let schedule = scheduler::schedule(weeks, rng)?;
    Ok(Outcome { roster, schedule })
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
