use crate::error::{Error, Result};
use crate::models::{Config, Student, Week};
use crate::parser::Roster;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

/// Build every week for the roster.
///
/// Students from the pairable years are concatenated in ascending year order,
/// shuffled as one list and paired off. Every other student gets a solo week,
/// ascending by year and in file order within a year.
pub fn group_weeks<R: Rng + ?Sized>(roster: &Roster, config: &Config, rng: &mut R) -> Vec<Week> {
    let mut pairable: Vec<Student> = roster
        .by_year
        .iter()
        .filter(|(year, _)| config.is_pairable(**year))
        .flat_map(|(_, students)| students.iter().cloned())
        .collect();
    pairable.shuffle(rng);

    let mut weeks = pair_students(pairable);
    weeks.extend(
        roster
            .by_year
            .iter()
            .filter(|(year, _)| !config.is_pairable(**year))
            .flat_map(|(_, students)| students.iter().cloned().map(Week::solo)),
    );
    weeks
}

/// Pair neighbours left to right; an odd student out gets a week alone.
pub fn pair_students(students: Vec<Student>) -> Vec<Week> {
    let mut weeks = Vec::with_capacity(students.len().div_ceil(2));
    let mut remaining = students.into_iter();

    while let Some(first) = remaining.next() {
        match remaining.next() {
            Some(second) => weeks.push(Week::pair(first, second)),
            None => weeks.push(Week::solo(first)),
        }
    }
    weeks
}

/// Draw one value per week from its normal distribution, cache it, and order
/// the weeks by that draw, earliest first.
pub fn schedule<R: Rng + ?Sized>(mut weeks: Vec<Week>, rng: &mut R) -> Result<Vec<Week>> {
    for week in &mut weeks {
        let normal = Normal::new(week.mu, week.sigma).map_err(|_| Error::InvalidDistribution {
            mu: week.mu,
            sigma: week.sigma,
        })?;
        let draw = normal.sample(rng);
        debug!(week = %week, mu = week.mu, sigma = week.sigma, draw, "drew sort value");
        week.last_draw = Some(draw);
    }

    weeks.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
    Ok(weeks)
}

fn sort_key(week: &Week) -> f64 {
    week.last_draw.unwrap_or(week.mu)
}
