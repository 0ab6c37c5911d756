use crate::models::Week;
use crate::parser::Roster;

pub fn summary_line(roster: &Roster) -> String {
    format!(
        "Parsed input file and found {} total students in {} years",
        roster.total,
        roster.year_count()
    )
}

/// `Week N: [..]`, optionally with the value the week was sorted by.
pub fn week_line(number: usize, week: &Week, show_draw: bool) -> String {
    if !show_draw {
        return format!("Week {}: {}", number, week);
    }
    match week.last_draw {
        Some(draw) => format!("Week {} (draw {:.2}): {}", number, draw, week),
        None => format!("Week {} (mu {:.2}, sigma {:.2}): {}", number, week.mu, week.sigma, week),
    }
}

/// Every output line in print order: matches, summary, then the schedule numbered from 1.
pub fn render(roster: &Roster, schedule: &[Week], show_draws: bool) -> Vec<String> {
    let mut lines: Vec<String> = roster.matches.iter().map(|m| m.to_string()).collect();
    lines.push(summary_line(roster));
    lines.extend(
        schedule
            .iter()
            .enumerate()
            .map(|(i, week)| week_line(i + 1, week, show_draws)),
    );
    lines
}

pub fn print_report(roster: &Roster, schedule: &[Week], show_draws: bool) {
    for line in render(roster, schedule, show_draws) {
        println!("{}", line);
    }
}
