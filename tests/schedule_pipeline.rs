//! End-to-end runs through temp files

use rand::rngs::SmallRng;
use rand::SeedableRng;
use speaker_scheduler::{report, run, Config, Error};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const LAST_YEAR: &str = "Date,Name\n\
9/4,Alice Smith\n\
9/11,Bob Jones/Carol White\n\
9/18,Dan Brown\n\
9/25,Erin Green\n";

#[test]
fn test_single_senior_gets_average_position() {
    let roster = create_temp_csv("Sam,Senior,4\n");
    let last_year = create_temp_csv("a,x\nb,y\nc,z\nd,w\ne,v\n");
    let mut rng = SmallRng::seed_from_u64(42);

    let outcome = run(roster.path(), last_year.path(), &Config::default(), &mut rng).unwrap();
    assert_eq!(outcome.roster.total, 1);
    let student = &outcome.roster.by_year[&4][0];
    assert_eq!((student.mu, student.sigma), (2.0, 3.0));

    let lines = report::render(&outcome.roster, &outcome.schedule, false);
    let week_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with("Week ")).collect();
    assert_eq!(week_lines, vec!["Week 1: [Sam Senior, 4th year]"]);
}

#[test]
fn test_full_roster_schedules_everyone_once() {
    let roster = create_temp_csv(
        "Ann,Citron,1\n\
         Ben,Fresh,1\n\
         Bob,Jones,2\n\
         Cara,White,2\n\
         Dan,Brown,3\n\
         Erin,Green,5\n\
         not,a,number\n",
    );
    let last_year = create_temp_csv(LAST_YEAR);
    let mut rng = SmallRng::seed_from_u64(2024);

    let outcome = run(roster.path(), last_year.path(), &Config::default(), &mut rng).unwrap();
    assert_eq!(outcome.roster.total, 6);
    assert_eq!(outcome.roster.year_count(), 4);
    // Bob, Cara and Dan are matched against last year
    assert_eq!(outcome.roster.matches.len(), 3);
    assert_eq!(outcome.roster.matches[0].matched_name, "bob jones");
    assert_eq!(outcome.roster.matches[0].position, 1);

    // Four pairable students form two pairs; Dan and Erin speak alone
    assert_eq!(outcome.schedule.len(), 4);
    assert_eq!(outcome.schedule.iter().filter(|w| w.is_pair()).count(), 2);

    let mut names: Vec<String> = outcome
        .schedule
        .iter()
        .flat_map(|w| w.students().iter().map(|s| s.first_name.clone()))
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ann", "Ben", "Bob", "Cara", "Dan", "Erin"]);

    let draws: Vec<f64> = outcome.schedule.iter().map(|w| w.last_draw.unwrap()).collect();
    assert!(draws.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_same_seed_reproduces_schedule() {
    let roster = create_temp_csv("A,One,1\nB,Two,1\nC,Three,2\nD,Four,3\nE,Five,4\n");
    let last_year = create_temp_csv(LAST_YEAR);

    let first = run(roster.path(), last_year.path(), &Config::default(), &mut SmallRng::seed_from_u64(7)).unwrap();
    let second = run(roster.path(), last_year.path(), &Config::default(), &mut SmallRng::seed_from_u64(7)).unwrap();
    assert_eq!(first.schedule, second.schedule);
}

#[test]
fn test_empty_roster_prints_no_weeks() {
    let roster = create_temp_csv("");
    let last_year = create_temp_csv(LAST_YEAR);
    let mut rng = SmallRng::seed_from_u64(1);

    let outcome = run(roster.path(), last_year.path(), &Config::default(), &mut rng).unwrap();
    assert!(outcome.schedule.is_empty());
    let lines = report::render(&outcome.roster, &outcome.schedule, false);
    assert_eq!(lines, vec!["Parsed input file and found 0 total students in 0 years".to_string()]);
}

#[test]
fn test_empty_prior_year_file_is_a_named_error() {
    let roster = create_temp_csv("Sam,Senior,4\n");
    let last_year = create_temp_csv("Date,Name\n");
    let mut rng = SmallRng::seed_from_u64(1);

    let err = run(roster.path(), last_year.path(), &Config::default(), &mut rng).unwrap_err();
    assert!(matches!(err, Error::EmptyPriorYear));
}

#[test]
fn test_missing_input_file_is_reported_with_path() {
    let last_year = create_temp_csv(LAST_YEAR);
    let missing = Path::new("/definitely/not/here/roster.csv");
    let mut rng = SmallRng::seed_from_u64(1);

    let err = run(missing, last_year.path(), &Config::default(), &mut rng).unwrap_err();
    match err {
        Error::Read { path, .. } => assert_eq!(path, missing),
        other => panic!("expected read error, got {:?}", other),
    }
}

#[test]
fn test_config_file_changes_policy() {
    let mut config = Config::default();
    config.first_year.mu = 50.0;
    config.first_year.sigma = 0.5;
    config.overrides.clear();
    let config_file = NamedTempFile::new().unwrap();
    let config_path = config_file.path().to_str().unwrap();
    config.save_to_file(config_path).unwrap();

    let loaded = Config::load_from_file(config_path).unwrap();
    assert_eq!(loaded, config);

    let roster = create_temp_csv("Ann,Citron,1\n");
    let last_year = create_temp_csv(LAST_YEAR);
    let outcome = run(roster.path(), last_year.path(), &loaded, &mut SmallRng::seed_from_u64(3)).unwrap();
    let student = &outcome.roster.by_year[&1][0];
    assert_eq!((student.mu, student.sigma), (50.0, 0.5));
}
