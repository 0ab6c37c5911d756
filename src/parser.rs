use crate::error::{Error, Result};
use crate::matcher::{self, NameMatch};
use crate::models::{Anchor, Config, MeanSource, Student};
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use tracing::{debug, info};

/// Last year's speakers, keyed by lowercase name, valued by the record position
/// at which they spoke.
///
/// Iteration follows first insertion, so fuzzy matching sees names in file order.
/// A name that recurs keeps its original slot but takes the later position.
#[derive(Debug, Clone, Default)]
pub struct PriorYearIndex {
    entries: Vec<(String, usize)>,
    lookup: HashMap<String, usize>,
}

impl PriorYearIndex {
    /// Build the index from `date,name[/name...]` lines.
    ///
    /// A line's position is its line number among non-header lines, so blank and
    /// malformed lines still take a position even though they contribute no names.
    /// Lines whose first field starts with "date" (any case) are headers.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut index = Self::default();
        let mut headers = 0u64;
        let mut seen = 0u64;

        for line in lines(reader) {
            let line = line?;
            if line.is_header() {
                headers += 1;
                continue;
            }
            let position = (line.number - 1 - headers) as usize;
            seen = line.number - headers;

            if line.fields.len() == 2 {
                for name in line.fields[1].split('/') {
                    let name = name.trim().to_lowercase();
                    if !name.is_empty() {
                        index.insert(&name, position);
                    }
                }
            } else {
                debug!(line = line.number, fields = line.fields.len(), "skipping prior-year line");
            }
        }

        if index.is_empty() {
            return Err(Error::EmptyPriorYear);
        }
        info!(names = index.len(), lines = seen, "built prior-year index");
        Ok(index)
    }

    pub fn insert(&mut self, name: &str, position: usize) {
        match self.lookup.get(name) {
            Some(&slot) => self.entries[slot].1 = position,
            None => {
                self.lookup.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), position));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).map(|&slot| self.entries[slot].1)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, position)| (name.as_str(), *position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean position over all names; the default mean for senior students.
    pub fn average_position(&self) -> Result<f64> {
        if self.entries.is_empty() {
            return Err(Error::EmptyPriorYear);
        }
        let total: usize = self.entries.iter().map(|(_, position)| position).sum();
        Ok(total as f64 / self.entries.len() as f64)
    }
}

/// This year's students grouped by class year, in file order within each year.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub by_year: BTreeMap<u32, Vec<Student>>,
    pub total: usize,
    /// Fuzzy matches performed while assigning means, in roster order
    pub matches: Vec<NameMatch>,
}

impl Roster {
    /// Parse `first,last,year` lines and assign each student's distribution.
    ///
    /// Lines with the wrong field count, a year that is not a positive integer,
    /// or a blank name are dropped.
    pub fn from_reader<R: Read>(reader: R, index: &PriorYearIndex, config: &Config) -> Result<Self> {
        let mut roster = Roster::default();

        for line in lines(reader) {
            let line = line?;
            let mut student = match student_from_fields(&line.fields) {
                Ok(student) => student,
                Err(reason) => {
                    debug!(line = line.number, %reason, "skipping roster line");
                    continue;
                }
            };

            if student.year >= config.senior_min_year {
                student.mu = index.average_position()?;
                student.sigma = config.senior_sigma;
            } else if student.year == 1 {
                student.mu = config.first_year.mu;
                student.sigma = config.first_year.sigma;
            } else {
                let found = matcher::find_position(&student.search_name(), index)?;
                student.mu = found.position as f64;
                student.sigma = config.matched_sigma;
                roster.matches.push(found);
            }

            if let Some(exception) = config.override_for(&student.last_name) {
                student.mu = match exception.mu {
                    MeanSource::Fixed(mu) => mu,
                    MeanSource::Anchor(Anchor::PriorYearAverage) => index.average_position()?,
                };
                student.sigma = exception.sigma;
                debug!(student = %student, mu = student.mu, sigma = student.sigma, "applied name override");
            }

            roster.by_year.entry(student.year).or_default().push(student);
            roster.total += 1;
        }

        info!(students = roster.total, years = roster.year_count(), "parsed roster");
        Ok(roster)
    }

    pub fn year_count(&self) -> usize {
        self.by_year.len()
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.by_year.values().flatten()
    }
}

/// Why a roster line was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    FieldCount(usize),
    BadYear,
    BlankName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldCount(n) => write!(f, "expected 3 fields, found {}", n),
            SkipReason::BadYear => write!(f, "year is not a positive integer"),
            SkipReason::BlankName => write!(f, "blank first or last name"),
        }
    }
}

fn student_from_fields(fields: &[String]) -> std::result::Result<Student, SkipReason> {
    let [first, last, year] = fields else {
        return Err(SkipReason::FieldCount(fields.len()));
    };
    let year: u32 = year
        .parse()
        .ok()
        .filter(|&y| y > 0)
        .ok_or(SkipReason::BadYear)?;
    if first.is_empty() || last.is_empty() {
        return Err(SkipReason::BlankName);
    }
    Ok(Student::new(first.as_str(), last.as_str(), year))
}

/// One physical input line split on commas
struct Line {
    /// 1-based line number in the file
    number: u64,
    fields: Vec<String>,
}

impl Line {
    fn is_header(&self) -> bool {
        self.fields
            .first()
            .map_or(false, |field| field.to_lowercase().starts_with("date"))
    }
}

/// Quoting is off so every physical line is exactly one record, and bytes that
/// are not UTF-8 are replaced rather than failing the whole file.
fn lines<R: Read>(reader: R) -> impl Iterator<Item = Result<Line>> {
    let mut last = 0u64;
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader)
        .into_byte_records()
        .map(move |record| -> Result<Line> {
            let record: ByteRecord = record?;
            let number = record.position().map_or(last + 1, |p| p.line());
            last = number;
            let fields = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .collect();
            Ok(Line { number, fields })
        })
}
