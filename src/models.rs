use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduling policy. Every constant that decides a student's distribution lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Class years whose students are shuffled together and paired into shared weeks
    pub pairable_years: Vec<u32>,
    /// Students at or above this year speak around last year's average position
    pub senior_min_year: u32,
    pub senior_sigma: f64,
    /// Spread used for students whose mean comes from a fuzzy match against last year
    pub matched_sigma: f64,
    pub first_year: TierParams,
    /// Per-surname exceptions, checked in order after the year-based policy
    pub overrides: Vec<NameOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    pub mu: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameOverride {
    pub last_name: String,
    pub mu: MeanSource,
    pub sigma: f64,
}

/// Either a literal mean or one resolved from the prior-year index.
///
/// In TOML this is a number (`mu = -20.0`) or `mu = "prior_year_average"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeanSource {
    Fixed(f64),
    Anchor(Anchor),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    PriorYearAverage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pairable_years: vec![1, 2],
            senior_min_year: 4,
            senior_sigma: 3.0,
            matched_sigma: 5.0,
            first_year: TierParams { mu: 6.0, sigma: 7.0 },
            overrides: vec![
                // Presented at the retreat, so treated like a senior
                NameOverride {
                    last_name: "Himmelstein".to_string(),
                    mu: MeanSource::Anchor(Anchor::PriorYearAverage),
                    sigma: 3.0,
                },
                NameOverride {
                    last_name: "Citron".to_string(),
                    mu: MeanSource::Fixed(-20.0),
                    sigma: 0.1,
                },
                NameOverride {
                    last_name: "Loshbaugh".to_string(),
                    mu: MeanSource::Fixed(-20.0),
                    sigma: 0.1,
                },
                NameOverride {
                    last_name: "Sharon".to_string(),
                    mu: MeanSource::Fixed(0.0),
                    sigma: 1.0,
                },
            ],
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    /// Rejects spreads a normal distribution cannot be built from.
    pub fn validate(&self) -> crate::Result<()> {
        let check = |label: &str, sigma: f64| {
            if sigma.is_finite() && sigma >= 0.0 {
                Ok(())
            } else {
                Err(crate::Error::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    label, sigma
                )))
            }
        };

        check("senior_sigma", self.senior_sigma)?;
        check("matched_sigma", self.matched_sigma)?;
        check("first_year.sigma", self.first_year.sigma)?;
        if !self.first_year.mu.is_finite() {
            return Err(crate::Error::Config("first_year.mu must be finite".to_string()));
        }
        for entry in &self.overrides {
            check(&format!("override sigma for {}", entry.last_name), entry.sigma)?;
        }
        Ok(())
    }

    /// First override whose surname matches exactly (case-sensitive).
    pub fn override_for(&self, last_name: &str) -> Option<&NameOverride> {
        self.overrides.iter().find(|o| o.last_name == last_name)
    }

    pub fn is_pairable(&self, year: u32) -> bool {
        self.pairable_years.contains(&year)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub year: u32,
    pub mu: f64,
    pub sigma: f64,
}

impl Student {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, year: u32) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            year,
            mu: 0.0,
            sigma: 1.0,
        }
    }

    /// Lowercase "first last" key used to look the student up in last year's records
    pub fn search_name(&self) -> String {
        format!("{} {}", self.first_name.to_lowercase(), self.last_name.to_lowercase())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.year {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        };
        write!(f, "{} {}, {}{} year", self.first_name, self.last_name, self.year, suffix)
    }
}

/// One speaking slot holding one or two students.
#[derive(Debug, Clone, PartialEq)]
pub struct Week {
    students: Vec<Student>,
    pub mu: f64,
    pub sigma: f64,
    pub last_draw: Option<f64>,
}

impl Week {
    pub fn solo(student: Student) -> Self {
        Self::from_students(vec![student])
    }

    pub fn pair(first: Student, second: Student) -> Self {
        Self::from_students(vec![first, second])
    }

    fn from_students(students: Vec<Student>) -> Self {
        let count = students.len() as f64;
        let mu = students.iter().map(|s| s.mu).sum::<f64>() / count;
        let sigma = students.iter().map(|s| s.sigma).sum::<f64>() / count;
        Self {
            students,
            mu,
            sigma,
            last_draw: None,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn is_pair(&self) -> bool {
        self.students.len() == 2
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.students.iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", names.join("; "))
    }
}
