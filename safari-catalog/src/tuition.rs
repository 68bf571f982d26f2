use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_YEARS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgrammeLevel {
    Certificate,
    Diploma,
    Bachelor,
    Master,
}

impl ProgrammeLevel {
    pub const ALL: [ProgrammeLevel; 4] = [
        ProgrammeLevel::Certificate,
        ProgrammeLevel::Diploma,
        ProgrammeLevel::Bachelor,
        ProgrammeLevel::Master,
    ];

    /// Annual tuition in USD.
    pub fn annual_tuition(&self) -> Decimal {
        match self {
            ProgrammeLevel::Certificate => Decimal::from(1_200),
            ProgrammeLevel::Diploma => Decimal::from(1_800),
            ProgrammeLevel::Bachelor => Decimal::from(2_600),
            ProgrammeLevel::Master => Decimal::from(3_400),
        }
    }
}

impl FromStr for ProgrammeLevel {
    type Err = TuitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "certificate" => Ok(ProgrammeLevel::Certificate),
            "diploma" => Ok(ProgrammeLevel::Diploma),
            "bachelor" | "bachelors" | "undergraduate" => Ok(ProgrammeLevel::Bachelor),
            "master" | "masters" | "postgraduate" => Ok(ProgrammeLevel::Master),
            other => Err(TuitionError::UnknownProgramme(other.to_string())),
        }
    }
}

// One-off and per-year charges shared by every programme.
const APPLICATION_FEE: i64 = 50;
const REGISTRATION_FEE: i64 = 150;
const LIBRARY_FEE_PER_YEAR: i64 = 40;
const EXAMINATION_FEE_PER_YEAR: i64 = 120;
const ACCOMMODATION_PER_YEAR: i64 = 1_800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitionEstimate {
    pub programme: ProgrammeLevel,
    pub years: u32,
    pub lines: Vec<FeeLine>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TuitionError {
    #[error("Unknown programme: {0}")]
    UnknownProgramme(String),
    #[error("Years must be between 1 and {max}, got {got}")]
    InvalidYears { got: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TuitionCalculator;

impl TuitionCalculator {
    /// Sums the fee table for `years` of study at `programme` level.
    pub fn estimate(
        &self,
        programme: ProgrammeLevel,
        years: u32,
        include_accommodation: bool,
    ) -> Result<TuitionEstimate, TuitionError> {
        if years == 0 || years > MAX_YEARS {
            return Err(TuitionError::InvalidYears { got: years, max: MAX_YEARS });
        }
        let per_year = |amount: Decimal| amount * Decimal::from(years);

        let mut lines = vec![
            FeeLine {
                label: "Tuition".to_string(),
                amount: per_year(programme.annual_tuition()),
            },
            FeeLine {
                label: "Application fee".to_string(),
                amount: Decimal::from(APPLICATION_FEE),
            },
            FeeLine {
                label: "Registration fee".to_string(),
                amount: Decimal::from(REGISTRATION_FEE),
            },
            FeeLine {
                label: "Library fee".to_string(),
                amount: per_year(Decimal::from(LIBRARY_FEE_PER_YEAR)),
            },
            FeeLine {
                label: "Examination fee".to_string(),
                amount: per_year(Decimal::from(EXAMINATION_FEE_PER_YEAR)),
            },
        ];
        if include_accommodation {
            lines.push(FeeLine {
                label: "Accommodation".to_string(),
                amount: per_year(Decimal::from(ACCOMMODATION_PER_YEAR)),
            });
        }

        let total = lines.iter().map(|l| l.amount).sum();
        Ok(TuitionEstimate {
            programme,
            years,
            lines,
            total,
        })
    }
}
