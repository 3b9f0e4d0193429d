use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").expect("plate regex"));

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Plates are exactly 3 letters followed by 3 digits, case-insensitive.
pub fn valid_plate(plate: &str) -> bool {
    PLATE_RE.is_match(plate)
}

/// Two-tier tariff table: one rate for motorcycles, a flat rate for every
/// other vehicle class. Amounts must match exactly; mismatches are rejected,
/// never clamped.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Tariffs {
    #[serde(default = "default_motorcycle_rate")]
    pub motorcycle: i32,
    #[serde(default = "default_standard_rate")]
    pub standard: i32,
}

fn default_motorcycle_rate() -> i32 {
    30
}

fn default_standard_rate() -> i32 {
    50
}

impl Default for Tariffs {
    fn default() -> Self {
        Tariffs {
            motorcycle: default_motorcycle_rate(),
            standard: default_standard_rate(),
        }
    }
}

impl Tariffs {
    pub fn expected(&self, vehicle: &str) -> i32 {
        if vehicle == "Motorcycle" {
            self.motorcycle
        } else {
            self.standard
        }
    }
}
