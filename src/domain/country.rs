//! Country rule table.
//!
//! The table is an ordinary value: build it once with
//! [`CountryRules::standard`] and hand it to whatever needs it.

use serde::Serialize;

/// Accepted digit counts for a country's national number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LengthRule {
    /// 10 digits, or 11 with a leading `1`.
    Nanp,
    /// Inclusive range.
    Range { min: usize, max: usize },
    /// Exactly this many digits.
    Exact(usize),
}

impl LengthRule {
    pub fn min(&self) -> usize {
        match *self {
            LengthRule::Nanp => 10,
            LengthRule::Range { min, .. } => min,
            LengthRule::Exact(n) => n,
        }
    }

    pub fn max(&self) -> usize {
        match *self {
            LengthRule::Nanp => 11,
            LengthRule::Range { max, .. } => max,
            LengthRule::Exact(n) => n,
        }
    }
}

/// Constraint on the leading digits of the area code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaCodeRule {
    /// Area and exchange codes never start with 0 or 1.
    Nanp,
    Unconstrained,
}

/// Dialing and length rules for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRule {
    /// ISO-2 code, upper case
    pub code: &'static str,
    pub name: &'static str,
    /// Dial code including the leading `+`
    pub dial_code: &'static str,
    pub length: LengthRule,
    pub area_code: AreaCodeRule,
    /// Example number shown as a placeholder in search forms
    pub example: &'static str,
    /// Message used when the length rule is violated
    pub length_message: &'static str,
}

impl CountryRule {
    /// Dial code digits without the `+`.
    pub fn dial_digits(&self) -> &'static str {
        self.dial_code.trim_start_matches('+')
    }

    pub fn is_nanp(&self) -> bool {
        self.area_code == AreaCodeRule::Nanp
    }
}

/// Immutable collection of [`CountryRule`]s keyed by ISO-2 code.
#[derive(Debug, Clone)]
pub struct CountryRules {
    rules: Vec<CountryRule>,
}

impl CountryRules {
    pub fn new(rules: Vec<CountryRule>) -> Self {
        Self { rules }
    }

    /// The rule set served by the lookup site.
    pub fn standard() -> Self {
        Self::new(vec![
            nanp("US", "United States", "408-234-5678"),
            nanp("CA", "Canada", "416-234-5678"),
            CountryRule {
                code: "GB",
                name: "United Kingdom",
                dial_code: "+44",
                length: LengthRule::Range { min: 10, max: 11 },
                area_code: AreaCodeRule::Unconstrained,
                example: "20 1234 5678",
                length_message: "UK numbers must be 10-11 digits",
            },
            CountryRule {
                code: "AU",
                name: "Australia",
                dial_code: "+61",
                length: LengthRule::Range { min: 9, max: 10 },
                area_code: AreaCodeRule::Unconstrained,
                example: "2 1234 5678",
                length_message: "Australian numbers must be 9-10 digits",
            },
            CountryRule {
                code: "DE",
                name: "Germany",
                dial_code: "+49",
                length: LengthRule::Range { min: 10, max: 12 },
                area_code: AreaCodeRule::Unconstrained,
                example: "30 12345678",
                length_message: "German numbers must be 10-12 digits",
            },
            CountryRule {
                code: "FR",
                name: "France",
                dial_code: "+33",
                length: LengthRule::Exact(10),
                area_code: AreaCodeRule::Unconstrained,
                example: "1 23 45 67 89",
                length_message: "French numbers must be 10 digits",
            },
            CountryRule {
                code: "JP",
                name: "Japan",
                dial_code: "+81",
                length: LengthRule::Range { min: 10, max: 11 },
                area_code: AreaCodeRule::Unconstrained,
                example: "3-1234-5678",
                length_message: "Japanese numbers must be 10-11 digits",
            },
            CountryRule {
                code: "IN",
                name: "India",
                dial_code: "+91",
                length: LengthRule::Exact(10),
                area_code: AreaCodeRule::Unconstrained,
                example: "98765 43210",
                length_message: "Indian numbers must be 10 digits",
            },
            generic("BR", "Brazil", "+55", "11 91234-5678"),
            generic("MX", "Mexico", "+52", "55 1234 5678"),
        ])
    }

    /// Case-insensitive lookup by ISO-2 code.
    pub fn get(&self, code: &str) -> Option<&CountryRule> {
        let code = code.trim();
        self.rules
            .iter()
            .find(|rule| rule.code.eq_ignore_ascii_case(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CountryRules {
    fn default() -> Self {
        Self::standard()
    }
}

fn nanp(code: &'static str, name: &'static str, example: &'static str) -> CountryRule {
    CountryRule {
        code,
        name,
        dial_code: "+1",
        length: LengthRule::Nanp,
        area_code: AreaCodeRule::Nanp,
        example,
        length_message: "US/Canada numbers must be 10 digits",
    }
}

// Countries listed in the selector without a dedicated length rule.
fn generic(
    code: &'static str,
    name: &'static str,
    dial_code: &'static str,
    example: &'static str,
) -> CountryRule {
    CountryRule {
        code,
        name,
        dial_code,
        length: LengthRule::Range { min: 7, max: 15 },
        area_code: AreaCodeRule::Unconstrained,
        example,
        length_message: "Phone number must be 7-15 digits",
    }
}
