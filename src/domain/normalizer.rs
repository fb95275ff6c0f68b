//! Phone number cleaning, validation and formatting.
//!
//! Everything here is total: malformed input produces an invalid
//! [`ValidationResult`] or an unchanged string, never a panic.

use super::country::{CountryRule, CountryRules, LengthRule};
use super::errors::ValidationErrorKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static NON_DIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9+]").expect("Failed to compile dial character regex"));

/// Generic lower bound on digit count (E.164 allows shorter, the site does not).
pub const MIN_DIGITS: usize = 7;

/// E.164 upper bound on digit count.
pub const MAX_DIGITS: usize = 15;

const ASCENDING: &str = "0123456789012345";
const DESCENDING: &str = "5432109876543210";

/// Placeholder numbers people type to get past a form.
const PLACEHOLDER_NUMBERS: [&str; 4] = ["5551234567", "1234567890", "0000000000", "1111111111"];

/// A digit-only string with at most one leading `+`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CleanedNumber(String);

impl CleanedNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The digits, without the leading `+`.
    pub fn digits(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }

    pub fn has_plus(&self) -> bool {
        self.0.starts_with('+')
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CleanedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of [`PhoneNormalizer::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
    pub kind: Option<ValidationErrorKind>,
    pub cleaned: CleanedNumber,
}

impl ValidationResult {
    fn valid(cleaned: CleanedNumber) -> Self {
        Self {
            is_valid: true,
            error: None,
            kind: None,
            cleaned,
        }
    }

    fn invalid(kind: ValidationErrorKind, message: &str, cleaned: CleanedNumber) -> Self {
        Self {
            is_valid: false,
            error: Some(message.to_string()),
            kind: Some(kind),
            cleaned,
        }
    }
}

/// Strip everything except digits and a single leading `+`.
///
/// # Example
///
/// ```
/// use people_lookup_mcp::domain::clean;
///
/// assert_eq!(clean("+1 (408) 123-4567").as_str(), "+14081234567");
/// assert_eq!(clean("408+123").as_str(), "408123");
/// ```
pub fn clean(input: &str) -> CleanedNumber {
    let kept = NON_DIAL_CHARS.replace_all(input, "");
    let mut out = String::with_capacity(kept.len());
    for c in kept.chars() {
        if c != '+' || out.is_empty() {
            out.push(c);
        }
    }
    CleanedNumber(out)
}

/// Display formatting.
///
/// 10 digits become `(AAA) EEE-NNNN`, 11 digits with a leading `1` become
/// `+1 (AAA) EEE-NNNN`. Other `+`-prefixed input is assumed to be formatted
/// already. Anything longer than 6 digits is grouped `AAA-EEE-NNNN...`.
pub fn format(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let cleaned = clean(input);
    let digits = cleaned.digits();

    if let Some(subscriber) = nanp_subscriber(digits) {
        let local = format_nanp(subscriber);
        return if digits.len() == 11 {
            format!("+1 {}", local)
        } else {
            local
        };
    }

    if input.starts_with('+') {
        return input.to_string();
    }

    if digits.len() > 6 {
        return format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]);
    }

    input.to_string()
}

/// Canonical `+<digits>` form used in outbound requests.
pub fn format_for_wire(input: &str) -> String {
    let cleaned = clean(input);
    let digits = cleaned.digits();

    match digits.len() {
        10 => format!("+1{}", digits),
        11 if digits.starts_with('1') => format!("+{}", digits),
        _ if cleaned.has_plus() => cleaned.into_inner(),
        _ => format!("+{}", digits),
    }
}

/// The 10-digit NANP subscriber number, if `digits` has that shape.
fn nanp_subscriber(digits: &str) -> Option<&str> {
    match digits.len() {
        10 => Some(digits),
        11 if digits.starts_with('1') => Some(&digits[1..]),
        _ => None,
    }
}

fn format_nanp(subscriber: &str) -> String {
    format!(
        "({}) {}-{}",
        &subscriber[..3],
        &subscriber[3..6],
        &subscriber[6..]
    )
}

fn has_invalid_pattern(digits: &str) -> bool {
    let mut chars = digits.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if ASCENDING.contains(digits) || DESCENDING.contains(digits) {
        return true;
    }

    PLACEHOLDER_NUMBERS.contains(&digits)
}

/// Country-aware validation and formatting over an injected rule table.
#[derive(Debug, Clone, Default)]
pub struct PhoneNormalizer {
    rules: CountryRules,
}

impl PhoneNormalizer {
    pub fn new(rules: CountryRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CountryRules {
        &self.rules
    }

    /// Validate a raw phone number, optionally against a country's rules.
    ///
    /// Unknown country codes are treated like no country at all: only the
    /// generic bounds apply, plus the NANP check when the number is
    /// US-shaped.
    ///
    /// # Example
    ///
    /// ```
    /// use people_lookup_mcp::domain::{PhoneNormalizer, ValidationErrorKind};
    ///
    /// let normalizer = PhoneNormalizer::default();
    /// assert!(normalizer.validate("(408) 234-5678", Some("US")).is_valid);
    ///
    /// let result = normalizer.validate("0234567890", Some("US"));
    /// assert_eq!(result.kind, Some(ValidationErrorKind::InvalidAreaCode));
    /// ```
    pub fn validate(&self, input: &str, country: Option<&str>) -> ValidationResult {
        use ValidationErrorKind::*;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return ValidationResult::invalid(
                EmptyInput,
                "Phone number is required",
                CleanedNumber::default(),
            );
        }

        let cleaned = clean(trimmed);
        let digits = cleaned.digits();

        if digits.is_empty() {
            return ValidationResult::invalid(
                EmptyInput,
                "Please enter a valid phone number",
                cleaned,
            );
        }
        if digits.len() < MIN_DIGITS {
            return ValidationResult::invalid(TooShort, "Phone number is too short", cleaned);
        }
        if digits.len() > MAX_DIGITS {
            return ValidationResult::invalid(TooLong, "Phone number is too long", cleaned);
        }

        let rule = country.and_then(|code| self.rules.get(code));

        if let Some(rule) = rule {
            if let Some((kind, message)) = check_length(rule, &cleaned) {
                return ValidationResult::invalid(kind, message, cleaned);
            }
        }

        let nanp_applies = rule.map_or(true, CountryRule::is_nanp);
        if nanp_applies {
            if let Some(subscriber) = nanp_subscriber(digits) {
                if matches!(subscriber.as_bytes()[0], b'0' | b'1') {
                    return ValidationResult::invalid(
                        InvalidAreaCode,
                        "Invalid area code - cannot start with 0 or 1",
                        cleaned,
                    );
                }
                if matches!(subscriber.as_bytes()[3], b'0' | b'1') {
                    return ValidationResult::invalid(
                        InvalidExchangeCode,
                        "Invalid exchange code - cannot start with 0 or 1",
                        cleaned,
                    );
                }
            }
        }

        if has_invalid_pattern(digits) {
            return ValidationResult::invalid(
                InvalidPattern,
                "Please enter a valid phone number",
                cleaned,
            );
        }

        ValidationResult::valid(cleaned)
    }

    /// Wire format using the country's dial code.
    ///
    /// NANP countries follow [`format_for_wire`] except that short numbers
    /// still get `+1`. Other countries get their dial code prepended unless
    /// the digits already start with it. Unknown countries fall back to
    /// [`format_for_wire`].
    pub fn format_for_wire_in(&self, input: &str, country: &str) -> String {
        let Some(rule) = self.rules.get(country) else {
            return format_for_wire(input);
        };

        let cleaned = clean(input);
        let digits = cleaned.digits();

        if rule.is_nanp() {
            return match digits.len() {
                11 if digits.starts_with('1') => format!("+{}", digits),
                _ => format!("+1{}", digits),
            };
        }

        if digits.starts_with(rule.dial_digits()) {
            format!("+{}", digits)
        } else {
            format!("+{}{}", rule.dial_digits(), digits)
        }
    }

    /// National display pattern for the few countries the site formats.
    pub fn format_national(&self, input: &str, country: &str) -> String {
        let digits = clean(input).digits().to_string();
        let code = self.rules.get(country).map(|rule| rule.code).unwrap_or("");

        match (code, digits.len()) {
            ("US" | "CA", 10) => format_nanp(&digits),
            ("GB", 11) => format!("{} {} {}", &digits[..2], &digits[2..6], &digits[6..]),
            ("AU", 9) => format!("{} {} {}", &digits[..1], &digits[1..5], &digits[5..]),
            ("IN", 10) => format!("{} {}", &digits[..5], &digits[5..]),
            _ => input.to_string(),
        }
    }

    /// Guess the country from an international dial-code prefix.
    ///
    /// Defaults to `US` when nothing matches.
    pub fn country_for_number(&self, input: &str) -> &CountryRule {
        const PREFIXES: [(&str, &str); 7] = [
            ("1", "US"),
            ("44", "GB"),
            ("61", "AU"),
            ("49", "DE"),
            ("33", "FR"),
            ("81", "JP"),
            ("91", "IN"),
        ];

        let cleaned = clean(input);
        let digits = cleaned.digits();
        let code = PREFIXES
            .iter()
            .find(|(prefix, _)| digits.starts_with(prefix))
            .map(|(_, code)| *code)
            .unwrap_or("US");

        self.rules
            .get(code)
            .or_else(|| self.rules.iter().next())
            .unwrap_or(&FALLBACK_RULE)
    }
}

// Used only when an injected table is empty.
static FALLBACK_RULE: CountryRule = CountryRule {
    code: "US",
    name: "United States",
    dial_code: "+1",
    length: LengthRule::Nanp,
    area_code: super::country::AreaCodeRule::Nanp,
    example: "408-234-5678",
    length_message: "US/Canada numbers must be 10 digits",
};

fn check_length(
    rule: &CountryRule,
    cleaned: &CleanedNumber,
) -> Option<(ValidationErrorKind, &'static str)> {
    let digits = cleaned.digits();

    if let LengthRule::Nanp = rule.length {
        return match digits.len() {
            n if n < 10 => Some((ValidationErrorKind::TooShort, rule.length_message)),
            n if n > 11 => Some((ValidationErrorKind::TooLong, "Phone number is too long")),
            11 if !digits.starts_with('1') => Some((
                ValidationErrorKind::TooLong,
                "US phone numbers must be 10 digits or 11 digits starting with 1",
            )),
            _ => None,
        };
    }

    let national = match digits.strip_prefix(rule.dial_digits()) {
        Some(rest) if cleaned.has_plus() => rest,
        _ => digits,
    };

    if national.len() < rule.length.min() {
        Some((ValidationErrorKind::TooShort, rule.length_message))
    } else if national.len() > rule.length.max() {
        Some((ValidationErrorKind::TooLong, rule.length_message))
    } else {
        None
    }
}
