//! Request payload validation.
//!
//! Every validator checks all fields and reports every failure at once, so a
//! form can highlight all problems in a single round trip. Validation never
//! echoes a regulated value back: SSN issues name the field and the expected
//! format only.

use std::sync::LazyLock;

use brickvault_crypto::Plaintext;
use brickvault_types::{PropertyStatus, UserId};
use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lifecycle::KycDecision;

static SSN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{2}-\d{4}$").expect("SSN pattern is valid"));

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("ZIP pattern is valid"));

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?\d{3}\)?[- ]?\d{3}[- ]?\d{4}$").expect("phone pattern is valid")
});

static QUARTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q[1-4] \d{4}$").expect("quarter pattern is valid"));

/// Date format accepted for dates of birth.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Country assumed when a listing does not name one.
pub const DEFAULT_COUNTRY: &str = "Kenya";

/// Oldest construction year accepted on a listing.
pub const EARLIEST_YEAR_BUILT: i32 = 1800;

/// Inclusive year range accepted for dividend distributions.
pub const DIVIDEND_YEARS: std::ops::RangeInclusive<i32> = 2020..=2100;

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// All rule failures for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether `field` has at least one issue.
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Accumulates issues for one payload.
#[derive(Debug, Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.0.push(FieldIssue {
                field,
                message: message.to_string(),
            });
        }
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Strips everything but digits (`123-45-6789` → `123456789`).
pub fn normalize_ssn(ssn: &Plaintext) -> Plaintext {
    Plaintext::new(digits_only(ssn.expose()))
}

/// Strips everything but digits (`(555) 123-4567` → `5551234567`).
pub fn normalize_phone(phone: &str) -> String {
    digits_only(phone)
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Whole years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

/// Identity details submitted by an investor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSubmission {
    pub legal_name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub ssn: Plaintext,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
}

impl KycSubmission {
    /// Validates against today's date.
    pub fn validate(&self, minimum_age: u32) -> Result<()> {
        self.validate_on(Utc::now().date_naive(), minimum_age)
    }

    /// Validates as if the current date were `today`.
    pub fn validate_on(&self, today: NaiveDate, minimum_age: u32) -> Result<()> {
        let mut issues = Issues::default();

        issues.check(
            min_chars(&self.legal_name, 2),
            "legalName",
            "Legal name must be at least 2 characters",
        );

        match NaiveDate::parse_from_str(&self.date_of_birth, DATE_FORMAT) {
            Ok(born) => issues.check(
                born <= today && i64::from(age_on(born, today)) >= i64::from(minimum_age),
                "dateOfBirth",
                &format!("You must be at least {minimum_age} years old"),
            ),
            Err(_) => issues.check(false, "dateOfBirth", "Date of birth must be YYYY-MM-DD"),
        }

        issues.check(
            SSN_RE.is_match(self.ssn.expose()),
            "ssn",
            "SSN must be in format XXX-XX-XXXX",
        );
        issues.check(min_chars(&self.address, 5), "address", "Address is required");
        issues.check(min_chars(&self.city, 2), "city", "City is required");
        issues.check(
            self.state.chars().count() == 2,
            "state",
            "State must be 2 characters (e.g., NY)",
        );
        issues.check(ZIP_RE.is_match(&self.zip_code), "zipCode", "Invalid ZIP code");
        issues.check(PHONE_RE.is_match(&self.phone), "phone", "Invalid phone number");

        issues.finish()
    }
}

/// A request to buy shares of a property.
///
/// Payload rules only; investments are not yet processed by a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    pub property_id: String,
    pub shares: i64,
    pub amount_cents: i64,
    #[serde(default)]
    pub bank_account_id: Option<String>,
}

impl InvestmentRequest {
    pub fn validate(&self) -> Result<()> {
        let mut issues = Issues::default();
        issues.check(
            !self.property_id.trim().is_empty(),
            "propertyId",
            "Property is required",
        );
        issues.check(
            self.shares > 0,
            "shares",
            "Number of shares must be positive",
        );
        issues.check(
            self.amount_cents > 0,
            "amountCents",
            "Investment amount must be positive",
        );
        issues.finish()
    }
}

/// A quarterly dividend payout for one property.
///
/// Payload rules only; payouts are not yet processed by a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendDistribution {
    pub property_id: String,
    pub total_amount_cents: i64,
    /// `Q1 2024`
    pub quarter: String,
    pub year: i32,
}

impl DividendDistribution {
    pub fn validate(&self) -> Result<()> {
        let mut issues = Issues::default();
        issues.check(
            !self.property_id.trim().is_empty(),
            "propertyId",
            "Property is required",
        );
        issues.check(
            self.total_amount_cents > 0,
            "totalAmountCents",
            "Total amount must be positive",
        );
        issues.check(
            QUARTER_RE.is_match(&self.quarter),
            "quarter",
            "Quarter must be in format \"Q1 2024\"",
        );
        issues.check(
            DIVIDEND_YEARS.contains(&self.year),
            "year",
            "Year must be between 2020 and 2100",
        );
        issues.finish()
    }
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// An offering as entered by an operator.
///
/// Money is in cents. Returns are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub zip_code: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub total_value_cents: i64,
    pub share_price_cents: i64,
    pub total_shares: i64,
    pub minimum_investment_cents: i64,
    pub expected_annual_return: f64,
    pub projected_roi: f64,
    pub property_type: String,
    #[serde(default)]
    pub square_feet: Option<i64>,
    #[serde(default)]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    pub bathrooms: Option<i64>,
    #[serde(default)]
    pub year_built: Option<i32>,
}

impl PropertyListing {
    pub fn validate(&self) -> Result<()> {
        self.validate_in(Utc::now().year())
    }

    /// Validates as if the current year were `current_year`.
    pub fn validate_in(&self, current_year: i32) -> Result<()> {
        let mut issues = Issues::default();

        issues.check(min_chars(&self.title, 5), "title", "Title must be at least 5 characters");
        issues.check(
            min_chars(&self.description, 50),
            "description",
            "Description must be at least 50 characters",
        );
        let short = self.short_description.trim().chars().count();
        issues.check(
            (20..=200).contains(&short),
            "shortDescription",
            "Short description must be between 20 and 200 characters",
        );
        issues.check(min_chars(&self.address, 5), "address", "Address is required");
        issues.check(min_chars(&self.city, 2), "city", "City is required");
        issues.check(min_chars(&self.state, 2), "state", "State is required");
        issues.check(min_chars(&self.country, 2), "country", "Country is required");
        issues.check(min_chars(&self.zip_code, 4), "zipCode", "ZIP code is required");

        issues.check(
            self.latitude.is_none_or(|lat| (-90.0..=90.0).contains(&lat)),
            "latitude",
            "Latitude must be between -90 and 90",
        );
        issues.check(
            self.longitude.is_none_or(|lng| (-180.0..=180.0).contains(&lng)),
            "longitude",
            "Longitude must be between -180 and 180",
        );

        issues.check(self.total_value_cents > 0, "totalValueCents", "Total value must be positive");
        issues.check(self.share_price_cents > 0, "sharePriceCents", "Share price must be positive");
        issues.check(self.total_shares > 0, "totalShares", "Total shares must be positive");
        issues.check(
            self.minimum_investment_cents > 0,
            "minimumInvestmentCents",
            "Minimum investment must be positive",
        );
        issues.check(
            self.total_shares <= 0
                || self.share_price_cents <= 0
                || self.funding_goal_cents().is_some(),
            "totalShares",
            "Funding goal is too large",
        );
        issues.check(
            (0.0..=100.0).contains(&self.expected_annual_return),
            "expectedAnnualReturn",
            "Expected annual return must be between 0 and 100",
        );
        issues.check(self.projected_roi >= 0.0, "projectedRoi", "Projected ROI cannot be negative");
        issues.check(
            !self.property_type.trim().is_empty(),
            "propertyType",
            "Property type is required",
        );

        issues.check(
            self.square_feet.is_none_or(|v| v > 0),
            "squareFeet",
            "Square feet must be positive",
        );
        issues.check(
            self.bedrooms.is_none_or(|v| v > 0),
            "bedrooms",
            "Bedrooms must be positive",
        );
        issues.check(
            self.bathrooms.is_none_or(|v| v > 0),
            "bathrooms",
            "Bathrooms must be positive",
        );
        issues.check(
            self.year_built
                .is_none_or(|year| (EARLIEST_YEAR_BUILT..=current_year).contains(&year)),
            "yearBuilt",
            &format!("Year built must be between {EARLIEST_YEAR_BUILT} and {current_year}"),
        );

        issues.finish()
    }

    /// `total_shares * share_price_cents`, or `None` on overflow.
    pub fn funding_goal_cents(&self) -> Option<i64> {
        self.total_shares.checked_mul(self.share_price_cents)
    }
}

/// Fields an operator may change after listing.
///
/// Share count and price are fixed once listed, so the funding goal never
/// moves under existing investors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub minimum_investment_cents: Option<i64>,
    #[serde(default)]
    pub expected_annual_return: Option<f64>,
    #[serde(default)]
    pub projected_roi: Option<f64>,
}

impl PropertyUpdate {
    /// Applies the set fields onto `listing`.
    pub fn apply_to(&self, listing: &mut PropertyListing) {
        if let Some(title) = &self.title {
            listing.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            listing.description.clone_from(description);
        }
        if let Some(short) = &self.short_description {
            listing.short_description.clone_from(short);
        }
        if let Some(minimum) = self.minimum_investment_cents {
            listing.minimum_investment_cents = minimum;
        }
        if let Some(rate) = self.expected_annual_return {
            listing.expected_annual_return = rate;
        }
        if let Some(roi) = self.projected_roi {
            listing.projected_roi = roi;
        }
    }
}

/// An operator's decision on one investor's KYC case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycReview {
    pub user_id: UserId,
    #[serde(flatten)]
    pub decision: KycDecision,
}

impl KycReview {
    pub fn validate(&self) -> Result<()> {
        let mut issues = Issues::default();
        if let KycDecision::Rejected { reason } = &self.decision {
            issues.check(
                !reason.trim().is_empty(),
                "rejectionReason",
                "A rejection must state a reason",
            );
        }
        issues.finish()
    }
}
