//! Item model for the card vault
//!
//! A [`Card`] is any scanned document the vault stores: bank cards,
//! business cards, passports, licenses. Expiry dates use the `MM/YY` or
//! `MM/YYYY` form printed on the physical card and are interpreted as the
//! last day of the expiry month.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Category of a stored card or document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Banking,
    Business,
    Id,
    Loyalty,
    Passport,
    #[serde(rename = "Driver License")]
    DriverLicense,
    #[serde(rename = "National ID")]
    NationalId,
    #[serde(rename = "Student ID")]
    StudentId,
    Other,
}

impl CardCategory {
    /// All categories, in display order
    pub const ALL: [CardCategory; 9] = [
        CardCategory::Banking,
        CardCategory::Business,
        CardCategory::Id,
        CardCategory::Loyalty,
        CardCategory::Passport,
        CardCategory::DriverLicense,
        CardCategory::NationalId,
        CardCategory::StudentId,
        CardCategory::Other,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CardCategory::Banking => "Banking",
            CardCategory::Business => "Business",
            CardCategory::Id => "ID",
            CardCategory::Loyalty => "Loyalty",
            CardCategory::Passport => "Passport",
            CardCategory::DriverLicense => "Driver License",
            CardCategory::NationalId => "National ID",
            CardCategory::StudentId => "Student ID",
            CardCategory::Other => "Other",
        }
    }

    /// Default display gradient for cards of this category
    pub fn default_theme(&self) -> &'static str {
        match self {
            CardCategory::Banking => "from-blue-600 to-blue-800",
            CardCategory::Business => "from-gray-700 to-gray-900",
            CardCategory::Passport => "from-indigo-900 to-slate-900",
            CardCategory::DriverLicense => "from-amber-700 to-orange-900",
            CardCategory::Loyalty => "from-gray-400 to-gray-600",
            _ => "from-slate-700 to-slate-900",
        }
    }
}

impl std::fmt::Display for CardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured fields produced by the external extraction collaborator
///
/// Only `issuer`, `category`, and `holder_name` are guaranteed; everything
/// else depends on what is visible on the scanned document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardFields {
    pub issuer: String,
    #[serde(rename = "type")]
    pub category: CardCategory,
    #[serde(default)]
    pub number: String,
    #[serde(rename = "holderName")]
    pub holder_name: String,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub nationality: Option<String>,
}

/// A stored card or identity document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier
    pub id: Uuid,
    /// Document category
    pub category: CardCategory,
    /// Issuing entity (Visa, company, government)
    pub issuer: String,
    /// Primary identifier (card number, passport number, phone)
    pub number: String,
    /// Name of the holder
    pub holder_name: String,
    /// Expiry in `MM/YY` or `MM/YYYY` form, when printed on the card
    pub expiry_date: Option<String>,
    /// Security code, when visible
    pub cvv: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Job title (business cards)
    pub job_title: Option<String>,
    /// Email (business cards)
    pub email: Option<String>,
    /// Phone (business cards)
    pub phone: Option<String>,
    /// Date of birth (identity documents)
    pub dob: Option<String>,
    /// Nationality or country code (passports, IDs)
    pub nationality: Option<String>,
    /// Display gradient
    pub color_theme: String,
    /// Creation timestamp, Unix epoch milliseconds
    pub created_at: u64,
    /// Number of times this card has been accessed
    pub usage_count: u32,
}

impl Card {
    /// Build a card from extracted fields
    pub fn from_fields(fields: CardFields, now_ms: u64) -> Self {
        let color_theme = fields.category.default_theme().to_string();
        Self {
            id: Uuid::new_v4(),
            category: fields.category,
            issuer: fields.issuer,
            number: fields.number,
            holder_name: fields.holder_name,
            expiry_date: fields.expiry_date,
            cvv: fields.cvv,
            notes: None,
            job_title: fields.job_title,
            email: fields.email,
            phone: fields.phone,
            dob: fields.dob,
            nationality: fields.nationality,
            color_theme,
            created_at: now_ms,
            usage_count: 0,
        }
    }

    /// Increment the access counter and return the new value
    pub fn record_use(&mut self) -> u32 {
        self.usage_count += 1;
        self.usage_count
    }

    /// The card's effective expiry day (last day of the expiry month)
    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry_date.as_deref().and_then(|s| parse_expiry(s).ok())
    }

    /// Whether the card has expired as of `now_ms`
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match (self.expiry(), epoch_ms_to_date(now_ms)) {
            (Some(expiry), Some(today)) => expiry < today,
            _ => false,
        }
    }

    /// Days until expiry (negative if already expired)
    pub fn days_until_expiry(&self, now_ms: u64) -> Option<i64> {
        let expiry = self.expiry()?;
        let today = epoch_ms_to_date(now_ms)?;
        Some((expiry - today).num_days())
    }
}

/// Parse a `MM/YY` or `MM/YYYY` expiry string into the last day of that month
pub fn parse_expiry(s: &str) -> Result<NaiveDate> {
    let mut parts = s.split('/');
    let (month, year) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(y), None) => (m.trim(), y.trim()),
        _ => return Err(CoreError::InvalidExpiry(s.to_string())),
    };

    let month: u32 = month
        .parse()
        .map_err(|_| CoreError::InvalidExpiry(s.to_string()))?;
    let mut year: i32 = year
        .parse()
        .map_err(|_| CoreError::InvalidExpiry(s.to_string()))?;
    if year < 100 {
        year += 2000;
    }
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidExpiry(s.to_string()));
    }

    // First day of the following month, minus one day
    let (next_y, next_m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .map(|d| d.pred_opt().unwrap_or(d))
        .ok_or_else(|| CoreError::InvalidExpiry(s.to_string()))
}

fn epoch_ms_to_date(now_ms: u64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(now_ms as i64).map(|dt| {
        NaiveDate::from_ymd_opt(dt.year(), dt.month(), dt.day()).expect("valid calendar date")
    })
}

/// Mask a card number for display, keeping the first and last four digits
pub fn mask_card_number(number: &str) -> String {
    if number.len() < 8 {
        return number.to_string();
    }
    let first4: String = number.chars().take(4).collect();
    let last4: String = number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{} **** **** {}", first4, last4)
}

/// Serde helper for 32-byte values stored as hex strings
pub mod hex_bytes_32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid length, expected 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card(expiry: Option<&str>) -> Card {
        Card {
            id: Uuid::new_v4(),
            category: CardCategory::Banking,
            issuer: "Visa".to_string(),
            number: "4242424242424242".to_string(),
            holder_name: "Alex Johnson".to_string(),
            expiry_date: expiry.map(str::to_string),
            cvv: None,
            notes: None,
            job_title: None,
            email: None,
            phone: None,
            dob: None,
            nationality: None,
            color_theme: CardCategory::Banking.default_theme().to_string(),
            created_at: 0,
            usage_count: 0,
        }
    }

    // 2026-06-15 00:00:00 UTC
    const NOW_MS: u64 = 1_781_481_600_000;

    #[test]
    fn test_parse_expiry_short_year() {
        let date = parse_expiry("12/28").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2028, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_expiry_full_year() {
        let date = parse_expiry("02/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_expiry_rejects_garbage() {
        assert!(parse_expiry("").is_err());
        assert!(parse_expiry("13/28").is_err());
        assert!(parse_expiry("1/2/3").is_err());
        assert!(parse_expiry("ab/cd").is_err());
    }

    #[test]
    fn test_card_expired() {
        assert!(sample_card(Some("01/24")).is_expired(NOW_MS));
        assert!(!sample_card(Some("12/28")).is_expired(NOW_MS));
        assert!(!sample_card(None).is_expired(NOW_MS));
    }

    #[test]
    fn test_card_valid_through_end_of_month() {
        // Expiry month is the current month: still valid
        assert!(!sample_card(Some("06/26")).is_expired(NOW_MS));
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(
            mask_card_number("4242424242424242"),
            "4242 **** **** 4242"
        );
        // Short identifiers pass through untouched
        assert_eq!(mask_card_number("G-9999"), "G-9999");
    }

    #[test]
    fn test_record_use() {
        let mut card = sample_card(None);
        assert_eq!(card.record_use(), 1);
        assert_eq!(card.record_use(), 2);
    }

    #[test]
    fn test_category_serde_labels() {
        let json = serde_json::to_string(&CardCategory::DriverLicense).unwrap();
        assert_eq!(json, "\"Driver License\"");
        let back: CardCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CardCategory::DriverLicense);
    }
}
