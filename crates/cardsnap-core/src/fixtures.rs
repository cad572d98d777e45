//! Fixture card sets
//!
//! `decoy_cards` backs the duress vault: a fixed, deliberately boring set
//! that is never written to the real store. `starter_cards` seeds a fresh
//! install when no items blob exists yet.

use uuid::Uuid;

use crate::types::{Card, CardCategory};

fn card(
    category: CardCategory,
    issuer: &str,
    number: &str,
    holder: &str,
    expiry: Option<&str>,
    created_at: u64,
    usage_count: u32,
) -> Card {
    Card {
        id: Uuid::new_v4(),
        category,
        issuer: issuer.to_string(),
        number: number.to_string(),
        holder_name: holder.to_string(),
        expiry_date: expiry.map(str::to_string),
        cvv: None,
        notes: None,
        job_title: None,
        email: None,
        phone: None,
        dob: None,
        nationality: None,
        color_theme: category.default_theme().to_string(),
        created_at,
        usage_count,
    }
}

/// The decoy vault contents shown to a duress session
pub fn decoy_cards(now_ms: u64) -> Vec<Card> {
    vec![
        card(
            CardCategory::Loyalty,
            "Library Card",
            "12345678",
            "John Doe",
            None,
            now_ms,
            1,
        ),
        card(
            CardCategory::Other,
            "Gym Membership",
            "G-9999",
            "John Doe",
            None,
            now_ms,
            0,
        ),
    ]
}

/// Starter cards for a fresh install with no persisted items
pub fn starter_cards(now_ms: u64) -> Vec<Card> {
    let mut business = card(
        CardCategory::Business,
        "TechCorp Inc.",
        "+1 555 0123",
        "Sarah Smith",
        None,
        now_ms.saturating_sub(100_000),
        8,
    );
    business.job_title = Some("Senior Software Engineer".to_string());
    business.email = Some("sarah.smith@techcorp.com".to_string());
    business.phone = Some("+1 555 0123".to_string());
    business.notes = Some("Met at TechConf 2024".to_string());

    let mut passport = card(
        CardCategory::Passport,
        "United States",
        "A12345678",
        "Alex Johnson",
        Some("01/24"),
        now_ms.saturating_sub(2_000_000),
        1,
    );
    passport.dob = Some("15/05/1990".to_string());
    passport.nationality = Some("USA".to_string());

    let mut license = card(
        CardCategory::DriverLicense,
        "California DMV",
        "D98765432",
        "Alex Johnson",
        Some("10/25"),
        now_ms.saturating_sub(3_000_000),
        5,
    );
    license.dob = Some("15/05/1990".to_string());

    vec![
        card(
            CardCategory::Banking,
            "Visa",
            "**** **** **** 4242",
            "Alex Johnson",
            Some("12/28"),
            now_ms,
            15,
        ),
        business,
        passport,
        license,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoy_set_is_fixed_shape() {
        let decoys = decoy_cards(1_000);
        assert_eq!(decoys.len(), 2);
        assert!(decoys.iter().all(|c| c.holder_name == "John Doe"));
    }

    #[test]
    fn test_starter_set_has_all_extended_fields() {
        let cards = starter_cards(1_000_000_000);
        assert_eq!(cards.len(), 4);
        let business = cards
            .iter()
            .find(|c| c.category == CardCategory::Business)
            .unwrap();
        assert!(business.job_title.is_some());
        assert!(business.email.is_some());
        let passport = cards
            .iter()
            .find(|c| c.category == CardCategory::Passport)
            .unwrap();
        assert_eq!(passport.nationality.as_deref(), Some("USA"));
    }

    #[test]
    fn test_fixture_sets_are_disjoint() {
        let decoys = decoy_cards(0);
        let starters = starter_cards(0);
        for d in &decoys {
            assert!(starters.iter().all(|s| s.number != d.number));
        }
    }
}
