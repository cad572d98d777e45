//! In-memory card collection exposed to an unlocked session
//!
//! The controller swaps the active store wholesale on every mode
//! transition: real items for a real session, the decoy fixture for a
//! duress session. Analytics here back the dashboard views.

use std::collections::BTreeMap;

use uuid::Uuid;

use cardsnap_core::{Card, CardCategory, EXPIRY_WARNING_DAYS};

/// Mutable card collection for the active session
#[derive(Debug, Clone, Default)]
pub struct VaultStore {
    cards: Vec<Card>,
}

impl VaultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing card set
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// All cards, newest first ordering is the caller's concern
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card by id
    pub fn get(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Insert a card at the front (newest first)
    pub fn add(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    /// Remove a card; returns whether it existed
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        self.cards.len() != before
    }

    /// Increment a card's usage counter, returning the new count
    pub fn record_use(&mut self, id: Uuid) -> Option<u32> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .map(Card::record_use)
    }

    /// Drop every card
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    // ---- Analytics ----

    /// Total access count across all cards
    pub fn total_usage(&self) -> u32 {
        self.cards.iter().map(|c| c.usage_count).sum()
    }

    /// Access counts aggregated by category
    pub fn usage_by_category(&self) -> BTreeMap<CardCategory, u32> {
        let mut usage = BTreeMap::new();
        for card in &self.cards {
            *usage.entry(card.category).or_insert(0) += card.usage_count;
        }
        usage
    }

    /// The `n` most-used cards, descending
    pub fn most_used(&self, n: usize) -> Vec<&Card> {
        let mut sorted: Vec<&Card> = self.cards.iter().collect();
        sorted.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        sorted.truncate(n);
        sorted
    }

    /// Cards expired or expiring within the warning window
    pub fn expiring_soon(&self, now_ms: u64) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| {
                c.days_until_expiry(now_ms)
                    .is_some_and(|days| days <= EXPIRY_WARNING_DAYS)
            })
            .collect()
    }

    /// Filter by category and a case-insensitive text query over issuer,
    /// holder name, and number
    pub fn filtered(&self, category: Option<CardCategory>, query: &str) -> Vec<&Card> {
        let query = query.to_lowercase();
        self.cards
            .iter()
            .filter(|c| category.map_or(true, |cat| c.category == cat))
            .filter(|c| {
                query.is_empty()
                    || c.issuer.to_lowercase().contains(&query)
                    || c.holder_name.to_lowercase().contains(&query)
                    || c.number.to_lowercase().contains(&query)
            })
            .collect()
    }
}
