//! Competitor sell-side listings.
//!
//! Listings arrive from market data collaborators in arbitrary order and may
//! contain garbage (negative prices, empty volume). [`sanitize_listings`] is
//! the single ingestion point that filters and sorts them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::TypeId;
use super::money::{Price, Units};

/// One sell-side entry from a rival trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorListing {
    pub price: Price,
    pub volume: Units,
}

impl CompetitorListing {
    #[must_use]
    pub const fn new(price: Price, volume: Units) -> Self {
        Self { price, volume }
    }

    /// Price must be non-negative and volume positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.price >= Price::ZERO && self.volume > 0
    }
}

/// A listing from a whole-venue order book, tagged with its item type.
///
/// Structure markets return every item type in one paged book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedListing {
    pub type_id: TypeId,
    pub price: Price,
    pub volume: Units,
}

impl TypedListing {
    #[must_use]
    pub const fn listing(&self) -> CompetitorListing {
        CompetitorListing::new(self.price, self.volume)
    }
}

/// Drop invalid listings and sort the rest ascending by price.
#[must_use]
pub fn sanitize_listings(listings: Vec<CompetitorListing>) -> Vec<CompetitorListing> {
    let mut valid: Vec<CompetitorListing> =
        listings.into_iter().filter(CompetitorListing::is_valid).collect();
    valid.sort_by(|a, b| a.price.cmp(&b.price).then(b.volume.cmp(&a.volume)));
    valid
}

/// Split a whole-venue book into sanitized per-type listings.
#[must_use]
pub fn group_by_type(book: Vec<TypedListing>) -> HashMap<TypeId, Vec<CompetitorListing>> {
    let mut grouped: HashMap<TypeId, Vec<CompetitorListing>> = HashMap::new();
    for entry in book {
        grouped.entry(entry.type_id).or_default().push(entry.listing());
    }
    grouped
        .into_iter()
        .map(|(type_id, listings)| (type_id, sanitize_listings(listings)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sanitize_filters_and_sorts() {
        let listings = vec![
            CompetitorListing::new(dec!(12), 5),
            CompetitorListing::new(dec!(-1), 5),
            CompetitorListing::new(dec!(10), 0),
            CompetitorListing::new(dec!(9.5), 3),
        ];

        let clean = sanitize_listings(listings);
        assert_eq!(
            clean,
            vec![
                CompetitorListing::new(dec!(9.5), 3),
                CompetitorListing::new(dec!(12), 5),
            ]
        );
    }

    #[test]
    fn group_by_type_sorts_each_bucket() {
        let book = vec![
            TypedListing {
                type_id: TypeId::new(1),
                price: dec!(3),
                volume: 1,
            },
            TypedListing {
                type_id: TypeId::new(2),
                price: dec!(7),
                volume: 1,
            },
            TypedListing {
                type_id: TypeId::new(1),
                price: dec!(2),
                volume: 4,
            },
        ];

        let grouped = group_by_type(book);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&TypeId::new(1)][0].price, dec!(2));
        assert_eq!(grouped[&TypeId::new(2)].len(), 1);
    }
}
