use serde::{Deserialize, Serialize};

use crate::train::TicketClass;

/// Per-class base fares, in minor units. Loaded from configuration at
/// startup; the totals it produces are fixed into the booking at creation
/// time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    pub economy: i64,
    pub business: i64,
    pub first: i64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            economy: 50,
            business: 120,
            first: 200,
        }
    }
}

impl PricingTable {
    pub fn base_price(&self, class: TicketClass) -> i64 {
        match class {
            TicketClass::Economy => self.economy,
            TicketClass::Business => self.business,
            TicketClass::First => self.first,
        }
    }

    /// Total fare for a party. Pure arithmetic, no I/O.
    pub fn total(&self, class: TicketClass, passengers: u32) -> i64 {
        self.base_price(class) * passengers as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_multiplies_base_by_party_size() {
        let table = PricingTable::default();

        assert_eq!(table.total(TicketClass::Economy, 2), 100);
        assert_eq!(table.total(TicketClass::Business, 3), 360);
        assert_eq!(table.total(TicketClass::First, 1), 200);
    }

    #[test]
    fn test_total_is_deterministic() {
        let table = PricingTable::default();

        let first = table.total(TicketClass::Economy, 4);
        let second = table.total(TicketClass::Economy, 4);
        assert_eq!(first, second);
    }
}
