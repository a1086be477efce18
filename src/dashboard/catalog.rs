//! Fixed plan offers shown on the purchase page.

/// One purchasable plan card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOffer {
    pub bandwidth_gb: u64,
    /// Price in US cents.
    pub price_cents: u32,
}

impl PlanOffer {
    /// Card title, e.g. `IPv6 5GB`.
    pub fn title(&self) -> String {
        format!("IPv6 {}GB", self.bandwidth_gb)
    }

    /// Price as shown on the card, e.g. `$0.50`.
    pub fn price_label(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

pub static PLAN_CATALOG: [PlanOffer; 2] = [
    PlanOffer {
        bandwidth_gb: 5,
        price_cents: 50,
    },
    PlanOffer {
        bandwidth_gb: 100,
        price_cents: 100,
    },
];

/// Bullet points every card lists.
pub const PLAN_FEATURES: [&str; 5] = [
    "/29 Network IP Pool size",
    "IP & User:Pass Authentication",
    "Country Targeting",
    "Rotating & Sticky Sessions",
    "HTTP Protocol Supported",
];

/// Look up an offer by its bandwidth.
pub fn offer(bandwidth_gb: u64) -> Option<&'static PlanOffer> {
    PLAN_CATALOG.iter().find(|o| o.bandwidth_gb == bandwidth_gb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_labels() {
        let labels: Vec<(String, String)> = PLAN_CATALOG
            .iter()
            .map(|o| (o.title(), o.price_label()))
            .collect();
        assert_eq!(
            labels,
            [
                ("IPv6 5GB".to_string(), "$0.50".to_string()),
                ("IPv6 100GB".to_string(), "$1.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_offer_lookup() {
        assert_eq!(offer(100).map(|o| o.price_cents), Some(100));
        assert!(offer(7).is_none());
    }
}
