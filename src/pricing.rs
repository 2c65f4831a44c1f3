//! Pricing table and billing arithmetic

use serde::{Deserialize, Serialize};

/// Yearly billing discount (25% off)
pub const YEARLY_DISCOUNT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub pageviews: &'static str,
    pub monthly_price: f64,
}

pub const TIERS: [Tier; 5] = [
    Tier { pageviews: "10K", monthly_price: 8.0 },
    Tier { pageviews: "50K", monthly_price: 12.0 },
    Tier { pageviews: "100K", monthly_price: 16.0 },
    Tier { pageviews: "500K", monthly_price: 24.0 },
    Tier { pageviews: "1M", monthly_price: 36.0 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Billing {
    #[default]
    Monthly,
    Yearly,
}

impl Billing {
    pub fn toggled(self) -> Self {
        match self {
            Billing::Monthly => Billing::Yearly,
            Billing::Yearly => Billing::Monthly,
        }
    }

    pub fn is_yearly(self) -> bool {
        self == Billing::Yearly
    }

    pub fn period(self) -> &'static str {
        match self {
            Billing::Monthly => "month",
            Billing::Yearly => "year",
        }
    }

    /// Value stored in the preference store
    pub fn as_str(self) -> &'static str {
        match self {
            Billing::Monthly => "monthly",
            Billing::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "monthly" => Some(Billing::Monthly),
            "yearly" => Some(Billing::Yearly),
            _ => None,
        }
    }
}

/// Tier for a slider index, clamped to the table
pub fn tier(index: usize) -> &'static Tier {
    &TIERS[index.min(TIERS.len() - 1)]
}

/// Price shown for a tier under the given billing. Yearly applies the
/// discount to the listed price.
pub fn price(tier: &Tier, billing: Billing) -> f64 {
    match billing {
        Billing::Monthly => tier.monthly_price,
        Billing::Yearly => tier.monthly_price * (1.0 - YEARLY_DISCOUNT),
    }
}

/// Displayable quote for one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub tier: usize,
    pub pageviews: &'static str,
    pub billing: Billing,
    pub price: f64,
    pub display_price: String,
    pub period: &'static str,
}

impl Quote {
    pub fn new(index: usize, billing: Billing) -> Self {
        let index = index.min(TIERS.len() - 1);
        let tier = tier(index);
        let price = price(tier, billing);
        Self {
            tier: index,
            pageviews: tier.pageviews,
            billing,
            price,
            display_price: format!("${:.2}", price),
            period: billing.period(),
        }
    }

    pub fn pageviews_label(&self) -> String {
        format!("{} PAGEVIEWS", self.pageviews)
    }

    pub fn period_label(&self) -> String {
        format!("/ {}", self.period)
    }
}
