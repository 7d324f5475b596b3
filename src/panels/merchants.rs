// 🏪 Merchant share panel - feeds both the proportional chart and the ranked list

use super::{PanelData, PanelState};
use serde::{Deserialize, Serialize};

/// Merchants shown in the chart and list
pub const MERCHANT_DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantAggregate {
    pub merchant: String,
    pub total_spending: f64,
    pub transaction_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantShare {
    /// 1-based position in caller order
    pub rank: usize,
    pub merchant: String,
    pub total_spending: f64,
    pub transaction_count: u32,
    /// Share of the displayed subtotal, 0..=100
    pub percentage: f64,
    /// `None` when the transaction count is zero
    pub average_ticket: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantBreakdown {
    /// Spending over the displayed merchants only
    pub subtotal: f64,
    pub shares: Vec<MerchantShare>,
}

impl PanelData for MerchantBreakdown {
    fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Shares over the first five aggregates, in the order they arrive.
/// The caller owns the ordering; nothing is re-sorted here.
pub fn derive_merchant_shares(aggregates: &[MerchantAggregate]) -> MerchantBreakdown {
    let top = &aggregates[..aggregates.len().min(MERCHANT_DISPLAY_LIMIT)];
    let subtotal: f64 = top.iter().map(|m| m.total_spending).sum();

    let shares = top
        .iter()
        .enumerate()
        .map(|(index, m)| MerchantShare {
            rank: index + 1,
            merchant: m.merchant.clone(),
            total_spending: m.total_spending,
            transaction_count: m.transaction_count,
            percentage: if subtotal > 0.0 {
                m.total_spending * 100.0 / subtotal
            } else {
                0.0
            },
            average_ticket: (m.transaction_count > 0)
                .then(|| m.total_spending / f64::from(m.transaction_count)),
        })
        .collect();

    MerchantBreakdown { subtotal, shares }
}

pub fn derive_merchant_panel(
    aggregates: &[MerchantAggregate],
    loading: bool,
) -> PanelState<MerchantBreakdown> {
    PanelState::resolve(loading, None, derive_merchant_shares(aggregates))
}
