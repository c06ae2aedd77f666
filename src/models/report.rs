/// One of the twelve fixed savings models applied to total inventory value.
#[derive(Debug, Clone, Copy)]
pub struct SavingsModel {
    pub label: &'static str,
    pub percentage: f64,
}

/// Fixed model set; report output preserves this declaration order.
pub const SAVINGS_MODELS: [SavingsModel; 12] = [
    SavingsModel { label: "Three-Statement Model (5%)", percentage: 0.05 },
    SavingsModel { label: "DCF Model (7%)", percentage: 0.07 },
    SavingsModel { label: "Comparable Company Analysis (3%)", percentage: 0.03 },
    SavingsModel { label: "Forecasting Model (2%)", percentage: 0.02 },
    SavingsModel { label: "Sum-of-the-Parts Model (4%)", percentage: 0.04 },
    SavingsModel { label: "Leveraged Buyout Model (5%)", percentage: 0.05 },
    SavingsModel { label: "Sensitivity Analysis (3%)", percentage: 0.03 },
    SavingsModel { label: "Economic Order Quantity (10%)", percentage: 0.10 },
    SavingsModel { label: "ABC Analysis (2%)", percentage: 0.02 },
    SavingsModel { label: "Activity-Based Costing (5%)", percentage: 0.05 },
    SavingsModel { label: "Just-In-Time Inventory Management (8%)", percentage: 0.08 },
    SavingsModel { label: "Cost Flow Assumptions (FIFO - 2%)", percentage: 0.02 },
];

/// A computed savings figure for one model.
#[derive(Debug, Clone)]
pub struct SavingsEntry {
    pub model: &'static str,
    pub percentage: f64,
    pub amount: f64,
}

/// Savings projection derived from the current sum of weapon costs.
/// Ephemeral; recomputed on every report request.
#[derive(Debug, Clone)]
pub struct SavingsReport {
    pub total_inventory_value: f64,
    pub entries: Vec<SavingsEntry>,
}

impl SavingsReport {
    pub fn from_total(total: f64) -> Self {
        let entries = SAVINGS_MODELS
            .iter()
            .map(|m| SavingsEntry {
                model: m.label,
                percentage: m.percentage,
                amount: total * m.percentage,
            })
            .collect();

        Self {
            total_inventory_value: total,
            entries,
        }
    }
}
