use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use serde::Serialize;

use crate::{
    config::ReportOptions,
    data::{
        datasources::file_export_datasource::{FileExportDatasource, FileExportDatasourceImpl},
        models::export_row_models::{PurchaseExportRow, TrialExportRow},
    },
    domain::entities::{
        purchase_info::{PurchaseInfo, PurchaseState},
        sku_details::SkuDetails,
        time_bucket::{resample, BucketFrequency, TimeBucket},
        trial_subscription_info::TrialSubscriptionInfo,
    },
    errors::BillingAnalyticsError,
};

const UNKNOWN_SKU_TYPE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkuTypeSplit {
    pub subscription: usize,
    pub one_time: usize,
}

/// Collects purchases, SKU details and trials, and derives summaries over
/// them. All queries are recomputed from the full collections.
pub struct SubscriptionManager {
    purchases: Vec<PurchaseInfo>,
    skus: Vec<SkuDetails>,
    trials: Vec<TrialSubscriptionInfo>,
    export_datasource: FileExportDatasourceImpl,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new(), Vec::new())
    }

    /// Takes ownership of existing collections. Retention is up to the caller.
    pub fn with_records(
        purchases: Vec<PurchaseInfo>,
        skus: Vec<SkuDetails>,
        trials: Vec<TrialSubscriptionInfo>,
    ) -> Self {
        Self {
            purchases,
            skus,
            trials,
            export_datasource: FileExportDatasourceImpl::new(&ReportOptions::default()),
        }
    }

    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.export_datasource = FileExportDatasourceImpl::new(&options);
        self
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionManager {
    // Adders.
    // ---------------------------

    pub fn add_purchase(&mut self, purchase: PurchaseInfo) {
        self.purchases.push(purchase);
    }

    pub fn add_sku(&mut self, sku: SkuDetails) {
        self.skus.push(sku);
    }

    pub fn add_trial(&mut self, trial: TrialSubscriptionInfo) {
        self.trials.push(trial);
    }

    pub fn purchases(&self) -> &[PurchaseInfo] {
        &self.purchases
    }

    pub fn skus(&self) -> &[SkuDetails] {
        &self.skus
    }

    pub fn trials(&self) -> &[TrialSubscriptionInfo] {
        &self.trials
    }

    // Purchases.
    // ---------------------------

    /// Number of purchases per state. States with no purchases are omitted.
    pub fn purchase_frequency(&self) -> BTreeMap<PurchaseState, usize> {
        let mut frequency: BTreeMap<PurchaseState, usize> = BTreeMap::new();
        for p in &self.purchases {
            *frequency.entry(p.purchase_state).or_default() += 1;
        }
        frequency
    }

    /// Share of each state, in percent.
    pub fn purchase_state_distribution(&self) -> BTreeMap<PurchaseState, f64> {
        let total = self.purchases.len() as f64;
        self.purchase_frequency()
            .into_iter()
            .map(|(state, count)| (state, count as f64 / total * 100.0))
            .collect()
    }

    /// Fraction of purchases that were refunded, or 0.0 if there are none.
    pub fn refund_ratio(&self) -> f64 {
        if self.purchases.is_empty() {
            return 0.0;
        }
        let refunded = self.purchases.iter().filter(|p| p.is_refunded()).count();
        refunded as f64 / self.purchases.len() as f64
    }

    /// PLACEHOLDER: not a real revenue figure. Sums the number formed by the
    /// digits and dots of each product ID (e.g. "gold_4.99" counts as 4.99).
    /// IDs that do not form a valid number are skipped.
    pub fn revenue_estimation(&self) -> f64 {
        let mut total = 0.0;
        for p in &self.purchases {
            let Some(product_id) = p.product_id.as_deref() else {
                continue;
            };
            let numeric: String = product_id
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            match numeric.parse::<f64>() {
                Ok(value) => total += value,
                Err(_) => {
                    tracing::debug!(product_id, "Skipping product ID with no numeric value.")
                }
            }
        }
        total
    }

    pub fn purchases_over_time(&self, frequency: BucketFrequency) -> Vec<TimeBucket> {
        resample(
            self.purchases.iter().filter_map(PurchaseInfo::purchase_datetime),
            frequency,
        )
    }

    /// Number of purchases per UTC hour of the day (0-23).
    pub fn purchases_by_hour(&self) -> BTreeMap<u32, usize> {
        use chrono::Timelike;

        let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
        for time in self.purchases.iter().filter_map(PurchaseInfo::purchase_datetime) {
            *by_hour.entry(time.hour()).or_default() += 1;
        }
        by_hour
    }

    // SKUs.
    // ---------------------------

    /// SKU with the highest price, ranked by the concatenated digits of its
    /// price string. Decimal separators are dropped, so "$9.99" ranks as 999
    /// and "$10" as 10; this is not a true currency comparison. A price with
    /// no digits ranks as 0.
    pub fn most_expensive_sku(&self) -> Option<&SkuDetails> {
        self.extreme_sku(0.0, |candidate, best| candidate > best)
    }

    /// SKU with the lowest price, using the same digit ranking as
    /// [`Self::most_expensive_sku`]. A price with no digits never wins.
    pub fn least_expensive_sku(&self) -> Option<&SkuDetails> {
        self.extreme_sku(f64::INFINITY, |candidate, best| candidate < best)
    }

    /// First SKU whose rank beats every earlier one according to `better`.
    fn extreme_sku(
        &self,
        no_digits: f64,
        better: impl Fn(f64, f64) -> bool,
    ) -> Option<&SkuDetails> {
        let rank = |sku: &SkuDetails| sku.price_digits().parse::<f64>().unwrap_or(no_digits);
        let mut skus = self.skus.iter();
        let mut best = skus.next()?;
        let mut best_rank = rank(best);
        for sku in skus {
            let sku_rank = rank(sku);
            if better(sku_rank, best_rank) {
                best = sku;
                best_rank = sku_rank;
            }
        }
        Some(best)
    }

    pub fn subscription_vs_one_time(&self) -> SkuTypeSplit {
        let subscription = self.skus.iter().filter(|s| s.is_subscription()).count();
        SkuTypeSplit {
            subscription,
            one_time: self.skus.len() - subscription,
        }
    }

    /// Mean refund rate per SKU type ("subs" / "inapp"), matching purchases to
    /// SKUs by product ID. Unmatched purchases are grouped under "unknown".
    /// Empty if there are no purchases or no SKUs.
    pub fn refund_probability_by_type(&self) -> BTreeMap<String, f64> {
        if self.purchases.is_empty() || self.skus.is_empty() {
            return BTreeMap::new();
        }
        let sku_types: HashMap<&str, &str> = self
            .skus
            .iter()
            .map(|s| (s.sku.as_str(), s.sku_type.as_str()))
            .collect();

        // (refunded, total) per type.
        let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for p in &self.purchases {
            let sku_type = p
                .product_id
                .as_deref()
                .and_then(|id| sku_types.get(id).copied())
                .unwrap_or(UNKNOWN_SKU_TYPE);
            let tally = tallies.entry(sku_type).or_default();
            tally.0 += usize::from(p.is_refunded());
            tally.1 += 1;
        }
        tallies
            .into_iter()
            .map(|(sku_type, (refunded, total))| {
                (sku_type.to_string(), refunded as f64 / total as f64)
            })
            .collect()
    }

    // Trials.
    // ---------------------------

    pub fn available_trials_count(&self) -> usize {
        self.trials.iter().filter(|t| t.can_use_trial()).count()
    }

    /// Mean trial length in days, or 0.0 if there are no trials.
    pub fn average_trial_days(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let total: u64 = self
            .trials
            .iter()
            .map(|t| u64::from(t.trial_period_days))
            .sum();
        total as f64 / self.trials.len() as f64
    }

    // Export.
    // ---------------------------

    /// Writes `order_id,product_id,state,timestamp`, one row per purchase.
    pub fn export_purchases_csv(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(), BillingAnalyticsError> {
        let path = path.as_ref();
        let rows = self.export_datasource.write_csv(
            path,
            &["order_id", "product_id", "state", "timestamp"],
            self.purchases.iter().map(PurchaseExportRow::from),
        )?;
        tracing::info!(path = %path.display(), rows, "Purchases exported.");
        Ok(())
    }

    /// Writes `available,days,ends_on`, one row per trial.
    pub fn export_trials_csv(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(), BillingAnalyticsError> {
        let path = path.as_ref();
        let rows = self.export_datasource.write_csv(
            path,
            &["available", "days", "ends_on"],
            self.trials.iter().map(TrialExportRow::from),
        )?;
        tracing::info!(path = %path.display(), rows, "Trials exported.");
        Ok(())
    }
}
