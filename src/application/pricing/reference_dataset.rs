use crate::domain::errors::ConfigurationError;
use crate::domain::pricing::{AggregateTier, Aggregates, PriceQuery, PriceRecord};
use statrs::statistics::{Data, Distribution};
use std::path::PathBuf;
use tracing::debug;

/// Historical price observations used for min/max price fallbacks.
///
/// Categorical fields are normalized on construction and the collection is never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    records: Vec<PriceRecord>,
    global: (f64, f64),
}

impl ReferenceDataset {
    /// `origin` only names the source in the error when there are no records.
    pub fn new(
        records: Vec<PriceRecord>,
        origin: impl Into<PathBuf>,
    ) -> Result<Self, ConfigurationError> {
        let records: Vec<PriceRecord> = records.into_iter().map(PriceRecord::normalized).collect();
        let global = match mean_prices(records.iter()) {
            (Some(avg_min), Some(avg_max)) => (avg_min, avg_max),
            _ => {
                return Err(ConfigurationError::EmptyDataset {
                    path: origin.into(),
                });
            }
        };

        Ok(Self { records, global })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Dataset-wide mean min and max price.
    pub fn global_aggregates(&self) -> Aggregates {
        Aggregates {
            avg_min_price: self.global.0,
            avg_max_price: self.global.1,
            tier: AggregateTier::GlobalFallback,
        }
    }

    /// Mean min/max price of the records matching all four categories, or the
    /// dataset-wide means when the combination was never observed.
    ///
    /// A matched group with no recorded value for a column yields NaN for that
    /// column, which the pipeline rejects before the model is called.
    pub fn lookup_aggregates(&self, query: &PriceQuery) -> Aggregates {
        let matching: Vec<&PriceRecord> = self.records.iter().filter(|r| r.matches(query)).collect();

        if matching.is_empty() {
            debug!(
                "No records for ({}, {}, {}, {}); using dataset-wide means",
                query.commodity(),
                query.state(),
                query.district(),
                query.market()
            );
            return self.global_aggregates();
        }

        let (avg_min, avg_max) = mean_prices(matching.iter().copied());
        Aggregates {
            avg_min_price: avg_min.unwrap_or(f64::NAN),
            avg_max_price: avg_max.unwrap_or(f64::NAN),
            tier: AggregateTier::ExactMatch {
                matched: matching.len(),
            },
        }
    }
}

/// Per-column arithmetic means; blanks are skipped in their own column only.
/// `None` for a column with no values.
fn mean_prices<'a>(
    records: impl Iterator<Item = &'a PriceRecord> + Clone,
) -> (Option<f64>, Option<f64>) {
    let column_mean = |values: Vec<f64>| {
        if values.is_empty() {
            None
        } else {
            Data::new(values).mean()
        }
    };
    let mins = records.clone().filter_map(|r| r.min_price).collect();
    let maxs = records.filter_map(|r| r.max_price).collect();
    (column_mean(mins), column_mean(maxs))
}
