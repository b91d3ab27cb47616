/// Ordered list of feature names.
/// This order MUST match the column order the model was trained on.
/// Any change here is a breaking change for saved models.
pub const FEATURE_NAMES: &[&str] = &[
    "commodity_name",
    "state",
    "district",
    "market",
    "min_price",
    "max_price",
];
