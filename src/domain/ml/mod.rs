pub mod encoder;
pub mod metrics;
pub mod min_max;
pub mod one_hot;
pub mod ordinal;
pub mod params;
pub mod schema;

pub use encoder::{FeatureEncoder, FittedEncoder};
pub use metrics::{RegressionMetrics, r2_score};
pub use params::{ForestParams, SplitCriterion};
pub use schema::{AlignedRow, FeatureSchema};
