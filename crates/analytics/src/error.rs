use crate::report::Kpi;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("KPI sets have different fields (current: {current:?}, previous: {previous:?})")]
    SchemaMismatch { current: Vec<Kpi>, previous: Vec<Kpi> },

    #[error("Date arithmetic left the supported calendar range: {0}")]
    DateOutOfRange(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
