use crate::error::AnalyticsError;
use crate::report::{DeltaSet, KpiSet};
use rust_decimal::Decimal;

/// Computes the percentage change of every field from `previous` to `current`.
///
/// Both sets must carry the same fields in the same order. Per field:
///
/// * either value missing: undefined
/// * values equal (including both zero): `0`
/// * previous is zero: undefined, there is no baseline
/// * otherwise `((current - previous) / previous) * 100`, rounded to two
///   decimal places with round-half-to-even
pub fn percentage_delta(current: &KpiSet, previous: &KpiSet) -> Result<DeltaSet, AnalyticsError> {
    if !current.kpis().eq(previous.kpis()) {
        return Err(AnalyticsError::SchemaMismatch {
            current: current.kpis().collect(),
            previous: previous.kpis().collect(),
        });
    }

    let mut deltas = DeltaSet::with_capacity(current.len());
    for ((kpi, c), (_, p)) in current.iter().zip(previous.iter()) {
        let delta = match (c, p) {
            (Some(c), Some(p)) => field_delta(c, p).ok_or_else(|| {
                AnalyticsError::Calculation(format!("percentage change of '{}' overflowed", kpi))
            })?,
            _ => None,
        };
        deltas.push(kpi, delta);
    }

    Ok(deltas)
}

/// Returns `None` on arithmetic overflow, `Some(None)` when undefined.
fn field_delta(current: Decimal, previous: Decimal) -> Option<Option<Decimal>> {
    if current == previous {
        return Some(Some(Decimal::ZERO));
    }
    if previous.is_zero() {
        return Some(None);
    }

    let change = current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(Some(change.round_dp(2)))
}
