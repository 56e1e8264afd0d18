//! Derived figures of a reception: net weight, discounts, bonus and net paddy
//!
//! Everything here is recomputed from the raw measurements (gross weight,
//! tare, analysis ranges, tolerances) on each edit. Unset inputs propagate
//! as unset outputs so the display keeps showing "0 kg" instead of a
//! fabricated zero.

use rust_decimal::Decimal;

use crate::models::{
    lookup_percent, ClusterName, Clusters, DiscountPercent, DiscountTemplate, SubFieldKind,
};

pub const MSG_TARE_EXCEEDS_GROSS: &str = "La tara no puede superar el peso bruto";
pub const MSG_NEGATIVE_WEIGHT: &str = "El peso no puede ser negativo";
pub const MSG_RANGE_NOT_FOUND: &str = "Valor fuera de los rangos de descuento";
pub const MSG_NEGATIVE_RANGE: &str = "El valor del análisis no puede ser negativo";
pub const MSG_NEGATIVE_TOLERANCE: &str = "La tolerancia no puede ser negativa";
pub const MSG_PERCENT_OVER_100: &str = "El porcentaje no puede superar 100";
pub const MSG_WEIGHT_OUT_OF_RANGE: &str = "Peso fuera de rango";

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Kilograms for `percent` of `base`, rounded to two decimals; `None` on overflow
pub fn percent_of(base: Decimal, percent: Decimal) -> Option<Decimal> {
    base.checked_mul(percent)
        .and_then(|kg| kg.checked_div(HUNDRED))
        .map(|kg| kg.round_dp(2))
}

/// Recompute all derived clusters in place
pub fn recalculate(
    clusters: &mut Clusters,
    template: &DiscountTemplate,
    ranges: &[DiscountPercent],
) {
    for cluster in clusters.values_mut() {
        cluster.clear_errors();
    }

    let net = compute_net_weight(clusters);

    let mut percent_sum: Option<Decimal> = None;
    let mut discount_sum = Some(Decimal::ZERO);
    let mut overflowed = false;

    for name in ClusterName::ANALYSIS {
        let setting = template.parameter(name);
        let cluster = clusters.entry(name);

        if !setting.available {
            for kind in [
                SubFieldKind::Range,
                SubFieldKind::Percent,
                SubFieldKind::Tolerance,
                SubFieldKind::Penalty,
            ] {
                cluster.set_value(kind, None);
            }
            continue;
        }

        let tolerance = match cluster.value(SubFieldKind::Tolerance) {
            Some(t) => t,
            None => {
                cluster.set_value(SubFieldKind::Tolerance, Some(setting.tolerance));
                setting.tolerance
            }
        };
        if tolerance < Decimal::ZERO {
            cluster.field_mut(SubFieldKind::Tolerance).set_error(MSG_NEGATIVE_TOLERANCE);
        }

        let Some(range) = cluster.value(SubFieldKind::Range) else {
            cluster.set_value(SubFieldKind::Percent, None);
            cluster.set_value(SubFieldKind::Penalty, None);
            continue;
        };

        if range < Decimal::ZERO {
            cluster.field_mut(SubFieldKind::Range).set_error(MSG_NEGATIVE_RANGE);
            cluster.set_value(SubFieldKind::Percent, None);
            cluster.set_value(SubFieldKind::Penalty, None);
            continue;
        }

        // The code is always present for analysis parameters
        let percent = name
            .discount_code()
            .and_then(|code| lookup_percent(ranges, code, range));
        cluster.set_value(SubFieldKind::Percent, percent);

        let Some(percent) = percent else {
            cluster.field_mut(SubFieldKind::Range).set_error(MSG_RANGE_NOT_FOUND);
            cluster.set_value(SubFieldKind::Penalty, None);
            continue;
        };
        if percent > HUNDRED {
            cluster.field_mut(SubFieldKind::Percent).set_error(MSG_PERCENT_OVER_100);
        }

        percent_sum = Some(percent_sum.unwrap_or_default().saturating_add(percent));

        let effective = percent
            .saturating_sub(tolerance.max(Decimal::ZERO))
            .max(Decimal::ZERO);
        let penalty = net.and_then(|n| percent_of(n, effective));
        cluster.set_value(SubFieldKind::Penalty, penalty);
        if net.is_some() {
            // An uncomputable penalty leaves the whole discount unknown
            discount_sum = discount_sum
                .zip(penalty)
                .and_then(|(sum, kg)| sum.checked_add(kg));
        }
    }

    clusters
        .entry(ClusterName::Summary)
        .set_value(SubFieldKind::Percent, percent_sum);

    let discount_total = net.and(discount_sum);
    overflowed |= net.is_some() && discount_total.is_none();
    clusters
        .entry(ClusterName::DiscountTotal)
        .set_value(SubFieldKind::Node, discount_total);

    let bonus_cluster = clusters.entry(ClusterName::Bonus);
    let bonus = if template.bonus.available {
        bonus_cluster.set_value(SubFieldKind::Percent, Some(template.bonus.percent));
        let bonus = net.and_then(|n| percent_of(n, template.bonus.percent));
        overflowed |= net.is_some() && bonus.is_none();
        bonus
    } else {
        bonus_cluster.set_value(SubFieldKind::Percent, None);
        None
    };
    bonus_cluster.set_value(SubFieldKind::Penalty, bonus);

    let total_paddy = net
        .zip(discount_total)
        .and_then(|(n, discount)| n.checked_sub(discount))
        .and_then(|kg| kg.checked_add(bonus.unwrap_or_default()));
    overflowed |= net.is_some() && total_paddy.is_none();
    clusters
        .entry(ClusterName::TotalPaddy)
        .set_value(SubFieldKind::Node, total_paddy);

    if overflowed {
        clusters
            .entry(ClusterName::GrossWeight)
            .field_mut(SubFieldKind::Node)
            .set_error(MSG_WEIGHT_OUT_OF_RANGE);
    }
}

/// Net weight from gross and tare, flagging impossible inputs
fn compute_net_weight(clusters: &mut Clusters) -> Option<Decimal> {
    let gross = clusters
        .get(ClusterName::GrossWeight)
        .and_then(|c| c.value(SubFieldKind::Node));
    let tare = clusters
        .get(ClusterName::Tare)
        .and_then(|c| c.value(SubFieldKind::Node));

    let mut valid = true;
    if gross.is_some_and(|g| g < Decimal::ZERO) {
        clusters
            .entry(ClusterName::GrossWeight)
            .field_mut(SubFieldKind::Node)
            .set_error(MSG_NEGATIVE_WEIGHT);
        valid = false;
    }
    if tare.is_some_and(|t| t < Decimal::ZERO) {
        clusters
            .entry(ClusterName::Tare)
            .field_mut(SubFieldKind::Node)
            .set_error(MSG_NEGATIVE_WEIGHT);
        valid = false;
    }

    let net = match (gross, tare) {
        (Some(g), Some(t)) if valid => {
            if t > g {
                clusters
                    .entry(ClusterName::Tare)
                    .field_mut(SubFieldKind::Node)
                    .set_error(MSG_TARE_EXCEEDS_GROSS);
                None
            } else {
                Some(g - t)
            }
        }
        _ => None,
    };

    clusters
        .entry(ClusterName::NetWeight)
        .set_value(SubFieldKind::Node, net);
    net
}
