//! Coverage evaluator: which demand points are energized under the
//! current connection graph.

use crate::catalog::BuildingKind;

use super::types::{Asset, Connection, CoverageSummary, DemandPoint};

/// Recomputes demand-point power levels from scratch.
///
/// Every substation with at least one active incident connection powers all
/// demand points within `coverage_radius` of it; a point needs only one
/// powering substation (union, not additive). Power is binary: a powered
/// point receives exactly its demand.
///
/// `total_generated_mw` sums rated output over all *placed* generators,
/// connected or not — the headline output statistic deliberately ignores
/// connectivity.
///
/// O(substations × demand points); both sets stay small.
pub fn evaluate(
    assets: &[Asset],
    connections: &[Connection],
    demand_points: &mut [DemandPoint],
    coverage_radius: f32,
) -> CoverageSummary {
    let total_generated_mw = assets
        .iter()
        .filter(|a| a.placed)
        .filter_map(|a| match a.kind {
            BuildingKind::Generator { output_mw } => Some(output_mw),
            _ => None,
        })
        .sum();

    let serving_substations: Vec<_> = assets
        .iter()
        .filter(|a| a.kind.is_substation())
        .filter(|a| {
            connections
                .iter()
                .any(|c| c.active && c.touches(a.id))
        })
        .filter_map(Asset::placed_position)
        .collect();

    let mut powered_demand_point_ids = Vec::new();
    let mut total_delivered_mw = 0.0;
    for point in demand_points.iter_mut() {
        let covered = serving_substations
            .iter()
            .any(|sub| point.position.distance_to(*sub) <= coverage_radius);
        if covered {
            point.power_mw = point.demand_mw;
            total_delivered_mw += point.demand_mw;
            powered_demand_point_ids.push(point.id.clone());
        } else {
            point.power_mw = 0.0;
        }
    }

    CoverageSummary {
        powered_demand_point_ids,
        total_generated_mw,
        total_delivered_mw,
    }
}
