//! Auto-connector: nearest-tower wiring for freshly placed substations.

use super::types::{Asset, AssetId, Connection, PlacementWarning};

/// Edge plan produced by the auto-connector.
///
/// The store materializes the planned edges into [`Connection`] records;
/// planning itself is a pure function of the current asset and edge sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPlan {
    /// `(from, to)` endpoint pairs in creation order.
    pub edges: Vec<(AssetId, AssetId)>,
    /// Set when no tower was reachable.
    pub warning: Option<PlacementWarning>,
}

/// Plans the links for a just-placed substation.
///
/// 1. Among placed towers whose distance to the substation is within the
///    tower's range, pick the nearest; equidistant towers tie-break by
///    ascending asset id for determinism.
/// 2. Plan one tower↔substation edge.
/// 3. Plan one generator↔tower edge for every placed generator within the
///    chosen tower's range. Generators never connect to the substation
///    directly.
///
/// Edges already present in `existing` (same unordered endpoint pair) are
/// not planned again. With no reachable tower the plan is empty and carries
/// [`PlacementWarning::NoEligiblePartner`]; the substation stays placed.
pub fn plan_substation_links(
    substation: &Asset,
    assets: &[Asset],
    existing: &[Connection],
) -> ConnectionPlan {
    let Some(sub_pos) = substation.placed_position() else {
        return ConnectionPlan {
            edges: Vec::new(),
            warning: Some(PlacementWarning::NoEligiblePartner),
        };
    };

    // Nearest reachable tower, ties broken by ascending id.
    let mut nearest: Option<(f32, AssetId, f32)> = None; // (distance, id, range)
    for tower in assets.iter().filter(|a| a.kind.is_tower()) {
        let Some(tower_pos) = tower.placed_position() else {
            continue;
        };
        let range = match tower.kind {
            crate::catalog::BuildingKind::Tower { range } => range,
            _ => continue,
        };
        let distance = sub_pos.distance_to(tower_pos);
        if distance > range {
            continue;
        }
        let closer = match nearest {
            None => true,
            Some((best_dist, best_id, _)) => {
                distance < best_dist || (distance == best_dist && tower.id < best_id)
            }
        };
        if closer {
            nearest = Some((distance, tower.id, range));
        }
    }

    let Some((_, tower_id, tower_range)) = nearest else {
        return ConnectionPlan {
            edges: Vec::new(),
            warning: Some(PlacementWarning::NoEligiblePartner),
        };
    };
    let tower_pos = assets
        .iter()
        .find(|a| a.id == tower_id)
        .and_then(Asset::placed_position);
    let Some(tower_pos) = tower_pos else {
        return ConnectionPlan {
            edges: Vec::new(),
            warning: Some(PlacementWarning::NoEligiblePartner),
        };
    };

    let mut edges: Vec<(AssetId, AssetId)> = Vec::new();
    let planned_or_existing = |a: AssetId, b: AssetId, edges: &[(AssetId, AssetId)]| {
        existing.iter().any(|c| c.links(a, b))
            || edges.iter().any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
    };

    if !planned_or_existing(substation.id, tower_id, &edges) {
        edges.push((substation.id, tower_id));
    }

    // Wire every generator the chosen tower can reach, regardless of
    // substation-side capacity.
    for generator in assets.iter().filter(|a| a.kind.is_generator()) {
        let Some(gen_pos) = generator.placed_position() else {
            continue;
        };
        if gen_pos.distance_to(tower_pos) <= tower_range
            && !planned_or_existing(generator.id, tower_id, &edges)
        {
            edges.push((generator.id, tower_id));
        }
    }

    ConnectionPlan {
        edges,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuildingKind;
    use crate::grid::types::{ConnectionId, ConnectionKind, Position};

    fn asset(id: u32, kind: BuildingKind, pos: Option<(f32, f32)>) -> Asset {
        Asset {
            id: AssetId(id),
            spec_id: "test".into(),
            name: "test".into(),
            kind,
            position: pos.map(|(x, y)| Position::new(x, y)),
            placed: pos.is_some(),
            operational: true,
            risk_level: 0.0,
        }
    }

    fn generator(id: u32, pos: (f32, f32)) -> Asset {
        asset(id, BuildingKind::Generator { output_mw: 50.0 }, Some(pos))
    }

    fn tower(id: u32, pos: (f32, f32), range: f32) -> Asset {
        asset(id, BuildingKind::Tower { range }, Some(pos))
    }

    fn substation(id: u32, pos: (f32, f32)) -> Asset {
        asset(
            id,
            BuildingKind::Substation { capacity_mw: 100.0 },
            Some(pos),
        )
    }

    #[test]
    fn wires_substation_to_nearest_tower_and_generators_to_it() {
        let plant = generator(1, (0.0, 0.0));
        let tw = tower(2, (100.0, 0.0), 150.0);
        let sub = substation(3, (200.0, 0.0));
        let assets = vec![plant, tw, sub.clone()];

        let plan = plan_substation_links(&sub, &assets, &[]);
        assert_eq!(plan.warning, None);
        assert_eq!(
            plan.edges,
            vec![(AssetId(3), AssetId(2)), (AssetId(1), AssetId(2))]
        );
    }

    #[test]
    fn no_towers_yields_warning_only() {
        let sub = substation(1, (200.0, 0.0));
        let assets = vec![generator(2, (0.0, 0.0)), sub.clone()];

        let plan = plan_substation_links(&sub, &assets, &[]);
        assert!(plan.edges.is_empty());
        assert_eq!(plan.warning, Some(PlacementWarning::NoEligiblePartner));
    }

    #[test]
    fn out_of_range_tower_is_ignored() {
        let sub = substation(1, (0.0, 0.0));
        let assets = vec![tower(2, (400.0, 0.0), 150.0), sub.clone()];

        let plan = plan_substation_links(&sub, &assets, &[]);
        assert!(plan.edges.is_empty());
        assert_eq!(plan.warning, Some(PlacementWarning::NoEligiblePartner));
    }

    #[test]
    fn equidistant_towers_tie_break_by_id() {
        let sub = substation(5, (0.0, 0.0));
        let assets = vec![
            tower(9, (100.0, 0.0), 150.0),
            tower(3, (-100.0, 0.0), 150.0),
            sub.clone(),
        ];

        let plan = plan_substation_links(&sub, &assets, &[]);
        assert_eq!(plan.edges, vec![(AssetId(5), AssetId(3))]);
    }

    #[test]
    fn generators_beyond_tower_range_are_skipped() {
        let sub = substation(1, (200.0, 0.0));
        let assets = vec![
            generator(2, (0.0, 0.0)),      // 100 from tower, in range
            generator(3, (-100.0, 0.0)),   // 200 from tower, out of range
            tower(4, (100.0, 0.0), 150.0),
            sub.clone(),
        ];

        let plan = plan_substation_links(&sub, &assets, &[]);
        assert_eq!(
            plan.edges,
            vec![(AssetId(1), AssetId(4)), (AssetId(2), AssetId(4))]
        );
    }

    #[test]
    fn unplaced_assets_are_invisible() {
        let sub = substation(1, (200.0, 0.0));
        let assets = vec![
            asset(2, BuildingKind::Tower { range: 150.0 }, None),
            sub.clone(),
        ];

        let plan = plan_substation_links(&sub, &assets, &[]);
        assert!(plan.edges.is_empty());
        assert_eq!(plan.warning, Some(PlacementWarning::NoEligiblePartner));
    }

    #[test]
    fn existing_edges_are_not_replanned() {
        let plant = generator(1, (0.0, 0.0));
        let tw = tower(2, (100.0, 0.0), 150.0);
        let first_sub = substation(3, (200.0, 0.0));
        let second_sub = substation(4, (150.0, 50.0));
        let assets = vec![plant, tw, first_sub, second_sub.clone()];
        let existing = vec![
            Connection {
                id: ConnectionId(0),
                from: AssetId(3),
                to: AssetId(2),
                kind: ConnectionKind::Ac,
                active: true,
            },
            Connection {
                id: ConnectionId(1),
                from: AssetId(1),
                to: AssetId(2),
                kind: ConnectionKind::Ac,
                active: true,
            },
        ];

        let plan = plan_substation_links(&second_sub, &assets, &existing);
        // Only the new substation's own link; the generator edge exists.
        assert_eq!(plan.edges, vec![(AssetId(4), AssetId(2))]);
    }

    #[test]
    fn repeated_planning_is_deterministic() {
        let assets = vec![
            generator(1, (0.0, 0.0)),
            generator(2, (50.0, 50.0)),
            tower(3, (100.0, 0.0), 150.0),
            tower(4, (120.0, 10.0), 150.0),
            substation(5, (200.0, 0.0)),
        ];
        let sub = assets[4].clone();

        let first = plan_substation_links(&sub, &assets, &[]);
        for _ in 0..10 {
            assert_eq!(plan_substation_links(&sub, &assets, &[]), first);
        }
    }
}
