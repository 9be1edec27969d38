//! Recommendation generator: canned response guidance derived from the
//! current weather and the count of at-risk stations.

use super::weather::WeatherKind;

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Critical,
    High,
    Medium,
}

/// A single suggested action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub priority: Priority,
    pub title: String,
    pub action: String,
}

/// Builds the recommendation list for the current conditions.
///
/// Pure function, no state: the result replaces the previous list
/// wholesale on every weather transition. One canned record per severe
/// weather kind, plus a crew/load-rebalancing record whenever any station
/// is at risk.
pub fn generate(weather: WeatherKind, at_risk_count: usize) -> Vec<Recommendation> {
    let mut recommendations = Vec::with_capacity(2);

    match weather {
        WeatherKind::Wildfire => recommendations.push(Recommendation {
            priority: Priority::Critical,
            title: "Wildfire emergency response".into(),
            action: "Isolate substations in the burn corridor and request fire crews".into(),
        }),
        WeatherKind::Lightning => recommendations.push(Recommendation {
            priority: Priority::High,
            title: "Lightning strike prevention".into(),
            action: "Switch exposed lines to DC and inspect grounding systems".into(),
        }),
        WeatherKind::HeavyRain => recommendations.push(Recommendation {
            priority: Priority::Medium,
            title: "Flood response".into(),
            action: "Drain underground equipment bays and secure bypass routes".into(),
        }),
        WeatherKind::Typhoon => recommendations.push(Recommendation {
            priority: Priority::Critical,
            title: "Typhoon emergency measures".into(),
            action: "Check line tension and clear vegetation near spans".into(),
        }),
        WeatherKind::Snow => recommendations.push(Recommendation {
            priority: Priority::Medium,
            title: "Snow loading watch".into(),
            action: "Patrol ice-loaded spans and stage de-icing crews".into(),
        }),
        WeatherKind::Normal => {}
    }

    if at_risk_count > 0 {
        recommendations.push(Recommendation {
            priority: Priority::High,
            title: format!("{at_risk_count} substations at elevated risk"),
            action: "Dispatch repair crews and rebalance load".into(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_weather_without_risk_yields_nothing() {
        assert!(generate(WeatherKind::Normal, 0).is_empty());
    }

    #[test]
    fn severe_weather_yields_one_canned_record() {
        let recs = generate(WeatherKind::Wildfire, 0);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::Critical);
        assert!(recs[0].title.contains("Wildfire"));
    }

    #[test]
    fn at_risk_stations_append_rebalancing_guidance() {
        let recs = generate(WeatherKind::Typhoon, 3);
        assert_eq!(recs.len(), 2);
        assert!(recs[1].title.contains('3'));
        assert_eq!(recs[1].priority, Priority::High);
    }

    #[test]
    fn risk_record_appears_even_in_normal_weather() {
        let recs = generate(WeatherKind::Normal, 2);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].title.contains('2'));
    }

    #[test]
    fn every_severe_kind_has_guidance() {
        for kind in WeatherKind::ALL {
            if kind.is_severe() {
                assert!(
                    !generate(kind, 0).is_empty(),
                    "{kind:?} should carry a recommendation"
                );
            }
        }
    }

    #[test]
    fn output_is_pure_and_replaces_wholesale() {
        assert_eq!(
            generate(WeatherKind::Lightning, 1),
            generate(WeatherKind::Lightning, 1)
        );
    }
}
