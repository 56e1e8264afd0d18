//! Reception aggregator tests
//!
//! Property-based and unit tests for the read-only reception views:
//! - Display values of weight clusters and of the bonus
//! - The validation error scan over typed and loosely shaped clusters
//! - Recalculation feeding the totals panel

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use shared::{
    calculation::MSG_WEIGHT_OUT_OF_RANGE, compute_bonus_display, compute_display_value,
    has_validation_errors, has_validation_errors_json, Cluster, ClusterName, Clusters,
    DiscountPercent, DiscountTemplate, FieldState, ReceptionData, ReceptionTotals,
    ReceptionUpdate, SubFieldKind,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

fn cluster_name_strategy() -> impl Strategy<Value = ClusterName> {
    proptest::sample::select(vec![
        ClusterName::GrossWeight,
        ClusterName::Tare,
        ClusterName::NetWeight,
        ClusterName::Humidity,
        ClusterName::GreenGrains,
        ClusterName::Impurities,
        ClusterName::Vano,
        ClusterName::Hualcacho,
        ClusterName::PeeledGrains,
        ClusterName::ChalkyGrains,
        ClusterName::StainedGrains,
        ClusterName::Summary,
        ClusterName::DiscountTotal,
        ClusterName::Bonus,
        ClusterName::TotalPaddy,
    ])
}

fn sub_field_strategy() -> impl Strategy<Value = SubFieldKind> {
    proptest::sample::select(SubFieldKind::ALL.to_vec())
}

/// A field that is never erroring: flag off, any message
fn clean_field_strategy() -> impl Strategy<Value = FieldState> {
    (proptest::option::of(-100_000i64..100_000), "[a-z ]{0,12}").prop_map(|(value, message)| {
        FieldState {
            value: value.map(Decimal::from),
            error: false,
            error_message: message,
        }
    })
}

fn clean_cluster_strategy() -> impl Strategy<Value = Cluster> {
    proptest::collection::vec(proptest::option::of(clean_field_strategy()), 5).prop_map(|f| {
        Cluster {
            node: f[0].clone(),
            percent: f[1].clone(),
            tolerance: f[2].clone(),
            penalty: f[3].clone(),
            range: f[4].clone(),
        }
    })
}

fn clean_clusters_strategy() -> impl Strategy<Value = Clusters> {
    proptest::collection::vec((cluster_name_strategy(), clean_cluster_strategy()), 0..15)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Every sub-field flagged with an empty message
fn flagged_silent_cluster() -> Cluster {
    let silent = || {
        Some(FieldState {
            value: None,
            error: true,
            error_message: String::new(),
        })
    };
    Cluster {
        node: silent(),
        percent: silent(),
        tolerance: silent(),
        penalty: silent(),
        range: silent(),
    }
}

// ============================================================================
// Display values
// ============================================================================

mod display {
    use super::*;

    #[test]
    fn test_unset_and_zero_render_as_zero() {
        assert_eq!(compute_display_value(&Cluster::measured(None)), "0 kg");
        assert_eq!(compute_display_value(&Cluster::measured(Some(Decimal::ZERO))), "0 kg");
    }

    #[test]
    fn test_fractional_weight() {
        let cluster = Cluster::measured(Some(Decimal::new(1235, 1)));
        assert_eq!(compute_display_value(&cluster), "123.5 kg");
    }

    #[test]
    fn test_bonus_reads_penalty_not_node() {
        let bonus: Cluster = serde_json::from_value(json!({
            "node": {"value": 99},
            "penalty": {"value": 15}
        }))
        .unwrap();
        assert_eq!(compute_bonus_display(&bonus), "15 kg");
        assert_eq!(compute_bonus_display(&Cluster::default()), "0 kg");
    }

    proptest! {
        #[test]
        fn prop_whole_weights_render_verbatim(kg in 0i64..1_000_000) {
            let cluster = Cluster::measured(Some(Decimal::from(kg)));
            prop_assert_eq!(compute_display_value(&cluster), format!("{} kg", kg));
        }
    }
}

// ============================================================================
// Validation scan
// ============================================================================

mod validation_scan {
    use super::*;

    #[test]
    fn test_empty_mapping_has_no_errors() {
        assert!(!has_validation_errors(&Clusters::new()));
        assert!(!has_validation_errors_json(&Map::new()));
    }

    #[test]
    fn test_only_non_empty_message_counts() {
        let mut cluster = flagged_silent_cluster();
        assert!(!has_validation_errors(&[(ClusterName::Humidity, cluster.clone())].into_iter().collect()));

        cluster.field_mut(SubFieldKind::Range).set_error("required");
        let clusters: Clusters = [(ClusterName::Humidity, cluster)].into_iter().collect();
        assert!(has_validation_errors(&clusters));
    }

    #[test]
    fn test_json_scan_matches_typed_scan() {
        let loose: Value = json!({
            "Humidity": {
                "percent": {"error": true, "errorMessage": ""},
                "range": {"error": true, "errorMessage": "required"}
            },
            "notes": "free text"
        });
        assert!(has_validation_errors_json(loose.as_object().unwrap()));

        let silent: Value = json!({
            "Humidity": {"range": {"error": true, "errorMessage": ""}},
            "Vano": {"node": {"error": false, "errorMessage": "stale"}}
        });
        assert!(!has_validation_errors_json(silent.as_object().unwrap()));
    }

    #[test]
    fn test_json_scan_uses_truthy_error_flag() {
        let numeric: Value = json!({
            "Humidity": {"range": {"error": 1, "errorMessage": "fuera de rango"}}
        });
        assert!(has_validation_errors_json(numeric.as_object().unwrap()));

        let falsy: Value = json!({
            "Humidity": {"range": {"error": 0, "errorMessage": "fuera de rango"}},
            "Vano": {"node": {"error": "", "errorMessage": "fuera de rango"}},
            "Hualcacho": {"node": {"error": null, "errorMessage": "fuera de rango"}}
        });
        assert!(!has_validation_errors_json(falsy.as_object().unwrap()));
    }

    proptest! {
        #[test]
        fn prop_clean_clusters_have_no_errors(clusters in clean_clusters_strategy()) {
            prop_assert!(!has_validation_errors(&clusters));
        }

        #[test]
        fn prop_single_message_is_detected(
            name in cluster_name_strategy(),
            kind in sub_field_strategy(),
        ) {
            let mut cluster = flagged_silent_cluster();
            cluster.field_mut(kind).set_error("required");
            let clusters: Clusters = [(name, cluster)].into_iter().collect();
            prop_assert!(has_validation_errors(&clusters));
        }
    }
}

// ============================================================================
// Recalculation through the draft
// ============================================================================

mod recalculation {
    use super::*;

    fn weigh(draft: &mut ReceptionData, gross: i64, tare: i64) {
        for (cluster, value) in [(ClusterName::GrossWeight, gross), (ClusterName::Tare, tare)] {
            draft
                .apply(ReceptionUpdate::SetField {
                    cluster,
                    field: SubFieldKind::Node,
                    value: Some(Decimal::from(value)),
                })
                .unwrap();
        }
    }

    #[test]
    fn test_tare_above_gross_flags_tare() {
        let mut draft = ReceptionData::new(DiscountTemplate::default());
        weigh(&mut draft, 1000, 1500);

        assert!(draft.has_validation_errors());
        let tare = draft.clusters.get(ClusterName::Tare).unwrap();
        assert!(tare.field(SubFieldKind::Node).unwrap().is_erroring());
        assert_eq!(ReceptionTotals::from_clusters(&draft.clusters).net_weight, "0 kg");
    }

    #[test]
    fn test_huge_gross_weight_does_not_poison_the_draft() {
        let mut draft = ReceptionData::new(DiscountTemplate::default());
        draft
            .apply(ReceptionUpdate::SetTemplate {
                template: DiscountTemplate::default(),
                ranges: vec![DiscountPercent {
                    id: 1,
                    discount_code: 1,
                    start: Decimal::ZERO,
                    end: Decimal::from(100),
                    percent: Decimal::from(4),
                }],
            })
            .unwrap();
        draft
            .apply(ReceptionUpdate::SetField {
                cluster: ClusterName::Humidity,
                field: SubFieldKind::Range,
                value: Some(Decimal::from(16)),
            })
            .unwrap();
        weigh(&mut draft, 0, 0);

        draft
            .apply(ReceptionUpdate::SetField {
                cluster: ClusterName::GrossWeight,
                field: SubFieldKind::Node,
                value: Some(Decimal::MAX),
            })
            .unwrap();

        assert!(draft.has_validation_errors());
        let gross = draft.clusters.get(ClusterName::GrossWeight).unwrap();
        assert_eq!(
            gross.field(SubFieldKind::Node).unwrap().error_message,
            MSG_WEIGHT_OUT_OF_RANGE
        );
        let humidity = draft.clusters.get(ClusterName::Humidity).unwrap();
        assert_eq!(humidity.value(SubFieldKind::Penalty), None);

        weigh(&mut draft, 10_000, 0);
        assert!(!draft.has_validation_errors());
        assert_eq!(ReceptionTotals::from_clusters(&draft.clusters).total_paddy, "9600 kg");
    }

    proptest! {
        #[test]
        fn prop_net_is_gross_minus_tare(gross in 0i64..100_000, tare in 0i64..100_000) {
            prop_assume!(tare <= gross);
            let mut draft = ReceptionData::new(DiscountTemplate::default());
            weigh(&mut draft, gross, tare);

            let totals = ReceptionTotals::from_clusters(&draft.clusters);
            prop_assert!(!draft.has_validation_errors());
            prop_assert_eq!(totals.net_weight, format!("{} kg", gross - tare));
            prop_assert_eq!(totals.total_paddy, format!("{} kg", gross - tare));
        }
    }
}
