mod common;

use active_city::io::{read_csv, read_geojson};
use active_city::{
    compute_index, compute_index_owned, compute_leave_one_out_sensitivity,
    compute_weight_sensitivity, Cell, Domain, IndexError, IndexOptions, IndicatorConfig,
    NormMethod, ScenarioSet, WeightConfig,
};
use common::{small_dataset, SMALL_FIXTURE_CSV};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn test_green_sub_index_with_constant_column() {
    let indexed = compute_index(
        &small_dataset(),
        &IndicatorConfig::default(),
        &WeightConfig::equal(),
        &IndexOptions::default(),
    )
    .unwrap();

    let green = indexed.sub_index(Domain::Green);
    assert_eq!(green, vec![0.0, 0.25, 0.5]);
    let column = indexed.column("parks_area_anteil_prozent_norm").unwrap();
    assert_eq!(column, vec![Cell::Number(0.0); 3]);
}

#[test]
fn test_composite_is_weighted_sum() {
    let weights = WeightConfig::new(0.5, 0.2, 0.3);
    let indexed = compute_index(
        &small_dataset(),
        &IndicatorConfig::default(),
        &weights,
        &IndexOptions::default(),
    )
    .unwrap();

    for district in indexed.districts() {
        let s = district.sub_indices;
        assert_eq!(
            district.active_city_index,
            0.5 * s.green + 0.2 * s.sport + 0.3 * s.mob
        );
    }
}

#[test]
fn test_borrowed_and_owned_agree_and_input_untouched() {
    let dataset = small_dataset();
    let before = dataset.clone();
    let indicators = IndicatorConfig::default();
    let weights = WeightConfig::equal();
    let options = IndexOptions::default();

    let borrowed = compute_index(&dataset, &indicators, &weights, &options).unwrap();
    assert_eq!(dataset, before);
    let owned = compute_index_owned(dataset, &indicators, &weights, &options).unwrap();
    assert_eq!(borrowed, owned);
}

#[test]
fn test_missing_values_are_filled_before_normalization() {
    let input = indoc! {"
        bez_nr,name,parks_pro_1000_einw,parks_area_anteil_prozent,sports_pro_1000_einw,sports_area_anteil_prozent,stops_pro_1000_einw,radweg_km_pro_km2
        1,A,,1,1,1,1,1
        2,B,4,2,2,2,2,2
        3,C,2,3,3,3,3,3
    "};
    let dataset = read_csv(input.as_bytes()).unwrap();
    let options = IndexOptions {
        norm_method: NormMethod::MinMax,
        fill_missing: 0.0,
    };
    let indexed = compute_index(
        &dataset,
        &IndicatorConfig::default(),
        &WeightConfig::equal(),
        &options,
    )
    .unwrap();

    assert_eq!(
        indexed.column("parks_pro_1000_einw"),
        Some(vec![
            Cell::Number(0.0),
            Cell::Number(4.0),
            Cell::Number(2.0)
        ])
    );
    assert_eq!(
        indexed.column("parks_pro_1000_einw_norm"),
        Some(vec![
            Cell::Number(0.0),
            Cell::Number(1.0),
            Cell::Number(0.5)
        ])
    );
}

#[test]
fn test_configuration_errors() {
    let dataset = small_dataset();
    let options = IndexOptions::default();

    let missing = IndicatorConfig::new(
        vec!["trees_per_km2".into()],
        vec!["sports_pro_1000_einw".into()],
        vec!["stops_pro_1000_einw".into()],
    );
    assert!(matches!(
        compute_index(&dataset, &missing, &WeightConfig::equal(), &options),
        Err(IndexError::MissingColumn(c)) if c == "trees_per_km2"
    ));

    let bad_weights = WeightConfig::new(0.6, 0.3, 0.3);
    match compute_index(&dataset, &IndicatorConfig::default(), &bad_weights, &options) {
        Err(IndexError::Validation(message)) => {
            assert_eq!(message, "Weights must sum to 1.0, got 1.200000")
        }
        other => panic!("unexpected: {other:?}"),
    }

    let empty = IndicatorConfig::new(vec![], vec!["a".into()], vec!["b".into()]);
    assert!(matches!(
        compute_index(&dataset, &empty, &WeightConfig::equal(), &options),
        Err(IndexError::EmptyDomain(Domain::Green))
    ));

    assert!(matches!(
        "robust".parse::<NormMethod>(),
        Err(IndexError::InvalidArgument(_))
    ));
}

#[test]
fn test_full_pipeline_from_csv() {
    let dataset = read_csv(SMALL_FIXTURE_CSV.as_bytes()).unwrap();
    let indicators = IndicatorConfig::default();
    let weights = WeightConfig::equal();
    let options = IndexOptions::default();

    let indexed = compute_index(&dataset, &indicators, &weights, &options).unwrap();
    let table = compute_weight_sensitivity(&indexed, &ScenarioSet::default()).unwrap();
    let loo =
        compute_leave_one_out_sensitivity(&dataset, &indicators, &weights, &options).unwrap();

    let order: Vec<i64> = table.rows().iter().map(|r| r.bez_nr).collect();
    assert_eq!(order, vec![3, 2, 1]);
    assert_eq!(table.rank(1, "equal"), Some(3));
    for row in table.rows() {
        assert!(close(
            table.score(row.bez_nr, "equal").unwrap(),
            indexed.find(row.bez_nr).unwrap().active_city_index
        ));
    }

    assert_eq!(loo.len(), indicators.total_indicators());
    assert!(loo
        .rows()
        .iter()
        .all(|r| r.spearman_rho.is_nan() || (-1.0..=1.0).contains(&r.spearman_rho)));
}

#[test]
fn test_geojson_input_keeps_geometry_through_index() {
    let input = indoc! {r#"
        {"type": "FeatureCollection", "features": [
          {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]},
           "properties": {"bez_nr": 1, "name": "A", "g": 1, "s": 2, "m": 3}},
          {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 1]},
           "properties": {"bez_nr": 2, "name": "B", "g": 3, "s": 2, "m": 1}}
        ]}
    "#};
    let dataset = read_geojson(input.as_bytes()).unwrap();
    let indicators = IndicatorConfig::new(vec!["g".into()], vec!["s".into()], vec!["m".into()]);
    let indexed = compute_index(
        &dataset,
        &indicators,
        &WeightConfig::equal(),
        &IndexOptions::default(),
    )
    .unwrap();

    assert!(indexed.has_geometry());
    // constant sport column contributes nothing
    assert_eq!(indexed.sub_index(Domain::Sport), vec![0.0, 0.0]);
}
