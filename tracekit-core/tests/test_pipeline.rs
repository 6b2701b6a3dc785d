use rstest::rstest;
use serde_json::json;
use tracekit_core::catalog::TransformCatalog;
use tracekit_core::error::TraceKitError;
use tracekit_core::pipeline::TransformPipeline;
use tracekit_core::spec::series::{SeriesContext, SeriesType};
use tracekit_core::spec::transform::aggregate::{AggregateFunc, Aggregation, AggregationSet};
use tracekit_core::spec::transform::filter::{FilterOperation, FilterTransformSpec};
use tracekit_core::spec::transform::patch::TransformPatch;
use tracekit_core::spec::transform::{Transform, TransformKind};

fn insertable(pipeline: &TransformPipeline, series_type: SeriesType) -> Vec<TransformKind> {
    pipeline
        .insertable_kinds(&TransformCatalog::default(), series_type)
        .into_iter()
        .map(|opt| opt.kind)
        .collect()
}

fn append(pipeline: &TransformPipeline, kind: TransformKind) -> TransformPipeline {
    let ctx = SeriesContext::new(SeriesType::Scatter);
    pipeline
        .append(kind, &TransformCatalog::default(), &ctx)
        .unwrap()
        .0
}

#[test]
fn empty_scatter_pipeline_offers_every_kind() {
    assert_eq!(
        insertable(&TransformPipeline::new(), SeriesType::Scatter),
        TransformKind::ALL.to_vec()
    );
}

#[test]
fn append_aggregate_uses_primary_field() {
    let ctx = SeriesContext::new(SeriesType::Scatter).with_primary_field(Some("y"));
    let (pipeline, appended) = TransformPipeline::new()
        .append(TransformKind::Aggregate, &TransformCatalog::default(), &ctx)
        .unwrap();

    assert_eq!(appended.index, 0);
    assert_eq!(pipeline.get(0), Some(&appended.transform));
    assert_eq!(
        serde_json::to_value(&appended.transform).unwrap(),
        json!({
            "type": "aggregate",
            "aggregations": [{"target": "y", "enabled": true, "func": "first"}],
            "enabled": true
        })
    );
}

#[rstest]
#[case(TransformKind::Groupby)]
#[case(TransformKind::Aggregate)]
#[case(TransformKind::Sort)]
fn singleton_kinds_are_consumed(#[case] kind: TransformKind) {
    let pipeline = append(&TransformPipeline::new(), kind);
    assert!(!insertable(&pipeline, SeriesType::Scatter).contains(&kind));

    // Still excluded after further, unrelated appends
    let pipeline = append(&pipeline, TransformKind::Filter);
    assert!(!insertable(&pipeline, SeriesType::Scatter).contains(&kind));

    let ctx = SeriesContext::new(SeriesType::Scatter);
    let err = pipeline
        .append(kind, &TransformCatalog::default(), &ctx)
        .unwrap_err();
    assert!(matches!(err, TraceKitError::InvalidKindError(..)));
    assert_eq!(pipeline.len(), 2);
}

#[test]
fn filters_are_unbounded() {
    let mut pipeline = TransformPipeline::new();
    for _ in 0..5 {
        pipeline = append(&pipeline, TransformKind::Filter);
        assert!(insertable(&pipeline, SeriesType::Scatter).contains(&TransformKind::Filter));
    }
    assert_eq!(pipeline.len(), 5);
}

#[test]
fn removing_a_singleton_makes_it_insertable_again() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Filter);
    let pipeline = append(&pipeline, TransformKind::Groupby);
    assert!(!insertable(&pipeline, SeriesType::Scatter).contains(&TransformKind::Groupby));

    let (pipeline, removed) = pipeline.remove(1).unwrap();
    assert_eq!(removed.kind(), TransformKind::Groupby);
    assert!(insertable(&pipeline, SeriesType::Scatter).contains(&TransformKind::Groupby));
}

#[test]
fn sort_is_never_offered_for_candlestick() {
    let ctx = SeriesContext::new(SeriesType::Candlestick);
    let err = TransformPipeline::new()
        .append(TransformKind::Sort, &TransformCatalog::default(), &ctx)
        .unwrap_err();
    assert!(matches!(err, TraceKitError::InvalidKindError(..)));
}

#[test]
fn update_filter_operation_keeps_other_defaults() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Filter);
    let patch = TransformPatch {
        operation: Some(FilterOperation::Greater),
        ..Default::default()
    };
    let updated = pipeline.update(0, &patch).unwrap();

    let expected = Transform::Filter(FilterTransformSpec {
        operation: FilterOperation::Greater,
        ..Default::default()
    });
    assert_eq!(updated.get(0), Some(&expected));

    // Original value untouched
    assert_eq!(
        pipeline.get(0),
        Some(&Transform::Filter(FilterTransformSpec::default()))
    );
}

#[test]
fn update_json_matches_form_payload() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Filter);
    let updated = pipeline
        .update_json(0, &json!({"operation": ">", "targetsrc": "col2", "value": 10}))
        .unwrap();
    assert_eq!(
        serde_json::to_value(&updated).unwrap(),
        json!([{
            "type": "filter",
            "target": [],
            "targetsrc": "col2",
            "operation": ">",
            "value": 10,
            "enabled": true
        }])
    );
}

#[test]
fn update_json_sets_null_filter_value() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Filter)
        .update_json(0, &json!({"value": 5}))
        .unwrap();
    let updated = pipeline.update_json(0, &json!({"value": null})).unwrap();
    assert_eq!(
        serde_json::to_value(updated.get(0).unwrap()).unwrap()["value"],
        json!(null)
    );

    let patch: TransformPatch = serde_json::from_value(json!({"value": null})).unwrap();
    assert_eq!(patch.attributes(), vec!["value"]);
    assert_eq!(patch.value, Some(serde_json::Value::Null));

    // An absent key still leaves the value alone
    let untouched = pipeline.update_json(0, &json!({"enabled": false})).unwrap();
    assert_eq!(
        serde_json::to_value(untouched.get(0).unwrap()).unwrap()["value"],
        json!(5)
    );
}

#[rstest]
#[case(1)]
#[case(7)]
fn update_out_of_range_fails(#[case] index: usize) {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Filter);
    let patch = TransformPatch {
        enabled: Some(false),
        ..Default::default()
    };
    let err = pipeline.update(index, &patch).unwrap_err();
    assert!(matches!(err, TraceKitError::IndexOutOfRangeError(..)));

    let err = pipeline.remove(index).unwrap_err();
    assert!(matches!(err, TraceKitError::IndexOutOfRangeError(..)));
}

#[test]
fn update_with_foreign_attribute_is_rejected() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Groupby);
    let err = pipeline
        .update_json(0, &json!({"order": "descending"}))
        .unwrap_err();
    assert!(matches!(err, TraceKitError::SpecificationError(..)));
}

#[test]
fn update_cannot_introduce_duplicate_aggregation_targets() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Aggregate);
    let err = pipeline
        .update_json(
            0,
            &json!({"aggregations": [
                {"target": "y", "func": "sum"},
                {"target": "y", "func": "max"}
            ]}),
        )
        .unwrap_err();
    assert!(matches!(err, TraceKitError::SpecificationError(..)));
}

#[test]
fn update_can_replace_aggregations() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Aggregate);
    let aggregations = AggregationSet::try_new(vec![
        Aggregation::new("y", AggregateFunc::Sum),
        Aggregation::new("marker.size", AggregateFunc::Max),
    ])
    .unwrap();
    let patch = TransformPatch {
        aggregations: Some(aggregations.clone()),
        ..Default::default()
    };
    let updated = pipeline.update(0, &patch).unwrap();
    let spec = updated.get(0).unwrap().as_aggregate().unwrap();
    assert_eq!(spec.aggregations, aggregations);
}

#[test]
fn set_aggregation_func() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Filter);
    let pipeline = append(&pipeline, TransformKind::Aggregate);

    let updated = pipeline
        .set_aggregation_func(1, "y", AggregateFunc::Stddev)
        .unwrap();
    let spec = updated.get(1).unwrap().as_aggregate().unwrap();
    assert_eq!(spec.aggregations.get("y").unwrap().func, AggregateFunc::Stddev);

    let err = pipeline
        .set_aggregation_func(1, "z", AggregateFunc::Sum)
        .unwrap_err();
    assert!(matches!(err, TraceKitError::TargetNotFoundError(..)));

    let err = pipeline
        .set_aggregation_func(0, "y", AggregateFunc::Sum)
        .unwrap_err();
    assert!(matches!(err, TraceKitError::SpecificationError(..)));
}

#[test]
fn indices_stay_stable_on_append() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Groupby);
    let pipeline = append(&pipeline, TransformKind::Filter);
    let pipeline = append(&pipeline, TransformKind::Sort);
    let kinds: Vec<_> = pipeline.iter().map(|tx| tx.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TransformKind::Groupby,
            TransformKind::Filter,
            TransformKind::Sort
        ]
    );
}

#[test]
fn from_json_skips_untyped_entries() {
    let pipeline = TransformPipeline::from_json(&json!([
        {"type": "filter", "operation": "<", "value": 3},
        {"target": ["x"]},
        {"type": null},
        {"type": "groupby", "groupssrc": "col3"}
    ]))
    .unwrap();

    let kinds: Vec<_> = pipeline.iter().map(|tx| tx.kind()).collect();
    assert_eq!(kinds, vec![TransformKind::Filter, TransformKind::Groupby]);
}

#[test]
fn from_json_rejects_repeated_singletons() {
    let err = TransformPipeline::from_json(&json!([
        {"type": "groupby", "groupssrc": "col1"},
        {"type": "groupby", "groupssrc": "col2"}
    ]))
    .unwrap_err();
    assert!(matches!(err, TraceKitError::SpecificationError(ref msg, _) if msg.contains("groupby")));
}

#[test]
fn from_json_rejects_unknown_kind() {
    let result = TransformPipeline::from_json(&json!([{"type": "pivot"}]));
    assert!(result.is_err());

    let result = TransformPipeline::from_json(&json!({"type": "filter"}));
    assert!(result.is_err());
}

#[test]
fn disabled_transforms_stay_in_the_pipeline() {
    let pipeline = append(&TransformPipeline::new(), TransformKind::Sort);
    let updated = pipeline.update_json(0, &json!({"enabled": false})).unwrap();
    assert_eq!(updated.len(), 1);
    assert!(!updated.get(0).unwrap().enabled());
    assert!(!insertable(&updated, SeriesType::Scatter).contains(&TransformKind::Sort));
}
