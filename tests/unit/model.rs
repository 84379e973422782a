use serde_json::json;

use super::*;

fn row(v: serde_json::Value) -> InputRow {
    v.as_object().cloned().unwrap()
}

#[test]
fn missing_columns_fail_the_whole_table() {
    let rows = vec![row(json!({ "VideoName": "A", "Step": 1, "Text": "hi" }))];
    let err = steps_from_rows(&rows).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("validation error:"));
    assert!(msg.contains("missing: ImageFile"));
}

#[test]
fn columns_are_checked_in_aggregate() {
    let rows = vec![
        row(json!({ "VideoName": "A", "Step": 1 })),
        row(json!({ "ImageFile": "a.png", "Text": "x" })),
    ];
    validate_columns(&rows).unwrap();
    assert!(validate_columns(&[]).is_err());
}

#[test]
fn values_are_coerced() {
    let r = row(json!({ "VideoName": 7, "Step": "3", "ImageFile": "a.png", "Text": 42 }));
    let step = Step::from_row(&r, 0).unwrap().unwrap();
    assert_eq!(step.video_name, "7");
    assert_eq!(step.order, 3);
    assert_eq!(step.caption, "42");

    let r = row(json!({ "VideoName": "A", "Step": 2.0, "ImageFile": null, "Text": null }));
    let step = Step::from_row(&r, 0).unwrap().unwrap();
    assert_eq!(step.order, 2);
    assert_eq!(step.image_reference, "");
    assert_eq!(step.caption, "");
}

#[test]
fn non_integer_step_is_rejected_with_row_number() {
    let r = row(json!({ "VideoName": "A", "Step": "first", "ImageFile": "a", "Text": "" }));
    let err = Step::from_row(&r, 4).unwrap_err();
    assert!(err.to_string().contains("row 4"));

    let r = row(json!({ "VideoName": "A", "Step": 1.5, "ImageFile": "a", "Text": "" }));
    assert!(Step::from_row(&r, 0).is_err());
}

#[test]
fn rows_without_video_name_are_skipped() {
    let rows = vec![
        row(json!({ "VideoName": null, "Step": 1, "ImageFile": "a", "Text": "x" })),
        row(json!({ "VideoName": "A", "Step": 1, "ImageFile": "a", "Text": "y" })),
    ];
    let steps = steps_from_rows(&rows).unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].caption, "y");
}

#[test]
fn grouping_sorts_each_video_by_step() {
    let rows = vec![
        row(json!({ "VideoName": "A", "Step": 3, "ImageFile": "a3", "Text": "a3" })),
        row(json!({ "VideoName": "B", "Step": 2, "ImageFile": "b2", "Text": "b2" })),
        row(json!({ "VideoName": "A", "Step": 1, "ImageFile": "a1", "Text": "a1" })),
        row(json!({ "VideoName": "B", "Step": 1, "ImageFile": "b1", "Text": "b1" })),
        row(json!({ "VideoName": "A", "Step": 2, "ImageFile": "a2", "Text": "a2" })),
    ];
    let jobs = group_jobs(steps_from_rows(&rows).unwrap());
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].video_name, "A");
    let a: Vec<i64> = jobs[0].steps.iter().map(|s| s.order).collect();
    assert_eq!(a, vec![1, 2, 3]);
    let b: Vec<&str> = jobs[1].steps.iter().map(|s| s.caption.as_str()).collect();
    assert_eq!(b, vec!["b1", "b2"]);
}

#[test]
fn duplicate_orders_keep_input_order_and_missing_sorts_last() {
    let steps = vec![
        Step::new("A", i64::MAX, "n", "no-step"),
        Step::new("A", 1, "x", "first"),
        Step::new("A", 1, "y", "second"),
        Step::new("A", 0, "z", "zero"),
    ];
    let job = VideoJob::new("A", steps);
    let captions: Vec<&str> = job.steps.iter().map(|s| s.caption.as_str()).collect();
    assert_eq!(captions, vec!["zero", "first", "second", "no-step"]);
}
