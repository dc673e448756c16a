use std::sync::Arc;

use hxl_model::{Column, Dataset, Row, Rows, TagPattern};

struct Fixed {
    columns: Arc<[Column]>,
    rows: Vec<Vec<String>>,
}

impl Dataset for Fixed {
    fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.columns)
    }

    fn rows(&self) -> Rows<'_> {
        let columns = self.columns();
        Box::new(
            self.rows
                .iter()
                .enumerate()
                .map(move |(i, values)| Row::new(Arc::clone(&columns), values.clone(), i, Some(i))),
        )
    }
}

fn fixture() -> Fixed {
    let columns: Arc<[Column]> = vec![
        Column::parse_with_header("#org+impl", Some("Organisation")).unwrap(),
        Column::untagged(Some("Notes")),
        Column::parse("#sector+cluster").unwrap(),
    ]
    .into();
    Fixed {
        columns,
        rows: vec![
            vec!["UNICEF".into(), "n1".into(), "WASH".into()],
            vec!["WFP".into(), "n2".into(), "Food".into()],
        ],
    }
}

#[test]
fn default_accessors_describe_columns() {
    let data = fixture();
    assert_eq!(data.display_tags(), ["#org+impl", "", "#sector+cluster"]);
    assert_eq!(
        data.tags(),
        [Some("#org".to_string()), None, Some("#sector".to_string())]
    );
    assert!(data.has_headers());
    assert_eq!(data.values().len(), 2);
}

#[test]
fn rows_share_the_dataset_column_list() {
    let data = fixture();
    let columns = data.columns();
    for row in data.rows() {
        assert!(Arc::ptr_eq(&row.columns, &columns));
        assert_eq!(row.values.len(), columns.len());
    }
}

#[test]
fn iteration_is_repeatable() {
    let data = fixture();
    let first: Vec<_> = data.rows().map(|r| r.values).collect();
    let second: Vec<_> = data.rows().map(|r| r.values).collect();
    assert_eq!(first, second);
}

#[test]
fn references_and_boxes_are_datasets() {
    let data = fixture();
    let by_ref: &dyn Dataset = &data;
    let boxed: Box<dyn Dataset> = Box::new(fixture());
    assert_eq!(by_ref.rows().count(), boxed.rows().count());
}

#[test]
fn patterns_skip_untagged_columns() {
    let data = fixture();
    let any = TagPattern::parse("#*").unwrap();
    let columns = data.columns();
    let matched: Vec<_> = columns.iter().filter(|c| any.matches(c)).collect();
    assert_eq!(matched.len(), 2);
}

#[test]
fn columns_and_patterns_serialize() {
    let column = Column::parse_with_header("#adm1+code", Some("P-code")).unwrap();
    let json = serde_json::to_string(&column).unwrap();
    let back: Column = serde_json::from_str(&json).unwrap();
    assert_eq!(back, column);

    let pattern = TagPattern::parse("#sector+cluster-code").unwrap();
    assert_eq!(
        serde_json::to_string(&pattern).unwrap(),
        "\"#sector+cluster-code\""
    );
    let back: TagPattern = serde_json::from_str("\"#sector+cluster-code\"").unwrap();
    assert_eq!(back, pattern);
    assert!(serde_json::from_str::<TagPattern>("\"#bad tag\"").is_err());
}
