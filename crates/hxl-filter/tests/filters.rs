use hxl_filter::{
    AddSpec, AppendFilter, CacheFilter, CleanOptions, ColumnFilter, CountFilter, DatasetExt,
    MergeOptions, RenameSpec, Replacement, Selection,
};
use hxl_ingest::MemoryDataset;
use hxl_model::{Dataset, RowQuery, TagPattern};

fn dataset(rows: &[&[&str]]) -> MemoryDataset {
    let raw = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    MemoryDataset::from_raw(raw).expect("hashtag row")
}

fn patterns(specs: &str) -> Vec<TagPattern> {
    TagPattern::parse_list(specs).expect("patterns")
}

fn sample() -> MemoryDataset {
    dataset(&[
        &["Organisation", "Cluster", "District", "Affected"],
        &["#org", "#sector+cluster", "#adm1", "#affected"],
        &["NGO A", "WASH", "Coast", "200"],
        &["NGO B", "Education", "Plains", "100"],
        &["NGO A", "Health", "Mountains", "50"],
    ])
}

#[test]
fn count_groups_and_aggregates_sorted_by_key() {
    let data = dataset(&[
        &["#a", "#n"],
        &["y", "2"],
        &["x", "1"],
        &["x", "3"],
    ]);
    let count = CountFilter::new(&data, patterns("#a"), Some(TagPattern::parse("#n").unwrap()))
        .unwrap();
    assert_eq!(
        count.display_tags(),
        [
            "#a",
            "#x_count_num",
            "#x_sum_num",
            "#x_average_num",
            "#x_min_num",
            "#x_max_num"
        ]
    );
    assert_eq!(
        count.values(),
        [
            ["x", "2", "4.0", "2.0", "1.0", "3.0"],
            ["y", "1", "2.0", "2.0", "2.0", "2.0"],
        ]
    );
}

#[test]
fn count_without_aggregate_and_missing_numbers() {
    let data = dataset(&[&["Agency", "Number"], &["#org", "#n"], &["A", "x"], &["A", ""]]);
    let count = (&data).count(patterns("#org"), Some(TagPattern::parse("#n").unwrap())).unwrap();
    assert_eq!(count.values(), [["A", "2", "", "", "", ""]]);
    assert_eq!(count.columns()[0].header.as_deref(), Some("Agency"));

    let plain = (&data).count(patterns("#org"), None).unwrap();
    assert_eq!(plain.values(), [["A", "2"]]);
    assert!(CountFilter::new(&data, Vec::new(), None).is_err());
}

#[test]
fn count_is_repeatable() {
    let data = sample();
    let count = (&data).count(patterns("#org"), None).unwrap();
    assert_eq!(count.values(), count.values());
    assert_eq!(count.values(), [["NGO A", "2"], ["NGO B", "1"]]);
}

#[test]
fn cut_include_and_exclude() {
    let data = dataset(&[&["#a", "#b", "#c"], &["1", "2", "3"], &["4", "5", "6"]]);
    let include = (&data).with_columns(patterns("#a"));
    assert_eq!(include.display_tags(), ["#a"]);
    assert_eq!(include.values(), [["1"], ["4"]]);

    let exclude = (&data).without_columns(patterns("#b"));
    assert_eq!(exclude.display_tags(), ["#a", "#c"]);
    assert_eq!(exclude.values(), [["1", "3"], ["4", "6"]]);

    let both = ColumnFilter::new(&data, patterns("#a,#b"), patterns("#b"));
    assert_eq!(both.display_tags(), ["#a"]);
}

#[test]
fn cache_caps_rows_and_flags_overflow() {
    let data = sample();
    let capped = CacheFilter::new(&data, Some(2));
    assert_eq!(capped.rows().count(), 2);
    assert!(capped.overflow());

    let exact = CacheFilter::new(&data, Some(3));
    assert_eq!(exact.rows().count(), 3);
    assert!(!exact.overflow());

    let all = (&data).cache(None);
    assert!(!all.overflow());
    assert_eq!(all.values(), data.values());
}

#[test]
fn add_then_cut_restores_original() {
    let data = sample();
    let specs = vec![AddSpec::parse("Country#country=Utopia").unwrap()];
    let added = (&data).add_columns(specs.clone(), false);
    assert_eq!(added.display_tags().last().map(String::as_str), Some("#country"));
    assert!(added.values().iter().all(|row| row.last().map(String::as_str) == Some("Utopia")));

    let before = (&data).add_columns(specs, true);
    assert_eq!(before.display_tags()[0], "#country");

    let restored = added.without_columns(patterns("#country"));
    assert_eq!(restored.columns().as_ref(), data.columns().as_ref());
    assert_eq!(restored.values(), data.values());
}

#[test]
fn select_with_or_queries_and_reverse() {
    let data = sample();
    let queries = RowQuery::parse_list(&["#sector=wash", "#affected<100"]).unwrap();
    let kept = (&data).with_rows(queries.clone());
    assert_eq!(
        kept.rows().map(|r| r.values[2].clone()).collect::<Vec<_>>(),
        ["Coast", "Mountains"]
    );
    let numbers: Vec<_> = kept.rows().map(|r| (r.row_number, r.source_row_number)).collect();
    assert_eq!(numbers, [(0, Some(2)), (1, Some(4))]);

    let dropped = (&data).without_rows(queries);
    assert_eq!(
        dropped.rows().map(|r| r.values[2].clone()).collect::<Vec<_>>(),
        ["Plains"]
    );
}

#[test]
fn sort_by_number_and_reverse() {
    let data = sample();
    let sorted = (&data).sort(patterns("#affected"), false);
    assert_eq!(
        sorted.rows().map(|r| r.values[3].clone()).collect::<Vec<_>>(),
        ["50", "100", "200"]
    );
    let reversed = (&data).sort(patterns("#affected"), true);
    assert_eq!(
        reversed.rows().map(|r| r.values[3].clone()).collect::<Vec<_>>(),
        ["200", "100", "50"]
    );
    let by_all = (&data).sort(Vec::new(), false);
    assert_eq!(by_all.values()[0][1], "Health");
}

#[test]
fn clean_selected_columns() {
    let data = dataset(&[
        &["#org", "#date+reported", "#x_num", "#adm1"],
        &["  Red   Cross ", "3 January 2018", "1,200.50", " coast "],
    ]);
    let options = CleanOptions {
        whitespace: Selection::All,
        upper: Selection::Patterns(patterns("#adm1")),
        date: Selection::All,
        number: Selection::All,
        ..CleanOptions::default()
    };
    let cleaned = (&data).clean(options);
    assert_eq!(
        cleaned.values(),
        [["Red Cross", "2018-01-03", "1200.5", "COAST"]]
    );
    assert_eq!(cleaned.columns(), data.columns());
}

#[test]
fn rename_retags_first_matching_spec() {
    let data = sample();
    let renamed = (&data).rename(vec![
        RenameSpec::parse("#org:Agency#org+impl").unwrap(),
        RenameSpec::parse("#org:#org+funder").unwrap(),
    ]);
    let columns = renamed.columns();
    assert_eq!(columns[0].display_tag().as_deref(), Some("#org+impl"));
    assert_eq!(columns[0].header.as_deref(), Some("Agency"));
    assert_eq!(renamed.values(), data.values());
}

#[test]
fn replacements_apply_in_order() {
    let data = sample();
    let rules = vec![
        Replacement::new("NGO", "Org", Some(TagPattern::parse("#org").unwrap()), false).unwrap(),
        Replacement::new(r"^Org (\w)$", "Organisation $1", None, true).unwrap(),
    ];
    let replaced = (&data).replace(rules);
    let orgs: Vec<_> = replaced.rows().map(|r| r.values[0].clone()).collect();
    assert_eq!(orgs, ["Organisation A", "Organisation B", "Organisation A"]);
}

#[test]
fn replacement_map_from_dataset() {
    let map = dataset(&[
        &["#x_pattern", "#x_substitution", "#x_tag", "#x_regex"],
        &["WASH", "Water", "#sector", ""],
        &["", "ignored", "", ""],
        &["^M(.*)", "Hill$1", "adm1", "yes"],
    ]);
    let rules = Replacement::from_dataset(&map).unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules[1].is_regex());

    let data = sample();
    let replaced = (&data).replace(rules);
    let values = replaced.values();
    assert_eq!(values[0][1], "Water");
    assert_eq!(values[2][2], "Hillountains");

    let bad = dataset(&[&["#x_substitution"], &["x"]]);
    assert!(Replacement::from_dataset(&bad).is_err());
}

#[test]
fn merge_adds_columns_by_key() {
    let data = sample();
    let lookup = dataset(&[
        &["District", "P-code", "Population"],
        &["#adm1+name", "#adm1+code", "#population"],
        &["coast", "C01", "1000"],
        &["Coast", "C99", "9999"],
        &["Plains", "P01", ""],
    ]);
    let merged = (&data).merge(
        &lookup,
        patterns("#adm1"),
        patterns("#adm1+code,#population"),
        MergeOptions::default(),
    );
    assert_eq!(
        merged.display_tags(),
        ["#org", "#sector+cluster", "#adm1", "#affected", "#adm1+code", "#population"]
    );
    let values = merged.values();
    assert_eq!(values[0][4..], ["C01", "1000"]);
    assert_eq!(values[1][4..], ["P01", ""]);
    assert_eq!(values[2][4..], ["", ""]);
}

#[test]
fn merge_replace_fills_and_overwrites() {
    let data = dataset(&[
        &["#adm1", "#population"],
        &["Coast", ""],
        &["Plains", "5"],
    ]);
    let lookup = dataset(&[
        &["#adm1", "#population"],
        &["Coast", "100"],
        &["Plains", "200"],
    ]);
    let fill = (&data).merge(
        &lookup,
        patterns("#adm1"),
        patterns("#population"),
        MergeOptions {
            replace: true,
            overwrite: false,
        },
    );
    assert_eq!(fill.display_tags(), ["#adm1", "#population"]);
    assert_eq!(fill.values(), [["Coast", "100"], ["Plains", "5"]]);

    let overwrite = (&data).merge(
        &lookup,
        patterns("#adm1"),
        patterns("#population"),
        MergeOptions {
            replace: true,
            overwrite: true,
        },
    );
    assert_eq!(overwrite.values(), [["Coast", "100"], ["Plains", "200"]]);
}

#[test]
fn append_unifies_columns() {
    let first = dataset(&[&["#org", "#adm1"], &["A", "Coast"]]);
    let second = dataset(&[&["#adm1", "#org", "#sector"], &["Plains", "B", "WASH"]]);

    let added = AppendFilter::new(&first, &second, true);
    assert_eq!(added.display_tags(), ["#org", "#adm1", "#sector"]);
    assert_eq!(
        added.values(),
        [["A", "Coast", ""], ["B", "Plains", "WASH"]]
    );
    let numbers: Vec<_> = added.rows().map(|r| r.row_number).collect();
    assert_eq!(numbers, [0, 1]);

    let dropped = (&first).append(&second, false);
    assert_eq!(dropped.display_tags(), ["#org", "#adm1"]);
    assert_eq!(dropped.values(), [["A", "Coast"], ["B", "Plains"]]);
}

#[test]
fn append_matches_repeated_tags_by_occurrence() {
    let first = dataset(&[&["#sector", "#sector"], &["a", "b"]]);
    let second = dataset(&[&["#sector", "#sector", "#sector"], &["c", "d", "e"]]);
    let appended = (&first).append(&second, true);
    assert_eq!(appended.display_tags(), ["#sector", "#sector", "#sector"]);
    assert_eq!(appended.values()[1], ["c", "d", "e"]);
}

#[test]
fn dedup_on_keys_or_whole_row() {
    let data = dataset(&[
        &["#org", "#adm1"],
        &["A", "Coast"],
        &["a ", "Plains"],
        &["A", "Coast"],
    ]);
    assert_eq!((&data).dedup(Vec::new()).values().len(), 2);
    let by_org = (&data).dedup(patterns("#org"));
    assert_eq!(by_org.values(), [["A", "Coast"]]);
}

#[test]
fn ragged_rows_are_tolerated() {
    let data = MemoryDataset::new(
        vec![
            hxl_model::Column::parse("#a").unwrap(),
            hxl_model::Column::parse("#b").unwrap(),
        ],
        vec![vec!["1".to_string()], vec!["2".into(), "x".into(), "extra".into()]],
    );
    let cut = (&data).with_columns(patterns("#b"));
    assert_eq!(cut.values(), [vec![""], vec!["x"]]);
    let cleaned = (&data).clean(CleanOptions {
        upper: Selection::All,
        ..CleanOptions::default()
    });
    assert_eq!(cleaned.values()[1], ["2", "X", "extra"]);
    let added = (&data).add_columns(vec![AddSpec::parse("#c=z").unwrap()], false);
    assert_eq!(added.values(), [["1", "", "z"], ["2", "x", "z"]]);
}

#[test]
fn stages_chain() {
    let data = sample();
    let pipeline = (&data)
        .with_rows(RowQuery::parse_list(&["#org=NGO A"]).unwrap())
        .count(patterns("#org"), Some(TagPattern::parse("#affected").unwrap()))
        .unwrap()
        .with_columns(patterns("#org,#x_sum_num"));
    assert_eq!(pipeline.values(), [["NGO A", "250.0"]]);
}
