//! Integration tests for the subcommands, run against temporary files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use hxl_cli::cli::{Cli, Command, IoArgs};
use hxl_cli::commands::{run_filter, run_validate};

const ACTIVITIES: &str = "\
Organisation,Sector,Province,Affected
#org,#sector,#adm1,#affected
NGO A,WASH,Coast,100
NGO B,Health,Plains,50
NGO A,Health,Coast,
NGO B,WASH,Plains,75
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn parse(dir: &TempDir, args: &[&str]) -> (Command, PathBuf) {
    let input = write_file(dir, "input.csv", ACTIVITIES);
    let output = dir.path().join("output.csv");
    let mut argv = vec!["hxl".to_string()];
    argv.extend(args.iter().map(|arg| (*arg).to_string()));
    argv.push(input.display().to_string());
    argv.push(output.display().to_string());
    let cli = Cli::try_parse_from(argv).unwrap();
    (cli.command, output)
}

fn run(args: &[&str]) -> String {
    let dir = TempDir::new().unwrap();
    let (command, output) = parse(&dir, args);
    run_filter(&command).unwrap();
    read(&output)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn count_with_aggregate() {
    let output = run(&["count", "-t", "org", "-a", "affected"]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines[0],
        "Organisation,Count,Sum,Average (mean),Minimum value,Maximum value"
    );
    assert_eq!(
        lines[1],
        "#org,#x_count_num,#x_sum_num,#x_average_num,#x_min_num,#x_max_num"
    );
    assert_eq!(lines[2], "NGO A,2,100.0,100.0,100.0,100.0");
    assert_eq!(lines[3], "NGO B,2,125.0,62.5,50.0,75.0");
}

#[test]
fn cut_and_strip_tags() {
    let output = run(&["cut", "-i", "org,affected", "--strip-tags"]);
    assert_eq!(
        output,
        "Organisation,Affected\nNGO A,100\nNGO B,50\nNGO A,\nNGO B,75\n"
    );
}

#[test]
fn select_with_reverse_and_no_headers() {
    let output = run(&["select", "--query", "sector=wash", "-r", "--no-headers"]);
    assert_eq!(
        output,
        "#org,#sector,#adm1,#affected\nNGO B,Health,Plains,50\nNGO A,Health,Coast,\n"
    );
}

#[test]
fn sort_descending() {
    let output = run(&["sort", "-t", "affected", "-r", "--strip-tags", "--no-headers"]);
    let first: Vec<&str> = output.lines().map(|l| l.split(',').next_back().unwrap()).collect();
    assert_eq!(first, ["", "100", "75", "50"]);
}

#[test]
fn add_rename_and_dedup() {
    let added = run(&["add", "-s", "Country#country=Kenya", "--strip-tags"]);
    assert!(added.starts_with("Organisation,Sector,Province,Affected,Country\n"));
    assert!(added.lines().skip(1).all(|line| line.ends_with(",Kenya")));

    let renamed = run(&["rename", "-r", "adm1:Region#adm2", "--no-headers"]);
    assert!(renamed.starts_with("#org,#sector,#adm2,#affected\n"));

    let deduped = run(&["dedup", "-t", "org", "--no-headers", "--strip-tags"]);
    assert_eq!(deduped, "NGO A,WASH,Coast,100\nNGO B,Health,Plains,50\n");
}

#[test]
fn replace_inline_and_clean() {
    let replaced = run(&["replace", "-p", "NGO", "-s", "Org", "-t", "org", "--strip-tags", "--no-headers"]);
    assert!(replaced.lines().all(|line| line.starts_with("Org ")));

    let cleaned = run(&["clean", "-u", "sector", "--strip-tags", "--no-headers"]);
    assert!(cleaned.lines().next().unwrap().contains(",WASH,"));
    assert!(cleaned.contains(",HEALTH,"));
}

#[test]
fn merge_from_second_file() {
    let dir = TempDir::new().unwrap();
    let merge = write_file(
        &dir,
        "codes.csv",
        "#adm1,#adm1+code\nCoast,K01\nPlains,K02\n",
    );
    let (command, output) = parse(
        &dir,
        &["merge", "-m", merge.to_str().unwrap(), "-k", "adm1", "-t", "adm1+code", "--no-headers"],
    );
    run_filter(&command).unwrap();
    let merged = read(&output);
    let lines: Vec<&str> = merged.lines().collect();
    assert_eq!(lines[0], "#org,#sector,#adm1,#affected,#adm1+code");
    assert_eq!(lines[1], "NGO A,WASH,Coast,100,K01");
    assert_eq!(lines[2], "NGO B,Health,Plains,50,K02");
}

#[test]
fn append_adds_missing_columns() {
    let dir = TempDir::new().unwrap();
    let extra = write_file(&dir, "extra.csv", "#org,#country\nNGO C,Kenya\n");
    let (command, output) = parse(
        &dir,
        &["append", "-a", extra.to_str().unwrap(), "--no-headers", "--strip-tags"],
    );
    run_filter(&command).unwrap();
    let appended = read(&output);
    assert_eq!(appended.lines().last(), Some("NGO C,,,,Kenya"));
    assert!(appended.lines().next().unwrap().ends_with(",100,"));
}

#[test]
fn tag_untagged_input() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "untagged.csv",
        "Organisation name,Sector of work\nNGO A,WASH\n",
    );
    let output = dir.path().join("tagged.csv");
    let cli = Cli::try_parse_from([
        "hxl",
        "tag",
        "-m",
        "organisation#org",
        "-m",
        "sector#sector",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ])
    .unwrap();
    run_filter(&cli.command).unwrap();
    assert_eq!(
        read(&output),
        "Organisation name,Sector of work\n#org,#sector\nNGO A,WASH\n"
    );
}

#[test]
fn validate_with_schema_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "input.csv", ACTIVITIES);
    let schema = write_file(
        &dir,
        "schema.csv",
        "#valid_tag,#valid_required,#valid_value+list\n#sector,true,WASH|Education\n#affected,true,\n",
    );
    let cli = Cli::try_parse_from([
        "hxl",
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        input.to_str().unwrap(),
    ])
    .unwrap();
    let Command::Validate(args) = &cli.command else {
        panic!("expected validate");
    };
    let report = run_validate(args).unwrap();
    assert_eq!(report.rows_validated, 4);
    assert_eq!(report.error_count(), 3);
    let values: Vec<_> = report.issues.iter().map(|i| i.value.clone()).collect();
    assert_eq!(
        values,
        [Some("Health".to_string()), Some("Health".to_string()), None]
    );
}

#[test]
fn validate_with_default_schema() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "input.csv", ACTIVITIES);
    let cli = Cli::try_parse_from(["hxl", "validate", "--json", input.to_str().unwrap()]).unwrap();
    let Command::Validate(args) = &cli.command else {
        panic!("expected validate");
    };
    assert!(args.json);
    assert!(run_validate(args).unwrap().is_valid());
}

#[test]
fn missing_input_is_an_error() {
    let command = Command::Dedup(hxl_cli::cli::DedupArgs {
        tags: None,
        io: IoArgs {
            input: Some(PathBuf::from("/nonexistent/input.csv")),
            ..IoArgs::default()
        },
    });
    let error = run_filter(&command).unwrap_err();
    assert!(format!("{error:#}").contains("/nonexistent/input.csv"));
}

#[test]
fn replace_requires_pattern_or_map() {
    assert!(Cli::try_parse_from(["hxl", "replace", "in.csv"]).is_err());
    assert!(Cli::try_parse_from(["hxl", "replace", "-p", "a", "in.csv"]).is_err());
    assert!(Cli::try_parse_from(["hxl", "replace", "-p", "a", "-s", "b", "in.csv"]).is_ok());
    assert!(Cli::try_parse_from(["hxl", "replace", "-m", "map.csv", "in.csv"]).is_ok());
}
