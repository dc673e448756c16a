//! Subcommand implementations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hxl_filter::{
    AddColumnsFilter, AddSpec, AppendFilter, CleanFilter, CleanOptions, ColumnFilter, CountFilter,
    DedupFilter, MergeDataFilter, MergeOptions, RenameFilter, RenameSpec, ReplaceDataFilter,
    Replacement, RowFilter, Selection, SortFilter,
};
use hxl_ingest::{
    MemoryDataset, TagSpec, Tagger, WriteOptions, parse_tagged_rows, read_csv, read_csv_from_reader,
    read_dataset, write_csv,
};
use hxl_model::{Dataset, RowQuery, TagPattern};
use hxl_validate::{Schema, ValidationReport};

use crate::cli::{
    AddArgs, AppendArgs, CleanArgs, Command, CountArgs, CutArgs, DedupArgs, IoArgs, MergeArgs,
    RenameArgs, ReplaceArgs, SelectArgs, SortArgs, TagArgs, ValidateArgs,
};

/// Raw CSV rows from a file, or standard input when `path` is `None`.
pub fn read_raw(path: Option<&Path>) -> Result<Vec<Vec<String>>> {
    match path {
        Some(path) => read_csv(path).with_context(|| format!("read {}", path.display())),
        None => read_csv_from_reader(io::stdin().lock()).context("read standard input"),
    }
}

/// Tagged dataset from a file, or standard input when `path` is `None`.
pub fn load_dataset(path: Option<&Path>) -> Result<MemoryDataset> {
    let raw = read_raw(path)?;
    let source = path.map_or_else(|| "standard input".to_string(), |p| p.display().to_string());
    parse_tagged_rows(raw).with_context(|| format!("parse HXL from {source}"))
}

fn load_other(path: &Path) -> Result<MemoryDataset> {
    read_dataset(path).with_context(|| format!("load {}", path.display()))
}

fn write_output<D: Dataset>(dataset: &D, io_args: &IoArgs) -> Result<usize> {
    let options = WriteOptions {
        headers: !io_args.no_headers,
        tags: !io_args.strip_tags,
    };
    let written = match &io_args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            write_csv(BufWriter::new(file), dataset, options)
                .with_context(|| format!("write {}", path.display()))?
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let written = write_csv(&mut handle, dataset, options).context("write standard output")?;
            handle.flush().context("flush standard output")?;
            written
        }
    };
    info!(rows = written, "output written");
    Ok(written)
}

fn patterns(list: &str) -> Result<Vec<TagPattern>> {
    TagPattern::parse_list(list).with_context(|| format!("parse tag patterns '{list}'"))
}

fn optional_patterns(list: Option<&str>) -> Result<Vec<TagPattern>> {
    list.map_or_else(|| Ok(Vec::new()), patterns)
}

fn selection(all: bool, list: Option<&str>) -> Result<Selection> {
    if all {
        return Ok(Selection::All);
    }
    Ok(match list {
        Some(list) => Selection::Patterns(patterns(list)?),
        None => Selection::None,
    })
}

/// Run any subcommand that writes a dataset. Returns the number of rows written.
///
/// `validate` is handled by [`run_validate`].
pub fn run_filter(command: &Command) -> Result<usize> {
    match command {
        Command::Add(args) => run_add(args),
        Command::Append(args) => run_append(args),
        Command::Clean(args) => run_clean(args),
        Command::Count(args) => run_count(args),
        Command::Cut(args) => run_cut(args),
        Command::Dedup(args) => run_dedup(args),
        Command::Merge(args) => run_merge(args),
        Command::Rename(args) => run_rename(args),
        Command::Replace(args) => run_replace(args),
        Command::Select(args) => run_select(args),
        Command::Sort(args) => run_sort(args),
        Command::Tag(args) => run_tag(args),
        Command::Validate(_) => anyhow::bail!("validate does not produce a dataset"),
    }
}

fn run_add(args: &AddArgs) -> Result<usize> {
    let _span = info_span!("add").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let specs = args
        .specs
        .iter()
        .map(|spec| AddSpec::parse(spec).with_context(|| format!("parse --spec '{spec}'")))
        .collect::<Result<Vec<_>>>()?;
    write_output(&AddColumnsFilter::new(source, specs, args.before), &args.io)
}

fn run_append(args: &AppendArgs) -> Result<usize> {
    let _span = info_span!("append").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let other = load_other(&args.append)?;
    let filter = AppendFilter::new(source, other, !args.exclude_extra_columns);
    write_output(&filter, &args.io)
}

fn run_clean(args: &CleanArgs) -> Result<usize> {
    let _span = info_span!("clean").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let options = CleanOptions {
        whitespace: selection(args.whitespace_all, args.whitespace.as_deref())?,
        upper: selection(false, args.upper.as_deref())?,
        lower: selection(false, args.lower.as_deref())?,
        date: selection(args.date_all, args.date.as_deref())?,
        number: selection(args.number_all, args.number.as_deref())?,
    };
    write_output(&CleanFilter::new(source, options), &args.io)
}

fn run_count(args: &CountArgs) -> Result<usize> {
    let _span = info_span!("count").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let aggregate = args
        .aggregate
        .as_deref()
        .map(TagPattern::parse)
        .transpose()
        .context("parse --aggregate")?;
    let filter = CountFilter::new(source, patterns(&args.tags)?, aggregate)?;
    write_output(&filter, &args.io)
}

fn run_cut(args: &CutArgs) -> Result<usize> {
    let _span = info_span!("cut").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let filter = ColumnFilter::new(
        source,
        optional_patterns(args.include.as_deref())?,
        optional_patterns(args.exclude.as_deref())?,
    );
    write_output(&filter, &args.io)
}

fn run_dedup(args: &DedupArgs) -> Result<usize> {
    let _span = info_span!("dedup").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let filter = DedupFilter::new(source, optional_patterns(args.tags.as_deref())?);
    write_output(&filter, &args.io)
}

fn run_merge(args: &MergeArgs) -> Result<usize> {
    let _span = info_span!("merge").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let merge = load_other(&args.merge)?;
    let options = MergeOptions {
        replace: args.replace,
        overwrite: args.overwrite,
    };
    let filter = MergeDataFilter::new(
        source,
        merge,
        patterns(&args.keys)?,
        patterns(&args.tags)?,
        options,
    );
    write_output(&filter, &args.io)
}

fn run_rename(args: &RenameArgs) -> Result<usize> {
    let _span = info_span!("rename").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let specs = args
        .renames
        .iter()
        .map(|spec| RenameSpec::parse(spec).with_context(|| format!("parse --rename '{spec}'")))
        .collect::<Result<Vec<_>>>()?;
    write_output(&RenameFilter::new(source, specs), &args.io)
}

fn run_replace(args: &ReplaceArgs) -> Result<usize> {
    let _span = info_span!("replace").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let replacements = match (&args.map, &args.pattern, &args.substitution) {
        (Some(map), _, _) => {
            Replacement::from_dataset(&load_other(map)?).context("read replacement map")?
        }
        (None, Some(pattern), Some(substitution)) => {
            let tags = args
                .tags
                .as_deref()
                .map(TagPattern::parse)
                .transpose()
                .context("parse --tags")?;
            vec![Replacement::new(pattern, substitution, tags, args.regex)?]
        }
        _ => anyhow::bail!("either --map or both --pattern and --substitution are required"),
    };
    write_output(&ReplaceDataFilter::new(source, replacements), &args.io)
}

fn run_select(args: &SelectArgs) -> Result<usize> {
    let _span = info_span!("select").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let queries = RowQuery::parse_list(args.queries.as_slice()).context("parse --query")?;
    write_output(&RowFilter::new(source, queries, args.reverse), &args.io)
}

fn run_sort(args: &SortArgs) -> Result<usize> {
    let _span = info_span!("sort").entered();
    let source = load_dataset(args.io.input.as_deref())?;
    let filter = SortFilter::new(source, optional_patterns(args.tags.as_deref())?, args.reverse);
    write_output(&filter, &args.io)
}

fn run_tag(args: &TagArgs) -> Result<usize> {
    let _span = info_span!("tag").entered();
    let specs = args
        .specs
        .iter()
        .map(|spec| TagSpec::parse(spec).with_context(|| format!("parse --map '{spec}'")))
        .collect::<Result<Vec<_>>>()?;
    let raw = read_raw(args.io.input.as_deref())?;
    let tagged = Tagger::new(specs).tag_rows(raw).context("tag header row")?;
    let dataset = parse_tagged_rows(tagged)?;
    write_output(&dataset, &args.io)
}

/// Validate a dataset against the given schema file or the built-in schema.
pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let _span = info_span!("validate").entered();
    let mut schema = match &args.schema {
        Some(path) => Schema::from_dataset(&load_other(path)?)
            .with_context(|| format!("load schema {}", path.display()))?,
        None => Schema::default_schema().context("load built-in schema")?,
    };
    let dataset = load_dataset(args.input.as_deref())?;
    Ok(schema.validate_report(&dataset))
}
