//! CLI argument definitions for the `hxl` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hxl",
    version,
    about = "Filter and validate HXL-tagged CSV data",
    long_about = "Filter and validate data tagged with the Humanitarian Exchange Language.\n\n\
                  Each subcommand reads tagged CSV from a file or standard input and\n\
                  writes CSV to a file or standard output."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add constant-valued columns to every row.
    Add(AddArgs),
    /// Append the rows of a second dataset.
    Append(AppendArgs),
    /// Normalise whitespace, case, dates and numbers.
    Clean(CleanArgs),
    /// Count rows by unique tag values, optionally aggregating a numeric column.
    Count(CountArgs),
    /// Keep or drop columns by tag pattern.
    Cut(CutArgs),
    /// Drop rows that repeat an earlier row.
    Dedup(DedupArgs),
    /// Merge columns from a second dataset using shared keys.
    Merge(MergeArgs),
    /// Change column tags and headers.
    Rename(RenameArgs),
    /// Replace strings or regular expressions in values.
    Replace(ReplaceArgs),
    /// Keep rows matching queries (or drop them with --reverse).
    Select(SelectArgs),
    /// Sort rows by tag values.
    Sort(SortArgs),
    /// Add a hashtag row to untagged CSV by matching header text.
    Tag(TagArgs),
    /// Validate a dataset against a schema.
    Validate(ValidateArgs),
}

/// Input and output shared by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct IoArgs {
    /// CSV file to read (standard input when omitted).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// CSV file to write (standard output when omitted).
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Leave the hashtag row out of the output.
    #[arg(long = "strip-tags")]
    pub strip_tags: bool,

    /// Leave the text header row out of the output.
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Constant value to add to each row.
    #[arg(short = 's', long = "spec", value_name = "header#<tag>=<value>", required = true)]
    pub specs: Vec<String>,

    /// Add new columns before existing ones rather than after them.
    #[arg(short = 'b', long = "before")]
    pub before: bool,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct AppendArgs {
    /// Tagged CSV file to append.
    #[arg(short = 'a', long = "append", value_name = "PATH")]
    pub append: PathBuf,

    /// Do not add columns missing from the original dataset.
    #[arg(short = 'x', long = "exclude-extra-columns")]
    pub exclude_extra_columns: bool,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Normalise whitespace in all columns.
    #[arg(short = 'W', long = "whitespace-all")]
    pub whitespace_all: bool,

    /// Comma-separated tags for normalised whitespace.
    #[arg(short = 'w', long = "whitespace", value_name = "tag,tag...")]
    pub whitespace: Option<String>,

    /// Comma-separated tags to convert to uppercase.
    #[arg(short = 'u', long = "upper", value_name = "tag,tag...")]
    pub upper: Option<String>,

    /// Comma-separated tags to convert to lowercase.
    #[arg(short = 'l', long = "lower", value_name = "tag,tag...")]
    pub lower: Option<String>,

    /// Normalise all dates.
    #[arg(short = 'D', long = "date-all")]
    pub date_all: bool,

    /// Comma-separated tags for date normalisation.
    #[arg(short = 'd', long = "date", value_name = "tag,tag...")]
    pub date: Option<String>,

    /// Normalise all numbers.
    #[arg(short = 'N', long = "number-all")]
    pub number_all: bool,

    /// Comma-separated tags for number normalisation.
    #[arg(short = 'n', long = "number", value_name = "tag,tag...")]
    pub number: Option<String>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct CountArgs {
    /// Comma-separated tags to count.
    #[arg(
        short = 't',
        long = "tags",
        value_name = "tag,tag...",
        default_value = "loc,org,sector,adm1,adm2,adm3"
    )]
    pub tags: String,

    /// Numeric tag to aggregate.
    #[arg(short = 'a', long = "aggregate", value_name = "tag")]
    pub aggregate: Option<String>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct CutArgs {
    /// Comma-separated tags to include.
    #[arg(short = 'i', long = "include", value_name = "tag,tag...")]
    pub include: Option<String>,

    /// Comma-separated tags to exclude.
    #[arg(short = 'x', long = "exclude", value_name = "tag,tag...")]
    pub exclude: Option<String>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct DedupArgs {
    /// Comma-separated tags to compare (all values when omitted).
    #[arg(short = 't', long = "tags", value_name = "tag,tag...")]
    pub tags: Option<String>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Tagged CSV file to merge from.
    #[arg(short = 'm', long = "merge", value_name = "PATH")]
    pub merge: PathBuf,

    /// Tags to use as a shared key.
    #[arg(short = 'k', long = "keys", value_name = "tag,tag...")]
    pub keys: String,

    /// Tags of the columns to take from the merge dataset.
    #[arg(short = 't', long = "tags", value_name = "tag,tag...")]
    pub tags: String,

    /// Fill empty values in existing columns instead of adding new ones.
    #[arg(short = 'r', long = "replace")]
    pub replace: bool,

    /// With --replace, overwrite existing values too.
    #[arg(short = 'O', long = "overwrite", requires = "replace")]
    pub overwrite: bool,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Rename an old tag to a new one, with an optional new header.
    #[arg(
        short = 'r',
        long = "rename",
        value_name = "#?<original_tag>:<Text header>?#?<new_tag>",
        required = true
    )]
    pub renames: Vec<String>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct ReplaceArgs {
    /// String or regular expression to search for.
    #[arg(short = 'p', long = "pattern", requires = "substitution", conflicts_with = "map")]
    pub pattern: Option<String>,

    /// Replacement string.
    #[arg(short = 's', long = "substitution", requires = "pattern")]
    pub substitution: Option<String>,

    /// Tag pattern limiting the columns affected.
    #[arg(short = 't', long = "tags", value_name = "tag")]
    pub tags: Option<String>,

    /// Treat the pattern as a regular expression.
    #[arg(short = 'r', long = "regex")]
    pub regex: bool,

    /// Replacement table tagged #x_pattern, #x_substitution, #x_tag, #x_regex.
    #[arg(short = 'm', long = "map", value_name = "PATH", required_unless_present = "pattern")]
    pub map: Option<PathBuf>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct SelectArgs {
    /// Query for selecting rows, repeat for logical OR: <tag><op><value>.
    #[arg(long = "query", value_name = "tag=value")]
    pub queries: Vec<String>,

    /// Keep only rows not matching the queries.
    #[arg(short = 'r', long = "reverse")]
    pub reverse: bool,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct SortArgs {
    /// Comma-separated tags to use as sort keys.
    #[arg(short = 't', long = "tags", value_name = "tag,tag...")]
    pub tags: Option<String>,

    /// Reverse the sort order.
    #[arg(short = 'r', long = "reverse")]
    pub reverse: bool,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct TagArgs {
    /// Header text to match and the tag to give it.
    #[arg(short = 'm', long = "map", value_name = "Header Text#tag", required = true)]
    pub specs: Vec<String>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Schema file (the built-in schema when omitted).
    #[arg(short = 's', long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// CSV file to validate (standard input when omitted).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
