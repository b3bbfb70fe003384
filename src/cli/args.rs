use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "chartable",
    version,
    about = "browse a cursor-paginated character collection as a table",
    long_about = "chartable fetches a character collection page by page until a minimum number of records is loaded, then filters, sorts and paginates it locally.\n\nExamples:\n  chartable\n  chartable --status alive --species human --sort name --desc\n  chartable --origin earth --page-size 50 --page 2\n  chartable --show 1\n  chartable --interactive\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "First page URL of the collection."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'm',
        long = "min",
        visible_alias = "min-count",
        value_name = "N",
        help_heading = "Input",
        help = "Keep fetching pages until at least N records are loaded."
    )]
    pub min_count: Option<usize>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.chartable/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "HTTP",
        help = "Page request rate limit (requests per second, 0 = unlimited)."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "nr",
        visible_alias = "no-redirects",
        help_heading = "HTTP",
        help = "Do not follow HTTP redirects."
    )]
    pub no_redirects: bool,

    #[arg(
        long = "name",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Only records whose name contains TEXT (case-insensitive)."
    )]
    pub name: Option<String>,

    #[arg(
        long = "status",
        value_name = "STATUS",
        help_heading = "Filters",
        help = "Only records with this status (alive, dead, unknown)."
    )]
    pub status: Option<String>,

    #[arg(
        long = "species",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Only records whose species contains TEXT (case-insensitive)."
    )]
    pub species: Option<String>,

    #[arg(
        long = "gender",
        value_name = "GENDER",
        help_heading = "Filters",
        help = "Only records with this gender (male, female, genderless, unknown)."
    )]
    pub gender: Option<String>,

    #[arg(
        long = "origin",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Only records whose origin name contains TEXT (case-insensitive)."
    )]
    pub origin: Option<String>,

    #[arg(
        short = 's',
        long = "srt",
        visible_alias = "sort",
        value_name = "KEY",
        help_heading = "Table",
        help = "Sort column: id, name, status, species, gender or origin (KEY:desc for descending)."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'd',
        long = "desc",
        visible_alias = "descending",
        help_heading = "Table",
        help = "Sort descending."
    )]
    pub descending: bool,

    #[arg(
        short = 'P',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Table",
        help = "Page to show (clamped to the available pages)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'N',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Table",
        help = "Rows per page (10, 20, 50 or 100)."
    )]
    pub page_size: Option<usize>,

    #[arg(
        long = "show",
        value_name = "ID",
        help_heading = "Table",
        help = "Show the detail view of the record with this id."
    )]
    pub show: Option<u64>,

    #[arg(
        long = "facets",
        help_heading = "Table",
        help = "List the distinct statuses, species and genders of the dataset."
    )]
    pub facets: bool,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Table",
        help = "Read table commands from stdin after loading (type 'help')."
    )]
    pub interactive: bool,
}
