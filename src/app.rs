use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::commands::{self, Command};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::filter::FilterField;
use crate::output::{self, OutputFormat, OutputReport};
use crate::paginate::PageSize;
use crate::runner::{LoadResult, Options, Runner};
use crate::session::{Session, SessionError, TableView};
use crate::sort::{SortDirection, SortState};

#[derive(Clone, Debug)]
struct RunConfig {
    options: Options,
    filters: Vec<(FilterField, String)>,
    sort: Option<SortState>,
    page: Option<usize>,
    show: Option<u64>,
    facets: bool,
    interactive: bool,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn print_summary(run: &RunConfig) {
    format_kv_line("URL", &run.options.url);
    format_kv_line("Minimum", &run.options.min_count.to_string());
    format_kv_line("Page size", &run.options.page_size.to_string());
    format_kv_line("Timeout", &format!("{}s", run.options.timeout_seconds));
    if run.options.rate > 0 {
        format_kv_line("Rate", &format!("{}/s", run.options.rate));
    }
    if let Some(proxy) = run.options.proxy.as_deref() {
        format_kv_line("Proxy", proxy);
    }
    format_kv_line("Redirects", format_bool(run.options.follow_redirects));
    println!();
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let output_format_raw = args
        .output_format
        .or(cfg.output_format)
        .unwrap_or_else(|| "text".to_string());
    let output_format = OutputFormat::parse(&output_format_raw)
        .ok_or_else(|| format!("invalid --output-format '{output_format_raw}', expected text or json"))?;

    let page_size_raw = args.page_size.or(cfg.page_size);
    let page_size = match page_size_raw {
        Some(n) => PageSize::try_from(n).map_err(|e| format!("invalid page size: {e}"))?,
        None => PageSize::default(),
    };

    let defaults = Options::default();
    let options = Options {
        url: args.url.or(cfg.url).unwrap_or(defaults.url),
        min_count: args.min_count.or(cfg.min_count).unwrap_or(defaults.min_count),
        timeout_seconds: args
            .timeout
            .or(cfg.timeout)
            .unwrap_or(defaults.timeout_seconds),
        rate: args.rate.or(cfg.rate).unwrap_or(defaults.rate),
        proxy: args
            .proxy
            .or(cfg.proxy)
            .filter(|p| !p.trim().is_empty()),
        follow_redirects: !args.no_redirects
            && cfg.follow_redirects.unwrap_or(defaults.follow_redirects),
        page_size,
    };

    let mut sort = match args.sort.or(cfg.sort) {
        Some(raw) => Some(
            crate::utils::parse_sort_spec(&raw).map_err(|e| format!("invalid sort '{raw}': {e}"))?,
        ),
        None => None,
    };
    if args.descending {
        let mut state = sort.unwrap_or_default();
        state.direction = SortDirection::Descending;
        sort = Some(state);
    }

    let filters = [
        (FilterField::Name, args.name),
        (FilterField::Status, args.status),
        (FilterField::Species, args.species),
        (FilterField::Gender, args.gender),
        (FilterField::Origin, args.origin),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|v| (field, v)))
    .collect();

    Ok(RunConfig {
        options,
        filters,
        sort,
        page: args.page,
        show: args.show,
        facets: args.facets,
        interactive: args.interactive,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,chartable={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn session_error(e: SessionError) -> String {
    e.to_string()
}

fn print_view(view: &TableView<'_>, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Text => print!("{}", output::render_table(view)),
        OutputFormat::Json => println!("{}", output::render_json(&output::build_view(view))?),
    }
    Ok(())
}

fn apply_flags(session: &mut Session, run: &RunConfig) -> Result<(), String> {
    for (field, value) in &run.filters {
        session
            .set_filter(*field, value)
            .map_err(session_error)?;
    }
    if let Some(sort) = run.sort {
        session
            .set_sort_order(sort.key, sort.direction)
            .map_err(session_error)?;
    }
    if let Some(page) = run.page {
        session.set_page(page).map_err(session_error)?;
    }
    Ok(())
}

fn print_once(session: &mut Session, run: &RunConfig) -> Result<(), String> {
    let selected = match run.show {
        Some(id) => Some(session.select(id).map_err(session_error)?.clone()),
        None => None,
    };
    let facets = if run.facets {
        Some(session.facets().map_err(session_error)?)
    } else {
        None
    };
    let view = session.view().map_err(session_error)?;

    match run.output_format {
        OutputFormat::Text => {
            print!("{}", output::render_table(&view));
            if let Some(facets) = facets.as_ref() {
                println!();
                print!("{}", output::render_facets(facets));
            }
            if let Some(c) = selected.as_ref() {
                println!();
                print!("{}", output::render_detail(c));
            }
        }
        OutputFormat::Json => {
            let report = OutputReport {
                view: output::build_view(&view),
                facets,
                selected: selected.as_ref().map(output::build_record),
            };
            println!("{}", output::render_json(&report)?);
        }
    }
    Ok(())
}

fn dispatch(session: &mut Session, command: Command, format: OutputFormat) -> Result<bool, String> {
    let view = match command {
        Command::Quit => return Ok(false),
        Command::Help => {
            println!("{}", commands::HELP);
            return Ok(true);
        }
        Command::Show { id } => {
            let c = session.select(id).map_err(session_error)?;
            match format {
                OutputFormat::Text => print!("{}", output::render_detail(c)),
                OutputFormat::Json => {
                    println!("{}", output::render_json(&output::build_record(c))?)
                }
            }
            return Ok(true);
        }
        Command::Close => {
            session.clear_selection();
            return Ok(true);
        }
        Command::Facets => {
            let facets = session.facets().map_err(session_error)?;
            match format {
                OutputFormat::Text => print!("{}", output::render_facets(&facets)),
                OutputFormat::Json => println!("{}", output::render_json(&facets)?),
            }
            return Ok(true);
        }
        Command::Filter { field, value } => session.set_filter(field, &value),
        Command::Clear => session.clear_filters(),
        Command::Sort { key } => session.set_sort_named(&key),
        Command::Size { size } => session.set_page_size(size),
        Command::Page { page } => session.set_page(page),
        Command::Next => session.next_page(),
        Command::Prev => session.prev_page(),
        Command::Table => session.view(),
    }
    .map_err(session_error)?;
    print_view(&view, format)?;
    Ok(true)
}

async fn interactive_loop(session: &mut Session, format: OutputFormat) -> Result<(), String> {
    println!("type 'help' for commands, 'quit' to exit");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read stdin: {e}")),
        };
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e.red());
                continue;
            }
        };
        debug!(?command, "interactive command");
        match dispatch(session, command, format) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{}", e.red()),
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    if run.output_format == OutputFormat::Text {
        print_summary(&run);
    }

    let runner = Runner::new(run.options.clone()).map_err(|e| e.to_string())?;

    let pb = ProgressBar::new(run.options.min_count as u64);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Loading: [{pos}/{len}] :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );

    let loaded = runner.run_with_progress(pb.clone()).await;
    pb.finish_and_clear();
    let LoadResult {
        mut session,
        elapsed,
    } = loaded.map_err(|e| e.to_string())?;

    if run.output_format == OutputFormat::Text {
        let total = session.dataset().map_err(session_error)?.len();
        println!(
            ":: Loaded :: {} in {}ms ::",
            crate::utils::plural(total, "record"),
            elapsed.as_millis()
        );
        println!();
    }

    apply_flags(&mut session, &run)?;
    print_once(&mut session, &run)?;

    if run.interactive {
        interactive_loop(&mut session, run.output_format).await?;
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                let mut cmd = CliArgs::command();
                print!("{}", cmd.render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine home directory for config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(run.verbose);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
