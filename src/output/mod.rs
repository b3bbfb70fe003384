use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::filter::FilterState;
use crate::model::{Character, Facets, Gender, Status};
use crate::paginate::PageSize;
use crate::session::TableView;
use crate::sort::{SortDirection, SortKey, SortState};
use crate::utils::{fit, plural};

const EPISODE_PREVIEW: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub id: u64,
    pub name: String,
    pub status: Status,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub gender: Gender,
    pub origin: String,
    pub location: String,
    pub episodes: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputView {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: PageSize,
    pub result_count: usize,
    pub total_count: usize,
    pub no_results: bool,
    pub sort: SortState,
    pub filters: FilterState,
    pub rows: Vec<OutputRecord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputReport {
    pub view: OutputView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<OutputRecord>,
}

pub fn build_record(c: &Character) -> OutputRecord {
    OutputRecord {
        id: c.id,
        name: c.name.clone(),
        status: c.status,
        species: c.species.clone(),
        kind: c.kind().map(str::to_string),
        gender: c.gender,
        origin: c.origin.name.clone(),
        location: c.location.name.clone(),
        episodes: c.episode.len(),
    }
}

pub fn build_view(view: &TableView<'_>) -> OutputView {
    OutputView {
        current_page: view.current_page,
        total_pages: view.total_pages,
        page_size: view.page_size,
        result_count: view.result_count,
        total_count: view.total_count,
        no_results: view.no_results,
        sort: view.sort,
        filters: view.filters.clone(),
        rows: view.rows.iter().map(|c| build_record(c)).collect(),
    }
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to render json: {e}"))
}

pub fn gender_symbol(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "♂",
        Gender::Female => "♀",
        Gender::Genderless | Gender::Unknown => "?",
    }
}

fn paint_status(status: Status, cell: String) -> ColoredString {
    match status {
        Status::Alive => cell.green(),
        Status::Dead => cell.red(),
        Status::Unknown => cell.dimmed(),
    }
}

fn column_title(key: SortKey, sort: SortState) -> String {
    let title = key.as_str().to_uppercase();
    if key != sort.key {
        return title;
    }
    match sort.direction {
        SortDirection::Ascending => format!("{title}^"),
        SortDirection::Descending => format!("{title}v"),
    }
}

pub fn visible_range(view: &TableView<'_>) -> Option<(usize, usize)> {
    if view.rows.is_empty() {
        return None;
    }
    let start = view.current_page.saturating_sub(1) * view.page_size.get() + 1;
    Some((start, start + view.rows.len() - 1))
}

pub fn render_table(view: &TableView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        ":: showing {} of {}",
        view.result_count,
        plural(view.total_count, "record")
    ));
    let filters = view.filters.summary();
    if !filters.is_empty() {
        out.push_str(&format!(" :: filters: {}", filters.join(" ")));
    }
    out.push_str(&format!(" :: sort: {}\n", view.sort));

    if view.no_results {
        out.push_str(&format!(
            "{}\n",
            "no records match the current filters, try clearing some".yellow()
        ));
        out.push_str(&format!(":: page {}/{}\n", view.current_page, view.total_pages));
        return out;
    }

    out.push_str(
        &format!(
            "{} {} {} {} {} {}",
            fit(&column_title(SortKey::Id, view.sort), 6),
            fit(&column_title(SortKey::Name, view.sort), 28),
            fit(&column_title(SortKey::Status, view.sort), 8),
            fit(&column_title(SortKey::Species, view.sort), 16),
            fit(&column_title(SortKey::Gender, view.sort), 12),
            column_title(SortKey::Origin, view.sort),
        )
        .bold()
        .to_string(),
    );
    out.push('\n');

    for c in &view.rows {
        out.push_str(&format!(
            "{} {} {} {} {} {}\n",
            fit(&c.id.to_string(), 6),
            fit(&c.name, 28),
            paint_status(c.status, fit(c.status.as_str(), 8)),
            fit(&c.species, 16),
            fit(&format!("{} {}", gender_symbol(c.gender), c.gender), 12),
            c.origin.name,
        ));
    }

    if let Some((first, last)) = visible_range(view) {
        out.push_str(&format!(
            ":: page {}/{} :: rows {first}-{last} of {}\n",
            view.current_page, view.total_pages, view.result_count
        ));
    }
    out
}

fn episode_label(url: &str) -> String {
    let number = url.rsplit('/').next().unwrap_or(url);
    format!("E{number}")
}

pub fn render_detail(c: &Character) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", format!("#{}", c.id).dimmed(), c.name.bold()));
    out.push_str(&format!(
        ":: {:<10}: {}\n",
        "status",
        paint_status(c.status, c.status.to_string())
    ));
    out.push_str(&format!(":: {:<10}: {}\n", "species", c.species));
    out.push_str(&format!(
        ":: {:<10}: {}\n",
        "type",
        c.kind().unwrap_or("not specified")
    ));
    out.push_str(&format!(
        ":: {:<10}: {} {}\n",
        "gender",
        gender_symbol(c.gender),
        c.gender
    ));
    out.push_str(&format!(":: {:<10}: {}\n", "origin", c.origin.name));
    out.push_str(&format!(":: {:<10}: {}\n", "location", c.location.name));
    if !c.image.is_empty() {
        out.push_str(&format!(":: {:<10}: {}\n", "image", c.image));
    }

    let mut episodes: Vec<String> = c
        .episode
        .iter()
        .take(EPISODE_PREVIEW)
        .map(|e| episode_label(e))
        .collect();
    if c.episode.len() > EPISODE_PREVIEW {
        episodes.push(format!("+{} more", c.episode.len() - EPISODE_PREVIEW));
    }
    out.push_str(&format!(
        ":: {:<10}: {}",
        "episodes",
        plural(c.episode.len(), "episode")
    ));
    if !episodes.is_empty() {
        out.push_str(&format!(" ({})", episodes.join(" ")));
    }
    out.push('\n');
    out
}

pub fn render_facets(facets: &Facets) -> String {
    let statuses = facets.statuses.iter().map(|s| s.as_str()).collect::<Vec<_>>();
    let genders = facets.genders.iter().map(|g| g.as_str()).collect::<Vec<_>>();
    format!(
        ":: {:<10}: {}\n:: {:<10}: {}\n:: {:<10}: {}\n",
        "statuses",
        statuses.join(", "),
        "species",
        facets.species.join(", "),
        "genders",
        genders.join(", ")
    )
}
