use std::collections::HashMap;

use indicatif::ProgressBar;
use proptest::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::fetcher::testing::MemorySource;
use crate::fetcher::{self, FetchError, HttpPageSource};
use crate::filter::{FilterField, FilterState};
use crate::model::{Character, Gender, Page, PageInfo, Place, Status};
use crate::paginate;
use crate::session::Session;
use crate::sort::{self, SortDirection, SortKey};

pub(crate) fn character(
    id: u64,
    name: &str,
    status: Status,
    species: &str,
    gender: Gender,
    origin: &str,
) -> Character {
    let place = Place {
        name: origin.to_string(),
        url: String::new(),
    };
    Character {
        id,
        name: name.to_string(),
        status,
        species: species.to_string(),
        kind: None,
        gender,
        origin: place.clone(),
        location: place,
        image: String::new(),
        episode: Vec::new(),
        url: String::new(),
        created: String::new(),
    }
}

pub(crate) fn sample_records() -> Vec<Character> {
    vec![
        character(1, "Rick Sanchez", Status::Alive, "Human", Gender::Male, "Earth (C-137)"),
        character(
            2,
            "Abradolf Lincler",
            Status::Unknown,
            "Human",
            Gender::Male,
            "Earth (Replacement Dimension)",
        ),
        character(3, "Birdperson", Status::Dead, "Bird-Person", Gender::Male, "Bird World"),
        character(
            4,
            "Summer Smith",
            Status::Alive,
            "Human",
            Gender::Female,
            "Earth (Replacement Dimension)",
        ),
        character(5, "Beth Smith", Status::Alive, "Human", Gender::Female, "Earth (C-137)"),
        character(6, "Unity", Status::Alive, "Alien", Gender::Genderless, "unknown"),
    ]
}

fn single_page_source(records: Vec<Character>) -> MemorySource {
    let mut source = MemorySource::default();
    source.pages.insert(
        MemorySource::url(1),
        Page {
            info: PageInfo::default(),
            results: records,
        },
    );
    source
}

async fn sample_session() -> Session {
    let source = single_page_source(sample_records());
    let mut session = Session::new();
    session
        .initialize(&source, &MemorySource::url(1), 250, &ProgressBar::hidden())
        .await
        .unwrap();
    session
}

fn ids(rows: &[&Character]) -> Vec<u64> {
    rows.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn browse_filter_sort_and_select() {
    let mut session = sample_session().await;

    session.set_filter(FilterField::Species, "hum").unwrap();
    let view = session.set_filter(FilterField::Gender, "female").unwrap();
    assert_eq!(ids(&view.rows), vec![4, 5]);
    assert_eq!(view.result_count, 2);
    assert_eq!(view.total_count, 6);

    let view = session.set_sort(SortKey::Name).unwrap();
    assert_eq!(ids(&view.rows), vec![5, 4]);

    assert_eq!(session.select(4).unwrap().name, "Summer Smith");
    let view = session.clear_filters().unwrap();
    assert_eq!(view.result_count, 6);
    assert_eq!(
        session.selected().map(|c| c.name.as_str()),
        Some("Summer Smith")
    );
}

#[tokio::test]
async fn nonexistent_name_yields_empty_single_page() {
    let mut session = sample_session().await;
    let view = session
        .set_filter(FilterField::Name, "zzzznonexistent")
        .unwrap();
    assert!(view.rows.is_empty());
    assert!(view.no_results);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.current_page, 1);
}

#[tokio::test]
async fn facets_follow_first_appearance() {
    let session = sample_session().await;
    let facets = session.facets().unwrap();
    assert_eq!(
        facets.statuses,
        vec![Status::Alive, Status::Unknown, Status::Dead]
    );
    assert_eq!(facets.species, vec!["Human", "Bird-Person", "Alien"]);
    assert_eq!(
        facets.genders,
        vec![Gender::Male, Gender::Female, Gender::Genderless]
    );
}

#[test]
fn filters_intersect() {
    let records = sample_records();
    let state = FilterState {
        status: Some(Status::Alive),
        origin: "c-137".to_string(),
        ..FilterState::default()
    };
    let rows = crate::filter::filter(&records, &state);
    assert_eq!(ids(&rows), vec![1, 5]);
    assert!(rows
        .iter()
        .all(|c| c.status == Status::Alive && c.origin.name.to_lowercase().contains("c-137")));
}

fn arb_records() -> impl Strategy<Value = Vec<Character>> {
    prop::collection::vec((0usize..3, "[a-c]{1,2}"), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (status, name))| {
                character(
                    i as u64 + 1,
                    &name,
                    Status::ALL[status],
                    "Human",
                    Gender::Male,
                    "Earth",
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn pages_cover_every_record_once(len in 0usize..300, size in 1usize..60) {
        let records: Vec<usize> = (0..len).collect();
        let total = paginate::total_pages(len, size);
        prop_assert_eq!(total, std::cmp::max(1, len.div_ceil(size)));

        let mut seen = Vec::new();
        for page in 1..=total {
            let slice = paginate::paginate(&records, size, page);
            prop_assert_eq!(slice.total_pages, total);
            if page < total {
                prop_assert_eq!(slice.visible.len(), size);
            }
            seen.extend_from_slice(slice.visible);
        }
        prop_assert_eq!(seen, records);
    }

    #[test]
    fn sort_is_stable_in_both_directions(records in arb_records(), desc in any::<bool>()) {
        let direction = if desc { SortDirection::Descending } else { SortDirection::Ascending };
        let sorted = sort::sort(records.iter().collect(), SortKey::Status, direction);
        prop_assert_eq!(sorted.len(), records.len());
        for pair in sorted.windows(2) {
            if pair[0].status == pair[1].status {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn descending_reverses_ascending_without_ties(len in 0u64..50) {
        let records: Vec<Character> = (1..=len)
            .map(|i| character(i, &format!("name {i:03}"), Status::Alive, "Human", Gender::Male, "Earth"))
            .collect();
        let asc = sort::sort(records.iter().collect(), SortKey::Name, SortDirection::Ascending);
        let mut desc = sort::sort(records.iter().collect(), SortKey::Name, SortDirection::Descending);
        desc.reverse();
        prop_assert_eq!(ids(&asc), ids(&desc));
    }
}

async fn bind_loopback() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

fn serve(listener: TcpListener, routes: HashMap<String, (u16, String)>) {
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, "{}".to_string()));
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
}

fn page_json(records: &[Character], next: Option<String>) -> String {
    serde_json::to_string(&Page {
        info: PageInfo {
            count: Some(6),
            pages: Some(2),
            next,
            prev: None,
        },
        results: records.to_vec(),
    })
    .unwrap()
}

fn loopback_source() -> HttpPageSource {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpPageSource::new(client)
}

#[tokio::test]
async fn http_source_follows_cursor_to_the_end() {
    let (listener, base) = bind_loopback().await;
    let records = sample_records();
    let routes = HashMap::from([
        (
            "/api/character".to_string(),
            (200, page_json(&records[..3], Some(format!("{base}/api/character?page=2")))),
        ),
        (
            "/api/character?page=2".to_string(),
            (200, page_json(&records[3..], None)),
        ),
    ]);
    serve(listener, routes);

    let dataset = fetcher::load_dataset(
        &loopback_source().with_rate(100),
        &format!("{base}/api/character"),
        250,
        &ProgressBar::hidden(),
    )
    .await
    .unwrap();
    assert_eq!(dataset.records(), records.as_slice());
}

#[tokio::test]
async fn http_source_reports_status_failure() {
    let (listener, base) = bind_loopback().await;
    serve(
        listener,
        HashMap::from([("/api/character".to_string(), (500, "{}".to_string()))]),
    );

    let err = fetcher::load_dataset(
        &loopback_source(),
        &format!("{base}/api/character"),
        250,
        &ProgressBar::hidden(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.pages_fetched, 0);
    assert!(err.source.is_transport());
    assert!(matches!(err.source, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn http_source_reports_malformed_body() {
    let (listener, base) = bind_loopback().await;
    serve(
        listener,
        HashMap::from([(
            "/api/character".to_string(),
            (200, r#"{"info": {"next": null}, "results": [{"id": "#.to_string()),
        )]),
    );

    let err = fetcher::load_dataset(
        &loopback_source(),
        &format!("{base}/api/character"),
        250,
        &ProgressBar::hidden(),
    )
    .await
    .unwrap_err();
    assert!(!err.source.is_transport());
    assert!(matches!(err.source, FetchError::Parse { .. }));
}
