use crate::sort::{SortDirection, SortKey, SortState};

pub fn parse_sort_spec(value: &str) -> Result<SortState, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("sort key is empty".to_string());
    }
    let (key, direction) = match trimmed.split_once(':') {
        Some((key, dir)) => (key.trim(), Some(dir.trim())),
        None => (trimmed, None),
    };
    let key = SortKey::parse(key).ok_or_else(|| {
        format!(
            "unknown sort key '{key}', expected one of {}",
            SortKey::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        )
    })?;
    let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") | Some("ascending") => SortDirection::Ascending,
        Some("desc") | Some("descending") => SortDirection::Descending,
        Some(other) => return Err(format!("unknown sort direction '{other}'")),
    };
    Ok(SortState { key, direction })
}

pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('~');
    out
}

pub fn fit(value: &str, width: usize) -> String {
    let cut = truncate(value, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{cut}{}", " ".repeat(pad))
}

pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}
