use crate::cli::args::CliArgs;
use crate::filter::FilterField;
use crate::model::{Gender, Status};
use crate::paginate::PageSize;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.status.as_deref().filter(|s| !s.trim().is_empty()) {
        raw.parse::<Status>()
            .map_err(|e| format!("invalid --{}: {e}", FilterField::Status))?;
    }
    if let Some(raw) = args.gender.as_deref().filter(|s| !s.trim().is_empty()) {
        raw.parse::<Gender>()
            .map_err(|e| format!("invalid --{}: {e}", FilterField::Gender))?;
    }
    if let Some(size) = args.page_size {
        PageSize::try_from(size).map_err(|e| format!("invalid --page-size: {e}"))?;
    }
    if let Some(raw) = args.sort.as_deref() {
        crate::utils::parse_sort_spec(raw).map_err(|e| format!("invalid --sort '{raw}': {e}"))?;
    }
    if let Some(min_count) = args.min_count {
        if min_count == 0 {
            return Err("invalid min-count, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    if args.page == Some(0) {
        return Err("invalid page, pages start at 1".to_string());
    }
    Ok(())
}
