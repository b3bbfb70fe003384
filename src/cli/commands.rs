use crate::filter::FilterField;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Filter { field: FilterField, value: String },
    Clear,
    Sort { key: String },
    Size { size: usize },
    Page { page: usize },
    Next,
    Prev,
    Show { id: u64 },
    Close,
    Facets,
    Table,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  filter <field> [value]  set or clear a filter (name, status, species, gender, origin)
  clear                   clear every filter
  sort <key>              sort by key; repeating the active key flips direction
  size <n>                rows per page (10, 20, 50, 100)
  page <n>                jump to page n
  next | prev             move one page
  show <id>               open the detail view of a record
  close                   close the detail view
  facets                  list distinct statuses, species and genders
  table                   redraw the table
  help                    this message
  quit                    exit";

pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "filter" | "f" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("usage: filter <field> [value]".to_string());
            }
            let field =
                FilterField::parse(field).ok_or_else(|| format!("unknown filter field '{field}'"))?;
            Command::Filter {
                field,
                value: value.to_string(),
            }
        }
        "clear" => Command::Clear,
        "sort" | "s" => {
            if rest.is_empty() {
                return Err("usage: sort <key>".to_string());
            }
            Command::Sort {
                key: rest.to_string(),
            }
        }
        "size" => Command::Size {
            size: parse_number(rest, "size <n>")?,
        },
        "page" | "p" => Command::Page {
            page: parse_number(rest, "page <n>")?,
        },
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "show" => Command::Show {
            id: parse_number(rest, "show <id>")?,
        },
        "close" => Command::Close,
        "facets" => Command::Facets,
        "table" | "t" => Command::Table,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(raw: &str, usage: &str) -> Result<T, String> {
    raw.parse::<T>().map_err(|_| format!("usage: {usage}"))
}
