use colored::Colorize;

fn main() {
    if let Err(e) = chartable::app::run_cli() {
        eprintln!("{} {}", "error:".red().bold(), e.red());
        std::process::exit(1);
    }
}
