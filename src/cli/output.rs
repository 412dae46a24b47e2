//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Print session banner (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print one row of a listing, indented
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (trees, config, help)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print prompt without newline (cyan)
pub fn prompt(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{}", msg.to_string().cyan());
    std::io::stdout().flush().ok();
}
