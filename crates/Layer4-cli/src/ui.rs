//! Styled console output helpers

use crossterm::style::Stylize;

const LOGO: &str = r#"
  ______          _
 |  ____|        | |
 | |__   _ __ ___| |__   ___ _ __
 |  __| | '_ ` _ \ '_ \ / _ \ '__|
 | |____| | | | | | |_) |  __/ |
 |______|_| |_| |_|_.__/ \___|_|
"#;

pub fn print_logo() {
    println!("{}", LOGO.dark_yellow());
}

pub fn print_header(text: &str) {
    println!("\n{}", format!("=== {} ===", text).bold());
}

pub fn print_info(text: &str) {
    println!("  {} {}", "•".blue(), text);
}

pub fn print_success(text: &str) {
    println!("  {} {}", "✓".green(), text);
}

pub fn print_warning(text: &str) {
    println!("  {} {}", "!".yellow(), text);
}

pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✗".red(), text);
}

pub fn print_separator() {
    println!("{}", "─".repeat(64).dark_grey());
}

pub fn print_bold(text: &str) {
    println!("{}", text.bold());
}

/// Flatten and truncate a value for one-line display
pub fn truncate(text: &str, max_len: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_len {
        flat
    } else {
        let cut: String = flat.chars().take(max_len).collect();
        format!("{}... ({} chars)", cut, text.chars().count())
    }
}
