//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Webtoon Download                                  ║
║     One episode at a time, straight to your library   ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(series: &[u32], workers: usize, library: &str) {
    let series: Vec<String> = series.iter().map(u32::to_string).collect();

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Series:  {}", series.join(", "));
    println!("  Workers: {}", workers);
    println!("  Library: {}", library);
    println!();
}
