//! Output formatting utilities

use console::style;

pub fn print_success(message: &str) {
    println!("{}", style(format!("✅ {}", message)).green());
}

pub fn print_warning(message: &str) {
    println!("{}", style(format!("⚠ {}", message)).yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{}", style(format!("❌ {}", message)).red());
}

pub fn print_info(message: &str) {
    println!("{}", style(message).cyan());
}

pub fn print_list<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) {
    for item in items {
        println!("  • {}", item);
    }
}
