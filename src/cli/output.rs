//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::User;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a table of users. Password hashes and tokens are never shown.
pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        info("No users found. Register one with POST /users");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Session").fg(Color::Cyan),
            Cell::new("Reset pending").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for user in users {
        let (session, session_color) = if user.session_id.is_some() {
            ("active", Color::Green)
        } else {
            ("none", Color::Red)
        };
        let reset = if user.reset_token.is_some() { "yes" } else { "no" };

        table.add_row(vec![
            Cell::new(&user.id),
            Cell::new(&user.email),
            Cell::new(session).fg(session_color),
            Cell::new(reset),
            Cell::new(user.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
}
