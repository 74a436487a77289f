//! Styled terminal output helpers

use console::style;

use super::context::UiContext;

/// Print a success line
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        println!("  {} {}", style("✓").green().bold(), message);
    } else {
        println!("  [OK] {message}");
    }
}

/// Print an informational line
pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        println!("  {} {}", style("→").cyan(), message);
    } else {
        println!("  [..] {message}");
    }
}

/// Print a warning line
pub fn step_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        println!("  {} {}", style("!").yellow().bold(), message);
    } else {
        println!("  [WARN] {message}");
    }
}

/// Print an aligned key/value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {:<12} {}", style(key).dim(), value);
    } else {
        println!("  {key:<12} {value}");
    }
}
