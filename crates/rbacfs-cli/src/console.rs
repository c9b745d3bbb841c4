use crate::shell::Reply;
use colored::*;

/// Console renders shell replies with colored formatting
pub struct Console {
    info_color: Color,
    content_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            info_color: Color::Green,
            content_color: Color::White,
        }
    }

    /// Print a reply. Returns false when the shell should stop.
    pub fn render(&self, reply: &Reply) -> bool {
        match reply {
            Reply::Nothing => {}
            Reply::Info(text) => println!("{}", text.color(self.info_color)),
            Reply::Content { path, body } => {
                println!("{} {}", "Content of".bold(), format!("'{}':", path).bold());
                println!("{}", body.color(self.content_color));
            }
            Reply::Failure(text) => self.print_error(text),
            Reply::Usage(text) => println!("{}", text.yellow()),
            Reply::Quit => {
                println!("{}", "Leaving rbacfs...".bright_black());
                return false;
            }
        }
        true
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Print a welcome banner
    pub fn print_banner(&self) {
        println!("{}", "=".repeat(60).bright_blue());
        println!("{}", "  rbacfs - role-gated file shell".bright_blue().bold());
        println!("{}", "=".repeat(60).bright_blue());
        println!("Type 'help' or '?' to list commands, 'quit' to leave.");
        println!();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
