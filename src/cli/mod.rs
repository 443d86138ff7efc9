use std::fmt::Write as _;
use std::io::{self, Write};

use crate::agent::{Message, Role};
use crate::session::ToolCallRecord;
use crate::tools::ToolRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Tools,
    Calls,
    History,
    Reset,
    Clear,
    Quit,
    Unknown(String),
}

pub fn print_help() {
    println!(
        "/help     Show help\n/tools    List registered tools\n/calls    Show tool calls made so far (newest first)\n/history  Show the conversation\n/reset    Start a new conversation\n/clear    Clear screen\n/quit     Quit\nAnything else is sent to the assistant."
    );
}

/// Slash commands; `None` means the line is a message for the assistant.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if !line.starts_with('/') {
        return None;
    }
    Some(match line {
        "/help" => Command::Help,
        "/tools" => Command::Tools,
        "/calls" => Command::Calls,
        "/history" => Command::History,
        "/reset" => Command::Reset,
        "/clear" => Command::Clear,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    })
}

pub fn clear_screen() {
    print!("\x1B[2J\x1B[H");
    let _ = io::stdout().flush();
}

pub fn render_message(m: &Message) -> String {
    match m.role() {
        Role::User => format!("You: {}", m.content()),
        Role::Tool => format!(
            "Tool [{}]: {}",
            m.tool_call_id().unwrap_or_default(),
            m.content()
        ),
        _ => format!("AI: {}", m.content()),
    }
}

/// Newest first, numbered from 1.
pub fn render_tool_calls(records: &[ToolCallRecord]) -> String {
    if records.is_empty() {
        return "No tool calls yet.".to_string();
    }
    let mut out = String::new();
    for (idx, rec) in records.iter().rev().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} -> {}  ({})",
            idx + 1,
            rec.tool,
            rec.result,
            rec.at.format("%H:%M:%S")
        );
    }
    out.trim_end().to_string()
}

pub fn render_tools(registry: &ToolRegistry) -> String {
    registry
        .iter()
        .map(|t| {
            let params = t
                .params()
                .iter()
                .map(|p| {
                    if p.variadic {
                        format!("<{}...>", p.name)
                    } else {
                        format!("<{}>", p.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{} {}  - {}", t.name(), params, t.description())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
