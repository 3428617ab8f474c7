use std::path::PathBuf;

use anyhow::Result;
use console::{Term, style};
use konspekt_core::{AnalysisResult, Section};

use crate::{export_notes, print_section};

enum Command {
    Show(Section),
    Export,
    Quit,
    Unknown,
}

fn parse_command(input: &str) -> Command {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "" | "q" | "quit" | "exit" => return Command::Quit,
        "e" | "export" => return Command::Export,
        _ => {}
    }

    if let Ok(n) = input.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| Section::ALL.get(i)) {
            Some(section) => Command::Show(*section),
            None => Command::Unknown,
        };
    }

    Section::from_name(input).map_or(Command::Unknown, Command::Show)
}

fn print_menu(term: &Term) -> std::io::Result<()> {
    let tabs = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{} {}", style(format!("[{}]", i + 1)).cyan(), section.title()))
        .collect::<Vec<_>>()
        .join("  ");
    term.write_line(&tabs)?;
    term.write_line(&format!(
        "{} export  {} quit",
        style("[e]").cyan(),
        style("[q]").cyan()
    ))?;
    term.write_str(&format!("{} ", style(">").bold()))
}

/// Tab-style section browser over one finished result
pub async fn run(result: &AnalysisResult, out_dir: Option<&PathBuf>) -> Result<()> {
    let term = Term::stdout();
    print_section(result, Section::Summary);

    loop {
        print_menu(&term)?;
        let line = term.read_line()?;
        term.write_line("")?;

        match parse_command(&line) {
            Command::Show(section) => {
                term.clear_screen()?;
                print_section(result, section);
            }
            Command::Export => export_notes(result, out_dir).await?,
            Command::Quit => break,
            Command::Unknown => {
                term.write_line(&format!("{} {}", style("Unknown section:").yellow(), line.trim()))?;
            }
        }
    }

    Ok(())
}
