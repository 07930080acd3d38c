use super::{line_col, read_input};
use crate::config::Config;
use anyhow::Result;
use attrmark_editor::{
    Decoration, DecorationSet, EngineOptions, LiveDecorations, MemoryBuffer, Selection,
    SyntaxBuffer,
};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Text file to preview
    pub input: PathBuf,

    /// Byte offset of the caret
    #[arg(short, long)]
    pub cursor: Option<usize>,
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = read_input(&args.input)?;

    let buffer = MemoryBuffer::new(source);
    let engine = run_engine(&buffer, config.editor, args.cursor);

    println!("{}", "Marks".bright_blue().bold());
    print_set(buffer.text(), engine.marks());
    println!();
    println!("{}", "Hidden".bright_blue().bold());
    print_set(buffer.text(), engine.replaces());
    println!();
    println!("{}", "Rendered".bright_blue().bold());
    println!("{}", render(buffer.text(), engine.replaces()));

    Ok(())
}

/// Drive the engine the way an editor would on opening a file
pub(crate) fn run_engine(
    buffer: &MemoryBuffer,
    options: EngineOptions,
    cursor: Option<usize>,
) -> LiveDecorations {
    let mut engine = LiveDecorations::new(options);
    engine.viewport_changed(buffer, vec![0..buffer.len()]);
    if let Some(pos) = cursor {
        engine.selection_changed(buffer, Selection::cursor(pos.min(buffer.len())));
    }
    engine.flush(buffer);
    engine
}

fn print_set(text: &str, set: &DecorationSet) {
    if set.is_empty() {
        println!("   (none)");
    }
    for item in set.iter() {
        let (line, column) = line_col(text, item.from);
        let detail = match item.decoration.as_ref() {
            Decoration::Mark { attributes } => attributes
                .iter()
                .map(|a| match &a.value {
                    Some(value) => format!("{}={}", a.key, value),
                    None => a.key.clone(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            Decoration::Replace { raw } => raw.clone(),
        };
        println!("   {}:{} {}..{} {}", line, column, item.from, item.to, detail);
    }
}

/// The text with hidden spans removed
pub(crate) fn render(text: &str, replaces: &DecorationSet) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for item in replaces.iter() {
        if item.from < last {
            continue;
        }
        out.push_str(&text[last..item.from]);
        last = item.to;
    }
    out.push_str(&text[last..]);
    out
}
