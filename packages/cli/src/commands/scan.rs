use super::{line_col, read_input, OutputFormat};
use anyhow::Result;
use attrmark_parser::{scan_line, AnnotationMatch, Attribute};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Text file to scan
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// One annotation with its position in the file
#[derive(Debug, Serialize)]
pub(crate) struct Located {
    pub line: usize,
    pub column: usize,
    #[serde(flatten)]
    pub annotation: AnnotationMatch,
}

pub fn scan(args: ScanArgs, _cwd: &str) -> Result<()> {
    let source = read_input(&args.input)?;
    let found = locate(&source);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Text => {
            for item in &found {
                println!(
                    "{}:{}:{} {} {}",
                    args.input.display(),
                    item.line,
                    item.column,
                    item.annotation.raw.bright_white(),
                    describe(&item.annotation.attributes).dimmed()
                );
            }
            println!();
            println!("   Annotations found: {}", found.len());
        }
    }

    Ok(())
}

pub(crate) fn locate(source: &str) -> Vec<Located> {
    scan_line(source)
        .into_iter()
        .map(|annotation| {
            let (line, column) = line_col(source, annotation.span.start);
            Located {
                line,
                column,
                annotation,
            }
        })
        .collect()
}

fn describe(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|attribute| match &attribute.value {
            Some(value) => format!("{}={:?}", attribute.key, value),
            None => attribute.key.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
