use super::{line_col, read_input};
use anyhow::{anyhow, Result};
use ariadne::{Color, Label, Report, ReportKind, Source};
use attrmark_parser::{scan_line, AttributeError};
use clap::Args;
use colored::Colorize;
use std::ops::Range;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Text file to check
    pub input: PathBuf,
}

/// An annotation a strict host would refuse
#[derive(Debug)]
pub(crate) struct Rejection {
    pub span: Range<usize>,
    pub error: AttributeError,
}

pub fn check(args: CheckArgs, _cwd: &str) -> Result<()> {
    let source = read_input(&args.input)?;
    let filename = args.input.display().to_string();
    let rejections = find_rejections(&source);

    if rejections.is_empty() {
        println!("{} {} No invalid annotations", "✓".green(), filename);
        return Ok(());
    }

    eprint!("{}", format_rejections(&source, &filename, &rejections)?);
    for rejection in &rejections {
        let (line, column) = line_col(&source, rejection.span.start);
        println!("{} {}:{}:{} {}", "✗".red(), filename, line, column, rejection.error);
    }

    Err(anyhow!("{} invalid annotation(s) in {}", rejections.len(), filename))
}

pub(crate) fn find_rejections(source: &str) -> Vec<Rejection> {
    scan_line(source)
        .into_iter()
        .filter_map(|annotation| {
            let error = annotation.validate().err()?;
            Some(Rejection {
                span: annotation.span,
                error,
            })
        })
        .collect()
}

/// Pretty-print rejections with source context
pub(crate) fn format_rejections(
    source: &str,
    filename: &str,
    rejections: &[Rejection],
) -> Result<String> {
    let mut output = Vec::new();

    for rejection in rejections {
        let report = Report::build(ReportKind::Error, filename, rejection.span.start)
            .with_message("Annotation would be rejected")
            .with_label(
                Label::new((filename, rejection.span.clone()))
                    .with_color(Color::Red)
                    .with_message(rejection.error.to_string()),
            )
            .finish();

        report.write((filename, Source::from(source)), &mut output)?;
    }

    Ok(String::from_utf8_lossy(&output).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_file_has_no_rejections() {
        assert!(find_rejections("Fine {.ok #id data-x=1}\nAlso {checked}").is_empty());
    }

    #[test]
    fn test_rejections_located() {
        let source = "Good {.a}\nBad {.b 9lives}\nEmpty {\"\"}";
        let rejections = find_rejections(source);

        assert_eq!(rejections.len(), 2);
        assert_eq!(&source[rejections[0].span.clone()], "{.b 9lives}");
        assert!(matches!(rejections[0].error, AttributeError::InvalidName { .. }));
        assert!(matches!(rejections[1].error, AttributeError::Empty { .. }));
    }

    #[test]
    fn test_report_mentions_error() {
        let source = "Bad {.b 9lives}";
        let rejections = find_rejections(source);
        let report = format_rejections(source, "notes.md", &rejections).unwrap();

        assert!(report.contains("notes.md"));
        assert!(report.contains("9lives"));
    }
}
