use super::read_input;
use crate::config::Config;
use anyhow::{anyhow, Result};
use attrmark_dom::{Applier, TargetBinding, VDocument};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    Html,
    Json,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON element tree to process
    pub input: PathBuf,

    /// Output format for the processed tree
    #[arg(short, long, value_enum, default_value = "html")]
    pub format: TreeFormat,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = read_input(&args.input)?;

    let (doc, bindings) = apply_to_json(&source, &config)?;

    match args.format {
        TreeFormat::Html => println!("{}", doc.to_html()),
        TreeFormat::Json => println!("{}", serde_json::to_string_pretty(&doc.to_vnode())?),
    }

    eprintln!(
        "{} Applied {} annotation(s) in {}",
        "✓".green(),
        bindings.len(),
        args.input.display()
    );

    Ok(())
}

pub(crate) fn apply_to_json(
    source: &str,
    config: &Config,
) -> Result<(VDocument, Vec<TargetBinding<attrmark_dom::NodeId>>)> {
    let mut doc =
        VDocument::from_json(source).map_err(|err| anyhow!("Invalid element tree: {}", err))?;
    let root = doc.root();
    let bindings = Applier::new(config.applier.clone()).apply(&mut doc, root);
    Ok((doc, bindings))
}
