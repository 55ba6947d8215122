//! # Template CLI
//!
//! `rodo template` prints the built-in questionnaire. With `--new <NAME>`
//! it prints a blank assessment document instead, which can be filled in
//! and passed to `rodo summary`.

use anyhow::{Context, Result};
use clap::Args;

use rodo_core::{rodo_template, Assessment};

use crate::print_json;

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Emit a blank assessment with this name instead of the questionnaire.
    #[arg(long, value_name = "NAME")]
    pub new: Option<String>,

    /// Description of the new assessment.
    #[arg(long, requires = "new", default_value = "")]
    pub description: String,

    /// Print YAML instead of JSON.
    #[arg(long)]
    pub yaml: bool,
}

pub fn run_template(args: &TemplateArgs) -> Result<u8> {
    match &args.new {
        Some(name) => {
            if name.trim().is_empty() {
                anyhow::bail!("assessment name must not be empty");
            }
            let assessment = Assessment::from_template(name.trim(), args.description.as_str());
            tracing::info!(id = %assessment.id, "blank assessment created");
            emit(&assessment, args.yaml)?;
        }
        None => {
            let template = rodo_template();
            tracing::debug!(chapters = template.chapters.len(), "printing template");
            emit(template, args.yaml)?;
        }
    }
    Ok(0)
}

fn emit<T: serde::Serialize>(value: &T, yaml: bool) -> Result<()> {
    if yaml {
        let text = serde_yaml::to_string(value).context("failed to serialize YAML")?;
        print!("{text}");
        Ok(())
    } else {
        print_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_template() {
        let args = TemplateArgs {
            new: None,
            description: String::new(),
            yaml: false,
        };
        assert_eq!(run_template(&args).unwrap(), 0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let args = TemplateArgs {
            new: Some("   ".to_string()),
            description: String::new(),
            yaml: true,
        };
        assert!(run_template(&args).is_err());
    }
}
