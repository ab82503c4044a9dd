//! Submit command implementation

use crate::app::{App, SubmitError};
use crate::config::Config;
use crate::lead::FormFields;
use clap::Args;

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Form identifier
    #[arg(long, default_value = "contato")]
    pub form: String,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    /// Custom field as key=value (repeatable)
    #[arg(long = "field", value_parser = parse_key_val)]
    pub fields: Vec<(String, String)>,

    /// Print the receipt as JSON
    #[arg(long)]
    pub json: bool,
}

impl SubmitArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let app = App::new(config.clone())?;

        let mut input = FormFields::new(&self.name, &self.email, &self.phone);
        for (key, value) in &self.fields {
            input = input.with_field(key, value);
        }

        match app.submit(&self.form, &input).await {
            Ok(receipt) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&receipt)?);
                } else {
                    println!("Lead {} {}", receipt.lead_id, receipt.status);
                    println!("  Redirect: {}", receipt.redirect);
                }
                Ok(())
            }
            Err(SubmitError::Validation(e)) => {
                for error in &e.errors {
                    eprintln!("  {}", error);
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("budget=ate-5k").unwrap(),
            ("budget".to_string(), "ate-5k".to_string())
        );
        assert_eq!(
            parse_key_val("nota=a=b").unwrap(),
            ("nota".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("budget").is_err());
    }
}
