use anyhow::Result;
use inquire::{Confirm, CustomType, Select, Text};

/// The questions the wizard can ask. Tests drive the wizard with a scripted
/// implementation; the binary uses [`InquireDriver`].
pub trait PromptDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String>;
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;
    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64>;
    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64>;
    fn ask_select(&self, title: &str, help: &str, options: &[String], start: usize)
    -> Result<String>;
}

pub struct InquireDriver;

fn in_bounds<T: PartialOrd>(v: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m)
}

fn bounds_text<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(a), Some(b)) => format!("between {a} and {b}"),
        (Some(a), None) => format!("at least {a}"),
        (None, Some(b)) => format!("at most {b}"),
        (None, None) => String::new(),
    }
}

impl PromptDriver for InquireDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        let mut prompt = Text::new(title).with_default(default);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        let mut prompt = Confirm::new(title).with_default(default);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        loop {
            let mut prompt = CustomType::<u64>::new(title)
                .with_default(default)
                .with_error_message("Please type a whole number");
            if !help.is_empty() {
                prompt = prompt.with_help_message(help);
            }
            let v = prompt.prompt()?;
            if in_bounds(v, min, max) {
                return Ok(v);
            }
            eprintln!("✗ value must be {}", bounds_text(min, max));
        }
    }

    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        loop {
            let mut prompt = CustomType::<f64>::new(title)
                .with_default(default)
                .with_error_message("Please type a number");
            if !help.is_empty() {
                prompt = prompt.with_help_message(help);
            }
            let v = prompt.prompt()?;
            if in_bounds(v, min, max) {
                return Ok(v);
            }
            eprintln!("✗ value must be {}", bounds_text(min, max));
        }
    }

    fn ask_select(
        &self,
        title: &str,
        help: &str,
        options: &[String],
        start: usize,
    ) -> Result<String> {
        let mut prompt = Select::new(title, options.to_vec())
            .with_starting_cursor(start.min(options.len().saturating_sub(1)));
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }
}
