use dialoguer::{theme::ColorfulTheme, Input};

use super::commands::CommandError;

/// Prompt for free-form text, optionally pre-filled with `default`.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    default: Option<&str>,
) -> Result<String, CommandError> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(value) = default {
        input = input.default(value.to_string());
    }
    Ok(input.interact_text()?)
}
