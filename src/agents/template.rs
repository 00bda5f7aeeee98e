//! Tera rendering of agent prompt text
//!
//! Placeholders such as `{{ backend_url }}` may appear in the welcome message,
//! context bodies and extracted-variable prompts.

use std::collections::BTreeMap;

use tera::{Context, Tera};

use super::domain::AgentConfigurationRequest;
use super::error::{ProvisionError, ProvisionResult};

/// Render every templated text field of `request`
///
/// Undefined variables and syntax errors fail; unrendered placeholders are
/// never sent to the platform.
pub fn render_request(
    request: &AgentConfigurationRequest,
    variables: &BTreeMap<String, String>,
) -> ProvisionResult<AgentConfigurationRequest> {
    let mut context = Context::new();
    for (key, value) in variables {
        context.insert(key, value);
    }

    let mut rendered = request.clone();
    rendered.welcome_message = render_text("welcome_message", &request.welcome_message, &context)?;

    for (idx, entry) in rendered.context_breakdown.iter_mut().enumerate() {
        entry.body = render_text(&format!("context_breakdown[{}].body", idx), &entry.body, &context)?;
    }

    for (idx, variable) in rendered
        .post_call_actions
        .extracted_variables
        .iter_mut()
        .enumerate()
    {
        variable.prompt = render_text(
            &format!("post_call_actions.extracted_variables[{}].prompt", idx),
            &variable.prompt,
            &context,
        )?;
    }

    Ok(rendered.normalize())
}

fn render_text(field: &str, text: &str, context: &Context) -> ProvisionResult<String> {
    if !text.contains("{{") && !text.contains("{%") {
        return Ok(text.to_string());
    }

    Tera::one_off(text, context, false).map_err(|e| {
        // Tera keeps the useful part (e.g. the undefined variable) in the source
        let detail = std::error::Error::source(&e)
            .map(|s| s.to_string())
            .unwrap_or_else(|| e.to_string());
        ProvisionError::Configuration(format!("Failed to render {}: {}", field, detail))
    })
}
