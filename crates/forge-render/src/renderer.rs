//! Handlebars template rendering.
//!
//! Output is plain text or Markdown, never HTML, so escaping is disabled.
//! Custom helpers:
//! - score: Format a 0-100 score as "85/100"
//! - cell: Make a value safe inside a Markdown table cell. Every escape is
//!   distinct, so distinct values stay distinct cells.

use forge_core::Scores;
use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use crate::templates::TemplatesFile;

handlebars_helper!(score: |value: u64| format!("{}/{}", value, Scores::MAX));

handlebars_helper!(cell: |value: str| table_cell(value));

fn table_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '\n' => out.push_str("<br>"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compiled renderer with registered helpers
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compile every template in the file
    pub fn new(templates: &TemplatesFile) -> Result<Self, String> {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("score", Box::new(score));
        handlebars.register_helper("cell", Box::new(cell));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| format!("Template '{}' failed to compile: {}", name, e))?;
        }

        Ok(TemplateRenderer { handlebars })
    }

    /// Render a named template with data
    pub fn render(&self, template_name: &str, data: &Value) -> Result<String, String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| format!("Render error: {}", e))
    }
}
