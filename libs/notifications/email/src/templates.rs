//! Email template management with Handlebars
//!
//! Ships the default catalog notification templates and renders them
//! with per-event data (product snapshot, actor, field changes).

use std::collections::HashMap;

use eyre::{eyre, Result};
use handlebars::Handlebars;
use serde_json::Value;

/// Rendered template result
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

/// Email template definition
#[derive(Clone, Debug)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

/// Handlebars-based template engine
///
/// Supports:
/// - Variables: `{{name}}`
/// - Conditionals: `{{#if condition}}...{{/if}}`
/// - Loops: `{{#each items}}...{{/each}}`
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateEngine {
    /// Create a new TemplateEngine with the default catalog templates
    pub fn new() -> Result<Self> {
        let mut engine = Self {
            handlebars: Handlebars::new(),
            templates: HashMap::new(),
        };

        engine.register_defaults()?;
        Ok(engine)
    }

    /// Register a template
    pub fn register(&mut self, template: EmailTemplate) -> Result<()> {
        self.handlebars
            .register_template_string(&format!("{}_subject", template.name), &template.subject)
            .map_err(|e| eyre!("Failed to register subject template: {}", e))?;

        if let Some(text) = &template.body_text {
            self.handlebars
                .register_template_string(&format!("{}_text", template.name), text)
                .map_err(|e| eyre!("Failed to register text template: {}", e))?;
        }

        if let Some(html) = &template.body_html {
            self.handlebars
                .register_template_string(&format!("{}_html", template.name), html)
                .map_err(|e| eyre!("Failed to register HTML template: {}", e))?;
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Render a registered template with the given data
    pub fn render(&self, name: &str, data: &Value) -> Result<RenderedTemplate> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| eyre!("Unknown template: {}", name))?;

        let subject = self
            .handlebars
            .render(&format!("{name}_subject"), data)
            .map_err(|e| eyre!("Failed to render subject: {}", e))?;

        let body_text = template
            .body_text
            .as_ref()
            .map(|_| self.handlebars.render(&format!("{name}_text"), data))
            .transpose()
            .map_err(|e| eyre!("Failed to render text body: {}", e))?;

        let body_html = template
            .body_html
            .as_ref()
            .map(|_| self.handlebars.render(&format!("{name}_html"), data))
            .transpose()
            .map_err(|e| eyre!("Failed to render HTML body: {}", e))?;

        Ok(RenderedTemplate {
            subject,
            body_text,
            body_html,
        })
    }

    /// List registered template names
    pub fn template_names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    fn register_defaults(&mut self) -> Result<()> {
        self.register(EmailTemplate {
            name: "product_created".to_string(),
            subject: "New product created: {{product.name}}".to_string(),
            body_text: Some(
                "A new product was added to the catalog by {{actor}}.\n\n\
                 Name: {{product.name}}\n\
                 Brand: {{product.brand}}\n\
                 SKU: {{product.sku}}\n\
                 Price: {{price}}\n"
                    .to_string(),
            ),
            body_html: None,
        })?;

        self.register(EmailTemplate {
            name: "product_updated".to_string(),
            subject: "Product updated: {{product.name}}".to_string(),
            body_text: Some(
                "Product {{product.name}} (SKU {{product.sku}}) was updated by {{actor}}.\n\n\
                 Changes:\n\
                 {{#each changes}}- {{@key}}: {{this.old}} -> {{this.new}}\n{{/each}}"
                    .to_string(),
            ),
            body_html: None,
        })?;

        self.register(EmailTemplate {
            name: "product_deleted".to_string(),
            subject: "Product deleted: {{product.name}}".to_string(),
            body_text: Some(
                "Product {{product.name}} (SKU {{product.sku}}) was removed from the catalog by {{actor}}.\n"
                    .to_string(),
            ),
            body_html: None,
        })?;

        Ok(())
    }
}
