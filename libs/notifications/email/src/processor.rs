//! Processor turning product event jobs into admin emails.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use core_config::email::EmailConfig;
use queue_worker::{JobProcessor, QueueError};

use crate::directory::RecipientDirectory;
use crate::job::{ProductEventJob, ProductEventKind};
use crate::models::Email;
use crate::provider::EmailProvider;
use crate::templates::TemplateEngine;

/// Sends one email per admin recipient for each product event.
///
/// The audience is resolved per job execution and the actor is always
/// excluded. Delivery is at-least-once: a partial send failure retries
/// the whole job, so recipients already served may see a duplicate.
pub struct ProductEventProcessor<P: EmailProvider> {
    provider: Arc<P>,
    directory: Arc<dyn RecipientDirectory>,
    templates: Arc<TemplateEngine>,
    from_email: String,
    from_name: String,
}

impl<P: EmailProvider> ProductEventProcessor<P> {
    pub fn new(
        provider: Arc<P>,
        directory: Arc<dyn RecipientDirectory>,
        templates: TemplateEngine,
        config: &EmailConfig,
    ) -> Self {
        Self {
            provider,
            directory,
            templates: Arc::new(templates),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    fn template_data(&self, job: &ProductEventJob) -> serde_json::Value {
        json!({
            "product": {
                "name": job.product.name,
                "brand": job.product.brand,
                "sku": job.product.sku,
            },
            "price": format_price(job.product.price_cents),
            "actor": job.actor_username.as_deref().unwrap_or("an administrator"),
            "changes": job.changes,
        })
    }
}

#[async_trait]
impl<P: EmailProvider> JobProcessor<ProductEventJob> for ProductEventProcessor<P> {
    async fn process(&self, job: &ProductEventJob) -> Result<(), QueueError> {
        let recipients = self
            .directory
            .admin_recipients()
            .await
            .map_err(|e| QueueError::transient(format!("Failed to resolve recipients: {e}")))?;

        let audience: Vec<_> = recipients
            .into_iter()
            .filter(|r| Some(r.user_id) != job.actor_user_id)
            .collect();

        if audience.is_empty() {
            debug!(
                job_id = %job.id,
                product_id = %job.product.id,
                "No admin recipients, skipping notification"
            );
            return Ok(());
        }

        let rendered = self
            .templates
            .render(job.kind.template_name(), &self.template_data(job))
            .map_err(|e| QueueError::permanent(format!("Template error: {e}")))?;

        let mut failures = 0usize;
        for recipient in &audience {
            let mut email = Email::new(&recipient.email, &rendered.subject)
                .with_from(format!("{} <{}>", self.from_name, self.from_email));
            email.body_text = rendered.body_text.clone();
            email.body_html = rendered.body_html.clone();

            if let Err(e) = self.provider.send(&email).await {
                warn!(
                    job_id = %job.id,
                    to = %recipient.email,
                    error = %e,
                    "Failed to send notification email"
                );
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(QueueError::transient(format!(
                "{failures} of {} notification emails failed",
                audience.len()
            )));
        }

        info!(
            job_id = %job.id,
            product_id = %job.product.id,
            kind = ?job.kind,
            recipients = audience.len(),
            "Product event notifications sent"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ProductEventProcessor"
    }
}

/// Formats a price in cents as a decimal string, e.g. `1999` -> `19.99`
fn format_price(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}
