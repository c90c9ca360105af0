//! # Email Notifications
//!
//! Catalog change notifications delivered over email.
//!
//! Product mutations enqueue a [`ProductEventJob`] carrying a detached
//! snapshot of the product plus the field-level changes. The
//! [`ProductEventProcessor`] resolves the admin audience at processing
//! time, renders the matching template, and sends one email per
//! recipient through an [`EmailProvider`].
//!
//! Providers:
//! - [`SmtpProvider`]: real delivery via lettre
//! - [`MockSmtpProvider`]: records sends in memory (development/tests)

pub mod directory;
pub mod job;
pub mod models;
pub mod processor;
pub mod provider;
pub mod templates;

pub use directory::{Recipient, RecipientDirectory, StaticRecipientDirectory};
pub use job::{FieldChange, ProductEventJob, ProductEventKind, ProductSnapshot};
pub use models::Email;
pub use processor::ProductEventProcessor;
pub use provider::{EmailProvider, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider};
pub use templates::{RenderedTemplate, TemplateEngine};
