//! Bookshelf application library
//!
//! An in-memory book inventory exposed through the module framework. The
//! [`BookStore`](modules::books::BookStore) is the data-access layer; the
//! HTTP routes are a thin adapter over it.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books;

/// Build the registry holding every application module, backed by a store
/// configured from `settings`.
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let store = books::BookStore::from_settings(&settings.books);
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store).context("failed to register modules")?;
    Ok(registry)
}

/// Run the service: initialise and start modules, serve HTTP until shutdown,
/// then stop modules in reverse order.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
