use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Context handed to modules while they are initialised and started.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// A unit of functionality mounted into the bookshelf service.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also its mount point under `/api`.
    fn name(&self) -> &'static str;

    /// Called once during startup, before any module is started.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes served under `/api/{name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` and `components.schemas`) merged into the
    /// service document. Paths are relative to the module mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called after every module has been initialised.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called on shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
