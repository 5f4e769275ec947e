//! Side effects the state modules trigger outside themselves.

use async_trait::async_trait;
use karrot_types::ApiResult;

/// User-facing notification raised by a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    InviteAcceptSuccess,
    InviteAcceptError,
}

/// Place the application should move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    GroupsGallery,
}

/// Session-level collaborators: authentication refresh, alerts and navigation.
#[async_trait]
pub trait SessionHooks: Send + Sync {
    /// Reloads the signed-in user, e.g. after joining a group.
    async fn refresh_session(&self) -> ApiResult<()> {
        Ok(())
    }

    fn alert(&self, alert: Alert);

    fn navigate(&self, route: Route);
}

/// Hooks for headless use: everything is logged, nothing else happens.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

#[async_trait]
impl SessionHooks for LoggingHooks {
    fn alert(&self, alert: Alert) {
        log::info!("Alert: {:?}", alert);
    }

    fn navigate(&self, route: Route) {
        log::info!("Navigate to {:?}", route);
    }
}
