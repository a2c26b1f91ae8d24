use crate::{
    client::DirectoryClient,
    config::RuntimeConfiguration,
    directory::{DirectoryMode, DirectoryView, pagination::Paginator},
    error::{RollcallResult, UnknownViewSnafu},
};
use maud::{DOCTYPE, Markup, html};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct RollcallState {
    config: RuntimeConfiguration,
    client: DirectoryClient,
    views: ViewRegistry,
}

impl RollcallState {
    pub fn new(config: RuntimeConfiguration) -> RollcallResult<Self> {
        let client = DirectoryClient::new(config.api_config())?;
        let views = ViewRegistry::new(config.view_ttl());

        Ok(Self {
            config,
            client,
            views,
        })
    }

    #[allow(clippy::unused_self)]
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Introduction Data" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center py-8 text-white" {
                    nav class="mb-8 flex flex-row space-x-4" {
                        a href="/" class="text-blue-200 underline" {"Home"}
                        a href="/directory" class="text-blue-200 underline" {"Students"}
                        a href="/directory?mode=browse" class="text-blue-200 underline" {"Browse by Prefix"}
                    }
                    (markup)
                }
            }
        }
    }

    pub const fn client(&self) -> &DirectoryClient {
        &self.client
    }

    pub const fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub const fn paginator(&self) -> Paginator {
        Paginator::new(self.config.page_size())
    }

    pub async fn mount_view(&self, mode: DirectoryMode) -> Uuid {
        let view = DirectoryView::mount(&self.client, mode, self.paginator()).await;
        let id = self.views.insert(view);
        info!(%id, ?mode, "Mounted directory view");
        id
    }

    pub fn sensible_shutdown(&self) {
        let dropped = self.views.clear();
        info!(dropped, "Dropped live directory views");
    }
}

#[derive(Debug)]
struct ViewSlot {
    view: DirectoryView,
    last_used: Instant,
}

/// Live directory views, each owned here until it goes idle for longer than the TTL.
#[derive(Clone, Debug)]
pub struct ViewRegistry {
    views: Arc<Mutex<HashMap<Uuid, ViewSlot>>>,
    ttl: Duration,
}

impl ViewRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            views: Arc::default(),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ViewSlot>> {
        // a panic mid-transition leaves a view no worse than its last full update
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, view: DirectoryView) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().insert(
            id,
            ViewSlot {
                view,
                last_used: Instant::now(),
            },
        );
        id
    }

    /// Runs `f` against one view. The lock is held only for the call, so `f`
    /// must not await.
    pub fn with_view<R>(&self, id: Uuid, f: impl FnOnce(&mut DirectoryView) -> R) -> RollcallResult<R> {
        let mut views = self.lock();
        let slot = views.get_mut(&id).ok_or_else(|| UnknownViewSnafu { id }.build())?;
        slot.last_used = Instant::now();
        Ok(f(&mut slot.view))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut views = self.lock();
        let before = views.len();
        views.retain(|_, slot| now.saturating_duration_since(slot.last_used) < self.ttl);
        before - views.len()
    }

    pub fn clear(&self) -> usize {
        let mut views = self.lock();
        let count = views.len();
        views.clear();
        count
    }

    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let registry = self.clone();
        let period = (self.ttl / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = registry.sweep_expired(Instant::now());
                if evicted > 0 {
                    debug!(evicted, remaining = registry.len(), "Evicted idle directory views");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollcallError;
    use std::num::NonZeroUsize;

    fn view() -> DirectoryView {
        DirectoryView::new(
            DirectoryMode::OnDemandBrowse,
            Paginator::new(NonZeroUsize::new(15).unwrap()),
        )
    }

    #[test]
    fn views_are_addressed_by_id() {
        let registry = ViewRegistry::new(Duration::from_secs(60));
        let id = registry.insert(view());

        registry.with_view(id, |v| v.set_query("ab")).unwrap();
        assert_eq!(registry.with_view(id, |v| v.query().to_string()).unwrap(), "ab");

        let err = registry.with_view(Uuid::nil(), |_| ()).unwrap_err();
        assert!(matches!(err, RollcallError::UnknownView { .. }));
    }

    #[test]
    fn idle_views_expire() {
        let registry = ViewRegistry::new(Duration::from_secs(60));
        let id = registry.insert(view());

        assert_eq!(registry.sweep_expired(Instant::now()), 0);
        assert_eq!(
            registry.sweep_expired(Instant::now() + Duration::from_secs(61)),
            1
        );
        assert!(registry.with_view(id, |_| ()).is_err());
    }
}
