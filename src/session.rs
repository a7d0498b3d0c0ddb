//! Page-wide session state: which dataset the page is currently working on,
//! plus the transient "uploaded" banner.

use std::time::Duration;

use leptos::leptos_dom::helpers::{set_timeout_with_handle, TimeoutHandle};
use leptos::prelude::*;

use crate::models::DatasetId;

/// How long the upload banner stays up before clearing itself.
pub const BANNER_WINDOW: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDataset {
    pub id: DatasetId,
    pub name: String,
}

/// Banner window bookkeeping. Each upload opens a fresh window and bumps the
/// epoch; an expiry callback only hides the banner if its epoch is still the
/// latest, so a second upload inside the window restarts the full three
/// seconds instead of being cut short by the first timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadBanner {
    epoch: u64,
    visible: bool,
}

impl UploadBanner {
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Open (or re-open) the banner; returns the epoch the expiry callback
    /// must present to close it.
    pub fn show(&mut self) -> u64 {
        self.epoch += 1;
        self.visible = true;
        self.epoch
    }

    pub fn elapsed(&mut self, epoch: u64) {
        if self.epoch == epoch {
            self.visible = false;
        }
    }
}

/// Handle the components share through context. The upload flow is the only
/// writer; every dataset-scoped section just follows `active`.
#[derive(Clone, Copy)]
pub struct SessionContext {
    active: RwSignal<Option<ActiveDataset>>,
    banner: RwSignal<UploadBanner>,
    banner_timer: StoredValue<Option<TimeoutHandle>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(None),
            banner: RwSignal::new(UploadBanner::default()),
            banner_timer: StoredValue::new(None),
        }
    }

    pub fn active_dataset(&self) -> Option<ActiveDataset> {
        self.active.get()
    }

    pub fn active_dataset_id(&self) -> Option<DatasetId> {
        self.active.with(|active| active.as_ref().map(|d| d.id))
    }

    pub fn banner_visible(&self) -> bool {
        self.banner.with(|banner| banner.visible())
    }

    /// The upload flow reports a freshly uploaded dataset. Every section keyed
    /// on the active dataset re-fetches, and the banner opens for the next
    /// three seconds. An upload landing inside the window cancels the pending
    /// clear and schedules a new one.
    pub fn dataset_uploaded(&self, dataset: ActiveDataset) {
        self.active.set(Some(dataset));

        let Some(epoch) = self.banner.try_update(|banner| banner.show()) else {
            return;
        };
        if let Some(handle) = self.banner_timer.get_value() {
            handle.clear();
        }
        let banner = self.banner;
        let handle = set_timeout_with_handle(
            move || {
                let _ = banner.try_update(|banner| banner.elapsed(epoch));
            },
            BANNER_WINDOW,
        )
        .ok();
        self.banner_timer.set_value(handle);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_opens_and_expires() {
        let mut banner = UploadBanner::default();
        assert!(!banner.visible());

        let epoch = banner.show();
        assert!(banner.visible());

        banner.elapsed(epoch);
        assert!(!banner.visible());
    }

    #[test]
    fn second_upload_restarts_the_window() {
        let mut banner = UploadBanner::default();
        let first = banner.show();
        let second = banner.show();

        // The first timer fires after being superseded; nothing happens.
        banner.elapsed(first);
        assert!(banner.visible());

        banner.elapsed(second);
        assert!(!banner.visible());
    }

    #[test]
    fn stale_epoch_never_reopens() {
        let mut banner = UploadBanner::default();
        let first = banner.show();
        banner.elapsed(first);

        let second = banner.show();
        banner.elapsed(first);
        assert!(banner.visible());
        banner.elapsed(second);
        assert!(!banner.visible());
    }
}
