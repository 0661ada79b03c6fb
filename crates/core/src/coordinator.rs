//! The pre-save / post-save protocol.
//!
//! A [`SaveCycleCoordinator`] belongs to exactly one open document. The host calls
//! [`SaveCycleCoordinator::on_before_save`] right before it serializes the document and
//! [`SaveCycleCoordinator::on_after_save`] once the save completes:
//!
//! 1. Before save: every qualifying region is stripped in place, and its remapped selections are
//!    queued in the [`SaveSession`].
//! 2. After save: the queued selections are applied back to the same regions, in the same
//!    order.
//!
//! Non-qualifying regions (markup, and raw unless configured) are skipped in both phases, which
//! keeps the queue aligned with the regions it was filled from.
//!
//! Neither phase can fail. A post-save without a matching pre-save restores nothing, and a
//! region with no queued entry is left as it is.

use std::collections::VecDeque;

use crate::{
    region::Document,
    remap::{Selection, remap},
    strip::StripConfig,
};

/// Selections captured before a save, waiting to be restored after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSession {
    pending: VecDeque<Vec<Selection>>,
}

impl SaveSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the selections of the next qualifying region.
    pub fn push(&mut self, selections: Vec<Selection>) {
        self.pending.push_back(selections);
    }

    /// Take the selections of the next qualifying region, oldest first.
    pub fn pop(&mut self) -> Option<Vec<Selection>> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// What [`SaveCycleCoordinator::on_before_save`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeforeSaveReport {
    /// Qualifying regions that were captured.
    pub regions_captured: usize,
    /// Regions passed over by the qualification predicate.
    pub regions_skipped: usize,
    /// Captured regions whose text changed.
    pub regions_changed: usize,
    /// Characters removed across all regions.
    pub characters_removed: usize,
}

/// What [`SaveCycleCoordinator::on_after_save`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AfterSaveReport {
    /// Regions whose selections were restored.
    pub regions_restored: usize,
    /// Qualifying regions with no queued selections.
    pub regions_missing: usize,
    /// Queued selection sets left over with no region to restore into.
    pub sets_discarded: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Captured,
}

/// Strips trailing whitespace around the saves of one document.
#[derive(Debug, Clone, Default)]
pub struct SaveCycleCoordinator {
    config: StripConfig,
    session: SaveSession,
    phase: Phase,
}

impl SaveCycleCoordinator {
    pub fn new(config: StripConfig) -> Self {
        Self {
            config,
            session: SaveSession::new(),
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn session(&self) -> &SaveSession {
        &self.session
    }

    /// Returns true between a pre-save and its post-save.
    pub fn is_captured(&self) -> bool {
        self.phase == Phase::Captured
    }

    /// Strip every qualifying region of `document` and queue its remapped selections.
    ///
    /// Any session left over from an earlier pre-save without a post-save is discarded first.
    pub fn on_before_save<D: Document + ?Sized>(&mut self, document: &mut D) -> BeforeSaveReport {
        if !self.session.is_empty() {
            tracing::debug!(
                stale = self.session.len(),
                "discarding selections from an unfinished save"
            );
        }
        self.session.clear();

        let mut report = BeforeSaveReport::default();
        for (i, region) in document.regions_mut().into_iter().enumerate() {
            let kind = region.kind();
            if !kind.qualifies(&self.config) {
                tracing::trace!(region = i, ?kind, "skipping region");
                report.regions_skipped += 1;
                continue;
            }

            let result = {
                let text = region.text();
                let selections = region.selections();
                remap(&text, &selections, &self.config)
            };

            if result.changed() {
                tracing::debug!(region = i, removed = result.removed, "stripped region");
                report.regions_changed += 1;
                report.characters_removed += result.removed;
                region.set_text(result.text);
            }
            self.session.push(result.selections);
            report.regions_captured += 1;
        }

        self.phase = Phase::Captured;
        report
    }

    /// Restore the queued selections into the qualifying regions of `document`.
    pub fn on_after_save<D: Document + ?Sized>(&mut self, document: &mut D) -> AfterSaveReport {
        if self.phase == Phase::Idle {
            tracing::debug!("post-save without a pre-save; nothing to restore");
        }

        let mut report = AfterSaveReport::default();
        for (i, region) in document.regions_mut().into_iter().enumerate() {
            if !region.kind().qualifies(&self.config) {
                continue;
            }
            match self.session.pop() {
                Some(selections) => {
                    region.set_selections(selections);
                    report.regions_restored += 1;
                }
                None => {
                    tracing::debug!(region = i, "no captured selections for region");
                    report.regions_missing += 1;
                }
            }
        }

        report.sets_discarded = self.session.len();
        if report.sets_discarded > 0 {
            tracing::debug!(
                discarded = report.sets_discarded,
                "document has fewer qualifying regions than were captured"
            );
        }
        self.session.clear();
        self.phase = Phase::Idle;
        report
    }
}
