//! Rebuild-on-version-change
//!
//! The host owns a version counter that it bumps whenever ingestions,
//! hidden sets or display flags change, and calls [`TimelineSession::rebuild`]
//! with it. Only newer versions run the build; the finished model replaces
//! the published one as a whole, so readers holding the previous `Arc` keep
//! a consistent chart.

use std::sync::Arc;

use crate::model::TimelineModel;

/// What a rebuild request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A new model is published
    Published,
    /// The build found nothing visible; the published model was cleared
    Cleared,
    /// The version was not newer than the published one; nothing ran
    Stale,
}

/// Holds the latest published chart
#[derive(Debug, Default)]
pub struct TimelineSession {
    version: Option<u64>,
    model: Option<Arc<TimelineModel>>,
}

impl TimelineSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version of the published model, if any build ran yet
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn model(&self) -> Option<Arc<TimelineModel>> {
        self.model.clone()
    }

    /// Run `build` if `version` is newer than the last published one
    pub fn rebuild<F>(&mut self, version: u64, build: F) -> RebuildOutcome
    where
        F: FnOnce() -> Option<TimelineModel>,
    {
        if self.version.is_some_and(|published| version <= published) {
            log::debug!(
                "Ignoring stale timeline rebuild v{} (published v{:?})",
                version,
                self.version
            );
            return RebuildOutcome::Stale;
        }

        let built = build();
        self.version = Some(version);
        match built {
            Some(model) => {
                self.model = Some(Arc::new(model));
                RebuildOutcome::Published
            }
            None => {
                self.model = None;
                RebuildOutcome::Cleared
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::input::{AdministrationRoute, Ingestion, IngestionId, SubstanceColor};
    use crate::lookup::SubstanceTable;
    use crate::model::{DisplayFlags, TimelineInputs};
    use chrono::{TimeZone, Utc};

    fn model() -> Option<TimelineModel> {
        let inputs = TimelineInputs {
            ingestions: vec![Ingestion {
                id: IngestionId(1),
                substance_name: "Ketamine".to_string(),
                route: AdministrationRoute::Insufflated,
                time: Utc.with_ymd_and_hms(2024, 5, 4, 22, 0, 0).unwrap(),
                dose: Some(30.0),
                units: "mg".to_string(),
                is_estimate: false,
                color: SubstanceColor::Cyan,
                consumer_name: None,
                stomach_fullness: None,
            }],
            ..Default::default()
        };
        TimelineModel::build(&inputs, &SubstanceTable::new(), DisplayFlags::default(), &TimelineConfig::default())
    }

    #[test]
    fn test_newer_versions_publish() {
        let mut session = TimelineSession::new();
        assert_eq!(session.rebuild(1, model), RebuildOutcome::Published);
        let first = session.model().unwrap();
        assert_eq!(session.rebuild(2, model), RebuildOutcome::Published);
        assert_eq!(session.version(), Some(2));
        // Readers of the old model are unaffected by the swap
        assert!(!Arc::ptr_eq(&first, &session.model().unwrap()));
    }

    #[test]
    fn test_stale_versions_do_not_build() {
        let mut session = TimelineSession::new();
        session.rebuild(5, model);
        let mut ran = false;
        let outcome = session.rebuild(3, || {
            ran = true;
            None
        });
        assert_eq!(outcome, RebuildOutcome::Stale);
        assert!(!ran);
        assert_eq!(session.rebuild(5, model), RebuildOutcome::Stale);
        assert!(session.model().is_some());
    }

    #[test]
    fn test_empty_build_clears() {
        let mut session = TimelineSession::new();
        session.rebuild(1, model);
        assert_eq!(session.rebuild(2, || None), RebuildOutcome::Cleared);
        assert!(session.model().is_none());
        assert_eq!(session.version(), Some(2));
    }
}
