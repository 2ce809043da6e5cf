//! All-or-nothing bundles of stages.

use super::{invoke, Stage, StageContext};
use crate::core::{LibraryItem, StageKind, StatusOutcome};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// An ordered sequence of stages treated as one unit.
///
/// Succeeds only if every sub-stage that applies to the item succeeds. The
/// first failure stops the sequence and becomes the composite's failure, so
/// a partially backed-up item stays eligible for another attempt.
#[derive(Debug, Clone)]
pub struct CompositeStage {
    name: String,
    stages: Vec<Arc<dyn Stage>>,
}

impl CompositeStage {
    /// Creates a composite from an ordered list of stages.
    #[must_use]
    pub fn new(name: impl Into<String>, stages: Vec<Arc<dyn Stage>>) -> Self {
        Self {
            name: name.into(),
            stages,
        }
    }

    /// The full backup of a book: liberate the audio, then fetch the document.
    #[must_use]
    pub fn backup_book(decrypt_audio: Arc<dyn Stage>, fetch_document: Arc<dyn Stage>) -> Self {
        Self::new("backup_book", vec![decrypt_audio, fetch_document])
    }

    /// Returns the sub-stages in order.
    #[must_use]
    pub fn stages(&self) -> &[Arc<dyn Stage>] {
        &self.stages
    }
}

#[async_trait]
impl Stage for CompositeStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Composite
    }

    fn validate(&self, item: &LibraryItem) -> bool {
        self.stages.iter().any(|s| s.validate(item))
    }

    fn completed_kinds(&self, item: &LibraryItem) -> Vec<StageKind> {
        let mut kinds = vec![StageKind::Composite];
        for stage in self.stages.iter().filter(|s| s.validate(item)) {
            for kind in stage.completed_kinds(item) {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds
    }

    async fn process(&self, item: &LibraryItem, ctx: &StageContext) -> StatusOutcome {
        for stage in &self.stages {
            if !stage.validate(item) {
                debug!(
                    composite = %self.name,
                    stage = %stage.name(),
                    product_id = %item.product_id,
                    "Sub-stage not needed for item"
                );
                continue;
            }

            let outcome = invoke(stage.as_ref(), item, ctx).await;
            if outcome.is_failure() {
                return outcome;
            }
        }

        StatusOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedStage;

    fn item() -> LibraryItem {
        LibraryItem::new("B1", "Book").with_document()
    }

    #[tokio::test]
    async fn test_all_succeed() {
        let audio = Arc::new(ScriptedStage::new("audio"));
        let pdf = Arc::new(ScriptedStage::new("pdf"));
        let composite = CompositeStage::backup_book(audio.clone(), pdf.clone());

        let outcome = composite.process(&item(), &StageContext::detached()).await;

        assert!(outcome.is_success());
        assert_eq!(audio.call_count(), 1);
        assert_eq!(pdf.call_count(), 1);
        assert_eq!(composite.kind(), StageKind::Composite);
    }

    #[tokio::test]
    async fn test_first_failure_short_circuits() {
        let audio = Arc::new(ScriptedStage::new("audio"));
        audio.fail_on("B1", ["license denied", "status 403"]);
        let pdf = Arc::new(ScriptedStage::new("pdf"));
        let composite = CompositeStage::backup_book(audio.clone(), pdf.clone());

        let outcome = composite.process(&item(), &StageContext::detached()).await;

        assert_eq!(
            outcome,
            StatusOutcome::Failure(vec!["license denied".to_string(), "status 403".to_string()])
        );
        assert_eq!(audio.call_count(), 1);
        assert_eq!(pdf.call_count(), 0);
    }

    #[tokio::test]
    async fn test_late_failure_is_overall_failure() {
        let audio = Arc::new(ScriptedStage::new("audio"));
        let pdf = Arc::new(ScriptedStage::new("pdf"));
        pdf.fail_on("B1", ["document missing"]);
        let composite = CompositeStage::backup_book(audio.clone(), pdf.clone());

        let outcome = composite.process(&item(), &StageContext::detached()).await;

        assert_eq!(outcome.messages(), &["document missing".to_string()]);
        assert_eq!(audio.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sub_stage_that_does_not_apply_is_skipped() {
        let audio = Arc::new(ScriptedStage::new("audio"));
        let pdf = Arc::new(ScriptedStage::new("pdf").only_with_document());
        let composite = CompositeStage::backup_book(audio.clone(), pdf.clone());
        let plain = LibraryItem::new("B2", "No pdf");

        assert!(composite.validate(&plain));
        let outcome = composite.process(&plain, &StageContext::detached()).await;

        assert!(outcome.is_success());
        assert_eq!(pdf.call_count(), 0);
    }

    #[test]
    fn test_validate_requires_any_sub_stage() {
        let pdf = Arc::new(ScriptedStage::new("pdf").only_with_document());
        let composite = CompositeStage::new("pdf_only", vec![pdf]);

        assert!(!composite.validate(&LibraryItem::new("B3", "Plain")));
        assert!(composite.validate(&item()));
        assert_eq!(composite.stages().len(), 1);
    }

    #[test]
    fn test_completed_kinds_cover_applicable_sub_stages() {
        let audio = Arc::new(ScriptedStage::new("audio").with_kind(StageKind::DecryptAudio));
        let pdf = Arc::new(
            ScriptedStage::new("pdf")
                .with_kind(StageKind::FetchDocument)
                .only_with_document(),
        );
        let composite = CompositeStage::backup_book(audio, pdf);

        assert_eq!(
            composite.completed_kinds(&item()),
            vec![StageKind::Composite, StageKind::DecryptAudio, StageKind::FetchDocument]
        );
        assert_eq!(
            composite.completed_kinds(&LibraryItem::new("B2", "No pdf")),
            vec![StageKind::Composite, StageKind::DecryptAudio]
        );
    }
}
