//! Closure-backed stages.
//!
//! These let an application plug its download, decrypt and transcode
//! routines into the pipeline without writing a [`Stage`] impl. The closures
//! return `anyhow::Result<()>`; an error becomes a failure carrying the
//! error's message and its cause chain.

use super::{Stage, StageContext};
use crate::core::{LibraryItem, StageKind, StatusOutcome};
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

/// Predicate deciding whether an item needs a stage.
pub type ItemValidator = Arc<dyn Fn(&LibraryItem) -> bool + Send + Sync>;

/// A stage backed by a synchronous function.
pub struct FnStage<F>
where
    F: Fn(&LibraryItem) -> anyhow::Result<()> + Send + Sync,
{
    name: String,
    kind: StageKind,
    validator: Option<ItemValidator>,
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(&LibraryItem) -> anyhow::Result<()> + Send + Sync,
{
    /// Creates a new function-based stage.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Custom,
            validator: None,
            func,
        }
    }

    /// Sets the stage kind.
    #[must_use]
    pub fn with_kind(mut self, kind: StageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Restricts the stage to items accepted by `validator`.
    #[must_use]
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&LibraryItem) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl<F> Debug for FnStage<F>
where
    F: Fn(&LibraryItem) -> anyhow::Result<()> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Stage for FnStage<F>
where
    F: Fn(&LibraryItem) -> anyhow::Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        self.kind
    }

    fn validate(&self, item: &LibraryItem) -> bool {
        self.validator.as_ref().map_or(true, |v| v(item))
    }

    async fn process(&self, item: &LibraryItem, _ctx: &StageContext) -> StatusOutcome {
        StatusOutcome::from_result((self.func)(item))
    }
}

/// A stage backed by an async function.
///
/// The function receives owned copies of the item and context so the
/// returned future can be `'static`.
pub struct AsyncFnStage<F, Fut>
where
    F: Fn(LibraryItem, StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    name: String,
    kind: StageKind,
    validator: Option<ItemValidator>,
    func: F,
    _phantom: std::marker::PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncFnStage<F, Fut>
where
    F: Fn(LibraryItem, StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    /// Creates a new async function-based stage.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Custom,
            validator: None,
            func,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the stage kind.
    #[must_use]
    pub fn with_kind(mut self, kind: StageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Restricts the stage to items accepted by `validator`.
    #[must_use]
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&LibraryItem) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl<F, Fut> Debug for AsyncFnStage<F, Fut>
where
    F: Fn(LibraryItem, StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFnStage")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> Stage for AsyncFnStage<F, Fut>
where
    F: Fn(LibraryItem, StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        self.kind
    }

    fn validate(&self, item: &LibraryItem) -> bool {
        self.validator.as_ref().map_or(true, |v| v(item))
    }

    async fn process(&self, item: &LibraryItem, ctx: &StageContext) -> StatusOutcome {
        StatusOutcome::from_result((self.func)(item.clone(), ctx.clone()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[tokio::test]
    async fn test_fn_stage_success() {
        let stage = FnStage::new("decrypt", |_item| Ok(())).with_kind(StageKind::DecryptAudio);

        assert_eq!(stage.name(), "decrypt");
        assert_eq!(stage.kind(), StageKind::DecryptAudio);

        let ctx = StageContext::detached();
        let outcome = stage.process(&LibraryItem::new("B1", "Book"), &ctx).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_fn_stage_error_becomes_failure() {
        let stage = FnStage::new("fetch", |item: &LibraryItem| {
            Err(std::io::Error::other("404"))
                .with_context(|| format!("downloading document for {}", item.product_id))
        });

        let ctx = StageContext::detached();
        let outcome = stage.process(&LibraryItem::new("B7", "Book"), &ctx).await;

        assert_eq!(outcome.messages()[0], "downloading document for B7");
        assert!(outcome.messages()[1].ends_with("404"));
    }

    #[test]
    fn test_validator() {
        let stage = FnStage::new("fetch", |_item| Ok(())).with_validator(|item| item.has_document);

        assert!(!stage.validate(&LibraryItem::new("B1", "Plain")));
        assert!(stage.validate(&LibraryItem::new("B2", "With pdf").with_document()));
    }

    #[tokio::test]
    async fn test_async_fn_stage() {
        let stage = AsyncFnStage::new("transcode", |item: LibraryItem, ctx: StageContext| async move {
            ctx.log(format!("converting {}", item.title));
            if item.title.is_empty() {
                anyhow::bail!("missing title");
            }
            Ok(())
        })
        .with_kind(StageKind::Transcode);

        let ctx = StageContext::detached();
        assert!(stage.process(&LibraryItem::new("B1", "Book"), &ctx).await.is_success());

        let outcome = stage.process(&LibraryItem::new("B2", ""), &ctx).await;
        assert_eq!(outcome.messages(), &["missing title".to_string()]);
        assert_eq!(stage.kind(), StageKind::Transcode);
    }
}
