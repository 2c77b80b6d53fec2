//! Seam to the external rich-text editing engine.
//!
//! Turning arbitrary pasted HTML into a raw delta is the editing engine's
//! job, not ours. Callers plug an engine in through [`ClipboardEngine`] and
//! own its lifetime through [`LazyEngine`]; [`HtmlImporter`] then classifies
//! the engine's raw output into the canonical form.

use crate::classify::{Classifier, GuessMime, MimeResolver};
use crate::error::DeltaError;
use crate::model::Delta;

pub trait ClipboardEngine {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Convert an HTML fragment into an unclassified delta.
    fn html_to_raw_delta(&mut self, html: &str) -> Result<Delta, Self::Error>;
}

/// A caller-owned engine handle that is built on first use and then reused.
///
/// Access goes through `&mut self`, so the handle stays confined to whoever
/// owns it. A failed initialization is not cached; the next call retries.
pub struct LazyEngine<E, F> {
    engine: Option<E>,
    init: F,
}

impl<E, F> LazyEngine<E, F>
where
    E: ClipboardEngine,
    F: FnMut() -> Result<E, E::Error>,
{
    pub fn new(init: F) -> Self {
        Self { engine: None, init }
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    pub fn get(&mut self) -> Result<&mut E, E::Error> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => {
                tracing::debug!("initializing clipboard engine");
                (self.init)()?
            }
        };
        Ok(self.engine.insert(engine))
    }
}

/// HTML import pipeline: engine conversion followed by media classification.
pub struct HtmlImporter<E, F, M = GuessMime> {
    engine: LazyEngine<E, F>,
    classifier: Classifier<M>,
}

impl<E, F> HtmlImporter<E, F, GuessMime>
where
    E: ClipboardEngine,
    F: FnMut() -> Result<E, E::Error>,
{
    pub fn new(init: F) -> Self {
        Self {
            engine: LazyEngine::new(init),
            classifier: Classifier::default(),
        }
    }
}

impl<E, F, M> HtmlImporter<E, F, M>
where
    E: ClipboardEngine,
    F: FnMut() -> Result<E, E::Error>,
    M: MimeResolver,
{
    pub fn with_classifier<N: MimeResolver>(self, classifier: Classifier<N>) -> HtmlImporter<E, F, N> {
        HtmlImporter {
            engine: self.engine,
            classifier,
        }
    }

    pub fn engine(&self) -> &LazyEngine<E, F> {
        &self.engine
    }

    /// Convert pasted HTML into a classified delta.
    pub fn import_html(&mut self, html: &str) -> Result<Delta, DeltaError> {
        let raw = self
            .engine
            .get()
            .map_err(|err| DeltaError::Engine(Box::new(err)))?
            .html_to_raw_delta(html)
            .map_err(|err| DeltaError::Engine(Box::new(err)))?;
        Ok(self.classifier.classify_delta(&raw))
    }
}
