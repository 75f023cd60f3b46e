use std::sync::{Arc, Mutex, MutexGuard};

use nld_core::dates::BuiltinDates;
use nld_session::{KeyEvent, KeyResponse, SessionError, SuggestionSession};
use tracing::{debug, warn};

use super::types::{
    convert_to_events, NldChange, NldContext, NldDocument, NldError, NldEvent, NldKey,
    NldKeyResponse, NldUpdate,
};
use super::view::HostView;

#[derive(uniffi::Object)]
pub struct NldSession {
    session: Mutex<SuggestionSession>,
}

#[uniffi::export]
impl NldSession {
    /// Session over the global settings. `locale` overrides `dates.locale`.
    #[uniffi::constructor]
    pub fn new(locale: Option<String>) -> Result<Arc<Self>, NldError> {
        let settings = Arc::new(crate::settings::settings().clone());
        let locale = locale.unwrap_or_else(|| settings.dates.locale.clone());
        let dates = BuiltinDates::new(&locale).map_err(|e| NldError::InvalidData {
            msg: e.to_string(),
        })?;
        debug!(%locale, phrase = %settings.trigger.phrase, "session created");
        Ok(Arc::new(Self {
            session: Mutex::new(SuggestionSession::new(settings, Box::new(dates))),
        }))
    }

    pub fn on_trigger(&self, doc: NldDocument) -> Result<NldUpdate, NldError> {
        let mut view = HostView::new(&doc)?;
        let context = self.session().on_trigger(&mut view);
        Ok(NldUpdate {
            context: context.as_ref().map(NldContext::from),
            events: view.into_events(),
        })
    }

    pub fn get_suggestions(&self, query: String) -> Vec<String> {
        self.session().get_suggestions(&query)
    }

    pub fn handle_key(
        &self,
        doc: NldDocument,
        key: NldKey,
        down: bool,
    ) -> Result<NldKeyResponse, NldError> {
        let Some(key) = key.to_key() else {
            return Ok(NldKeyResponse {
                handled: false,
                events: Vec::new(),
            });
        };
        let event = if down {
            KeyEvent::Down(key)
        } else {
            KeyEvent::Up(key)
        };
        self.with_view(&doc, |session, view| session.handle_key(view, event))
    }

    /// Confirm `label`, as when a suggestion row is clicked.
    ///
    /// A label that cannot be applied still closes the session; the
    /// response then carries the clean-up events and `SelectionFailed`.
    pub fn select(&self, doc: NldDocument, label: String) -> Result<NldKeyResponse, NldError> {
        let mut view = HostView::new(&doc)?;
        let result = self.session().select_suggestion(&mut view, &label);
        let mut events = view.into_events();
        match result {
            Ok(selection) => events.push(NldEvent::Commit {
                text: selection.text,
            }),
            Err(SessionError::NotOpen) => {
                return Err(NldError::Session {
                    msg: SessionError::NotOpen.to_string(),
                })
            }
            Err(e) => {
                warn!(error = %e, label = %label, "selection failed");
                events.push(NldEvent::SelectionFailed {
                    reason: e.to_string(),
                });
            }
        }
        events.push(NldEvent::HideSuggestions);
        Ok(NldKeyResponse {
            handled: true,
            events,
        })
    }

    pub fn run_deferred(&self, doc: NldDocument) -> Result<NldKeyResponse, NldError> {
        self.with_view(&doc, |session, view| session.run_deferred(view))
    }

    pub fn close(&self, doc: NldDocument) -> Result<Vec<NldEvent>, NldError> {
        let mut view = HostView::new(&doc)?;
        self.session().close(&mut view);
        Ok(view.into_events())
    }

    pub fn document_changed(&self, changes: Vec<NldChange>) {
        let changes: Vec<_> = changes.into_iter().map(Into::into).collect();
        self.session().on_document_changed(&changes);
    }

    pub fn set_locale(&self, code: String) -> Result<(), NldError> {
        self.session()
            .set_locale(&code)
            .map_err(|e| NldError::InvalidData { msg: e.to_string() })
    }

    pub fn is_open(&self) -> bool {
        self.session().is_open()
    }

    /// Open context as JSON, for diagnostics.
    pub fn context_json(&self) -> Option<String> {
        let session = self.session();
        let ctx = session.context()?;
        serde_json::to_string(ctx).ok()
    }
}

impl NldSession {
    fn session(&self) -> MutexGuard<'_, SuggestionSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_view(
        &self,
        doc: &NldDocument,
        f: impl FnOnce(&mut SuggestionSession, &mut HostView) -> KeyResponse,
    ) -> Result<NldKeyResponse, NldError> {
        let mut view = HostView::new(doc)?;
        let resp = f(&mut *self.session(), &mut view);
        Ok(convert_to_events(resp, view.into_events()))
    }
}
