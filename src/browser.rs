//! Navigation session driving a [`Fetcher`].
//!
//! The browser owns everything one navigation session needs: the cached API
//! documentation, the route table, the UI styling and the form session store.
//! Every page load replaces the current page; a form built before the load
//! no longer receives choice lists.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api_doc::ApiDocumentation;
use crate::config::ClientConfig;
use crate::context::NavigationContext;
use crate::error::HydraError;
use crate::fetch::Fetcher;
use crate::form::{build_form_model, fill_choices, submit_form, FormModel, FormRequest, FormSessionStore, SessionId};
use crate::jsonld::{node_id, unwrap_singleton, values};
use crate::loader::{load_document_auto, Expander, PreExpanded};
use crate::page::{build_page, Page, PageItem, PageItemKind};
use crate::router::{activate, Navigation, RouteTable};
use crate::styling::UiStyling;
use crate::vocab::hydra;

/// The page currently shown.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub iri: String,
    /// Expanded resource the page was built from.
    pub resource: Value,
    pub page: Page,
}

/// Result of submitting a form.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub request: FormRequest,
    /// Expanded response body, if the server sent one.
    pub response: Option<Value>,
    /// Session of the follow-up form the response led to.
    pub next_form: Option<SessionId>,
}

pub struct HydraBrowser<F, E = PreExpanded> {
    fetcher: F,
    expander: E,
    config: ClientConfig,
    routes: RouteTable,
    styling: Option<UiStyling>,
    api_doc: Option<(String, ApiDocumentation)>,
    sessions: FormSessionStore,
    current: Option<LoadedPage>,
}

impl<F: Fetcher> HydraBrowser<F> {
    /// # Errors
    ///
    /// Returns `HydraError::MissingEntryPoint` or `HydraError::InvalidConfig`
    /// when the configuration does not validate.
    pub fn new(fetcher: F, config: ClientConfig) -> Result<Self, HydraError> {
        config.validate()?;
        Ok(Self {
            fetcher,
            expander: PreExpanded,
            routes: config.route_table(),
            config,
            styling: None,
            api_doc: None,
            sessions: FormSessionStore::new(),
            current: None,
        })
    }
}

impl<F: Fetcher, E: Expander> HydraBrowser<F, E> {
    pub fn with_expander<E2: Expander>(self, expander: E2) -> HydraBrowser<F, E2> {
        HydraBrowser {
            fetcher: self.fetcher,
            expander,
            config: self.config,
            routes: self.routes,
            styling: self.styling,
            api_doc: self.api_doc,
            sessions: self.sessions,
            current: self.current,
        }
    }

    pub fn with_styling(mut self, styling: UiStyling) -> Self {
        self.styling = Some(styling);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api_documentation(&self) -> Option<&ApiDocumentation> {
        self.api_doc.as_ref().map(|(_, doc)| doc)
    }

    pub fn current_page(&self) -> Option<&LoadedPage> {
        self.current.as_ref()
    }

    pub fn sessions(&self) -> &FormSessionStore {
        &self.sessions
    }

    /// Load the configured entry point, along with the configured styling
    /// document if none was set yet.
    pub fn open_entry_point(&mut self) -> Result<&LoadedPage, HydraError> {
        if self.styling.is_none() {
            if let Some(source) = self.config.ui_styling.clone() {
                let document = self.expander.expand(load_document_auto(&source)?)?;
                self.styling = Some(UiStyling::from_expanded(&document)?);
                info!(source = %source, "loaded UI styling");
            }
        }
        let entry_point = self.config.validate()?.to_string();
        self.load_page(&entry_point)
    }

    /// Fetch `iri` and build its page.
    ///
    /// The API documentation is fetched again only when the resource
    /// announces a different one than the cached one. On failure the
    /// previous page stays current together with the API documentation it
    /// was built from.
    pub fn load_page(&mut self, iri: &str) -> Result<&LoadedPage, HydraError> {
        let fetched = self.fetcher.fetch_resource(iri)?;
        let resource = self.expander.expand(fetched.data)?;
        let api_doc_url = match fetched.api_doc_url {
            Some(url) => url,
            None => self.config.default_api_doc_url(iri)?,
        };

        let fetched_doc = match &self.api_doc {
            Some((url, _)) if *url == api_doc_url => None,
            _ => {
                let document = self
                    .expander
                    .expand(self.fetcher.fetch_api_documentation(&api_doc_url)?)?;
                let api_doc = ApiDocumentation::from_expanded(&document)?;
                info!(url = %api_doc_url, "fetched API documentation");
                Some((api_doc_url, api_doc))
            }
        };

        let (_, api_doc) = fetched_doc
            .as_ref()
            .or(self.api_doc.as_ref())
            .ok_or(HydraError::NoPageLoaded)?;
        let mut ctx = NavigationContext::new(api_doc, &self.routes, &mut self.sessions)
            .with_styling(self.styling.as_ref());
        let page = build_page(&resource, &mut ctx)?;
        info!(iri, title = page.title(), "page loaded");

        if fetched_doc.is_some() {
            self.api_doc = fetched_doc;
        }
        self.sessions.clear_current();
        Ok(self.current.insert(LoadedPage {
            iri: node_id(unwrap_singleton(&resource))
                .unwrap_or(iri)
                .to_string(),
            resource,
            page,
        }))
    }

    /// Route the activation of `item` on the current page.
    ///
    /// A PUT form is pre-filled from the current page only when it edits
    /// that page's resource; a link to another resource opens an empty form.
    pub fn activate(&mut self, item: &PageItem, method: &str) -> Result<Navigation, HydraError> {
        let (_, api_doc) = self.api_doc.as_ref().ok_or(HydraError::NoPageLoaded)?;
        let existing = self.current.as_ref().filter(|current| match &item.kind {
            PageItemKind::Link { resource_iri } => *resource_iri == current.iri,
            _ => item.subject.as_deref().map_or(true, |subject| subject == current.iri),
        });
        let mut ctx = NavigationContext::new(api_doc, &self.routes, &mut self.sessions)
            .with_styling(self.styling.as_ref());
        activate(&mut ctx, item, method, existing.map(|current| &current.resource))
    }

    /// Carry out a navigation. Returns the new page, or `None` for a form
    /// navigation, whose form is built with [`HydraBrowser::form`].
    pub fn follow(&mut self, navigation: &Navigation) -> Result<Option<&LoadedPage>, HydraError> {
        match navigation {
            Navigation::Custom { resource_iri, .. }
            | Navigation::Collection { resource_iri }
            | Navigation::Item { resource_iri } => self.load_page(resource_iri).map(Some),
            Navigation::Form { .. } => Ok(None),
        }
    }

    /// Build the form of session `id` and make the session current.
    pub fn form(&mut self, id: &SessionId) -> Result<FormModel, HydraError> {
        let (_, api_doc) = self.api_doc.as_ref().ok_or(HydraError::NoPageLoaded)?;
        build_form_model(&mut self.sessions, id, api_doc)
    }

    /// Fetch the collections behind the form's pending choice lists and fill
    /// them in. A list that cannot be fetched stays empty.
    ///
    /// Returns how many lists were filled.
    pub fn populate_choices(&mut self, model: &mut FormModel) -> usize {
        let mut filled = 0;
        for (property, collection) in model.pending_choices() {
            let members = self
                .fetcher
                .fetch_resource(&collection)
                .and_then(|fetched| self.expander.expand(fetched.data))
                .map(|expanded| values(unwrap_singleton(&expanded), hydra::MEMBER).to_vec());

            match members {
                Ok(members) => {
                    if fill_choices(&self.sessions, model, &property, &members) {
                        filled += 1;
                    }
                }
                Err(e) => {
                    warn!(property = %property, collection = %collection, error = %e, "choice list unavailable");
                    model.abandon_choices(&property);
                }
            }
        }
        filled
    }

    /// Submit a filled-in form.
    ///
    /// A typed response whose class declares a further write operation opens
    /// the session for that operation, reported as `next_form`.
    pub fn submit(&mut self, model: &FormModel) -> Result<SubmitOutcome, HydraError> {
        let session = self
            .sessions
            .get_form_data(&model.session.id)
            .ok_or_else(|| HydraError::UnknownSession {
                id: model.session.id.to_string(),
            })?;
        let request = submit_form(session, &model.fields);

        let response = self
            .fetcher
            .submit(&request)?
            .map(|body| self.expander.expand(body))
            .transpose()?;
        info!(method = %request.method, url = %request.url, "form submitted");

        let next_form = match (&response, &self.api_doc) {
            (Some(response), Some((_, api_doc))) => {
                self.sessions
                    .chain_from_response(api_doc, response, &request.url)?
            }
            _ => None,
        };

        Ok(SubmitOutcome {
            request,
            response,
            next_form,
        })
    }
}
