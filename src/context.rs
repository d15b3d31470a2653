//! Per-navigation resolution context.

use crate::api_doc::ApiDocumentation;
use crate::form::FormSessionStore;
use crate::router::RouteTable;
use crate::styling::UiStyling;

/// Everything a page build or routing decision reads or writes.
///
/// Scoped to one navigation session: the API documentation is replaced
/// wholesale on navigation, and the form session store is the only state
/// that resolution mutates.
pub struct NavigationContext<'a> {
    pub api_doc: &'a ApiDocumentation,
    pub styling: Option<&'a UiStyling>,
    pub routes: &'a RouteTable,
    pub sessions: &'a mut FormSessionStore,
}

impl<'a> NavigationContext<'a> {
    pub fn new(
        api_doc: &'a ApiDocumentation,
        routes: &'a RouteTable,
        sessions: &'a mut FormSessionStore,
    ) -> Self {
        Self {
            api_doc,
            styling: None,
            routes,
            sessions,
        }
    }

    pub fn with_styling(mut self, styling: Option<&'a UiStyling>) -> Self {
        self.styling = styling;
        self
    }
}
