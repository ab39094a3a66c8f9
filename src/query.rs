//! Query flow: JSON request body → validated search term → table lookup.

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::event::{Event, Response};
use crate::store::RecordStore;

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    search: Option<String>,
}

/// True when `term` is one or more ASCII letters, digits, or underscores.
/// Anything else, including the empty string, fails the check.
fn is_safe_term(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Runs the query flow for a direct request.
///
/// A missing `body` or an unsafe search term answers 400; a term that
/// survives validation is looked up exactly, answering 200 with the secret
/// or JSON null. Store failures are fatal.
#[tracing::instrument(skip_all)]
pub async fn run(event: &Event, store: &dyn RecordStore) -> Result<Response> {
    let Some(body) = event.body.as_deref() else {
        return Ok(Response::bad_request("Invalid search query"));
    };

    let is_raw = event.is_raw.unwrap_or(false);

    // Malformed JSON and a missing search field are distinct conditions
    // worth logging, but both surface as the same 400 below.
    let search = match serde_json::from_str::<SearchBody>(body) {
        Ok(SearchBody { search: Some(s) }) => Some(s),
        Ok(SearchBody { search: None }) => {
            debug!("Request body has no search field");
            None
        }
        Err(e) => {
            warn!(error = %e, "Request body is not valid JSON");
            None
        }
    };

    if let Some(term) = search.as_deref() {
        if !is_raw && !is_safe_term(term) {
            debug!("Search term failed the safe-character check");
            return Ok(Response::bad_request("Invalid search query"));
        }
    }

    let Some(term) = search.filter(|s| !s.is_empty()) else {
        return Ok(Response::bad_request("No search query provided"));
    };

    let secret = store.find_secret(&term).await?;
    debug!(found = secret.is_some(), "Lookup complete");

    Ok(Response::ok(secret.map_or(Value::Null, Value::String)))
}
