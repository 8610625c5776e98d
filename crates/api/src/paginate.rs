//! Cursor pagination over list queries.

use fsupload_protocol::GraphQlRequest;
use serde_json::Value;
use tracing::debug;

use crate::client::GraphQlTransport;
use crate::error::ApiError;

/// Fetches every page of a list query and concatenates the records.
///
/// The cursor for the next page is the `_cursor` of the last record, fed back
/// as `variables.after`. Pagination stops on an empty page, a missing or empty
/// cursor, or once `limit` records have been collected. The first page is
/// always fetched; the limit is checked before each later fetch, so the result
/// may exceed it by up to one page.
///
/// A response without `data` yields no records. A response with `data` but
/// without `result_field` is a protocol error.
pub async fn collect_all(
    transport: &dyn GraphQlTransport,
    mut request: GraphQlRequest,
    result_field: &str,
    limit: Option<usize>,
) -> Result<Vec<Value>, ApiError> {
    if result_field.is_empty() {
        return Err(ApiError::Config("result field is required".into()));
    }
    if !request.variables.is_object() {
        return Err(ApiError::Config(
            "paginated query variables must be an object".into(),
        ));
    }

    let mut records = Vec::new();
    let mut page = 0usize;

    loop {
        page += 1;
        let response = transport.send(request.clone()).await?;
        let Some(data) = response.data() else {
            debug!(result_field, page, "page carried no data");
            break;
        };

        let items = match data.get(result_field) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => break,
            Some(_) => {
                return Err(ApiError::Protocol(format!(
                    "{result_field} is not a list"
                )));
            }
            None => {
                return Err(ApiError::Protocol(format!(
                    "{result_field} not in response"
                )));
            }
        };

        let cursor = items
            .last()
            .and_then(|item| item.get("_cursor"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        records.extend(items.iter().cloned());
        debug!(result_field, page, count = items.len(), "fetched page");

        let Some(cursor) = cursor else {
            break;
        };
        if limit.is_some_and(|max| records.len() >= max) {
            debug!(result_field, collected = records.len(), "pagination limit reached");
            break;
        }
        request.variables["after"] = Value::String(cursor);
    }

    Ok(records)
}
