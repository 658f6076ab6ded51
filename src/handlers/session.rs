use axum::extract::State;
use axum::response::Response;
use std::collections::HashSet;

use crate::auth::AuthorizedUser;
use crate::registry::AppRegistry;
use crate::session::{Identity, SessionSnapshot};
use crate::utils::error::AppResult;
use crate::utils::response::success;

/// One immutable snapshot of the caller's session: identity, the current
/// event list, and the reconciled attending-set. An unauthenticated request
/// gets a signed-out snapshot with an empty set.
pub async fn get_session(
    user: Option<AuthorizedUser>,
    State(registry): State<AppRegistry>,
) -> AppResult<Response> {
    let identity = match user {
        Some(AuthorizedUser(user)) => Identity::SignedIn(user),
        None => Identity::SignedOut,
    };

    let events = registry.event_store().list(None).await?;
    let snapshot = SessionSnapshot::reconciled(
        identity,
        events,
        &HashSet::new(),
        registry.attendance_store(),
    )
    .await;

    Ok(success(snapshot, "Session snapshot"))
}
