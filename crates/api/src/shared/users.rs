use agenda_domain::ID;
use agenda_infra::AgendaContext;
use itertools::Itertools;

/// Looks up every given id in the user directory with a single query and
/// returns the ids that do not resolve to a `User`, in the order given
pub async fn find_missing_users(ctx: &AgendaContext, user_ids: &[ID]) -> anyhow::Result<Vec<ID>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    let user_ids = user_ids.iter().cloned().unique().collect::<Vec<_>>();
    let found = ctx.repos.users.find_many(&user_ids).await?;

    Ok(user_ids
        .into_iter()
        .filter(|user_id| !found.iter().any(|user| user.id == *user_id))
        .collect())
}

/// "3, 99" for the ids 3 and 99
pub fn format_ids(ids: &[ID]) -> String {
    ids.iter().join(", ")
}
