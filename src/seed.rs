use agenda_api::{create_event, CreateEventInput};
use agenda_domain::{EventCategory, Role, User};
use agenda_infra::AgendaContext;
use chrono::{TimeZone, Utc};
use tracing::info;

const ADMIN_EMAIL: &str = "admin@example.com";
const USER_EMAIL: &str = "john.doe@example.com";

async fn seed_user(
    ctx: &AgendaContext,
    first_name: &str,
    last_name: &str,
    email: &str,
    role: Role,
) -> anyhow::Result<User> {
    if let Some(user) = ctx.repos.users.find_by_email(email).await? {
        return Ok(user);
    }

    let now = ctx.sys.get_timestamp_millis();
    let mut user = User::new(first_name);
    user.last_name = Some(last_name.into());
    user.email = Some(email.into());
    user.role = role;
    user.created = now;
    user.updated = now;
    let user = ctx.repos.users.insert(&user).await?;
    info!("Seeded user: {} with id: {}", email, user.id);
    Ok(user)
}

fn millis(y: i32, m: u32, d: u32, h: u32) -> anyhow::Result<i64> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| anyhow::anyhow!("Invalid seed date: {}-{}-{} {}:00", y, m, d, h))
}

/// Seeds an admin, a regular user and two events owned by the admin.
/// Running it again changes nothing.
pub async fn run(ctx: &AgendaContext) -> anyhow::Result<()> {
    let admin = seed_user(ctx, "Super", "Admin", ADMIN_EMAIL, Role::Admin).await?;
    seed_user(ctx, "John", "Doe", USER_EMAIL, Role::User).await?;

    let existing = ctx.repos.events.find_by_participant(&admin.id).await?;
    if !existing.is_empty() {
        info!("Admin already has events, skipping event seeding");
        return Ok(());
    }

    let events = vec![
        CreateEventInput {
            title: "Launch Event".into(),
            start_ts: millis(2025, 1, 15, 10)?,
            end_ts: millis(2025, 1, 15, 12)?,
            category: EventCategory::Personal,
            description: "Product launch".into(),
            location: "Main Hall".into(),
            ..Default::default()
        },
        CreateEventInput {
            title: "Team Building Retreat".into(),
            start_ts: millis(2025, 2, 1, 9)?,
            end_ts: millis(2025, 2, 3, 17)?,
            category: EventCategory::Project,
            description: "Yearly offsite".into(),
            location: "Mountain Lodge".into(),
            ..Default::default()
        },
    ];
    for input in events {
        let e = create_event(ctx, &admin, input).await?;
        info!("Seeded event: {} with id: {}", e.title, e.id);
    }

    Ok(())
}
