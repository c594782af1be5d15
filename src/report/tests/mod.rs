//! Unit tests for the report module.


use std::sync::Arc;

use crate::observer::{Observer, ObserverError, ObserverId};
use crate::project::domain::ProjectId;
use crate::sprint::domain::{Sprint, SprintDraft, SprintEvent, SprintType};
use crate::user::domain::UserId;
use crate::work_item::domain::{BacklogItem, SharedBacklogItem};
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;

struct Silent(ObserverId);

impl Observer<SprintEvent> for Silent {
    fn observer_id(&self) -> ObserverId {
        self.0
    }

    fn on_notified(&self, _event: &SprintEvent) -> Result<(), ObserverError> {
        Ok(())
    }
}

fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0)
        .single()
        .expect("valid date")
}

fn sprint(scrum_master: UserId) -> Sprint {
    let product_owner = UserId::new();
    let draft = SprintDraft {
        name: "Sprint 1".to_owned(),
        sprint_type: SprintType::Review,
        start: date(2),
        end: date(16),
        project_id: ProjectId::new(),
        scrum_master,
        product_owner,
    };
    Sprint::new(
        draft,
        Arc::new(Silent(scrum_master.observer_id())),
        Arc::new(Silent(product_owner.observer_id())),
        &DefaultClock,
    )
    .expect("valid sprint")
}

/// "Login page", 5 points, with "Design" done and "Build" open.
fn login_page() -> SharedBacklogItem {
    let clock = DefaultClock;
    let mut item = BacklogItem::new("Login page", "", 5, &clock).expect("valid item");
    let design = item.add_activity("Design", &clock).expect("activity");
    item.add_activity("Build", &clock).expect("activity");
    item.mark_activity_done(design, &clock).expect("mark done");
    SharedBacklogItem::new(item)
}

/// A planned sprint with a team of one and the login page item.
fn planned_sprint(scrum_master: UserId, developer: UserId) -> Sprint {
    let mut planned = sprint(scrum_master);
    planned
        .add_team_member(developer, Arc::new(Silent(developer.observer_id())), &DefaultClock)
        .expect("add member");
    planned
        .add_backlog_item(login_page(), &DefaultClock)
        .expect("add item");
    planned
}
