//! Service orchestration tests for sprints.

use std::sync::Arc;

use crate::error::ErrorKind;
use crate::notification::{
    adapters::simulated::{EmailChannel, Outbox},
    services::{ChannelNotificationService, UserObserverRegistry},
};
use crate::pipeline::{ActionSpec, DevelopmentPipeline, create_action};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectId},
    ports::ProjectRepository,
};
use crate::sprint::{
    adapters::{memory::InMemorySprintRepository, runtime::TokioReleaseExecutor},
    domain::{ReleaseResolution, SprintDraft, SprintId, SprintState, SprintType},
    services::{SprintRepositories, SprintService, SprintServiceError},
};
use crate::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{ChannelKind, ContactChannels, Role, User},
    ports::UserRepository,
};
use crate::work_item::{
    adapters::memory::InMemoryBacklogItemRepository, domain::BacklogItem,
    ports::BacklogItemRepository,
};
use chrono::{Duration, Utc};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = SprintService<
    InMemorySprintRepository,
    InMemoryBacklogItemRepository,
    InMemoryUserRepository,
    InMemoryProjectRepository,
    DefaultClock,
>;

struct Harness {
    service: TestService,
    users: Arc<InMemoryUserRepository>,
    items: Arc<InMemoryBacklogItemRepository>,
    projects: Arc<InMemoryProjectRepository>,
    registry: Arc<UserObserverRegistry>,
    outbox: Outbox,
}

struct Team {
    project: ProjectId,
    scrum_master: User,
    product_owner: User,
    developer: User,
}

impl Harness {
    async fn user(&self, name: &str, role: Role) -> eyre::Result<User> {
        let contacts = ContactChannels::new().with_email(format!("{name}@example.com"))?;
        let user = User::new(name, role, contacts)?.with_preference(ChannelKind::Email);
        self.users.store(&user).await?;
        Ok(user)
    }

    async fn team(&self) -> eyre::Result<Team> {
        let scrum_master = self.user("sam", Role::ScrumMaster).await?;
        let product_owner = self.user("olga", Role::ProductOwner).await?;
        let developer = self.user("dana", Role::Developer).await?;
        let project = Project::new("Shop", product_owner.id(), &DefaultClock)?;
        self.projects.store(&project).await?;
        Ok(Team {
            project: project.id(),
            scrum_master,
            product_owner,
            developer,
        })
    }

    fn draft(team: &Team, sprint_type: SprintType) -> SprintDraft {
        let now = Utc::now();
        SprintDraft {
            name: "Sprint 1".to_owned(),
            sprint_type,
            start: now - Duration::days(1),
            end: now + Duration::days(14),
            project_id: team.project,
            scrum_master: team.scrum_master.id(),
            product_owner: team.product_owner.id(),
        }
    }

    /// Creates a sprint, staffs it, fills its backlog, runs and finishes it.
    async fn finished_sprint(
        &self,
        team: &Team,
        sprint_type: SprintType,
        pipeline_succeeds: bool,
    ) -> eyre::Result<SprintId> {
        let handle = self
            .service
            .create_sprint(Self::draft(team, sprint_type))
            .await?;
        let sprint_id = handle.id();
        let item = self
            .items
            .store(BacklogItem::new("Checkout", "", 3, &DefaultClock)?)
            .await?;
        self.service
            .add_team_member(sprint_id, team.developer.id())
            .await?;
        self.service.add_backlog_item(sprint_id, item.id()).await?;
        let pipeline = DevelopmentPipeline::new("release")?
            .with_action(create_action("build", ActionSpec::build())?)
            .with_action(create_action("tests", ActionSpec::test(!pipeline_succeeds))?);
        self.service.attach_pipeline(sprint_id, pipeline).await?;
        self.service.start(sprint_id).await?;
        self.service.finish(sprint_id).await?;
        Ok(sprint_id)
    }
}

#[fixture]
fn harness() -> Harness {
    let outbox = Outbox::new();
    let notifier = ChannelNotificationService::new()
        .with_channel(Arc::new(EmailChannel::new(outbox.clone())));
    let registry = Arc::new(UserObserverRegistry::new(Arc::new(notifier)));
    let users = Arc::new(InMemoryUserRepository::new());
    let items = Arc::new(InMemoryBacklogItemRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let service = SprintService::new(
        SprintRepositories {
            sprints: Arc::new(InMemorySprintRepository::new()),
            items: items.clone(),
            users: users.clone(),
            projects: projects.clone(),
        },
        registry.clone(),
        Arc::new(TokioReleaseExecutor::default()),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        users,
        items,
        projects,
        registry,
        outbox,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_sprint_registers_with_project_and_notifies(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;

    let handle = harness
        .service
        .create_sprint(Harness::draft(&team, SprintType::Review))
        .await?;

    let Some(project) = harness.projects.find_by_id(team.project).await? else {
        bail!("project should exist");
    };
    ensure!(project.sprints() == [handle.id()]);
    let listed = harness.service.list_for_project(team.project).await?;
    ensure!(listed.len() == 1);
    for stakeholder in [&team.scrum_master, &team.product_owner] {
        let messages = harness.outbox.messages_for(stakeholder.id());
        ensure!(
            messages == ["New sprint 'Sprint 1' created".to_owned()],
            "{} got {messages:?}",
            stakeholder.name()
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_sprint_rejects_inverted_dates(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;
    let mut draft = Harness::draft(&team, SprintType::Review);
    draft.end = draft.start;

    let Err(err) = harness.service.create_sprint(draft).await else {
        bail!("inverted dates should be rejected");
    };

    ensure!(err.kind() == ErrorKind::Validation);
    ensure!(harness.service.list().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_sprint_checks_stakeholder_roles(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;
    let mut wrong_master = Harness::draft(&team, SprintType::Review);
    wrong_master.scrum_master = team.developer.id();
    let outsider = harness.user("otto", Role::ProductOwner).await?;
    let mut wrong_owner = Harness::draft(&team, SprintType::Review);
    wrong_owner.product_owner = outsider.id();

    let master_result = harness.service.create_sprint(wrong_master).await;
    let owner_result = harness.service.create_sprint(wrong_owner).await;

    ensure!(matches!(
        master_result,
        Err(SprintServiceError::RoleMismatch {
            expected: Role::ScrumMaster,
            actual: Role::Developer,
            ..
        })
    ));
    ensure!(matches!(
        owner_result,
        Err(SprintServiceError::NotProjectOwner { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_developers_join_the_team(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;
    let handle = harness
        .service
        .create_sprint(Harness::draft(&team, SprintType::Review))
        .await?;

    let result = harness
        .service
        .add_team_member(handle.id(), team.product_owner.id())
        .await;

    ensure!(matches!(result, Err(SprintServiceError::RoleMismatch { .. })));
    ensure!(harness.service.add_team_member(handle.id(), team.developer.id()).await?);
    ensure!(!harness.service.add_team_member(handle.id(), team.developer.id()).await?);
    ensure!(harness.service.remove_team_member(handle.id(), team.developer.id()).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_release_notifies_stakeholders(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;
    let sprint_id = harness.finished_sprint(&team, SprintType::Release, true).await?;

    let job = harness.service.initiate_release(sprint_id).await?;
    let resolution = job.wait().await?;

    ensure!(resolution == ReleaseResolution::Applied {
        state: SprintState::Released,
        success: true,
    });
    let owner_messages = harness.outbox.messages_for(team.product_owner.id());
    ensure!(owner_messages.contains(&"Sprint 'Sprint 1' was released successfully".to_owned()));
    ensure!(owner_messages.contains(&"Sprint 'Sprint 1' successfully released".to_owned()));
    let follow_ups = harness.registry.follow_ups(team.scrum_master.id());
    ensure!(follow_ups.iter().any(|follow_up| follow_up.note.contains("now that it is released")));

    ensure!(harness.service.close(sprint_id).await?);
    ensure!(!harness.service.close(sprint_id).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_release_returns_to_finished(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;
    let sprint_id = harness.finished_sprint(&team, SprintType::Release, false).await?;

    let resolution = harness.service.initiate_release(sprint_id).await?.wait().await?;

    ensure!(resolution == ReleaseResolution::Applied {
        state: SprintState::Finished,
        success: false,
    });
    let master_messages = harness.outbox.messages_for(team.scrum_master.id());
    ensure!(master_messages.contains(&"Release of sprint 'Sprint 1' did not complete".to_owned()));
    let handle = harness.service.get(sprint_id).await?;
    ensure!(handle.with(|sprint| sprint.state())? == SprintState::Finished);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_sprint_cannot_be_released(harness: Harness) -> eyre::Result<()> {
    let team = harness.team().await?;
    let sprint_id = harness.finished_sprint(&team, SprintType::Review, true).await?;

    let release = harness.service.initiate_release(sprint_id).await;
    let reviewed = harness.service.review(sprint_id, "reviews/sprint-1.md").await?;

    ensure!(matches!(release.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::InvalidState)));
    ensure!(reviewed.to == SprintState::Reviewed);
    ensure!(harness.service.close(sprint_id).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_sprint_is_not_found(harness: Harness) {
    let missing = SprintId::new();

    let result = harness.service.start(missing).await;

    assert!(matches!(result, Err(SprintServiceError::SprintNotFound(id)) if id == missing));
}
