//! Shared wiring for in-memory integration tests.

use std::sync::{Arc, Mutex, mpsc};

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use scrumflow::notification::{
    adapters::simulated::{ChatChannel, EmailChannel, Outbox},
    services::{ChannelNotificationService, UserObserverRegistry},
};
use scrumflow::pipeline::{ActionKind, ActionSpec, DevelopmentPipeline, PipelineAction, create_action};
use scrumflow::project::{
    adapters::memory::InMemoryProjectRepository, domain::ProjectId, services::ProjectService,
};
use scrumflow::report::services::ReportService;
use scrumflow::sprint::{
    adapters::{
        memory::InMemorySprintRepository,
        runtime::{ReleaseExecutorConfig, TokioReleaseExecutor},
    },
    domain::{SprintDraft, SprintType},
    services::{SprintRepositories, SprintService},
};
use scrumflow::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{ChannelKind, ContactChannels, Role, User},
    ports::UserRepository,
};
use scrumflow::work_item::{
    adapters::memory::InMemoryBacklogItemRepository, services::BacklogItemService,
};

/// Sprint service over in-memory repositories.
pub type Sprints = SprintService<
    InMemorySprintRepository,
    InMemoryBacklogItemRepository,
    InMemoryUserRepository,
    InMemoryProjectRepository,
    DefaultClock,
>;

/// Backlog item service over in-memory repositories.
pub type Items = BacklogItemService<
    InMemoryBacklogItemRepository,
    InMemoryUserRepository,
    InMemoryProjectRepository,
    DefaultClock,
>;

/// Every service wired to the same repositories and outbox.
pub struct World {
    pub users: Arc<InMemoryUserRepository>,
    pub projects: ProjectService<InMemoryProjectRepository, InMemoryUserRepository, DefaultClock>,
    pub items: Items,
    pub sprints: Sprints,
    pub reports: ReportService<InMemorySprintRepository, InMemoryUserRepository>,
    pub registry: Arc<UserObserverRegistry>,
    pub outbox: Outbox,
}

/// The people of one project.
pub struct Team {
    pub project: ProjectId,
    pub scrum_master: User,
    pub product_owner: User,
    pub developer: User,
}

/// Builds a world whose release executor uses `config`.
#[must_use]
pub fn world_with(config: ReleaseExecutorConfig) -> World {
    let outbox = Outbox::new();
    let notifier = ChannelNotificationService::new()
        .with_channel(Arc::new(EmailChannel::new(outbox.clone())))
        .with_channel(Arc::new(ChatChannel::new(outbox.clone())));
    let registry = Arc::new(UserObserverRegistry::new(Arc::new(notifier)));
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryUserRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let items = Arc::new(InMemoryBacklogItemRepository::new());
    let sprints = Arc::new(InMemorySprintRepository::new());

    World {
        projects: ProjectService::new(Arc::clone(&projects), Arc::clone(&users), Arc::clone(&clock)),
        items: BacklogItemService::new(
            Arc::clone(&items),
            Arc::clone(&users),
            Arc::clone(&projects),
            Arc::clone(&registry),
            Arc::clone(&clock),
        ),
        sprints: SprintService::new(
            SprintRepositories {
                sprints: Arc::clone(&sprints),
                items,
                users: Arc::clone(&users),
                projects,
            },
            Arc::clone(&registry),
            Arc::new(TokioReleaseExecutor::new(config)),
            clock,
        ),
        reports: ReportService::new(sprints, Arc::clone(&users)),
        users,
        registry,
        outbox,
    }
}

/// Provides a world without a release timeout.
#[fixture]
pub fn world() -> World {
    world_with(ReleaseExecutorConfig::default())
}

impl World {
    /// Registers a user reachable by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is invalid or cannot be stored.
    pub async fn user(&self, name: &str, role: Role) -> eyre::Result<User> {
        let contacts = ContactChannels::new()
            .with_email(format!("{}@example.com", name.to_lowercase()))?;
        let user = User::new(name, role, contacts)?.with_preference(ChannelKind::Email);
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Registers a Scrum Master, a Product Owner, a developer and their
    /// project.
    ///
    /// # Errors
    ///
    /// Returns an error if any user or the project cannot be created.
    pub async fn team(&self) -> eyre::Result<Team> {
        let scrum_master = self.user("Sam", Role::ScrumMaster).await?;
        let product_owner = self.user("Olga", Role::ProductOwner).await?;
        let developer = self.user("Dana", Role::Developer).await?;
        let project = self
            .projects
            .create_project("Webshop", product_owner.id())
            .await?;
        Ok(Team {
            project: project.id(),
            scrum_master,
            product_owner,
            developer,
        })
    }
}

/// A sprint draft that started yesterday and ends in two weeks.
#[must_use]
pub fn draft(team: &Team, name: &str, sprint_type: SprintType) -> SprintDraft {
    let now = Utc::now();
    SprintDraft {
        name: name.to_owned(),
        sprint_type,
        start: now - Duration::days(1),
        end: now + Duration::days(14),
        project_id: team.project,
        scrum_master: team.scrum_master.id(),
        product_owner: team.product_owner.id(),
    }
}

/// A build-test-deploy pipeline whose test step passes or fails.
///
/// # Errors
///
/// Returns an error if an action cannot be created.
pub fn release_pipeline(tests_pass: bool) -> eyre::Result<DevelopmentPipeline> {
    Ok(DevelopmentPipeline::new("release")?
        .with_action(create_action("build", ActionSpec::build())?)
        .with_action(create_action("tests", ActionSpec::test(!tests_pass))?)
        .with_action(create_action(
            "deploy",
            ActionSpec::deploy("production", "10.0.0.5"),
        )?))
}

/// Action that blocks until the test sends its outcome.
#[derive(Debug)]
pub struct GatedAction {
    gate: Mutex<mpsc::Receiver<bool>>,
}

impl GatedAction {
    /// Creates the action and the sender that releases it.
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::Sender<bool>) {
        let (sender, receiver) = mpsc::channel();
        (
            Arc::new(Self {
                gate: Mutex::new(receiver),
            }),
            sender,
        )
    }
}

impl PipelineAction for GatedAction {
    fn name(&self) -> &str {
        "gated"
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Utility
    }

    fn execute(&self) -> bool {
        self.gate
            .lock()
            .map(|receiver| receiver.recv().unwrap_or(false))
            .unwrap_or(false)
    }
}
