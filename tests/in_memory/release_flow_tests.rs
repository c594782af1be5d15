//! Release sprints: pipeline outcomes, retries, cancellation and timeouts.

use std::time::Duration;

use rstest::rstest;
use scrumflow::error::ErrorKind;
use scrumflow::pipeline::DevelopmentPipeline;
use scrumflow::sprint::{
    adapters::runtime::ReleaseExecutorConfig,
    domain::{ReleaseResolution, SprintId, SprintState, SprintType},
};
use scrumflow::work_item::services::CreateBacklogItemRequest;

use super::helpers::{GatedAction, Team, World, draft, release_pipeline, world, world_with};

async fn finished_release_sprint(
    world: &World,
    team: &Team,
    pipeline: Option<DevelopmentPipeline>,
) -> eyre::Result<SprintId> {
    let sprint = world
        .sprints
        .create_sprint(draft(team, "Sprint 2", SprintType::Release))
        .await?;
    let sprint_id = sprint.id();
    let item = world
        .items
        .create(CreateBacklogItemRequest::new("Dark mode").with_story_points(2))
        .await?;
    world.sprints.add_team_member(sprint_id, team.developer.id()).await?;
    world.sprints.add_backlog_item(sprint_id, item.id()).await?;
    if let Some(attached) = pipeline {
        world.sprints.attach_pipeline(sprint_id, attached).await?;
    }
    world.sprints.start(sprint_id).await?;
    world.sprints.finish(sprint_id).await?;
    Ok(sprint_id)
}

async fn state_of(world: &World, sprint_id: SprintId) -> eyre::Result<SprintState> {
    let handle = world.sprints.get(sprint_id).await?;
    Ok(handle.with(|sprint| sprint.state())?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_release_can_be_retried(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let sprint_id = finished_release_sprint(&world, &team, Some(release_pipeline(false)?)).await?;

    let failed = world.sprints.initiate_release(sprint_id).await?.wait().await?;
    world.sprints.attach_pipeline(sprint_id, release_pipeline(true)?).await?;
    let retried = world.sprints.initiate_release(sprint_id).await?.wait().await?;

    eyre::ensure!(
        failed
            == ReleaseResolution::Applied {
                state: SprintState::Finished,
                success: false,
            },
        "unexpected first resolution {failed:?}"
    );
    eyre::ensure!(
        retried
            == ReleaseResolution::Applied {
                state: SprintState::Released,
                success: true,
            },
        "unexpected retry resolution {retried:?}"
    );
    let notes: Vec<_> = world
        .registry
        .follow_ups(team.scrum_master.id())
        .into_iter()
        .map(|follow_up| follow_up.note)
        .collect();
    eyre::ensure!(
        notes
            == vec![
                "Investigate the failed release pipeline of sprint 'Sprint 2'".to_owned(),
                "Close sprint 'Sprint 2' now that it is released".to_owned(),
            ],
        "unexpected scrum master follow-ups {notes:?}"
    );
    eyre::ensure!(world.sprints.close(sprint_id).await?, "released sprint closes");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_release_discards_the_late_result(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let (action, gate) = GatedAction::new();
    let gated = DevelopmentPipeline::new("gated")?.with_action(action);
    let sprint_id = finished_release_sprint(&world, &team, Some(gated)).await?;

    let job = world.sprints.initiate_release(sprint_id).await?;
    let releasing = state_of(&world, sprint_id).await?;
    let cancelled = world.sprints.cancel_release(sprint_id).await?;
    gate.send(true)?;
    let resolution = job.wait().await?;

    eyre::ensure!(releasing == SprintState::Releasing, "release should be running");
    eyre::ensure!(cancelled.to == SprintState::Cancelled, "cancel installs cancelled");
    eyre::ensure!(
        resolution
            == ReleaseResolution::Discarded {
                current_state: SprintState::Cancelled,
            },
        "late success must not resurrect the release, got {resolution:?}"
    );
    eyre::ensure!(
        state_of(&world, sprint_id).await? == SprintState::Cancelled,
        "sprint stays cancelled"
    );
    let owner_messages = world.outbox.messages_for(team.product_owner.id());
    for expected in [
        "Release of sprint 'Sprint 2' did not complete",
        "Release for sprint 'Sprint 2' was cancelled",
    ] {
        eyre::ensure!(
            owner_messages.iter().any(|message| message == expected),
            "missing {expected:?} in {owner_messages:?}"
        );
    }
    eyre::ensure!(
        world
            .registry
            .follow_ups(team.product_owner.id())
            .iter()
            .any(|follow_up| follow_up.note.starts_with("Decide how to continue")),
        "product owner decides after a cancellation"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stalled_pipeline_times_out_as_failure() -> eyre::Result<()> {
    let world = world_with(ReleaseExecutorConfig::default().with_timeout(Duration::from_millis(50)));
    let team = world.team().await?;
    let (action, gate) = GatedAction::new();
    let stalled = DevelopmentPipeline::new("stalled")?.with_action(action);
    let sprint_id = finished_release_sprint(&world, &team, Some(stalled)).await?;

    let resolution = world.sprints.initiate_release(sprint_id).await?.wait().await?;
    drop(gate);

    eyre::ensure!(
        resolution
            == ReleaseResolution::Applied {
                state: SprintState::Finished,
                success: false,
            },
        "timeout should count as a failed run, got {resolution:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_requires_a_pipeline(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let sprint_id = finished_release_sprint(&world, &team, None).await?;

    let result = world.sprints.initiate_release(sprint_id).await;

    let Err(err) = result else {
        eyre::bail!("release without a pipeline should be refused");
    };
    eyre::ensure!(err.kind() == ErrorKind::PreconditionNotMet, "unexpected {err:?}");
    eyre::ensure!(
        state_of(&world, sprint_id).await? == SprintState::Finished,
        "sprint stays finished"
    );
    Ok(())
}
