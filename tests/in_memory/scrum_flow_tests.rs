//! A backlog item and a review sprint driven end to end through the
//! services.

use rstest::rstest;
use scrumflow::error::ErrorKind;
use scrumflow::report::domain::{ReportFormat, ReportOptions};
use scrumflow::sprint::domain::{SprintState, SprintType};
use scrumflow::user::domain::Role;
use scrumflow::work_item::{domain::BacklogItemState, services::CreateBacklogItemRequest};

use super::helpers::{World, draft, world};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn item_travels_from_todo_to_done(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let item = world
        .items
        .create(CreateBacklogItemRequest::new("Checkout").with_story_points(8))
        .await?;
    let item_id = item.id();
    eyre::ensure!(
        world.items.add_to_project_backlog(team.project, item_id).await?,
        "item joins the product backlog"
    );
    let activity = world.items.add_activity(item_id, "Payment form").await?;
    world.items.assign_developer(item_id, team.developer.id()).await?;
    world.items.watch(item_id, team.scrum_master.id()).await?;

    world.items.start_task(item_id).await?;
    world.items.mark_ready_for_testing(item_id).await?;
    world.items.start_testing(item_id).await?;
    world.items.send_test_result(item_id, true).await?;
    let blocked = world.items.complete_task(item_id).await;
    world.items.mark_activity_done(item_id, activity).await?;
    let completed = world.items.complete_task(item_id).await?;

    let Err(err) = blocked else {
        eyre::bail!("completion should wait for open activities");
    };
    eyre::ensure!(err.kind() == ErrorKind::PreconditionNotMet, "unexpected {err:?}");
    eyre::ensure!(completed.state() == BacklogItemState::Done, "item should be done");
    eyre::ensure!(item.lock()?.is_done(), "composite completion holds");

    let developer_messages = world.outbox.messages_for(team.developer.id());
    eyre::ensure!(
        developer_messages.first().map(String::as_str)
            == Some("You have been assigned to backlog item 'Checkout'"),
        "unexpected first message {developer_messages:?}"
    );
    eyre::ensure!(
        developer_messages.last().map(String::as_str)
            == Some("Backlog item 'Checkout' moved from tested to done"),
        "unexpected last message {developer_messages:?}"
    );
    eyre::ensure!(
        world.outbox.messages_for(team.scrum_master.id()).len() == 5,
        "the watching scrum master hears all five transitions"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_item_reaches_the_scrum_master(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let item = world.items.create(CreateBacklogItemRequest::new("Search")).await?;
    world.items.assign_developer(item.id(), team.developer.id()).await?;
    world.items.watch(item.id(), team.scrum_master.id()).await?;

    world.items.start_task(item.id()).await?;
    world.items.mark_ready_for_testing(item.id()).await?;
    world.items.start_testing(item.id()).await?;
    let rejected = world.items.send_test_result(item.id(), false).await?;

    eyre::ensure!(rejected.state() == BacklogItemState::Todo, "failed test returns to todo");
    let follow_ups = world.registry.follow_ups(team.scrum_master.id());
    eyre::ensure!(
        follow_ups
            .iter()
            .any(|follow_up| follow_up.note == "Discuss the rejected backlog item 'Search' with its developer"),
        "unexpected follow-ups {follow_ups:?}"
    );
    eyre::ensure!(
        world.registry.follow_ups(team.developer.id()).is_empty(),
        "developers get messages only"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn discussion_reaches_earlier_participants(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let tester = world.user("Tess", Role::Developer).await?;
    let item = world.items.create(CreateBacklogItemRequest::new("Invoices")).await?;
    world.items.assign_developer(item.id(), team.developer.id()).await?;

    world
        .items
        .post_discussion_message(item.id(), tester.id(), "Which VAT rates apply?")
        .await?;
    world
        .items
        .post_discussion_message(item.id(), team.developer.id(), "Only the standard rate")
        .await?;

    eyre::ensure!(
        world.outbox.messages_for(tester.id())
            == vec!["Dana posted on 'Invoices': Only the standard rate".to_owned()],
        "tester should hear the reply"
    );
    eyre::ensure!(
        world
            .outbox
            .messages_for(team.developer.id())
            .contains(&"Tess posted on 'Invoices': Which VAT rates apply?".to_owned()),
        "assigned developer should hear the question"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_sprint_runs_to_closure_and_reports(world: World) -> eyre::Result<()> {
    let team = world.team().await?;
    let sprint = world
        .sprints
        .create_sprint(draft(&team, "Sprint 1", SprintType::Review))
        .await?;
    let sprint_id = sprint.id();
    let item = world
        .items
        .create(CreateBacklogItemRequest::new("Checkout").with_story_points(3))
        .await?;
    world.sprints.add_team_member(sprint_id, team.developer.id()).await?;
    world.sprints.add_backlog_item(sprint_id, item.id()).await?;

    world.sprints.start(sprint_id).await?;
    let late_member = world.sprints.add_team_member(sprint_id, team.developer.id()).await;
    world.sprints.finish(sprint_id).await?;
    world.sprints.review(sprint_id, "reviews/sprint-1.md").await?;
    let report = world
        .reports
        .generate(
            sprint_id,
            ReportFormat::Markdown,
            &ReportOptions::new().with_header("Webshop"),
        )
        .await?;
    let closed = world.sprints.close(sprint_id).await?;

    let Err(err) = late_member else {
        eyre::bail!("the team is frozen while running");
    };
    eyre::ensure!(err.kind() == ErrorKind::InvalidState, "unexpected {err:?}");
    eyre::ensure!(closed, "first close succeeds");
    eyre::ensure!(sprint.lock()?.state() == SprintState::Reviewed, "reviewed sprint stays reviewed");
    eyre::ensure!(sprint.lock()?.closed_at().is_some(), "close is recorded");
    eyre::ensure!(report.contains("| Scrum Master | Sam |"), "unexpected report:\n{report}");
    eyre::ensure!(report.contains("| Team | Dana |"), "unexpected report:\n{report}");
    eyre::ensure!(
        report.contains("| Review summary | reviews/sprint-1.md |"),
        "unexpected report:\n{report}"
    );
    eyre::ensure!(
        world
            .outbox
            .messages_for(team.product_owner.id())
            .contains(&"Sprint 'Sprint 1' has been reviewed. Summary: reviews/sprint-1.md".to_owned()),
        "product owner hears about the review"
    );
    Ok(())
}
