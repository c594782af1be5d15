//! Tests for the backlog item aggregate: guards, events and discussions.

use std::sync::{Arc, Mutex};

use crate::error::ErrorKind;
use crate::observer::{Observer, ObserverError, ObserverId};
use crate::user::domain::UserId;
use crate::work_item::domain::{
    ALL_ITEM_STATES, BacklogItem, BacklogItemAction, BacklogItemDomainError, BacklogItemEvent,
    BacklogItemEventKind, BacklogItemState, ItemPrecondition, ItemTransition, WorkItem,
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[derive(Default)]
struct RecordingObserver {
    id: ObserverId,
    events: Mutex<Vec<BacklogItemEvent>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<BacklogItemEvent> {
        self.events.lock().expect("recording lock").clone()
    }
}

impl Observer<BacklogItemEvent> for RecordingObserver {
    fn observer_id(&self) -> ObserverId {
        self.id
    }

    fn on_notified(&self, event: &BacklogItemEvent) -> Result<(), ObserverError> {
        self.events.lock().expect("recording lock").push(event.clone());
        Ok(())
    }
}

struct FailingObserver;

impl Observer<BacklogItemEvent> for FailingObserver {
    fn observer_id(&self) -> ObserverId {
        ObserverId::from_uuid(uuid::Uuid::nil())
    }

    fn on_notified(&self, _event: &BacklogItemEvent) -> Result<(), ObserverError> {
        Err(ObserverError::new(self.observer_id(), "mailbox full"))
    }
}

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn item(clock: DefaultClock) -> BacklogItem {
    BacklogItem::new("Login page", "Users can sign in", 5, &clock).expect("valid item")
}

fn drive_to(item: &mut BacklogItem, target: BacklogItemState) -> Result<(), BacklogItemDomainError> {
    let clock = DefaultClock;
    let path = [
        (BacklogItemState::Doing, BacklogItemAction::StartTask),
        (BacklogItemState::ReadyForTesting, BacklogItemAction::MarkReadyForTesting),
        (BacklogItemState::Testing, BacklogItemAction::StartTesting),
        (BacklogItemState::Tested, BacklogItemAction::PassTest),
        (BacklogItemState::Done, BacklogItemAction::CompleteTask),
    ];
    if item.assigned_developer().is_none() {
        item.assign_developer(Some(UserId::new()), &clock);
    }
    for (reached, action) in path {
        if item.state() == target {
            break;
        }
        item.apply(action, &clock)?;
        if reached == target {
            break;
        }
    }
    Ok(())
}

#[rstest]
fn new_item_starts_in_todo(item: BacklogItem) {
    assert_eq!(item.state(), BacklogItemState::Todo);
    assert_eq!(item.title(), "Login page");
    assert_eq!(item.story_points(), 5);
    assert!(item.assigned_developer().is_none());
    assert!(item.activities().is_empty());
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_title_is_rejected(#[case] title: &str, clock: DefaultClock) {
    let result = BacklogItem::new(title, "", 1, &clock);
    assert_eq!(result.err(), Some(BacklogItemDomainError::EmptyTitle));
}

#[rstest]
fn start_task_requires_a_developer(mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    let Err(err) = item.start_task(&clock) else {
        bail!("start without developer should fail");
    };

    ensure!(err.kind() == ErrorKind::PreconditionNotMet);
    ensure!(matches!(
        err,
        BacklogItemDomainError::PreconditionNotMet {
            reason: ItemPrecondition::NoDeveloperAssigned,
            ..
        }
    ));
    ensure!(err.to_string().contains("No developer assigned"));
    ensure!(item.state() == BacklogItemState::Todo);
    Ok(())
}

#[rstest]
fn happy_path_reaches_done(mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    item.assign_developer(Some(UserId::new()), &clock);

    ensure!(item.start_task(&clock)? == ItemTransition::Moved {
        from: BacklogItemState::Todo,
        to: BacklogItemState::Doing,
    });
    item.mark_ready_for_testing(&clock)?;
    item.start_testing(&clock)?;
    item.send_test_result(true, &clock)?;
    let last = item.complete_task(&clock)?;

    ensure!(last.state() == BacklogItemState::Done);
    ensure!(item.is_done());
    Ok(())
}

#[rstest]
fn complete_task_requires_finished_activities(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let activity = item.add_activity("Write form", &clock)?;
    drive_to(&mut item, BacklogItemState::Tested)?;

    let Err(err) = item.complete_task(&clock) else {
        bail!("completion with open activities should fail");
    };
    ensure!(matches!(
        err,
        BacklogItemDomainError::PreconditionNotMet {
            reason: ItemPrecondition::ActivitiesIncomplete,
            ..
        }
    ));

    item.mark_activity_done(activity, &clock)?;
    item.complete_task(&clock)?;
    ensure!(item.state() == BacklogItemState::Done);
    Ok(())
}

#[rstest]
fn illegal_action_reports_invalid_state(mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    let Err(err) = item.complete_task(&clock) else {
        bail!("completing a todo item should fail");
    };

    ensure!(err.kind() == ErrorKind::InvalidState);
    ensure!(matches!(
        err,
        BacklogItemDomainError::InvalidState {
            action: BacklogItemAction::CompleteTask,
            state: BacklogItemState::Todo,
            ..
        }
    ));
    Ok(())
}

const ALL_ACTIONS: [BacklogItemAction; 7] = [
    BacklogItemAction::StartTask,
    BacklogItemAction::MarkReadyForTesting,
    BacklogItemAction::StartTesting,
    BacklogItemAction::PassTest,
    BacklogItemAction::FailTest,
    BacklogItemAction::CompleteTask,
    BacklogItemAction::ReopenTask,
];

fn is_legal(state: BacklogItemState, action: BacklogItemAction) -> bool {
    use BacklogItemAction as Action;
    use BacklogItemState as State;
    matches!(
        (state, action),
        (_, Action::ReopenTask)
            | (State::Todo, Action::StartTask)
            | (State::Doing, Action::MarkReadyForTesting)
            | (State::ReadyForTesting, Action::MarkReadyForTesting | Action::StartTesting)
            | (State::Testing, Action::StartTesting | Action::PassTest | Action::FailTest)
            | (State::Tested, Action::CompleteTask)
    )
}

#[rstest]
fn every_illegal_action_leaves_the_item_unchanged(clock: DefaultClock) -> eyre::Result<()> {
    let mut checked = 0;
    for state in ALL_ITEM_STATES {
        for action in ALL_ACTIONS {
            if is_legal(state, action) {
                continue;
            }
            let mut item = BacklogItem::new("Login page", "", 5, &clock)?;
            drive_to(&mut item, state)?;
            ensure!(item.state() == state, "could not reach {state}");
            let observer = Arc::new(RecordingObserver::default());
            item.attach_observer(observer.clone());

            let Err(err) = item.apply(action, &clock) else {
                bail!("{action:?} should be refused in {state}");
            };

            ensure!(err.kind() == ErrorKind::InvalidState, "{action:?} in {state}: {err}");
            ensure!(matches!(
                err,
                BacklogItemDomainError::InvalidState { action: a, state: s, .. } if a == action && s == state
            ));
            ensure!(item.state() == state, "{action:?} changed {state}");
            ensure!(observer.events().is_empty(), "{action:?} in {state} notified observers");
            checked += 1;
        }
    }
    ensure!(checked == 28, "expected 28 illegal cells, checked {checked}");
    Ok(())
}

#[rstest]
fn failed_test_sends_item_back_to_todo(mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    let observer = Arc::new(RecordingObserver::default());
    item.attach_observer(observer.clone());
    drive_to(&mut item, BacklogItemState::Testing)?;

    item.send_test_result(false, &clock)?;

    ensure!(item.state() == BacklogItemState::Todo);
    let events = observer.events();
    let Some(last) = events.last() else {
        bail!("rejection should be broadcast");
    };
    ensure!(last.kind == BacklogItemEventKind::TestRejected);
    ensure!(last.message().contains("rejected by the tester"));
    Ok(())
}

#[rstest]
fn idempotent_actions_leave_state_and_observers_alone(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let observer = Arc::new(RecordingObserver::default());
    item.attach_observer(observer.clone());

    let reopened = item.reopen_task(&clock)?;
    drive_to(&mut item, BacklogItemState::ReadyForTesting)?;
    let before = observer.events().len();
    let ready_again = item.mark_ready_for_testing(&clock)?;

    ensure!(reopened == ItemTransition::Unchanged(BacklogItemState::Todo));
    ensure!(!ready_again.is_change());
    ensure!(observer.events().len() == before);
    Ok(())
}

#[rstest]
fn every_state_change_is_broadcast_in_order(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let observer = Arc::new(RecordingObserver::default());
    item.attach_observer(observer.clone());

    drive_to(&mut item, BacklogItemState::Done)?;
    item.reopen_task(&clock)?;

    let kinds: Vec<_> = observer.events().iter().map(|event| event.kind).collect();
    ensure!(
        kinds
            == [
                BacklogItemEventKind::StateChanged,
                BacklogItemEventKind::StateChanged,
                BacklogItemEventKind::StateChanged,
                BacklogItemEventKind::TestPassed,
                BacklogItemEventKind::StateChanged,
                BacklogItemEventKind::Reopened,
            ]
    );
    ensure!(observer.events().iter().all(|event| event.item_id == item.id()));
    Ok(())
}

#[rstest]
fn failing_observer_does_not_block_transition(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let recorder = Arc::new(RecordingObserver::default());
    item.attach_observer(Arc::new(FailingObserver));
    item.attach_observer(recorder.clone());
    item.assign_developer(Some(UserId::new()), &clock);

    item.start_task(&clock)?;

    ensure!(item.state() == BacklogItemState::Doing);
    ensure!(recorder.events().len() == 1);
    Ok(())
}

#[rstest]
fn observers_attach_once_and_detach_cleanly(mut item: BacklogItem) {
    let observer = Arc::new(RecordingObserver::default());

    assert!(item.attach_observer(observer.clone()));
    assert!(!item.attach_observer(observer.clone()));
    assert_eq!(item.observer_ids(), vec![observer.id]);
    assert!(item.detach_observer(observer.id));
    assert!(!item.detach_observer(observer.id));
    assert!(item.observer_ids().is_empty());
}

#[rstest]
fn done_state_with_open_activity_is_not_done(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    drive_to(&mut item, BacklogItemState::Done)?;
    ensure!(item.is_done());

    item.add_activity("Late follow-up", &clock)?;

    ensure!(item.state() == BacklogItemState::Done);
    ensure!(!item.is_done());
    Ok(())
}

#[rstest]
fn activities_can_be_assigned_and_removed(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let developer = UserId::new();
    let first = item.add_activity("Design", &clock)?;
    let second = item.add_activity("Build", &clock)?;

    item.assign_activity(first, Some(developer), &clock)?;
    let removed = item.remove_activity(second, &clock)?;

    ensure!(removed.description() == "Build");
    ensure!(item.activities().len() == 1);
    ensure!(item
        .activities()
        .first()
        .and_then(|activity| activity.assigned_developer())
        == Some(developer));
    ensure!(matches!(
        item.remove_activity(second, &clock),
        Err(BacklogItemDomainError::ActivityNotFound { .. })
    ));
    ensure!(item.add_activity("  ", &clock) == Err(BacklogItemDomainError::EmptyActivityDescription));
    Ok(())
}

#[rstest]
fn discussion_recipients_exclude_the_author(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let developer = UserId::new();
    let tester = UserId::new();
    let owner = UserId::new();
    item.assign_developer(Some(developer), &clock);
    let thread = item.start_discussion("Edge cases", &clock)?;

    let first = item.post_message(thread, tester, "What about empty passwords?", &clock)?;
    let second = item.post_message(thread, owner, "Reject them", &clock)?;
    let third = item.post_message(thread, developer, "Done", &clock)?;

    ensure!(first == vec![developer]);
    ensure!(second == vec![tester, developer]);
    ensure!(third == vec![tester, owner]);
    let Some(discussion) = item.discussions().first() else {
        bail!("thread should exist");
    };
    ensure!(discussion.messages().len() == 3);
    ensure!(discussion.participants() == vec![tester, owner, developer]);
    Ok(())
}

#[rstest]
fn discussions_are_frozen_once_done(mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    let thread = item.start_discussion("Scope", &clock)?;
    drive_to(&mut item, BacklogItemState::Done)?;

    let post = item.post_message(thread, UserId::new(), "Too late", &clock);
    let open = item.start_discussion("Another", &clock);

    ensure!(post == Err(BacklogItemDomainError::CompletedItemImmutable(item.id())));
    ensure!(matches!(open, Err(BacklogItemDomainError::CompletedItemImmutable(_))));

    item.reopen_task(&clock)?;
    item.post_message(thread, UserId::new(), "Reopened, so fine", &clock)?;
    Ok(())
}

#[rstest]
#[case("")]
#[case("\t")]
fn blank_messages_are_rejected(#[case] content: &str, mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    let thread = item.start_discussion("Scope", &clock)?;

    let result = item.post_message(thread, UserId::new(), content, &clock);

    ensure!(result == Err(BacklogItemDomainError::EmptyMessage));
    Ok(())
}

#[rstest]
fn render_outlines_item_and_activities(mut item: BacklogItem, clock: DefaultClock) -> eyre::Result<()> {
    let design = item.add_activity("Design", &clock)?;
    item.add_activity("Build", &clock)?;
    item.mark_activity_done(design, &clock)?;

    let rendered = item.render(0);

    ensure!(
        rendered
            == "- [ ] Login page (todo, 1/2 activities done)\n  - [x] Design\n  - [ ] Build\n",
        "unexpected outline: {rendered}"
    );
    Ok(())
}

#[rstest]
fn first_post_opens_a_thread_named_after_the_item(
    mut item: BacklogItem,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let author = UserId::new();

    item.post_to_first_thread(author, "Which browsers?", &clock)?;
    item.post_to_first_thread(UserId::new(), "The usual ones", &clock)?;

    ensure!(item.discussions().len() == 1);
    let Some(thread) = item.discussions().first() else {
        bail!("thread should exist");
    };
    ensure!(thread.subject() == "Login page");
    ensure!(thread.messages().len() == 2);
    Ok(())
}

#[rstest]
fn rejected_first_post_leaves_no_thread(mut item: BacklogItem, clock: DefaultClock) {
    let result = item.post_to_first_thread(UserId::new(), "  ", &clock);

    assert_eq!(result, Err(BacklogItemDomainError::EmptyMessage));
    assert!(item.discussions().is_empty());
}
