//! In-memory user repository behaviour.

use rstest::{fixture, rstest};
use scrumflow::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{ChannelKind, ContactChannels, Role, User},
    ports::{UserRepository, UserRepositoryError},
};

#[fixture]
fn repo() -> InMemoryUserRepository {
    InMemoryUserRepository::new()
}

fn user(name: &str, role: Role, email: &str) -> eyre::Result<User> {
    Ok(User::new(name, role, ContactChannels::new().with_email(email)?)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_are_found_by_email_ignoring_case(repo: InMemoryUserRepository) -> eyre::Result<()> {
    let stored = user("Uma", Role::Developer, "uma@example.com")?;
    repo.store(&stored).await?;

    let found = repo.find_by_email("  UMA@Example.com ").await?;

    eyre::ensure!(found == Some(stored), "unexpected lookup {found:?}");
    eyre::ensure!(
        repo.find_by_email("nobody@example.com").await?.is_none(),
        "unknown address"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn email_addresses_are_unique(repo: InMemoryUserRepository) -> eyre::Result<()> {
    repo.store(&user("Vic", Role::Developer, "team@example.com")?).await?;

    let result = repo
        .store(&user("Wes", Role::ScrumMaster, "Team@example.com")?)
        .await;

    eyre::ensure!(
        matches!(result, Err(UserRepositoryError::DuplicateEmail(ref email)) if email == "team@example.com"),
        "unexpected result {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_are_listed_by_role_in_insertion_order(
    repo: InMemoryUserRepository,
) -> eyre::Result<()> {
    let first = user("Xan", Role::Developer, "xan@example.com")?;
    let master = user("Yul", Role::ScrumMaster, "yul@example.com")?;
    let second = user("Zoe", Role::Developer, "zoe@example.com")?;
    for stored in [&first, &master, &second] {
        repo.store(stored).await?;
    }

    let developers = repo.list_by_role(Role::Developer).await?;

    eyre::ensure!(developers == vec![first, second], "unexpected developers");
    eyre::ensure!(repo.list_all().await?.len() == 3, "every user listed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_keep_preferences_and_deletes_remove(
    repo: InMemoryUserRepository,
) -> eyre::Result<()> {
    let mut stored = user("Ada", Role::ProductOwner, "ada@example.com")?;
    repo.store(&stored).await?;

    stored.add_preference(ChannelKind::Chat);
    stored.update_contacts(
        ContactChannels::new()
            .with_email("ada@example.com")?
            .with_chat_handle("ada")?,
    );
    repo.update(&stored).await?;
    let reloaded = repo.find_by_id(stored.id()).await?;
    repo.delete(stored.id()).await?;
    let missing = repo.delete(stored.id()).await;

    eyre::ensure!(
        reloaded.as_ref().map(User::preferences) == Some(&[ChannelKind::Chat][..]),
        "preferences persisted, got {reloaded:?}"
    );
    eyre::ensure!(
        matches!(missing, Err(UserRepositoryError::NotFound(id)) if id == stored.id()),
        "second delete should fail, got {missing:?}"
    );
    Ok(())
}
