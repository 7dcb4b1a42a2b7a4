use todo_api::domain::{repository::TodoRepository, todo::{Todo, TodoId}};
use todo_api::infrastructure::sqlite_repo::SqliteTodoRepository;

async fn repo() -> SqliteTodoRepository {
    let repo = SqliteTodoRepository::connect("sqlite::memory:").await.unwrap();
    repo.init().await.unwrap();
    repo
}

#[tokio::test]
async fn first_save_gets_id_one() {
    let repo = repo().await;
    let saved = repo.save(Todo::new("Buy milk", false)).await.unwrap();
    assert_eq!(saved, Todo { id: Some(TodoId(1)), title: "Buy milk".into(), completed: false });
}

#[tokio::test]
async fn save_with_id_overwrites_all_fields() {
    let repo = repo().await;
    let saved = repo.save(Todo::new("Buy milk", false)).await.unwrap();
    let id = saved.id.unwrap();

    repo.save(Todo { id: Some(id), title: "Buy oat milk".into(), completed: true }).await.unwrap();

    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found, Todo { id: Some(id), title: "Buy oat milk".into(), completed: true });
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn save_with_unknown_id_inserts_under_it() {
    let repo = repo().await;
    repo.save(Todo { id: Some(TodoId(10)), title: "ten".into(), completed: false }).await.unwrap();
    assert!(repo.find_by_id(TodoId(10)).await.unwrap().is_some());

    let next = repo.save(Todo::new("after", false)).await.unwrap();
    assert!(next.id.unwrap() > TodoId(10));
}

#[tokio::test]
async fn find_missing_returns_none() {
    let repo = repo().await;
    assert_eq!(repo.find_by_id(TodoId(1)).await.unwrap(), None);
    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_and_tolerates_missing() {
    let repo = repo().await;
    let saved = repo.save(Todo::new("gone", true)).await.unwrap();
    let id = saved.id.unwrap();

    repo.delete_by_id(id).await.unwrap();
    assert_eq!(repo.find_by_id(id).await.unwrap(), None);

    repo.delete_by_id(id).await.unwrap();
    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn find_all_returns_every_saved_todo() {
    let repo = repo().await;
    let mut saved = Vec::new();
    for i in 0..3 {
        saved.push(repo.save(Todo::new(format!("todo {i}"), i == 1)).await.unwrap());
    }
    assert_eq!(repo.find_all().await.unwrap(), saved);
}

#[tokio::test]
async fn init_is_idempotent() {
    let repo = repo().await;
    repo.save(Todo::new("kept", false)).await.unwrap();
    repo.init().await.unwrap();
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleted_ids_are_not_reissued() {
    let repo = repo().await;
    let first = repo.save(Todo::new("first", false)).await.unwrap().id.unwrap();
    let second = repo.save(Todo::new("second", false)).await.unwrap().id.unwrap();
    repo.delete_by_id(second).await.unwrap();
    repo.delete_by_id(first).await.unwrap();

    let next = repo.save(Todo::new("third", false)).await.unwrap().id.unwrap();
    assert_ne!(next, first);
    assert_ne!(next, second);
    assert!(next > second);
}
