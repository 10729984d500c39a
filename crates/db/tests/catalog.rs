//! Integration tests for the catalog read path and the position invariant.
//!
//! Exercises the repository layer and `PgCatalog` against a real database:
//! - Dense positions across append, reorder and delete
//! - Snapshot reads through the catalog traits
//! - Corruption detection for gaps
//! - Kind immutability and cascade delete

use assert_matches::assert_matches;
use shelfbot_core::catalog::ResourceCatalog;
use shelfbot_core::error::CatalogError;
use shelfbot_core::resource::ResourceKind;
use shelfbot_db::models::resource::{CreateResource, ResourceRow};
use shelfbot_db::repositories::{ComicFileRepo, ResourceRepo};
use shelfbot_db::PgCatalog;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_resource(kind: ResourceKind, title: &str) -> CreateResource {
    CreateResource {
        title: title.to_string(),
        kind,
        jump_url: kind.is_linked().then(|| "https://example.com/r".to_string()),
        cover_file_id: None,
        preview_message_id: None,
        preview_url: None,
        is_vip: None,
    }
}

async fn comic_with_files(pool: &PgPool, count: usize) -> ResourceRow {
    let comic = ResourceRepo::create(pool, &new_resource(ResourceKind::Comic, "Harbor Lights"))
        .await
        .unwrap();
    let files: Vec<String> = (1..=count).map(|n| format!("handle-{n}")).collect();
    ComicFileRepo::append(pool, comic.id, &files)
        .await
        .unwrap()
        .unwrap();
    comic
}

async fn positions(pool: &PgPool, comic: &ResourceRow) -> Vec<(String, i32)> {
    ComicFileRepo::list_by_resource(pool, comic.id)
        .await
        .unwrap()
        .into_iter()
        .map(|f| (f.file_id, f.position))
        .collect()
}

// ---------------------------------------------------------------------------
// Test: Lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn lookup_maps_row_to_domain(pool: PgPool) {
    let created = ResourceRepo::create(&pool, &new_resource(ResourceKind::Novel, "Tide"))
        .await
        .unwrap();
    let catalog = PgCatalog::new(pool);

    let resource = catalog.lookup(created.id).await.unwrap().unwrap();

    assert_eq!(resource.title, "Tide");
    assert_eq!(resource.kind, ResourceKind::Novel);
    assert!(!resource.is_vip);
    assert_eq!(resource.jump_url.as_deref(), Some("https://example.com/r"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_resource_is_none(pool: PgPool) {
    let catalog = PgCatalog::new(pool);
    let id = uuid::Uuid::new_v4();

    assert!(catalog.lookup(id).await.unwrap().is_none());
    assert!(catalog.items(id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: Positions stay dense
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn append_numbers_from_one_and_continues(pool: PgPool) {
    let comic = comic_with_files(&pool, 3).await;
    ComicFileRepo::append(&pool, comic.id, &["handle-4".to_string()])
        .await
        .unwrap()
        .unwrap();

    let rows = positions(&pool, &comic).await;
    assert_eq!(
        rows,
        vec![
            ("handle-1".to_string(), 1),
            ("handle-2".to_string(), 2),
            ("handle-3".to_string(), 3),
            ("handle-4".to_string(), 4),
        ]
    );
    assert_eq!(ComicFileRepo::count_by_resource(&pool, comic.id).await.unwrap(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn append_to_missing_resource_is_none(pool: PgPool) {
    let result = ComicFileRepo::append(&pool, uuid::Uuid::new_v4(), &["h".to_string()])
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_rederives_positions(pool: PgPool) {
    let comic = comic_with_files(&pool, 3).await;
    let mut ids: Vec<i64> = ComicFileRepo::list_by_resource(&pool, comic.id)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();
    ids.reverse();

    assert!(ComicFileRepo::reorder(&pool, comic.id, &ids).await.unwrap());

    let rows = positions(&pool, &comic).await;
    assert_eq!(
        rows,
        vec![
            ("handle-3".to_string(), 1),
            ("handle-2".to_string(), 2),
            ("handle-1".to_string(), 3),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_with_incomplete_list_changes_nothing(pool: PgPool) {
    let comic = comic_with_files(&pool, 3).await;
    let ids: Vec<i64> = ComicFileRepo::list_by_resource(&pool, comic.id)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();

    assert!(!ComicFileRepo::reorder(&pool, comic.id, &ids[..2]).await.unwrap());
    assert!(!ComicFileRepo::reorder(&pool, comic.id, &[ids[0], ids[0], ids[1]])
        .await
        .unwrap());

    let rows = positions(&pool, &comic).await;
    assert_eq!(rows[0], ("handle-1".to_string(), 1));
    assert_eq!(rows[2], ("handle-3".to_string(), 3));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_closes_the_gap(pool: PgPool) {
    let comic = comic_with_files(&pool, 4).await;
    let second = ComicFileRepo::list_by_resource(&pool, comic.id).await.unwrap()[1].id;

    assert!(ComicFileRepo::delete(&pool, comic.id, second).await.unwrap());
    assert!(!ComicFileRepo::delete(&pool, comic.id, second).await.unwrap());

    let rows = positions(&pool, &comic).await;
    assert_eq!(
        rows,
        vec![
            ("handle-1".to_string(), 1),
            ("handle-3".to_string(), 2),
            ("handle-4".to_string(), 3),
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: Catalog items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_items_are_ordered(pool: PgPool) {
    let comic = comic_with_files(&pool, 12).await;
    let catalog = PgCatalog::new(pool);

    let items = catalog.items(comic.id).await.unwrap().unwrap();

    assert_eq!(items.len(), 12);
    assert_eq!(items[0].file_id, "handle-1");
    assert_eq!(items[11].file_id, "handle-12");
    assert!(items.iter().zip(1..).all(|(item, n)| item.position == n));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_comic_has_empty_items(pool: PgPool) {
    let comic = comic_with_files(&pool, 0).await;
    let catalog = PgCatalog::new(pool);

    assert_eq!(catalog.items(comic.id).await.unwrap(), Some(Vec::new()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gap_in_positions_is_reported(pool: PgPool) {
    let comic = comic_with_files(&pool, 2).await;
    sqlx::query("INSERT INTO comic_files (resource_id, file_id, position) VALUES ($1, 'stray', 5)")
        .bind(comic.id)
        .execute(&pool)
        .await
        .unwrap();
    let catalog = PgCatalog::new(pool);

    assert_matches!(
        catalog.items(comic.id).await,
        Err(CatalogError::CorruptOrdering { expected: 3, found: 5, .. })
    );
}

// ---------------------------------------------------------------------------
// Test: Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn kind_cannot_change(pool: PgPool) {
    let comic = comic_with_files(&pool, 1).await;

    let result = sqlx::query("UPDATE resources SET kind = 'novel' WHERE id = $1")
        .bind(comic.id)
        .execute(&pool)
        .await;

    assert!(result.is_err());
    let row = ResourceRepo::find_by_id(&pool, comic.id).await.unwrap().unwrap();
    assert_eq!(row.kind, "comic");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn vip_flag_is_editable(pool: PgPool) {
    let comic = comic_with_files(&pool, 1).await;

    assert!(ResourceRepo::set_vip(&pool, comic.id, true).await.unwrap());

    let row = ResourceRepo::find_by_id(&pool, comic.id).await.unwrap().unwrap();
    assert!(row.is_vip);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_resource_cascades_to_files(pool: PgPool) {
    let comic = comic_with_files(&pool, 5).await;

    assert!(ResourceRepo::delete(&pool, comic.id).await.unwrap());

    assert_eq!(ComicFileRepo::count_by_resource(&pool, comic.id).await.unwrap(), 0);
    assert!(ResourceRepo::find_by_id(&pool, comic.id).await.unwrap().is_none());
}
