use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::links::ShortLink;
use crate::store::Backend;
use crate::store::Memory;
use crate::tests::helper;

#[tokio::test]
async fn test_list_pagination() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    let mut created = Vec::new();
    for index in 0..25 {
        let url = format!("https://www.example.com/{index}");
        created.push(helper::create_short_link(&mut app, &access_token, &url).await);
    }

    // defaults to the first page of 10
    let page = helper::list_short_links(&mut app, &access_token, "").await;
    assert_eq!(10, page.links.len());
    assert_eq!(25, page.total);
    assert_eq!(3, page.total_pages);
    assert!(!page.degraded);

    let page = helper::list_short_links(&mut app, &access_token, "?page=3&limit=10").await;
    assert_eq!(5, page.links.len());

    let page = helper::list_short_links(&mut app, &access_token, "?page=4&limit=10").await;
    assert!(page.links.is_empty());
    assert_eq!(25, page.total);

    let page = helper::list_short_links(&mut app, &access_token, "?page=1&limit=25").await;
    assert_eq!(1, page.total_pages);

    // every link shows up exactly once across the pages
    let mut listed = Vec::new();
    for number in 1..=3 {
        let query = format!("?page={number}&limit=10");
        let page = helper::list_short_links(&mut app, &access_token, &query).await;
        listed.extend(page.links.into_iter().map(|link| link.id));
    }

    let mut expected = created.iter().map(|link| link.id).collect::<Vec<_>>();
    assert_eq!(expected.len(), listed.len());

    expected.sort();
    listed.sort();
    assert_eq!(expected, listed);
}

#[tokio::test]
async fn test_list_newest_first() {
    let memory = Memory::default();
    let now = Utc::now();

    let links = [("older1", 20), ("newest", 0), ("older2", 10)]
        .into_iter()
        .map(|(short_code, minutes_ago)| ShortLink {
            id: Uuid::new_v4(),
            short_code: short_code.to_string(),
            original_url: format!("https://www.example.com/{short_code}"),
            created_at: now - Duration::minutes(minutes_ago),
            owner_id: Some("user_1".to_string()),
            click_count: 0,
        })
        .collect::<Vec<_>>();
    memory.write_all(&links).await.unwrap();

    let mut app = helper::setup_test_app_with_backend(Arc::new(memory));

    let access_token = helper::login("user_1");

    let page = helper::list_short_links(&mut app, &access_token, "").await;
    let codes = page
        .links
        .iter()
        .map(|link| link.short_code.as_str())
        .collect::<Vec<_>>();
    assert_eq!(vec!["newest", "older2", "older1"], codes);
}

#[tokio::test]
async fn test_list_only_own_links() {
    let mut app = helper::setup_test_app();

    let access_token_one = helper::login("user_1");
    let access_token_two = helper::login("user_2");

    helper::create_short_link(&mut app, &access_token_one, "https://www.example.com/1").await;
    helper::create_short_link(&mut app, &access_token_one, "https://www.example.com/2").await;
    helper::create_short_link(&mut app, &access_token_two, "https://www.example.com/3").await;

    let page = helper::list_short_links(&mut app, &access_token_one, "").await;
    assert_eq!(2, page.total);
    assert!(
        page.links
            .iter()
            .all(|link| link.owner_id.as_deref() == Some("user_1"))
    );

    let page = helper::list_short_links(&mut app, &access_token_two, "").await;
    assert_eq!(1, page.total);
    assert_eq!("https://www.example.com/3", page.links[0].original_url);
}

#[tokio::test]
async fn test_list_is_idempotent() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    for _ in 0..3 {
        helper::create_short_link(&mut app, &access_token, "https://www.example.com/").await;
    }

    let first = helper::list_short_links(&mut app, &access_token, "?page=1&limit=2").await;
    let second = helper::list_short_links(&mut app, &access_token, "?page=1&limit=2").await;

    let ids = |page: &helper::Page| page.links.iter().map(|link| link.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.total, second.total);
    assert_eq!(first.total_pages, second.total_pages);
}

#[tokio::test]
async fn test_list_invalid_query() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    let (status_code, _, error) =
        helper::maybe_list_short_links(&mut app, Some(&access_token), "?page=abc").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid query parameter".to_string(), error.unwrap().error);

    let (status_code, _, _) =
        helper::maybe_list_short_links(&mut app, Some(&access_token), "?limit=-1").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
}

#[tokio::test]
async fn test_list_empty_query_values() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    for number in 0..12 {
        let url = format!("https://www.example.com/{number}");
        helper::create_short_link(&mut app, &access_token, &url).await;
    }

    // empty values fall back to page 1 of 10
    let page = helper::list_short_links(&mut app, &access_token, "?page=&limit=").await;
    assert_eq!(10, page.links.len());
    assert_eq!(12, page.total);
    assert_eq!(2, page.total_pages);
}

#[tokio::test]
async fn test_list_out_of_bounds() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    helper::create_short_link(&mut app, &access_token, "https://www.example.com/").await;

    let page = helper::list_short_links(&mut app, &access_token, "?page=0").await;
    assert!(page.links.is_empty());
    assert_eq!(1, page.total);

    let page = helper::list_short_links(&mut app, &access_token, "?limit=0").await;
    assert!(page.links.is_empty());
    assert_eq!(0, page.total_pages);
}
