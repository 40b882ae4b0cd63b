use axum::http::StatusCode;

use crate::codes::ALPHABET;
use crate::codes::DEFAULT_LENGTH;
use crate::tests::helper;

#[tokio::test]
async fn test_create() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    let url = "https://www.example.com/some/path?with=query";
    let (status_code, link, _) =
        helper::maybe_create_short_link(&mut app, Some(&access_token), url).await;
    assert_eq!(StatusCode::CREATED, status_code);

    let link = link.unwrap();
    assert_eq!(url, link.original_url);
    assert_eq!(DEFAULT_LENGTH, link.short_code.len());
    assert!(link.short_code.bytes().all(|byte| ALPHABET.contains(&byte)));
    assert_eq!(Some("user_1".to_string()), link.owner_id);
    assert_eq!(0, link.click_count);
}

#[tokio::test]
async fn test_create_adds_scheme() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    let link = helper::create_short_link(&mut app, &access_token, "  www.example.com/path ").await;
    assert_eq!("https://www.example.com/path", link.original_url);

    let link = helper::create_short_link(&mut app, &access_token, "http://www.example.com/").await;
    assert_eq!("http://www.example.com/", link.original_url);

    // only lowercase http(s) counts as a scheme, anything else gets prefixed
    let link = helper::create_short_link(&mut app, &access_token, "ftp://x.y/").await;
    assert_eq!("https://ftp://x.y/", link.original_url);

    let link = helper::create_short_link(&mut app, &access_token, "HTTPS://EXAMPLE.COM").await;
    assert_eq!("https://HTTPS://EXAMPLE.COM", link.original_url);
}

#[tokio::test]
async fn test_create_invalid_url() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    let (status_code, link, error) =
        helper::maybe_create_short_link(&mut app, Some(&access_token), "not a url").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(link.is_none());
    assert!(error.unwrap().error.starts_with("Invalid URL"));

    // nothing was stored
    let page = helper::list_short_links(&mut app, &access_token, "").await;
    assert_eq!(0, page.total);
}

#[tokio::test]
async fn test_create_missing_url() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    for body in [r"{}", r#"{"url":""}"#, r#"{"url":"   "}"#] {
        let (status_code, _, error) = helper::maybe_create_short_link_with_raw_body(
            &mut app,
            Some(&access_token),
            body,
            true,
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code);
        assert_eq!("URL is required".to_string(), error.unwrap().error);
    }
}

#[tokio::test]
async fn test_create_unique_codes() {
    let mut app = helper::setup_test_app();

    let access_token = helper::login("user_1");

    let mut codes = Vec::new();
    for _ in 0..50 {
        let link = helper::create_short_link(&mut app, &access_token, "https://www.example.com/")
            .await;
        codes.push(link.short_code.to_ascii_lowercase());
    }

    codes.sort();
    codes.dedup();
    assert_eq!(50, codes.len());
}
