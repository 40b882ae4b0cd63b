use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

use crate::links::ShortLink;
use crate::store::Backend;
use crate::store::Memory;
use crate::store::backend;
use crate::tests::helper;

/// Backend that can be switched off
#[derive(Default)]
struct Switchable {
    inner: Memory,
    down: AtomicBool,
}

impl Switchable {
    fn check(&self) -> backend::Result<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(backend::Error::Io(std::io::Error::other("backend is down")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Backend for Switchable {
    fn name(&self) -> &'static str {
        "switchable"
    }

    async fn read_all(&self) -> backend::Result<Vec<ShortLink>> {
        self.check()?;
        self.inner.read_all().await
    }

    async fn write_all(&self, links: &[ShortLink]) -> backend::Result<()> {
        self.check()?;
        self.inner.write_all(links).await
    }
}

#[tokio::test]
async fn test_unavailable_storage() {
    let backend = Arc::new(Switchable::default());
    let mut app = helper::setup_test_app_with_backend(backend.clone());

    let access_token = helper::login("user_1");

    let link = helper::create_short_link(&mut app, &access_token, "https://www.example.com/").await;

    backend.down.store(true, Ordering::SeqCst);

    // reads degrade to an empty, flagged page
    let page = helper::list_short_links(&mut app, &access_token, "").await;
    assert!(page.degraded);
    assert!(page.links.is_empty());
    assert_eq!(0, page.total);

    // misses say the storage was unreadable
    let (status_code, _, body) =
        helper::redirect(&mut app, &format!("/s/{}", link.short_code)).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    let body = serde_json::from_str::<Value>(&body).unwrap();
    assert_eq!("Short link not found", body["error"].as_str().unwrap());
    assert_eq!("Storage could not be read", body["description"].as_str().unwrap());

    // writes refuse
    let (status_code, _, error) =
        helper::maybe_create_short_link(&mut app, Some(&access_token), "https://www.example.com/")
            .await;
    assert_eq!(StatusCode::SERVICE_UNAVAILABLE, status_code);
    assert_eq!("Storage unavailable".to_string(), error.unwrap().error);

    let (status_code, _) =
        helper::maybe_delete_short_link(&mut app, Some(&access_token), &link.id.to_string())
            .await;
    assert_eq!(StatusCode::SERVICE_UNAVAILABLE, status_code);

    // back up, nothing was lost
    backend.down.store(false, Ordering::SeqCst);

    let page = helper::list_short_links(&mut app, &access_token, "").await;
    assert!(!page.degraded);
    assert_eq!(1, page.total);
    assert_eq!(link.id, page.links[0].id);
}
