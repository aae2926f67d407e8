//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to stand in for the listing sites and exercise
//! the real HTTP renderer, adapters, store and expiry sweep end-to-end.

use coursepress::classify::{reclassify_all, Classifier};
use coursepress::config::{ExpiryConfig, RendererConfig};
use coursepress::expiry::run_expiry;
use coursepress::render::HttpRenderer;
use coursepress::sources::{CouponScorpionAdapter, RealDiscountAdapter, SiteAdapter};
use coursepress::stats::load_statistics;
use coursepress::storage::{CourseStore, NewCourse, SqliteStore};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn renderer() -> HttpRenderer {
    HttpRenderer::new(&RendererConfig {
        network_settled_timeout_secs: 5,
        dom_ready_timeout_secs: 2,
        settle_delay_secs: 0,
    })
    .expect("renderer")
}

fn course(slug: &str, link: &str) -> NewCourse {
    NewCourse {
        title: slug.to_string(),
        slug: slug.to_string(),
        image: "https://img.example.com/a.jpg".to_string(),
        target_link: link.to_string(),
        category: "Programming".to_string(),
        source: "couponscorpion".to_string(),
    }
}

#[tokio::test]
async fn test_resolve_target_through_http_renderer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/python-bootcamp/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <a class="btn_offer_block re_track_btn"
               href="https://www.udemy.com/course/python-bootcamp/?couponCode=FREE123">
               Get Coupon
            </a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let renderer = renderer();
    let detail = Url::parse(&format!("{}/python-bootcamp/", server.uri())).unwrap();

    let target = CouponScorpionAdapter
        .resolve_target(&renderer, &detail)
        .await
        .expect("resolved link");
    assert_eq!(
        target.as_str(),
        "https://www.udemy.com/course/python-bootcamp/?couponCode=FREE123"
    );
}

#[tokio::test]
async fn test_resolve_ladder_prefers_primary_button() {
    let server = MockServer::start().await;
    // An incidental udemy mention appears before the real button in
    // document order; the ladder's rule order must still pick the button
    Mock::given(method("GET"))
        .and(path("/offer/sql/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <p><a href="https://www.udemy.com/course/unrelated/">a course we mentioned</a></p>
            <a class="MuiButton-root" href="https://www.udemy.com/course/sql/?couponCode=GO">Enroll</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let renderer = renderer();
    let detail = Url::parse(&format!("{}/offer/sql/", server.uri())).unwrap();

    let target = RealDiscountAdapter
        .resolve_target(&renderer, &detail)
        .await
        .expect("resolved link");
    assert!(target.as_str().contains("couponCode=GO"));
}

#[tokio::test]
async fn test_resolve_target_unrenderable_page_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let renderer = renderer();
    let detail = Url::parse(&format!("{}/gone/", server.uri())).unwrap();

    assert!(CouponScorpionAdapter
        .resolve_target(&renderer, &detail)
        .await
        .is_none());
}

#[tokio::test]
async fn test_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("courses.db");

    {
        let mut store = SqliteStore::new(&db_path).unwrap();
        assert!(store
            .insert_if_absent(&course("rust-basics", "https://example.com/a"))
            .unwrap());
    }

    let store = SqliteStore::new(&db_path).unwrap();
    let found = store
        .find_by_slug_or_title("rust-basics", "")
        .unwrap()
        .expect("course survives reopen");
    assert_eq!(found.target_link, "https://example.com/a");
    assert!(!found.expired);
}

#[tokio::test]
async fn test_expiry_sweep_retires_dead_coupons() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("courses.db");
    let mut store = SqliteStore::new(&db_path).unwrap();
    store
        .insert_if_absent(&course("dead", &format!("{}/dead", server.uri())))
        .unwrap();
    store
        .insert_if_absent(&course("alive", &format!("{}/alive", server.uri())))
        .unwrap();

    // Age the records past the cutoff; only records strictly older than
    // now - max_age_days are probed
    rusqlite::Connection::open(&db_path)
        .unwrap()
        .execute("UPDATE courses SET added_at = '2020-01-01T00:00:00Z'", [])
        .unwrap();

    let config = ExpiryConfig {
        max_age_days: 0,
        batch_size: 10,
        probe_timeout_secs: 5,
        check_limit: 100,
    };
    let report = run_expiry(&config, &mut store).await.unwrap();

    assert_eq!(report.checked, 2);
    assert_eq!(report.expired, 1);
    assert_eq!(report.live, 1);

    let stats = load_statistics(&store).unwrap();
    assert_eq!(stats.total_courses, 2);
    assert_eq!(stats.expired_courses, 1);

    // A second sweep finds nothing new to expire
    let second = run_expiry(&config, &mut store).await.unwrap();
    assert_eq!(second.expired, 0);
}

#[tokio::test]
async fn test_reclassify_fixes_default_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteStore::new(&dir.path().join("courses.db")).unwrap();
    store
        .insert_if_absent(&NewCourse {
            title: "Machine Learning A-Z".to_string(),
            slug: "machine-learning-a-z".to_string(),
            image: "https://img.example.com/ml.jpg".to_string(),
            target_link: "https://example.com/ml".to_string(),
            category: "Other Courses".to_string(),
            source: "real_discount".to_string(),
        })
        .unwrap();

    let outcome = reclassify_all(&mut store, &Classifier::rules_only())
        .await
        .unwrap();

    assert_eq!(outcome.updated, 1);
    let found = store
        .find_by_slug_or_title("machine-learning-a-z", "")
        .unwrap()
        .unwrap();
    assert_eq!(found.category, "Data Science & AI");
}
