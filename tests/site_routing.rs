//! End-to-end locale routing and profile dispatch.

use std::time::{Duration, Instant};

use reqwest::header::LOCATION;
use reqwest::StatusCode;
use serde_json::Value;
use umpmusic_site::config::RedirectKind;
use umpmusic_site::content::{ArtistInput, NewsInput};

mod common;

fn artist(name: &str, slug: &str, role: Option<&str>) -> ArtistInput {
    ArtistInput {
        name: name.into(),
        slug: slug.into(),
        role: role.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_unprefixed_paths_redirect_to_default_locale() {
    let site = common::start_site().await;
    let client = common::client();

    let cases = [
        ("/", "/es"),
        ("/artists", "/es/artists"),
        ("/news?page=2", "/es/news?page=2"),
        ("/fr/artists", "/es/fr/artists"),
        ("/english", "/es/english"),
    ];
    for (path, location) in cases {
        let res = client.get(site.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "path {path}");
        assert_eq!(res.headers()[LOCATION], location, "path {path}");
    }
}

#[tokio::test]
async fn test_redirect_target_is_served() {
    let site = common::start_site().await;
    let client = common::client();

    let res = client.get(site.url("/about")).send().await.unwrap();
    let location = res.headers()[LOCATION].to_str().unwrap().to_string();

    let res = client.get(site.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["lang"], "es");
    assert_eq!(page["page"], "about");
}

#[tokio::test]
async fn test_trailing_slash_serves_localized_pages() {
    let site = common::start_site().await;
    site.store.create_artist(artist("Nadia", "nadia", Some("DJ"))).unwrap();
    let client = common::client();

    for path in ["/es/", "/en/", "/es/news/", "/en/artists/", "/es/artists/nadia/", "/en/about/"] {
        let res = client.get(site.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "path {path}");
    }

    let res = client.get(site.url("/news/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[LOCATION], "/es/news");
}

#[tokio::test]
async fn test_permanent_redirects_when_configured() {
    let site = common::start_site_with(|c| c.routing.redirect = RedirectKind::Permanent).await;
    let res = common::client().get(site.url("/contact")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()[LOCATION], "/es/contact");
}

#[tokio::test]
async fn test_bypassed_paths_are_not_redirected() {
    let site = common::start_site().await;
    let client = common::client();

    let res = client.get(site.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Unknown bypassed paths reach the fallback instead of the redirect.
    for path in ["/logo.png", "/_internal/x", "/auth/callback", "/assets/missing.css"] {
        let res = client.get(site.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {path}");
        assert!(res.headers().get(LOCATION).is_none(), "path {path}");
    }
}

#[tokio::test]
async fn test_localized_pages_use_their_dictionary() {
    let site = common::start_site().await;
    let client = common::client();

    let es: Value = client.get(site.url("/es")).send().await.unwrap().json().await.unwrap();
    let en: Value = client.get(site.url("/en")).send().await.unwrap().json().await.unwrap();
    assert_eq!(es["lang"], "es");
    assert_eq!(en["lang"], "en");
    assert_ne!(es["labels"], en["labels"]);
}

#[tokio::test]
async fn test_profile_variant_follows_role() {
    let site = common::start_site().await;
    site.store.create_artist(artist("Nadia", "nadia", Some("DJ / Selector"))).unwrap();
    site.store.create_artist(artist("Bruno", "bruno", Some("Productor musical"))).unwrap();
    site.store.create_artist(artist("Sol", "sol", Some("Artista Exclusivo"))).unwrap();
    site.store.create_artist(artist("Mar", "mar", None)).unwrap();
    site.store.create_artist(artist("Kai", "kai", Some("DJ & Producer"))).unwrap();

    let client = common::client();
    let cases = [
        ("nadia", "dj"),
        ("bruno", "producer"),
        ("sol", "artist"),
        ("mar", "artist"),
        ("kai", "dj"),
    ];
    for (slug, variant) in cases {
        let res = client
            .get(site.url(&format!("/en/artists/{slug}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "slug {slug}");
        let page: Value = res.json().await.unwrap();
        assert_eq!(page["variant"], variant, "slug {slug}");
    }
}

#[tokio::test]
async fn test_profile_localizes_bio_with_fallback() {
    let site = common::start_site().await;
    site.store
        .create_artist(ArtistInput {
            bio_es: Some("Biografía".into()),
            tagline_es: Some("Lema".into()),
            tagline_en: Some("Tagline".into()),
            ..artist("Luz", "luz", Some("Artista"))
        })
        .unwrap();

    let client = common::client();
    let en: Value = client.get(site.url("/en/artists/luz")).send().await.unwrap().json().await.unwrap();
    assert_eq!(en["artist"]["tagline"], "Tagline");
    assert_eq!(en["artist"]["bio"], "Biografía");

    let es: Value = client.get(site.url("/es/artists/luz")).send().await.unwrap().json().await.unwrap();
    assert_eq!(es["artist"]["tagline"], "Lema");
}

#[tokio::test]
async fn test_role_is_shown_in_visitor_language() {
    let site = common::start_site().await;
    site.store
        .create_artist(ArtistInput {
            role_en: Some("Music producer".into()),
            ..artist("Bruno", "bruno", Some("Productor musical"))
        })
        .unwrap();
    let client = common::client();

    let en: Value = client.get(site.url("/en/artists/bruno")).send().await.unwrap().json().await.unwrap();
    assert_eq!(en["artist"]["role"], "Music producer");
    // classification reads the canonical role
    assert_eq!(en["variant"], "producer");

    let es: Value = client.get(site.url("/es/artists/bruno")).send().await.unwrap().json().await.unwrap();
    assert_eq!(es["artist"]["role"], "Productor musical");

    let roster: Value = client
        .get(site.url("/en/artists?role=productor"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(roster["artists"][0]["role"], "Music producer");

    let home: Value = client.get(site.url("/en")).send().await.unwrap().json().await.unwrap();
    assert_eq!(home["featured_artists"][0]["role"], "Music producer");
}

#[tokio::test]
async fn test_missing_profile_and_unknown_locale_are_not_found() {
    let site = common::start_site().await;
    let client = common::client();

    let res = client.get(site.url("/es/artists/nobody")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Artista no encontrado");

    // Routed as a localized-looking path that is not a locale: redirected, never served.
    let res = client.get(site.url("/fr")).send().await.unwrap();
    assert_eq!(res.headers()[LOCATION], "/es/fr");
    let res = client.get(site.url("/es/fr")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_roster_filter_and_labels() {
    let site = common::start_site().await;
    site.store.create_artist(artist("Ana", "ana", Some("DJ"))).unwrap();
    site.store.create_artist(artist("Beto", "beto", Some("Productor"))).unwrap();
    site.store.create_artist(artist("Ciro", "ciro", None)).unwrap();
    site.store
        .create_artist(ArtistInput {
            is_active: Some(false),
            ..artist("Dani", "dani", Some("DJ"))
        })
        .unwrap();

    let client = common::client();
    let all: Value = client.get(site.url("/en/artists")).send().await.unwrap().json().await.unwrap();
    let slugs: Vec<&str> = all["artists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["ana", "beto", "ciro"]);
    assert_eq!(all["artists"][0]["role_label"], "DJ");
    assert_eq!(all["artists"][1]["role_label"], "Producer");

    let djs: Value = client
        .get(site.url("/en/artists?role=dj"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(djs["artists"].as_array().unwrap().len(), 1);

    let artistas: Value = client
        .get(site.url("/en/artists?role=artista"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(artistas["artists"][0]["slug"], "ciro");
}

#[tokio::test]
async fn test_only_published_news_is_public() {
    let site = common::start_site().await;
    site.store
        .create_news(NewsInput {
            title: "Nuevo lanzamiento".into(),
            title_en: Some("New release".into()),
            slug: "nuevo-lanzamiento".into(),
            is_published: true,
            ..Default::default()
        })
        .unwrap();
    site.store
        .create_news(NewsInput {
            title: "Borrador".into(),
            slug: "borrador".into(),
            ..Default::default()
        })
        .unwrap();

    let client = common::client();
    let list: Value = client.get(site.url("/en/news")).send().await.unwrap().json().await.unwrap();
    assert_eq!(list["articles"].as_array().unwrap().len(), 1);
    assert_eq!(list["articles"][0]["title"], "New release");

    let res = client.get(site.url("/es/news/borrador")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = client.get(site.url("/es/news/nuevo-lanzamiento")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_config_reload_adds_locale() {
    let site = common::start_site().await;
    let client = common::client();

    let res = client.get(site.url("/pt")).send().await.unwrap();
    assert_eq!(res.headers()[LOCATION], "/es/pt");

    let mut config = common::test_config(&site.data_dir);
    config.i18n.locales = vec!["es".into(), "en".into(), "pt".into()];
    site.config_tx.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(site.url("/pt")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["lang"], "pt");
}

#[tokio::test]
async fn test_concurrent_requests() {
    let site = common::start_site().await;
    site.store.create_artist(artist("Nadia", "nadia", Some("DJ"))).unwrap();

    let concurrency = 20;
    let requests_per_task = 25;
    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for i in 0..concurrency {
        let client = client.clone();
        let path = if i % 2 == 0 { "/artists/nadia" } else { "/es/artists/nadia" };
        let url = site.url(path);
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for _ in 0..requests_per_task {
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() || res.status().is_redirection() {
                        ok += 1;
                    }
                }
            }
            ok
        }));
    }

    let mut total_ok = 0;
    for task in tasks {
        total_ok += task.await.unwrap();
    }
    println!(
        "{} requests in {:?}",
        concurrency * requests_per_task,
        start.elapsed()
    );
    assert_eq!(total_ok, concurrency * requests_per_task);
}
