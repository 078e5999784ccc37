mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn anonymous_page_request_redirects_to_login() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();

    // No page stored and no session: the gate must win over the
    // missing-page redirect
    let res = client
        .get(format!("{}/view/Nonexistent", server.base_url))
        .send()
        .await?;

    assert!(res.status().is_redirection(), "got {}", res.status());
    assert_eq!(common::location(&res), "/login");
    Ok(())
}

#[tokio::test]
async fn anonymous_edit_and_save_are_gated_too() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();

    let res = client
        .get(format!("{}/edit/Anything", server.base_url))
        .send()
        .await?;
    assert!(res.status().is_redirection());
    assert_eq!(common::location(&res), "/login");

    let res = client
        .post(format!("{}/save/Anything", server.base_url))
        .form(&[("body", "should never land")])
        .send()
        .await?;
    assert!(res.status().is_redirection());
    assert_eq!(common::location(&res), "/login");
    Ok(())
}

#[tokio::test]
async fn login_returns_visitor_to_requested_page() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();

    // Knock on a gated page first; the gate hands out an anonymous session
    // that remembers where we were going
    let res = client
        .get(format!("{}/view/ReturnHere", server.base_url))
        .send()
        .await?;
    assert_eq!(common::location(&res), "/login");
    let anon_cookie = common::session_cookie(&res).expect("gate should set a session cookie");

    // Logging in with that session should bounce back to the original path
    let res = client
        .post(format!("{}/session/new", server.base_url))
        .header(reqwest::header::COOKIE, &anon_cookie)
        .send()
        .await?;
    assert!(res.status().is_redirection());
    assert_eq!(common::location(&res), "/view/ReturnHere");
    Ok(())
}

#[tokio::test]
async fn login_without_captured_path_lands_on_front_page() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = common::client()
        .post(format!("{}/session/new", server.base_url))
        .send()
        .await?;

    assert!(res.status().is_redirection());
    assert_eq!(common::location(&res), "/");
    Ok(())
}

#[tokio::test]
async fn logout_redirects_to_front_and_is_idempotent() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();
    let cookie = common::login(server).await?;

    let res = client
        .post(format!("{}/session/destroy", server.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?;
    assert!(res.status().is_redirection());
    assert_eq!(common::location(&res), "/");

    // Revoking an already-anonymous session is not an error
    let res = client
        .post(format!("{}/session/destroy", server.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?;
    assert!(res.status().is_redirection());
    assert_eq!(common::location(&res), "/");
    Ok(())
}

#[tokio::test]
async fn replayed_cookie_after_logout_is_anonymous() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();
    let cookie = common::login(server).await?;

    // Sanity: the session works before logout
    let res = client
        .get(format!("{}/edit/ReplayCheck", server.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    client
        .post(format!("{}/session/destroy", server.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?;

    // Replaying the old cookie must not restore authentication
    let res = client
        .get(format!("{}/edit/ReplayCheck", server.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?;
    assert!(res.status().is_redirection(), "got {}", res.status());
    assert_eq!(common::location(&res), "/login");
    Ok(())
}
