use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    pages_dir: tempfile::TempDir,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Fresh page directory per server so tests never see stale pages
        let pages_dir = tempfile::tempdir().context("failed to create pages dir")?;

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/wikid");
        cmd.env("WIKID_PORT", port.to_string())
            .env("WIKID_PAGES_DIR", pages_dir.path().join("pages"))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, pages_dir, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        wait_ready(&self.base_url, timeout).await
    }
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    loop {
        if Instant::now() > deadline { break; }
        let url = format!("{}/health", base_url);
        match client.get(&url).send().await {
            Ok(resp) => {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            Err(_) => {}
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}

/// A server with its own page directory, for tests that sabotage storage and
/// must not disturb the shared instance.
#[allow(dead_code)]
pub struct IsolatedServer {
    pub base_url: String,
    pub pages_path: std::path::PathBuf,
    #[allow(dead_code)]
    dir: tempfile::TempDir,
    #[allow(dead_code)]
    child: Child,
}

#[allow(dead_code)]
pub async fn spawn_isolated() -> Result<IsolatedServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let dir = tempfile::tempdir().context("failed to create pages dir")?;
    let pages_path = dir.path().join("pages");

    let mut cmd = Command::new("target/debug/wikid");
    cmd.env("WIKID_PORT", port.to_string())
        .env("WIKID_PAGES_DIR", &pages_path)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let child = cmd.spawn().context("failed to spawn server binary")?;
    wait_ready(&base_url, Duration::from_secs(10)).await?;

    Ok(IsolatedServer { base_url, pages_path, dir, child })
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that never follows redirects, so Location headers stay observable.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

/// Extract the Location header from a redirect response.
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Extract the session cookie pair (`name=value`) from a Set-Cookie header.
pub fn session_cookie(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("wikid_session="))
        .map(|pair| pair.to_string())
}

/// Log in and return the authenticated session cookie pair.
pub async fn login(server: &TestServer) -> Result<String> {
    let resp = client()
        .post(format!("{}/session/new", server.base_url))
        .send()
        .await?;

    anyhow::ensure!(
        resp.status().is_redirection(),
        "login should redirect, got {}",
        resp.status()
    );

    session_cookie(&resp).context("login response carried no session cookie")
}
