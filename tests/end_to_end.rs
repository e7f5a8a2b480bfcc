//! End-to-end tests against a running server and a real deploy command.

#![cfg(unix)]

use std::time::{Duration, Instant};

mod common;

use common::{client, recorded_calls, start_hook_server, test_config, write_deploy_script, write_projects};

#[tokio::test]
async fn test_list_hooks_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha", "beta", "alpha"]);
    let script = write_deploy_script(dir.path(), "echo done");
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let res = client().get(format!("http://{}/hooks", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let names: Vec<String> = res.json().await.unwrap();
    assert_eq!(names, vec!["alpha", "beta", "alpha"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_deploy_from_localhost() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let script = write_deploy_script(dir.path(), "echo \"deployed $2 to $3\"");
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let res = client()
        .post(format!("http://{}/hook/alpha/prod", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OKdeployed alpha to prod\n");
    assert_eq!(recorded_calls(dir.path()), vec!["-y alpha prod"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_forwarded_foreign_address_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let script = write_deploy_script(dir.path(), "echo done");
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let res = client()
        .post(format!("http://{}/hook/alpha/prod", addr))
        .header("X-Forwarded-For", "8.8.8.8")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    assert_eq!(res.text().await.unwrap(), "Unauthorized");
    assert!(recorded_calls(dir.path()).is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_bad_environment_has_no_side_effect() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let script = write_deploy_script(dir.path(), "echo done");
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let res = client()
        .post(format!("http://{}/hook/alpha/staging", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "Not Found");
    assert!(recorded_calls(dir.path()).is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_failing_command_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let script = write_deploy_script(dir.path(), "echo partial; echo 'ssh failed' >&2; exit 2");
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let res = client()
        .post(format!("http://{}/hook/alpha/beta", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "Not Found");
    assert_eq!(recorded_calls(dir.path()), vec!["-y alpha beta"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_deploy_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let script = write_deploy_script(dir.path(), "sleep 5");
    let mut config = test_config(&projects, &script);
    config.deploy.timeout_secs = 1;
    let (addr, shutdown) = start_hook_server(config).await;

    let start = Instant::now();
    let res = client()
        .post(format!("http://{}/hook/alpha/prod", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert!(start.elapsed() < Duration::from_secs(4));

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_deploy_does_not_block_other_requests() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha", "beta"]);
    let script = write_deploy_script(dir.path(), "if [ \"$2\" = alpha ]; then sleep 2; fi; echo ok");
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let slow = tokio::spawn({
        let url = format!("http://{}/hook/alpha/prod", addr);
        async move { client().post(url).send().await.unwrap().status() }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    let start = Instant::now();
    let res = client().get(format!("http://{}/hooks", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = client()
        .post(format!("http://{}/hook/beta/prod", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(start.elapsed() < Duration::from_millis(1500));

    assert_eq!(slow.await.unwrap(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_serialized_targets_run_one_at_a_time() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let script = write_deploy_script(dir.path(), "sleep 1; echo ok");
    let mut config = test_config(&projects, &script);
    config.deploy.serialize_targets = true;
    let (addr, shutdown) = start_hook_server(config).await;

    let url = format!("http://{}/hook/alpha/prod", addr);
    let start = Instant::now();
    let (a, b) = tokio::join!(client().post(&url).send(), client().post(&url).send());
    assert_eq!(a.unwrap().status(), 200);
    assert_eq!(b.unwrap().status(), 200);
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(recorded_calls(dir.path()).len(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_deploy_finishes_after_caller_disconnects() {
    let dir = tempfile::tempdir().unwrap();
    let projects = write_projects(dir.path(), &["alpha"]);
    let finished = dir.path().join("finished");
    let script = write_deploy_script(
        dir.path(),
        &format!("sleep 2; touch \"{}\"", finished.display()),
    );
    let (addr, shutdown) = start_hook_server(test_config(&projects, &script)).await;

    let impatient = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let res = impatient
        .post(format!("http://{}/hook/alpha/prod", addr))
        .send()
        .await;
    assert!(res.is_err());

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(recorded_calls(dir.path()), vec!["-y alpha prod"]);
    assert!(finished.exists());

    shutdown.trigger();
}
