use std::fs::{create_dir_all, write};

use rulebix_publish::content::ResolveOptions;
use rulebix_publish::load_config::{load_config, PublishConfig};
use rulebix_publish::payload::SubmissionPayload;
use rulebix_publish::publish::{publish, PublishJob};
use rulebix_publish::upload::MockPublisher;
use rulebix_publish::PublishError;
use serde_json::json;
use tempfile::tempdir;

fn config() -> PublishConfig {
    load_config(|name| match name {
        "OIDC_TOKEN" => Some("tok".into()),
        "GITHUB_REPOSITORY" => Some("acme/rules".into()),
        "GITHUB_SHA" => Some("cafe".into()),
        _ => None,
    })
    .expect("config should load")
}

#[tokio::test]
async fn test_publish_inlines_skill_and_doc_content() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    create_dir_all(root.join("skills/foo")).unwrap();
    create_dir_all(root.join("skills/bar")).unwrap();
    create_dir_all(root.join("docs")).unwrap();
    write(root.join("skills/foo/SKILL.md"), "foo").unwrap();
    write(root.join("skills/bar/SKILL.md"), "bar").unwrap();
    write(root.join("docs/readme.txt"), "readme").unwrap();
    write(
        root.join("spec.json"),
        r#"{"entries": [
            {"id": "foo", "type": "skill", "path": "skills/foo"},
            {"id": "bar", "type": "skill", "path": "skills/bar/SKILL.md"},
            {"id": "readme", "type": "doc", "path": "docs/readme.txt"}
        ], "owner": "acme"}"#,
    )
    .unwrap();

    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .withf(|payload: &SubmissionPayload| {
            let entries = &payload.config.as_value()["entries"];
            payload.repo == "acme/rules"
                && payload.commit == "cafe"
                && payload.config.as_value()["owner"] == "acme"
                && entries[0]["content"] == "foo"
                && entries[1]["content"] == "bar"
                && entries[2]["content"] == "readme"
        })
        .times(1)
        .returning(|_| Ok(String::new()));

    let job = PublishJob {
        manifest_path: root.join("spec.json"),
        resolve: ResolveOptions::new(root),
    };
    let report = publish(&config(), &job, &publisher)
        .await
        .expect("publish should succeed");

    assert_eq!(report.entries, 3);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn test_publish_stops_on_malformed_manifest() {
    let dir = tempdir().unwrap();
    write(dir.path().join("spec.json"), "[1, 2").unwrap();

    let mut publisher = MockPublisher::new();
    publisher.expect_publish().times(0);

    let job = PublishJob {
        manifest_path: dir.path().join("spec.json"),
        resolve: ResolveOptions::new(dir.path()),
    };
    let err = publish(&config(), &job, &publisher).await.unwrap_err();
    assert!(matches!(err, PublishError::ManifestParse { .. }));
}

#[tokio::test]
async fn test_publish_surfaces_network_errors() {
    let dir = tempdir().unwrap();
    write(dir.path().join("spec.json"), json!({"entries": []}).to_string()).unwrap();

    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .times(1)
        .returning(|_| Err(PublishError::Network("connection refused".into())));

    let job = PublishJob {
        manifest_path: dir.path().join("spec.json"),
        resolve: ResolveOptions::new(dir.path()),
    };
    let err = publish(&config(), &job, &publisher).await.unwrap_err();
    assert!(err.is_network());
}
