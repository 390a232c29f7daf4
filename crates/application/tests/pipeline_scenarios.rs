mod support;

use std::sync::Arc;

use application::{SyncOptions, TagPipeline};
use chrono::Utc;
use domain::{ExistingTag, PipelineError, TagTemplate, Tagger};
use support::{MockHost, MockOrg, MockRepo, StaticCandidates, StaticManifest, candidate_map, manifest_map};

fn options() -> SyncOptions {
    SyncOptions {
        org: "lsst".to_string(),
        candidate: "w_2018_18".to_string(),
        manifest: "b3595".to_string(),
        allow_teams: vec!["Data Management".to_string()],
        deny_teams: vec![],
        external_teams: vec![],
        ignore_version: false,
        force_tag: false,
        dry_run: false,
        limit: None,
        fail_fast: false,
    }
}

fn template() -> TagTemplate {
    TagTemplate {
        name: "w.2018.18".to_string(),
        message: "Version w.2018.18 release from w_2018_18/b3595".to_string(),
        tagger: Tagger::new("Jane Doe", "jane@example.org", Utc::now()),
    }
}

fn pipeline(org: Arc<MockOrg>, opts: SyncOptions) -> TagPipeline {
    TagPipeline::new(
        MockHost::new(org),
        Arc::new(StaticCandidates(candidate_map(&[("pkgA", "w_2018_18")]))),
        Arc::new(StaticManifest(manifest_map(&[(
            "pkgA",
            "w_2018_18",
            "abc123",
        )]))),
        opts,
    )
}

#[tokio::test]
async fn new_tag_is_created_end_to_end() {
    let org = MockOrg::new("lsst");
    let repo = MockRepo::new("lsst/pkgA", &["Data Management"]).build();
    org.add_repo(repo.clone());

    let applied = pipeline(org, options()).run(&template()).await.unwrap();
    assert_eq!(applied, 1);

    let created_tags = repo.created_tags.lock().unwrap();
    assert_eq!(created_tags[0].sha, "abc123");
    assert_eq!(created_tags[0].name, "w.2018.18");

    let created_refs = repo.created_refs.lock().unwrap();
    assert_eq!(
        created_refs.as_slice(),
        [("w.2018.18".to_string(), "tagobj-abc123".to_string())]
    );
}

#[tokio::test]
async fn in_sync_tag_means_no_mutation_and_success() {
    let tpl = template();
    let org = MockOrg::new("lsst");
    let repo = MockRepo::new("lsst/pkgA", &["Data Management"])
        .with_existing_tag(ExistingTag {
            sha: "tagobj-old".to_string(),
            name: tpl.name.clone(),
            message: tpl.message.clone(),
            tagger: Tagger::new("Jane Doe", "jane@example.org", Utc::now()),
            object_sha: "abc123".to_string(),
        })
        .build();
    org.add_repo(repo.clone());

    let applied = pipeline(org, options()).run(&tpl).await.unwrap();
    assert_eq!(applied, 0);
    assert!(repo.created_tags.lock().unwrap().is_empty());
    assert!(repo.created_refs.lock().unwrap().is_empty());
    assert!(repo.updated_refs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_manifest_entry_yields_one_aggregated_error() {
    let org = MockOrg::new("lsst");
    org.add_repo(MockRepo::new("lsst/pkgA", &["Data Management"]).build());

    let pipeline = TagPipeline::new(
        MockHost::new(org),
        Arc::new(StaticCandidates(candidate_map(&[
            ("pkgA", "w_2018_18"),
            ("pkgB", "w_2018_18"),
        ]))),
        Arc::new(StaticManifest(manifest_map(&[(
            "pkgA",
            "w_2018_18",
            "abc123",
        )]))),
        options(),
    );

    let err = pipeline.run(&template()).await.unwrap_err();
    match err {
        PipelineError::Aggregated(agg) => {
            assert_eq!(agg.count(), 1);
            assert_eq!(agg.exit_code(), 1);
        }
        other => panic!("expected aggregated error, got {other:?}"),
    }
}

#[tokio::test]
async fn dry_run_reaches_the_applier_but_mutates_nothing() {
    let org = MockOrg::new("lsst");
    let repo = MockRepo::new("lsst/pkgA", &["Data Management"]).build();
    org.add_repo(repo.clone());

    let mut opts = options();
    opts.dry_run = true;

    let applied = pipeline(org, opts).run(&template()).await.unwrap();
    assert_eq!(applied, 1);
    assert!(repo.created_tags.lock().unwrap().is_empty());
    assert!(repo.created_refs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn limit_caps_products_after_cross_reference() {
    let org = MockOrg::new("lsst");
    let first = MockRepo::new("lsst/pkgA", &["Data Management"]).build();
    let second = MockRepo::new("lsst/pkgB", &["Data Management"]).build();
    org.add_repo(first.clone());
    org.add_repo(second.clone());

    let mut opts = options();
    opts.limit = Some(1);

    let pipeline = TagPipeline::new(
        MockHost::new(org),
        Arc::new(StaticCandidates(candidate_map(&[
            ("pkgA", "w_2018_18"),
            ("pkgB", "w_2018_18"),
        ]))),
        Arc::new(StaticManifest(manifest_map(&[
            ("pkgA", "w_2018_18", "abc123"),
            ("pkgB", "w_2018_18", "def456"),
        ]))),
        opts,
    );

    let applied = pipeline.run(&template()).await.unwrap();
    assert_eq!(applied, 1);
    assert_eq!(first.created_refs.lock().unwrap().len(), 1);
    assert!(second.created_refs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn forced_move_repoints_existing_conflicting_ref() {
    let tpl = template();
    let org = MockOrg::new("lsst");
    let repo = MockRepo::new("lsst/pkgA", &["Data Management"])
        .with_existing_tag(ExistingTag {
            sha: "tagobj-old".to_string(),
            name: tpl.name.clone(),
            message: tpl.message.clone(),
            tagger: Tagger::new("Jane Doe", "jane@example.org", Utc::now()),
            object_sha: "0ldc0mm1t".to_string(),
        })
        .build();
    org.add_repo(repo.clone());

    let mut opts = options();
    opts.force_tag = true;

    let applied = pipeline(org, opts).run(&tpl).await.unwrap();
    assert_eq!(applied, 1);
    assert!(repo.created_refs.lock().unwrap().is_empty());
    assert_eq!(
        repo.updated_refs.lock().unwrap().as_slice(),
        [("w.2018.18".to_string(), "tagobj-abc123".to_string())]
    );
}
