//! Integration tests for the scan → reconcile → rescan → export workflow.
//! Tests: override precedence, idempotent resolution, group keys, export gating

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use saveid_core::{
    CatalogIndex, CatalogRecord, Confidence, ExportPlan, GameId, ManualMappingStore,
    MappingSnapshot, Resolver, ResolverOptions, SaveIdError, SourceTag, UnresolvedGroupKey, score,
};

fn catalog() -> Arc<CatalogIndex> {
    Arc::new(
        CatalogIndex::builder()
            .with_record(CatalogRecord::new("T-1201N", "Sonic Adventure", "US"))
            .with_record(CatalogRecord::new("T-1201X", "Sonic Adventure (Rev 1)", "US"))
            .with_record(CatalogRecord::new("HDR-0178", "Shenmue", "JP"))
            .with_record(CatalogRecord::new("MK-51059", "Crazy Taxi", "EU"))
            .build(),
    )
}

fn resolver(mappings: MappingSnapshot) -> Resolver {
    Resolver::new(
        catalog(),
        Arc::new(mappings),
        ResolverOptions::builder().parallel(false).build(),
    )
}

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(&path, b"vmu").expect("write save");
    path
}

#[test]
fn manual_override_beats_detection() {
    let resolver = resolver(MappingSnapshot::from_entries([("T-1201N", "T-1201X")]));
    let result = resolver.resolve(Path::new("/cards/T1201N"), "save.vmu");
    assert_eq!(result.id, GameId::Known("T-1201X".into()));
    assert_eq!(result.confidence, Confidence::Manual);
    assert_eq!(result.source, SourceTag::UserConfirmed);
}

#[test]
fn resolution_is_idempotent() {
    let resolver = resolver(MappingSnapshot::from_entries([("HDR-0178", "T-1201N")]));
    for (folder, name) in [
        ("/cards/HDR0178", "a.vmu"),
        ("/cards/misc", "T-1201N.vmu"),
        ("/cards/misc", "nothing.vmu"),
    ] {
        let first = resolver.resolve(Path::new(folder), name);
        let second = resolver.resolve(Path::new(folder), name);
        assert_eq!(first, second, "{folder}/{name}");
    }
}

#[test]
fn exact_id_query_scores_maximum() {
    let catalog = catalog();
    for record in catalog.records() {
        assert_eq!(
            score(&record.id, &record.id, &record.title, &record.region),
            10_000,
            "{}",
            record.id
        );
    }
}

#[test]
fn group_keys_differ_per_folder() {
    let folders = ["/a/Misc", "/b/Misc", "/a/misc", "/a/Misc/Misc"];
    let keys: HashSet<_> = folders
        .iter()
        .map(|f| UnresolvedGroupKey::for_folder(Path::new(f)))
        .collect();
    assert_eq!(keys.len(), folders.len());
}

#[test]
fn scan_reconcile_rescan_export() {
    let source = tempfile::tempdir().expect("source dir");
    let state = tempfile::tempdir().expect("state dir");
    let output = tempfile::tempdir().expect("output dir");

    touch(source.path(), "T1201N Sonic/a.vmu");
    touch(source.path(), "misc/HDR0178.vmu");
    touch(source.path(), "Mystery Disc/one.vmu");
    touch(source.path(), "Mystery Disc/two.VMU");
    touch(source.path(), "Mystery Disc/icon.bin");

    let (mut store, warning) = ManualMappingStore::in_dir(state.path());
    assert!(warning.is_none());
    let resolver = Resolver::new(
        catalog(),
        store.snapshot(),
        ResolverOptions::builder().parallel(false).build(),
    );

    let first = resolver.scan_tree(source.path()).expect("first scan");
    assert_eq!(first.files.len(), 4);
    assert_eq!(first.matched_games(), 2);
    assert_eq!(first.unmatched_groups(), 1);
    assert_eq!(first.unmatched_files(), 2);

    match ExportPlan::from_report(&first, output.path()) {
        Err(SaveIdError::UnresolvedFiles { count, .. }) => assert_eq!(count, 2),
        other => panic!("export should be refused, got {other:?}"),
    }

    let mut session = resolver.reconcile(&first);
    assert_eq!(session.suggested_query().as_deref(), Some("Mystery Disc"));
    session.confirm("T-1201N").expect("confirm");
    assert!(session.is_finished());
    let outcome = session.finish(&mut store).expect("finish");
    assert_eq!(outcome.confirmed, 1);
    assert_eq!(outcome.snapshot.generation(), 1);

    let resolver = resolver.reload(&store);
    let second = resolver.scan_tree(source.path()).expect("second scan");
    assert_eq!(second.unmatched_groups(), 0);
    assert_eq!(second.unmatched_files(), 0);
    let sonic: Vec<_> = second
        .files_for(&GameId::Known("T-1201N".into()))
        .map(|f| (f.file_name.as_str(), f.detection.source))
        .collect();
    assert_eq!(
        sonic,
        vec![
            ("one.vmu", SourceTag::UserConfirmed),
            ("two.VMU", SourceTag::UserConfirmed),
            ("a.vmu", SourceTag::Path),
        ]
    );

    let plan = ExportPlan::from_report(&second, output.path()).expect("export plan");
    let mut names: Vec<_> = plan
        .entries
        .iter()
        .filter_map(|e| e.destination.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["HDR-0178-1.vmu", "T-1201N-1.vmu", "T-1201N-2.vmu", "T-1201N-3.vmu"]
    );
    assert!(
        plan.entries
            .iter()
            .all(|e| e.destination.starts_with(output.path().join("Dreamcast")))
    );
}

#[test]
fn stale_resolver_keeps_its_snapshot() {
    let state = tempfile::tempdir().expect("state dir");
    let (mut store, _) = ManualMappingStore::in_dir(state.path());
    let before = Resolver::new(catalog(), store.snapshot(), ResolverOptions::default());

    store
        .confirm_batch([("HDR-0178", "MK-51059")])
        .expect("confirm");
    let after = before.reload(&store);

    let folder = Path::new("/cards/HDR-0178");
    assert_eq!(before.resolve(folder, "a.vmu").id, GameId::Known("HDR-0178".into()));
    assert_eq!(after.resolve(folder, "a.vmu").id, GameId::Known("MK-51059".into()));
    assert_eq!(after.mappings().generation(), 1);
}

#[test]
fn confirmed_folder_with_trailing_space_stays_resolved() {
    let source = tempfile::tempdir().expect("source dir");
    let state = tempfile::tempdir().expect("state dir");
    touch(source.path(), "Misc /one.vmu");

    let (mut store, _) = ManualMappingStore::in_dir(state.path());
    let resolver = Resolver::new(
        catalog(),
        store.snapshot(),
        ResolverOptions::builder().parallel(false).build(),
    );
    let first = resolver.scan_tree(source.path()).expect("first scan");
    assert_eq!(first.unmatched_groups(), 1);
    let key = first.unresolved[0].key.clone();
    assert!(key.as_str().ends_with("Misc "));

    let mut session = resolver.reconcile(&first);
    session.confirm("HDR-0178").expect("confirm");
    session.finish(&mut store).expect("finish");
    assert_eq!(store.snapshot().get(key.as_str()), Some("HDR-0178"));

    let second = resolver
        .reload(&store)
        .scan_tree(source.path())
        .expect("second scan");
    assert_eq!(second.unmatched_files(), 0);
    assert_eq!(
        second.files[0].detection.id,
        GameId::Known("HDR-0178".into())
    );
    assert_eq!(second.files[0].detection.confidence, Confidence::Manual);
}
