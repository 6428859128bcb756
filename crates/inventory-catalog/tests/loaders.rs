use std::fs;
use std::path::Path;

use inventory_catalog::csv_dir::load_csv_dir;
use inventory_catalog::json::load_json;
use inventory_catalog::{CatalogError, load_catalog};
use inventory_model::{EntityId, EntityKind};

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_csv_directory_with_specs() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("types.csv"), "id,name\n1,Laptop\n2,Monitor\n");
    write(
        &dir.path().join("makes.csv"),
        "id,type_id,name\n10,1,Dell\n11, 1 , HP \n",
    );
    write(
        &dir.path().join("models.csv"),
        "id,make_id,name,cpu,ram\n100,10,XPS,i7,16GB\n101,11,EliteBook,,8GB\n",
    );

    let loaded = load_csv_dir(dir.path()).unwrap();
    let catalog = &loaded.catalog;

    assert_eq!(catalog.len(EntityKind::AssetType), 2);
    let hp = catalog
        .get(EntityKind::AssetMake, EntityId::new(11))
        .expect("make 11");
    assert_eq!(hp.name(), "HP");
    assert_eq!(hp.parent_id(), Some(EntityId::new(1)));

    let models = &catalog.snapshot().models;
    assert_eq!(models[0].specs.get("cpu").map(String::as_str), Some("i7"));
    assert!(!models[1].specs.contains_key("cpu"));
    assert_eq!(models[1].specs.get("ram").map(String::as_str), Some("8GB"));

    // OS files are absent: partial catalog.
    assert_eq!(catalog.len(EntityKind::OperatingSystem), 0);
    let files: Vec<&str> = loaded.sources.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(files, vec!["types.csv", "makes.csv", "models.csv"]);
}

#[test]
fn csv_with_invalid_id_reports_record() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("os_versions.csv"),
        "id,os_id,name\n1,1,10\nx,1,11\n",
    );

    let err = load_csv_dir(dir.path()).unwrap_err();
    match err {
        CatalogError::Csv { path, message } => {
            assert!(path.ends_with("os_versions.csv"));
            assert!(message.contains("record 2"), "{message}");
            assert!(message.contains("invalid id"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn csv_missing_parent_column_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("makes.csv"), "id,name\n10,Dell\n");

    let err = load_csv_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("missing type_id"), "{err}");
}

#[test]
fn loads_json_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    write(
        &path,
        r#"{"operating_systems":[{"id":1,"name":"Windows"}],"os_versions":[{"id":5,"os_id":1,"name":"11"}]}"#,
    );

    let loaded = load_catalog(&path).unwrap();

    assert_eq!(loaded.catalog.len(EntityKind::OsVersion), 1);
    assert_eq!(loaded.catalog.len(EntityKind::AssetType), 0);
    assert_eq!(loaded.sources.len(), 1);
    assert_eq!(loaded.sources[0].path, "catalog.json");
    assert_eq!(loaded.sources[0].sha256.len(), 64);
}

#[test]
fn load_catalog_dispatches_on_directories() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("operating_systems.csv"), "id,name\n3,Ubuntu\n");

    let loaded = load_catalog(dir.path()).unwrap();

    assert!(loaded.catalog.contains(EntityKind::OperatingSystem, EntityId::new(3)));
}

#[test]
fn malformed_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    write(&path, "{\"types\": [");

    let err = load_json(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Json { .. }));
}

#[test]
fn missing_json_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_json(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}
