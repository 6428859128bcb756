//! Resolution scenarios for the built-in chains.

use inventory_model::{CatalogSnapshot, EntityId, EntityKind, ReferenceCatalog, RoleName};
use inventory_resolve::{
    Chain, ChainBuilder, ChainError, Change, ResolutionEngine, SelectionState, apply_change,
    declared_parent, options_for,
};

fn id(value: u64) -> EntityId {
    EntityId::new(value)
}

fn role(name: &str) -> RoleName {
    RoleName::new(name).unwrap()
}

fn laptop_catalog() -> ReferenceCatalog {
    ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_type(1, "Laptop")
            .with_make(10, 1, "Dell")
            .with_make(11, 1, "HP")
            .with_model(100, 10, "XPS")
            .with_model(101, 11, "EliteBook"),
    )
}

#[test]
fn model_then_sibling_make_scenario() {
    let chain = Chain::asset_model();
    let catalog = laptop_catalog();

    let first = apply_change(&chain, &SelectionState::new(), &catalog, "model", Some(id(100)))
        .unwrap();
    assert_eq!(first.state.get("type"), Some(id(1)));
    assert_eq!(first.state.get("make"), Some(id(10)));
    assert_eq!(first.state.get("model"), Some(id(100)));

    let second = apply_change(&chain, &first.state, &catalog, "make", Some(id(11))).unwrap();
    assert_eq!(second.state.get("type"), Some(id(1)));
    assert_eq!(second.state.get("make"), Some(id(11)));
    assert_eq!(second.state.get("model"), None);
}

#[test]
fn selecting_model_infers_make_and_type() {
    let resolution = apply_change(
        &Chain::asset_model(),
        &SelectionState::new(),
        &laptop_catalog(),
        "model",
        Some(id(100)),
    )
    .unwrap();

    let changes: Vec<(&str, Change)> = resolution
        .changes
        .iter()
        .map(|entry| (entry.role.as_str(), entry.change))
        .collect();
    assert_eq!(
        changes,
        vec![
            ("type", Change::Inferred(id(1))),
            ("make", Change::Inferred(id(10))),
            ("model", Change::Set(id(100))),
        ]
    );
    let inferred: Vec<&str> = resolution
        .changes
        .inferred_roles()
        .into_iter()
        .map(RoleName::as_str)
        .collect();
    assert_eq!(inferred, vec!["type", "make"]);
}

#[test]
fn downstream_clear_unless_valid() {
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_type(1, "Laptop")
            .with_make(10, 1, "Dell")
            .with_make(11, 1, "Lenovo")
            .with_model(100, 10, "Latitude"),
    );
    let state = SelectionState::new()
        .with(role("type"), id(1))
        .with(role("make"), id(10))
        .with(role("model"), id(100));

    let resolution =
        apply_change(&Chain::asset_model(), &state, &catalog, "make", Some(id(11))).unwrap();

    assert_eq!(resolution.state.get("model"), None);
    assert_eq!(resolution.state.get("type"), Some(id(1)));
    assert_eq!(resolution.changes.get("type"), None);
    assert_eq!(resolution.changes.get("model"), Some(Change::Cleared));
}

#[test]
fn dangling_make_keeps_value_and_clears_model() {
    let state = SelectionState::new()
        .with(role("type"), id(1))
        .with(role("make"), id(10))
        .with(role("model"), id(100));

    let resolution = apply_change(
        &Chain::asset_model(),
        &state,
        &laptop_catalog(),
        "make",
        Some(id(999)),
    )
    .unwrap();

    assert_eq!(resolution.state.get("make"), Some(id(999)));
    assert_eq!(resolution.state.get("model"), None);
    assert_eq!(resolution.state.get("type"), Some(id(1)));
    assert!(resolution.changes.inferred_roles().is_empty());
}

#[test]
fn dangling_parent_invalidates_matching_child() {
    // A model pointing at make 999 must not survive under an unresolvable make.
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_type(1, "Laptop")
            .with_model(300, 999, "Ghost"),
    );
    let state = SelectionState::new().with(role("model"), id(300));

    let resolution =
        apply_change(&Chain::asset_model(), &state, &catalog, "make", Some(id(999))).unwrap();

    assert_eq!(resolution.state.get("model"), None);
}

#[test]
fn unresolvable_grandparent_clears_stale_type() {
    // Make 13 belongs to type 4, which the catalog does not contain.
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_type(1, "Laptop")
            .with_make(10, 1, "Dell")
            .with_make(13, 4, "Framework")
            .with_model(100, 10, "XPS")
            .with_model(107, 13, "Laptop 13"),
    );
    let chain = Chain::asset_model();
    let state = SelectionState::new()
        .with(role("type"), id(1))
        .with(role("make"), id(10))
        .with(role("model"), id(100));

    let resolution = apply_change(&chain, &state, &catalog, "model", Some(id(107))).unwrap();

    assert_eq!(resolution.state.get("model"), Some(id(107)));
    assert_eq!(resolution.state.get("make"), Some(id(13)));
    assert_eq!(resolution.state.get("type"), None);
    assert_eq!(resolution.changes.get("type"), Some(Change::Cleared));
    assert_eq!(resolution.changes.get("make"), Some(Change::Inferred(id(13))));

    let again = apply_change(&chain, &resolution.state, &catalog, "model", Some(id(107))).unwrap();
    assert!(again.changes.is_empty());
}

#[test]
fn stored_dangling_parent_is_kept_and_roles_above_cleared() {
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_type(1, "Laptop")
            .with_model(300, 999, "Ghost"),
    );
    let state = SelectionState::new()
        .with(role("type"), id(1))
        .with(role("make"), id(999));

    let resolution =
        apply_change(&Chain::asset_model(), &state, &catalog, "model", Some(id(300))).unwrap();

    assert_eq!(resolution.state.get("make"), Some(id(999)));
    assert_eq!(resolution.state.get("type"), None);
    assert_eq!(resolution.changes.len(), 2);
}

#[test]
fn settled_leaf_reapplication_is_a_no_op() {
    let chain = Chain::asset_model();
    let catalog = laptop_catalog();
    let settled = apply_change(&chain, &SelectionState::new(), &catalog, "model", Some(id(101)))
        .unwrap()
        .state;

    let again = apply_change(&chain, &settled, &catalog, "model", Some(id(101))).unwrap();

    assert_eq!(again.state, settled);
    assert!(again.changes.is_empty());
}

#[test]
fn empty_catalog_degrades_gracefully() {
    let catalog = ReferenceCatalog::default();
    let chain = Chain::asset_model();

    let resolution =
        apply_change(&chain, &SelectionState::new(), &catalog, "model", Some(id(100))).unwrap();
    assert_eq!(resolution.changes.len(), 1);

    let options = options_for(&chain, &resolution.state, &catalog, "make").unwrap();
    assert!(options.is_empty());
}

#[test]
fn filtered_makes_follow_catalog_order() {
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_type(1, "Laptop")
            .with_type(2, "Monitor")
            .with_make(12, 2, "LG")
            .with_make(11, 1, "HP")
            .with_make(13, 2, "Samsung")
            .with_make(10, 1, "Dell"),
    );
    let state = SelectionState::new().with(role("type"), id(1));

    let options = options_for(&Chain::asset_model(), &state, &catalog, "make").unwrap();
    let ids: Vec<EntityId> = options.iter().map(|entity| entity.id()).collect();

    assert_eq!(ids, vec![id(11), id(10)]);
}

#[test]
fn os_chain_infers_operating_system() {
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_os(1, "Windows")
            .with_os(2, "Ubuntu")
            .with_os_version(20, 2, "24.04"),
    );
    let state = SelectionState::new().with(role("os"), id(1));

    let resolution = apply_change(
        &Chain::operating_system(),
        &state,
        &catalog,
        "os_version",
        Some(id(20)),
    )
    .unwrap();

    assert_eq!(resolution.state.get("os"), Some(id(2)));
    assert_eq!(resolution.changes.get("os"), Some(Change::Inferred(id(2))));
}

fn make_of_model_via_name(entity: &inventory_model::EntityRef<'_>) -> Option<EntityId> {
    // Custom key path: models named "Generic" belong to make 11 regardless of their record.
    if entity.name() == "Generic" {
        Some(EntityId::new(11))
    } else {
        entity.parent_id()
    }
}

#[test]
fn engine_uses_declared_parent_key_path() {
    let engine = ResolutionEngine::build(
        ChainBuilder::new("custom")
            .head("make", EntityKind::AssetMake)
            .then("model", EntityKind::AssetModel, "make", make_of_model_via_name),
    )
    .unwrap();
    let catalog = ReferenceCatalog::new(
        CatalogSnapshot::default()
            .with_make(10, 1, "Dell")
            .with_make(11, 1, "HP")
            .with_model(500, 10, "Generic"),
    );

    let resolution = engine
        .apply_change(&SelectionState::new(), &catalog, "model", Some(id(500)))
        .unwrap();

    assert_eq!(resolution.state.get("make"), Some(id(11)));
    assert_eq!(engine.chain().name(), "custom");
}

#[test]
fn malformed_chain_fails_at_engine_construction() {
    let err = ResolutionEngine::build(
        ChainBuilder::new("broken")
            .head("type", EntityKind::AssetType)
            .then("make", EntityKind::AssetMake, "vendor", declared_parent),
    )
    .unwrap_err();
    assert!(matches!(err, ChainError::UnknownParent { .. }));
}

#[test]
fn resolution_is_deterministic() {
    let chain = Chain::asset_model();
    let catalog = laptop_catalog();
    let state = SelectionState::new().with(role("model"), id(101));

    let first = apply_change(&chain, &state, &catalog, "type", Some(id(1))).unwrap();
    let second = apply_change(&chain, &state, &catalog, "type", Some(id(1))).unwrap();

    assert_eq!(first, second);
}

#[test]
fn change_set_serializes_in_chain_order() {
    let resolution = apply_change(
        &Chain::asset_model(),
        &SelectionState::new(),
        &laptop_catalog(),
        "model",
        Some(id(100)),
    )
    .unwrap();

    let json = serde_json::to_value(&resolution.changes).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"role": "type", "change": {"kind": "inferred", "value": 1}},
            {"role": "make", "change": {"kind": "inferred", "value": 10}},
            {"role": "model", "change": {"kind": "set", "value": 100}},
        ])
    );
    let state = serde_json::to_value(&resolution.state).unwrap();
    assert_eq!(state, serde_json::json!({"make": 10, "model": 100, "type": 1}));
}

#[test]
fn role_lookups_accept_any_case() {
    let state = SelectionState::new()
        .with(role("type"), id(1))
        .with(role("make"), id(10))
        .with(role("model"), id(100));

    let resolution = apply_change(
        &Chain::asset_model(),
        &state,
        &laptop_catalog(),
        "MAKE",
        Some(id(11)),
    )
    .unwrap();

    assert_eq!(resolution.changes.get("MAKE"), Some(Change::Set(id(11))));
    assert_eq!(resolution.changes.get(" Model "), Some(Change::Cleared));
    assert_eq!(resolution.state.get("Make"), Some(id(11)));
}
