// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the stack registry and the layout generator
//!
//! These tests verify critical invariants:
//! 1. Layout safety - no two active stacks overlap or share a number
//! 2. Pairing - size changes land on both partners or on neither
//! 3. Occupancy - capacity always bounds occupancy, occupied stacks stay
//! 4. Generation - partial batches, clones and the reference template

use stackyard::error::{GenerationError, RegistryError};
use stackyard::generator::GridSpec;
use stackyard::registry::StackRegistry;
use stackyard::store::DepotStore;
use stackyard::types::{
    ContainerSize, Dimensions, NewStack, Position, Section, Stack, StackPatch, Yard,
};
use stackyard::validator::LayoutRules;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const TANTARELLI_SECTIONS: [&str; 3] = ["Top Section", "Center Section", "Bottom Section"];

fn make_registry() -> StackRegistry<DepotStore> {
    StackRegistry::new(DepotStore::new(), LayoutRules::default()).with_operator("test")
}

/// Add a yard with the given sections, returning the yard ID
fn add_yard(registry: &mut StackRegistry<DepotStore>, code: &str, sections: &[&str]) -> String {
    let yard = Yard::new(code, &format!("{code} Depot"), 1000);
    let yard_id = yard.id.clone();
    registry.store_mut().add_yard(yard).unwrap();
    for name in sections {
        registry
            .store_mut()
            .add_section(Section::new(&yard_id, name))
            .unwrap();
    }
    yard_id
}

fn section_id(yard_id: &str, name: &str) -> String {
    Section::generate_id(yard_id, name)
}

fn make_stack(number: u32, x: f64, y: f64, size: ContainerSize) -> NewStack {
    NewStack {
        stack_number: number,
        rows: 4,
        max_tiers: 5,
        position: Position::new(x, y),
        dimensions: Dimensions::new(25.0, 60.0),
        container_size: size,
        is_special_stack: false,
        assigned_client_code: None,
    }
}

fn size_patch(size: ContainerSize) -> StackPatch {
    StackPatch {
        container_size: Some(size),
        ..StackPatch::default()
    }
}

fn stored(registry: &StackRegistry<DepotStore>, yard_id: &str, number: u32) -> Stack {
    registry.find_by_number(yard_id, number).unwrap().unwrap()
}

/// Yard "P" with two 20ft stacks that form a pair
fn paired_yard(a: u32, b: u32) -> (StackRegistry<DepotStore>, String, String) {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "P", &["Top"]);
    let section = section_id(&yard, "Top");
    registry
        .create_stack(&yard, &section, make_stack(a, 0.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    registry
        .create_stack(&yard, &section, make_stack(b, 100.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    (registry, yard, section)
}

// =============================================================================
// Invariant 1: Layout Safety
// =============================================================================

#[test]
fn test_overlap_then_free_spot() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["top"]);
    let top = section_id(&yard, "top");

    let mut first = make_stack(1, 0.0, 0.0, ContainerSize::Twenty);
    first.dimensions = Dimensions::new(80.0, 60.0);
    let first = registry.create_stack(&yard, &top, first).unwrap();
    assert_eq!(first.capacity, first.rows * first.max_tiers);

    let mut second = make_stack(2, 10.0, 10.0, ContainerSize::Twenty);
    second.dimensions = Dimensions::new(80.0, 60.0);
    let err = registry
        .create_stack(&yard, &top, second.clone())
        .unwrap_err();
    let failure = err.validation().expect("overlap is a validation failure");
    assert!(failure
        .errors
        .iter()
        .any(|e| e.contains("overlaps with existing stack(s): 1")));

    second.position = Position::new(200.0, 0.0);
    let second = registry.create_stack(&yard, &top, second).unwrap();
    assert_eq!(second.stack_number, 2);
    assert_eq!(registry.list_stacks(&yard).unwrap().len(), 2);
}

#[test]
fn test_touching_edges_follow_rules() {
    let mut strict = make_registry();
    let yard = add_yard(&mut strict, "A", &["Top"]);
    let top = section_id(&yard, "Top");
    strict
        .create_stack(&yard, &top, make_stack(2, 0.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    // Shares the x = 25 edge with stack 2
    assert!(strict
        .create_stack(&yard, &top, make_stack(4, 25.0, 0.0, ContainerSize::Twenty))
        .is_err());

    let rules = LayoutRules {
        touching_edges_conflict: false,
        ..LayoutRules::default()
    };
    let mut relaxed = StackRegistry::new(DepotStore::new(), rules);
    let yard = add_yard(&mut relaxed, "B", &["Top"]);
    let top = section_id(&yard, "Top");
    relaxed
        .create_stack(&yard, &top, make_stack(2, 0.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    relaxed
        .create_stack(&yard, &top, make_stack(4, 25.0, 0.0, ContainerSize::Twenty))
        .unwrap();
}

#[test]
fn test_duplicate_number_rejected_in_yard_only() {
    let mut registry = make_registry();
    let a = add_yard(&mut registry, "A", &["Top"]);
    let b = add_yard(&mut registry, "B", &["Top"]);

    registry
        .create_stack(&a, &section_id(&a, "Top"), make_stack(2, 0.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    let err = registry
        .create_stack(&a, &section_id(&a, "Top"), make_stack(2, 500.0, 0.0, ContainerSize::Twenty))
        .unwrap_err();
    assert!(err.to_string().contains("Stack number 2 already exists"));

    // Same number and position in another yard is fine
    registry
        .create_stack(&b, &section_id(&b, "Top"), make_stack(2, 0.0, 0.0, ContainerSize::Twenty))
        .unwrap();
}

#[test]
fn test_all_errors_reported_together() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);

    let mut bad = make_stack(0, 0.0, 0.0, ContainerSize::Twenty);
    bad.rows = 11;
    bad.max_tiers = 0;
    bad.dimensions = Dimensions::new(0.0, -1.0);
    let err = registry
        .create_stack(&yard, "section:a:missing", bad)
        .unwrap_err();

    let failure = err.validation().unwrap();
    assert!(failure.errors.len() >= 6, "{:?}", failure.errors);
    assert!(registry.list_stacks(&yard).unwrap().is_empty());
}

#[test]
fn test_validation_warnings_do_not_block() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let mut tall = make_stack(2, 0.0, 0.0, ContainerSize::Twenty);
    tall.rows = 8;
    tall.max_tiers = 7;

    let result = registry
        .validate_candidate(&yard, &section_id(&yard, "Top"), &tall)
        .unwrap();
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 2);

    let stack = registry
        .create_stack(&yard, &section_id(&yard, "Top"), tall)
        .unwrap();
    assert_eq!(stack.capacity, 56);
}

// =============================================================================
// Invariant 2: Pairing
// =============================================================================

#[test]
fn test_paired_update_moves_both_stacks() {
    let (mut registry, yard, _) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);

    let updated = registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Forty))
        .unwrap();

    assert_eq!(updated.container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 7).container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 9).container_size, ContainerSize::Forty);
}

#[test]
fn test_paired_narrowing_follows_when_sizes_matched() {
    let (mut registry, yard, _) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);
    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Forty))
        .unwrap();

    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Twenty))
        .unwrap();

    assert_eq!(stored(&registry, &yard, 7).container_size, ContainerSize::Twenty);
    assert_eq!(stored(&registry, &yard, 9).container_size, ContainerSize::Twenty);
}

#[test]
fn test_pairing_is_all_or_nothing() {
    let (mut registry, yard, _) = paired_yard(3, 5);
    let three = stored(&registry, &yard, 3);
    let five = stored(&registry, &yard, 5);
    registry.set_occupancy(&yard, &five.id, 2).unwrap();

    let err = registry
        .update_stack(&yard, &three.id, &size_patch(ContainerSize::Forty))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
    assert!(err.to_string().contains("Pairing partner stack 5"));

    assert_eq!(stored(&registry, &yard, 3).container_size, ContainerSize::Twenty);
    assert_eq!(stored(&registry, &yard, 5).container_size, ContainerSize::Twenty);
}

#[test]
fn test_partner_must_exist_for_forty() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let top = section_id(&yard, "Top");

    let err = registry
        .create_stack(&yard, &top, make_stack(11, 0.0, 0.0, ContainerSize::Forty))
        .unwrap_err();
    assert!(err.to_string().contains("not present"));

    let err = registry
        .create_stack(&yard, &top, make_stack(2, 0.0, 0.0, ContainerSize::Forty))
        .unwrap_err();
    assert!(err.to_string().contains("no valid pairing partner"));
}

#[test]
fn test_create_forty_updates_existing_partner() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let top = section_id(&yard, "Top");
    registry
        .create_stack(&yard, &top, make_stack(13, 0.0, 0.0, ContainerSize::Twenty))
        .unwrap();

    registry
        .create_stack(&yard, &top, make_stack(11, 100.0, 0.0, ContainerSize::Forty))
        .unwrap();

    assert_eq!(stored(&registry, &yard, 13).container_size, ContainerSize::Forty);
}

#[test]
fn test_twenty_cannot_join_forty_pair() {
    let (mut registry, yard, section) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);
    let nine = stored(&registry, &yard, 9);
    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Forty))
        .unwrap();
    registry.delete_stack(&yard, &nine.id).unwrap();

    let err = registry
        .create_stack(&yard, &section, make_stack(9, 100.0, 0.0, ContainerSize::Twenty))
        .unwrap_err();
    assert!(err.to_string().contains("stack 9 must match"));
}

#[test]
fn test_special_stack_stays_twenty() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let top = section_id(&yard, "Top");

    let mut special = make_stack(1, 0.0, 0.0, ContainerSize::Twenty);
    special.is_special_stack = true;
    let special = registry.create_stack(&yard, &top, special).unwrap();

    let err = registry
        .update_stack(&yard, &special.id, &size_patch(ContainerSize::Forty))
        .unwrap_err();
    assert!(err.to_string().contains("special stack"));
    assert_eq!(stored(&registry, &yard, 1).container_size, ContainerSize::Twenty);

    let mut forty_special = make_stack(31, 200.0, 0.0, ContainerSize::Forty);
    forty_special.is_special_stack = true;
    assert!(registry.create_stack(&yard, &top, forty_special).is_err());
}

#[test]
fn test_marking_special_narrows_size() {
    let (mut registry, yard, _) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);
    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Both))
        .unwrap();

    let patch = StackPatch {
        is_special_stack: Some(true),
        ..StackPatch::default()
    };
    let updated = registry.update_stack(&yard, &seven.id, &patch).unwrap();

    assert!(updated.is_special_stack);
    assert_eq!(updated.container_size, ContainerSize::Twenty);
    assert_eq!(stored(&registry, &yard, 9).container_size, ContainerSize::Twenty);
}

#[test]
fn test_marking_special_rejected_when_partner_holds_forty() {
    let (mut registry, yard, _) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);
    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Both))
        .unwrap();
    let nine = stored(&registry, &yard, 9);
    registry.set_occupancy(&yard, &nine.id, 2).unwrap();

    let patch = StackPatch {
        is_special_stack: Some(true),
        ..StackPatch::default()
    };
    let err = registry.update_stack(&yard, &seven.id, &patch).unwrap_err();
    assert!(err.to_string().contains("Pairing partner stack 9"));

    let seven = stored(&registry, &yard, 7);
    assert!(!seven.is_special_stack);
    assert_eq!(seven.container_size, ContainerSize::Both);
    assert_eq!(stored(&registry, &yard, 9).container_size, ContainerSize::Both);
}

fn renumber_patch(number: u32) -> StackPatch {
    StackPatch {
        stack_number: Some(number),
        ..StackPatch::default()
    }
}

#[test]
fn test_renumbering_forty_moves_the_pair() {
    let (mut registry, yard, section) = paired_yard(3, 5);
    registry
        .create_stack(&yard, &section, make_stack(13, 200.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    let three = stored(&registry, &yard, 3);
    registry
        .update_stack(&yard, &three.id, &size_patch(ContainerSize::Forty))
        .unwrap();

    let moved = registry
        .update_stack(&yard, &three.id, &renumber_patch(11))
        .unwrap();

    assert_eq!(moved.stack_number, 11);
    assert_eq!(moved.container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 13).container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 5).container_size, ContainerSize::Twenty);
    assert!(registry.find_by_number(&yard, 3).unwrap().is_none());
}

#[test]
fn test_renumbering_forty_rejected_without_partner() {
    let (mut registry, yard, _) = paired_yard(3, 5);
    let three = stored(&registry, &yard, 3);
    registry
        .update_stack(&yard, &three.id, &size_patch(ContainerSize::Forty))
        .unwrap();

    let err = registry
        .update_stack(&yard, &three.id, &renumber_patch(11))
        .unwrap_err();
    assert!(err.to_string().contains("not present"));

    assert_eq!(stored(&registry, &yard, 3).container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 5).container_size, ContainerSize::Forty);
}

#[test]
fn test_renumbering_forty_rejected_when_new_partner_occupied() {
    let (mut registry, yard, section) = paired_yard(3, 5);
    let thirteen = registry
        .create_stack(&yard, &section, make_stack(13, 200.0, 0.0, ContainerSize::Twenty))
        .unwrap();
    registry.set_occupancy(&yard, &thirteen.id, 4).unwrap();
    let three = stored(&registry, &yard, 3);
    registry
        .update_stack(&yard, &three.id, &size_patch(ContainerSize::Forty))
        .unwrap();

    let err = registry
        .update_stack(&yard, &three.id, &renumber_patch(11))
        .unwrap_err();
    assert!(err.to_string().contains("incompatible"));

    assert_eq!(stored(&registry, &yard, 3).container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 5).container_size, ContainerSize::Forty);
    assert_eq!(stored(&registry, &yard, 13).container_size, ContainerSize::Twenty);
}

#[test]
fn test_renumbering_twenty_cannot_join_forty_pair() {
    let (mut registry, yard, section) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);
    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Forty))
        .unwrap();
    let nine = stored(&registry, &yard, 9);
    registry.delete_stack(&yard, &nine.id).unwrap();
    let spare = registry
        .create_stack(&yard, &section, make_stack(13, 200.0, 0.0, ContainerSize::Twenty))
        .unwrap();

    let err = registry
        .update_stack(&yard, &spare.id, &renumber_patch(9))
        .unwrap_err();
    assert!(err.to_string().contains("stack 9 must match"));
    assert_eq!(stored(&registry, &yard, 13).stack_number, 13);
}

// =============================================================================
// Invariant 3: Occupancy
// =============================================================================

#[test]
fn test_occupied_stack_cannot_be_deleted() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let stack = registry
        .create_stack(
            &yard,
            &section_id(&yard, "Top"),
            make_stack(2, 0.0, 0.0, ContainerSize::Twenty),
        )
        .unwrap();
    registry.set_occupancy(&yard, &stack.id, 3).unwrap();

    let err = registry.delete_stack(&yard, &stack.id).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::OccupiedStack {
            stack_number: 2,
            occupancy: 3
        }
    ));
    assert!(registry.get_stack(&yard, &stack.id).unwrap().is_some());

    registry.set_occupancy(&yard, &stack.id, 0).unwrap();
    registry.delete_stack(&yard, &stack.id).unwrap();
    assert!(registry.list_stacks(&yard).unwrap().is_empty());
}

#[test]
fn test_shrinking_below_occupancy_is_rejected() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let stack = registry
        .create_stack(
            &yard,
            &section_id(&yard, "Top"),
            make_stack(2, 0.0, 0.0, ContainerSize::Twenty),
        )
        .unwrap();
    registry.set_occupancy(&yard, &stack.id, 18).unwrap();
    let before = stored(&registry, &yard, 2);

    let patch = StackPatch {
        rows: Some(3),
        ..StackPatch::default()
    };
    let err = registry.update_stack(&yard, &stack.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::CapacityViolation {
            occupancy: 18,
            capacity: 15,
            ..
        }
    ));
    assert_eq!(stored(&registry, &yard, 2), before);
}

#[test]
fn test_occupied_stack_cannot_narrow() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let err = registry
        .create_stack(
            &yard,
            &section_id(&yard, "Top"),
            make_stack(2, 0.0, 0.0, ContainerSize::Both),
        )
        .unwrap_err();
    // 2 has no partner, so "both" is refused outright
    assert!(err.to_string().contains("no valid pairing partner"));

    let (mut registry, yard, _) = paired_yard(7, 9);
    let seven = stored(&registry, &yard, 7);
    registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Both))
        .unwrap();
    registry.set_occupancy(&yard, &seven.id, 1).unwrap();

    let err = registry
        .update_stack(&yard, &seven.id, &size_patch(ContainerSize::Forty))
        .unwrap_err();
    assert!(err.to_string().contains("would not accept"));
}

#[test]
fn test_update_moves_stack_without_self_overlap() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let stack = registry
        .create_stack(
            &yard,
            &section_id(&yard, "Top"),
            make_stack(2, 0.0, 0.0, ContainerSize::Twenty),
        )
        .unwrap();

    // New footprint overlaps the stack's own old footprint only
    let patch = StackPatch {
        position: Some(Position::new(10.0, 0.0)),
        ..StackPatch::default()
    };
    let moved = registry.update_stack(&yard, &stack.id, &patch).unwrap();
    assert_eq!(moved.position.x, 10.0);
    assert_eq!(moved.id, stack.id);
}

#[test]
fn test_concurrent_writers_cannot_both_win() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "A", &["Top"]);
    let top = section_id(&yard, "Top");
    let shared = Arc::new(Mutex::new(registry));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let shared = Arc::clone(&shared);
            let yard = yard.clone();
            let top = top.clone();
            thread::spawn(move || {
                // Every writer targets the same spot with a different number
                let candidate = make_stack(100 + i * 2, 0.0, 0.0, ContainerSize::Twenty);
                let mut registry = shared.lock().unwrap();
                registry.create_stack(&yard, &top, candidate).is_ok()
            })
        })
        .collect();

    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(wins, 1);
    assert_eq!(shared.lock().unwrap().list_stacks(&yard).unwrap().len(), 1);
}

// =============================================================================
// Invariant 4: Generation
// =============================================================================

#[test]
fn test_tantarelli_into_fresh_yard() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "TNT", &TANTARELLI_SECTIONS);

    let report = registry.generate_tantarelli(&yard).unwrap();
    assert_eq!(report.created_count(), 50);
    assert_eq!(report.skipped_count(), 0);
    assert!(report.warnings.is_empty());

    let s31 = stored(&registry, &yard, 31);
    assert!(s31.is_special_stack);
    assert_eq!(s31.container_size, ContainerSize::Twenty);
    assert_eq!(s31.section_id, section_id(&yard, "Top Section"));

    let s45 = stored(&registry, &yard, 45);
    assert_eq!(s45.container_size, ContainerSize::Both);
    assert_eq!(s45.max_tiers, 5);
    assert_eq!(s45.section_id, section_id(&yard, "Center Section"));

    assert_eq!(
        stored(&registry, &yard, 103).section_id,
        section_id(&yard, "Bottom Section")
    );
}

#[test]
fn test_tantarelli_twice_skips_everything() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "TNT", &TANTARELLI_SECTIONS);
    registry.generate_tantarelli(&yard).unwrap();

    let report = registry.generate_tantarelli(&yard).unwrap();
    assert_eq!(report.created_count(), 0);
    assert_eq!(report.skipped_count(), 50);
    assert!(report.failures[0].reasons[0].contains("already exists"));
    assert_eq!(registry.list_stacks(&yard).unwrap().len(), 50);
}

#[test]
fn test_tantarelli_partial_when_spot_taken() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "TNT", &TANTARELLI_SECTIONS);
    // Occupies the origin of template stack 1
    registry
        .create_stack(
            &yard,
            &section_id(&yard, "Top Section"),
            make_stack(500, 0.0, 0.0, ContainerSize::Twenty),
        )
        .unwrap();

    let report = registry.generate_tantarelli(&yard).unwrap();
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.failures[0].stack_number, 1);
    assert_eq!(report.created_count(), 49);
}

#[test]
fn test_generation_needs_sections() {
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "EMPTY", &[]);

    let err = registry.generate_tantarelli(&yard).unwrap_err();
    assert!(matches!(err, GenerationError::NoSections(_)));

    let err = registry
        .generate_grid(&yard, &GridSpec::new("section:empty:top", 1, 5))
        .unwrap_err();
    assert!(matches!(err, GenerationError::NoSections(_)));
}

#[test]
fn test_clone_resets_occupancy_and_keeps_geometry() {
    let mut registry = make_registry();
    let a = add_yard(&mut registry, "A", &["Top Section", "Bottom Section"]);
    let b = add_yard(&mut registry, "B", &["Top Section", "Bottom Section"]);

    let mut top = GridSpec::new(&section_id(&a, "Top Section"), 1, 10);
    top.per_row = 5;
    let mut bottom = GridSpec::new(&section_id(&a, "Bottom Section"), 11, 20);
    bottom.start_y = 500.0;
    assert_eq!(registry.generate_grid(&a, &top).unwrap().created_count(), 10);
    assert_eq!(registry.generate_grid(&a, &bottom).unwrap().created_count(), 10);

    for number in [3, 12, 20] {
        let stack = stored(&registry, &a, number);
        registry.set_occupancy(&a, &stack.id, 4).unwrap();
    }

    let report = registry.clone_yard(&a, &b).unwrap();
    assert_eq!(report.created_count(), 20);
    assert_eq!(report.skipped_count(), 0);

    let source = registry.list_stacks(&a).unwrap();
    let target = registry.list_stacks(&b).unwrap();
    assert_eq!(target.len(), 20);
    for (s, t) in source.iter().zip(&target) {
        assert_eq!(t.stack_number, s.stack_number);
        assert_eq!(t.position, s.position);
        assert_eq!(t.dimensions, s.dimensions);
        assert_eq!(t.rows, s.rows);
        assert_eq!(t.max_tiers, s.max_tiers);
        assert_eq!(t.container_size, s.container_size);
        assert_eq!(t.current_occupancy, 0);
        assert_ne!(t.id, s.id);
    }
    assert_eq!(
        stored(&registry, &b, 15).section_id,
        section_id(&b, "Bottom Section")
    );
}

#[test]
fn test_clone_falls_back_to_first_section() {
    let mut registry = make_registry();
    let a = add_yard(&mut registry, "A", &["North"]);
    let b = add_yard(&mut registry, "B", &["South"]);
    registry
        .generate_grid(&a, &GridSpec::new(&section_id(&a, "North"), 1, 3))
        .unwrap();

    let report = registry.clone_yard(&a, &b).unwrap();
    assert_eq!(report.created_count(), 3);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("North"));
    assert!(registry
        .list_stacks(&b)
        .unwrap()
        .iter()
        .all(|s| s.section_id == section_id(&b, "South")));
}

#[test]
fn test_clone_from_empty_yard_is_fatal() {
    let mut registry = make_registry();
    let a = add_yard(&mut registry, "A", &["Top"]);
    let b = add_yard(&mut registry, "B", &["Top"]);

    let err = registry.clone_yard(&a, &b).unwrap_err();
    assert!(matches!(err, GenerationError::SourceYardEmpty(_)));
}

#[test]
fn test_generated_layout_survives_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = make_registry();
    let yard = add_yard(&mut registry, "TNT", &TANTARELLI_SECTIONS);
    registry.generate_tantarelli(&yard).unwrap();
    registry.store().save(temp_dir.path()).unwrap();

    let loaded = DepotStore::load(temp_dir.path()).unwrap();
    assert_eq!(&loaded, registry.store());

    let reopened = StackRegistry::new(loaded, LayoutRules::default());
    assert_eq!(reopened.list_stacks(&yard).unwrap().len(), 50);
    assert_eq!(reopened.next_stack_number(&yard).unwrap(), 104);
}
