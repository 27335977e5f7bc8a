// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Adjacency pairs for 40ft assignment
//!
//! A 40ft container spans two physically adjacent 20ft stacks, so only the
//! pairs below may take 40ft (or mixed) assignments, and both stacks of a
//! pair always carry the same size.

/// Stack pairs that share a 40ft assignment
pub const VALID_PAIRS: &[(u32, u32)] = &[
    (3, 5),
    (7, 9),
    (11, 13),
    (15, 17),
    (19, 21),
    (23, 25),
    (27, 29),
    (33, 35),
    (37, 39),
    (41, 43),
    (45, 47),
    (49, 51),
    (53, 55),
    (61, 63),
    (65, 67),
    (69, 71),
    (73, 75),
    (77, 79),
    (81, 83),
    (85, 87),
    (89, 91),
    (93, 95),
    (97, 99),
];

/// Stacks that are 20ft only in the reference layout
pub const SPECIAL_STACKS: &[u32] = &[1, 31, 101, 103];

/// Partner of a stack number, if it has one
#[must_use]
pub fn partner_of(stack_number: u32) -> Option<u32> {
    VALID_PAIRS.iter().find_map(|&(a, b)| {
        if a == stack_number {
            Some(b)
        } else if b == stack_number {
            Some(a)
        } else {
            None
        }
    })
}

/// Whether the number belongs to a reference special stack
#[must_use]
pub fn is_reference_special(stack_number: u32) -> bool {
    SPECIAL_STACKS.contains(&stack_number)
}
