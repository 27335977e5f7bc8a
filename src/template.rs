// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tantarelli reference layout
//!
//! Fifty odd-numbered stacks in three bands. Coordinates are yard-plane
//! units; every stack is 25 wide and 60 long with a gap of 5 between
//! neighbours.

/// Tier height given to every generated stack
pub const TEMPLATE_MAX_TIERS: u32 = 5;

/// Band of the template a stack belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateGroup {
    /// Stacks 1-31
    Top,
    /// Stacks 33-55
    Center,
    /// Stacks 61-103
    Bottom,
}

impl TemplateGroup {
    /// All groups in layout order
    pub const ALL: [Self; 3] = [Self::Top, Self::Center, Self::Bottom];

    /// Substrings that identify the group's section by name
    #[must_use]
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Top => &["top"],
            Self::Center => &["center", "centre"],
            Self::Bottom => &["bottom"],
        }
    }

    /// Whether a section name belongs to this group
    #[must_use]
    pub fn matches(&self, section_name: &str) -> bool {
        let name = section_name.to_lowercase();
        self.keywords().iter().any(|k| name.contains(k))
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }
}

/// One stack of the template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateStack {
    /// Stack number
    pub stack_number: u32,
    /// Rows
    pub rows: u32,
    /// Origin x
    pub x: f64,
    /// Origin y
    pub y: f64,
    /// Width
    pub width: f64,
    /// Length
    pub length: f64,
    /// 20ft-only stack
    pub is_special: bool,
    /// Band
    pub group: TemplateGroup,
}

#[allow(clippy::too_many_arguments)]
const fn entry(
    stack_number: u32,
    rows: u32,
    x: f64,
    y: f64,
    width: f64,
    length: f64,
    is_special: bool,
    group: TemplateGroup,
) -> TemplateStack {
    TemplateStack {
        stack_number,
        rows,
        x,
        y,
        width,
        length,
        is_special,
        group,
    }
}

/// The Tantarelli layout
pub const TANTARELLI_LAYOUT: &[TemplateStack] = &[
    // Top
    entry(1, 4, 0.0, 0.0, 25.0, 60.0, true, TemplateGroup::Top),
    entry(3, 5, 30.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(5, 5, 60.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(7, 5, 90.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(9, 5, 120.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(11, 5, 150.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(13, 5, 180.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(15, 5, 210.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(17, 5, 240.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(19, 5, 270.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(21, 5, 300.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(23, 5, 330.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(25, 5, 360.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(27, 5, 390.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(29, 5, 420.0, 0.0, 25.0, 60.0, false, TemplateGroup::Top),
    entry(31, 4, 450.0, 0.0, 25.0, 60.0, true, TemplateGroup::Top),
    // Center
    entry(33, 6, 0.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(35, 6, 30.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(37, 6, 60.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(39, 6, 90.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(41, 6, 120.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(43, 6, 150.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(45, 6, 180.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(47, 6, 210.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(49, 6, 240.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(51, 6, 270.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(53, 6, 300.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    entry(55, 6, 330.0, 100.0, 25.0, 60.0, false, TemplateGroup::Center),
    // Bottom
    entry(61, 4, 0.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(63, 4, 30.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(65, 4, 60.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(67, 4, 90.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(69, 4, 120.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(71, 4, 150.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(73, 4, 180.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(75, 4, 210.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(77, 4, 240.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(79, 4, 270.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(81, 4, 300.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(83, 4, 330.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(85, 4, 360.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(87, 4, 390.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(89, 4, 420.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(91, 4, 450.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(93, 4, 480.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(95, 4, 510.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(97, 4, 540.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(99, 4, 570.0, 200.0, 25.0, 60.0, false, TemplateGroup::Bottom),
    entry(101, 3, 600.0, 200.0, 25.0, 60.0, true, TemplateGroup::Bottom),
    entry(103, 3, 630.0, 200.0, 25.0, 60.0, true, TemplateGroup::Bottom),
];
