//! The intermediate every renderer consumes: a code, its module pattern and
//! the layout facts a drawing needs.

use crate::core::codec;
use crate::core::tables::{
    CENTER_GUARD, CENTER_GUARD_OFFSET, DIGIT_MODULES, END_GUARD, END_GUARD_OFFSET, GROUP_DIGITS,
    LEFT_GROUP_OFFSET, LEFT_QUIET_ZONE, RIGHT_GROUP_OFFSET, RIGHT_QUIET_ZONE, START_GUARD,
    START_GUARD_OFFSET, TOTAL_MODULES,
};
use crate::domain::model::{Ean13, ModulePattern};
use serde::Serialize;
use std::ops::Range;

/// Module ranges of the fixed parts of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolLayout {
    pub start_guard: Range<usize>,
    pub left_group: Range<usize>,
    pub center_guard: Range<usize>,
    pub right_group: Range<usize>,
    pub end_guard: Range<usize>,
    pub left_quiet_zone: usize,
    pub right_quiet_zone: usize,
}

impl SymbolLayout {
    pub const EAN13: SymbolLayout = SymbolLayout {
        start_guard: START_GUARD_OFFSET..START_GUARD_OFFSET + START_GUARD.len(),
        left_group: LEFT_GROUP_OFFSET..CENTER_GUARD_OFFSET,
        center_guard: CENTER_GUARD_OFFSET..CENTER_GUARD_OFFSET + CENTER_GUARD.len(),
        right_group: RIGHT_GROUP_OFFSET..END_GUARD_OFFSET,
        end_guard: END_GUARD_OFFSET..END_GUARD_OFFSET + END_GUARD.len(),
        left_quiet_zone: LEFT_QUIET_ZONE,
        right_quiet_zone: RIGHT_QUIET_ZONE,
    };

    pub fn is_guard(&self, module: usize) -> bool {
        self.start_guard.contains(&module)
            || self.center_guard.contains(&module)
            || self.end_guard.contains(&module)
    }

    /// Module index at the middle of the digit drawn at `position` (0..12,
    /// leading digit excluded).
    pub fn digit_center(&self, position: usize) -> usize {
        let (group_start, index) = if position < GROUP_DIGITS {
            (self.left_group.start, position)
        } else {
            (self.right_group.start, position - GROUP_DIGITS)
        };
        group_start + index * DIGIT_MODULES + DIGIT_MODULES / 2
    }
}

static LAYOUT: SymbolLayout = SymbolLayout::EAN13;

/// A code ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    code: Ean13,
    pattern: ModulePattern,
}

impl Symbol {
    pub fn new(code: Ean13) -> Self {
        Self {
            pattern: codec::to_module_pattern(&code),
            code,
        }
    }

    pub fn code(&self) -> &Ean13 {
        &self.code
    }

    pub fn pattern(&self) -> &ModulePattern {
        &self.pattern
    }

    pub fn layout(&self) -> &'static SymbolLayout {
        &LAYOUT
    }

    pub fn width(&self, with_quiet_zone: bool) -> usize {
        if with_quiet_zone {
            LEFT_QUIET_ZONE + TOTAL_MODULES + RIGHT_QUIET_ZONE
        } else {
            TOTAL_MODULES
        }
    }

    /// Printed text: the leading digit, then the left and right groups.
    pub fn human_readable(&self) -> HumanReadable {
        let text = self.code.to_string();
        HumanReadable {
            leading: text[..1].to_string(),
            left: text[1..=GROUP_DIGITS].to_string(),
            right: text[GROUP_DIGITS + 1..].to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanReadable {
    pub leading: String,
    pub left: String,
    pub right: String,
}

impl std::fmt::Display for HumanReadable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.leading, self.left, self.right)
    }
}
