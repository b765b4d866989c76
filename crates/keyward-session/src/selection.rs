// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paged cursor over the current result list.

use std::ops::Range;

use keyward_core::CredentialId;

/// Cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// `(page, position)` within a result list split into fixed-size pages.
///
/// Horizontal movement changes page, clamped to the last page, and resets the
/// position. Vertical movement stays within the items of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    page: usize,
    position: usize,
    page_size: usize,
}

impl Selection {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            position: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 0;
        self.position = 0;
    }

    /// Number of pages for `total` results. An empty list still has one page.
    pub fn pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Index range of the current page within a list of `total` results.
    pub fn page_bounds(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    fn items_on_page(&self, total: usize) -> usize {
        self.page_bounds(total).len()
    }

    pub fn apply(&mut self, direction: Direction, total: usize) {
        match direction {
            Direction::Left => {
                self.page = self.page.saturating_sub(1);
                self.position = 0;
            }
            Direction::Right => {
                self.page = (self.page + 1).min(self.pages(total) - 1);
                self.position = 0;
            }
            Direction::Up => self.position = self.position.saturating_sub(1),
            Direction::Down => {
                let last = self.items_on_page(total).saturating_sub(1);
                self.position = (self.position + 1).min(last);
            }
        }
    }

    /// The selected id, if the cursor points at a result.
    pub fn selected<'a>(&self, results: &'a [CredentialId]) -> Option<&'a CredentialId> {
        let bounds = self.page_bounds(results.len());
        results.get(bounds.start + self.position).filter(|_| self.position < bounds.len())
    }
}
