//! Menu tree and selection state.

use heapless::Vec;

use super::input_logic::{scroll_window, select_next, select_prev};
use super::label::{LabelFn, LabelGenerator};
use super::NavEvent;
use crate::config::{MENU_MAX_DEPTH, MENU_VISIBLE_ROWS};

/// One selectable row.
///
/// When a generator is bound it is authoritative for the displayed text;
/// the static label is only the fallback when formatting fails.
#[derive(Clone, Copy)]
pub struct MenuEntry<'a> {
    label: &'a str,
    submenu: Option<&'a Menu<'a>>,
    generator: Option<LabelGenerator<'a>>,
}

impl<'a> MenuEntry<'a> {
    pub const fn new(label: &'a str) -> Self {
        Self {
            label,
            submenu: None,
            generator: None,
        }
    }

    pub const fn with_submenu(label: &'a str, submenu: &'a Menu<'a>) -> Self {
        Self {
            label,
            submenu: Some(submenu),
            generator: None,
        }
    }

    pub const fn generated(label: &'a str, render: LabelFn<'a>, param: u32) -> Self {
        Self {
            label,
            submenu: None,
            generator: Some(LabelGenerator::new(render, param)),
        }
    }

    pub fn label(&self) -> &'a str {
        self.label
    }

    pub fn submenu(&self) -> Option<&'a Menu<'a>> {
        self.submenu
    }

    /// Text to display, formatted into `buf` when a generator is bound.
    pub fn resolve<'b>(&'b self, buf: &'b mut [u8]) -> &'b str {
        match &self.generator {
            Some(generator) => generator.generate(buf).unwrap_or(self.label),
            None => self.label,
        }
    }
}

/// A titled, ordered list of entries; insertion order is display order.
#[derive(Clone, Copy)]
pub struct Menu<'a> {
    pub title: &'a str,
    pub entries: &'a [MenuEntry<'a>],
}

impl<'a> Menu<'a> {
    pub const fn new(title: &'a str, entries: &'a [MenuEntry<'a>]) -> Self {
        Self { title, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a navigation event did to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuStep {
    Moved,
    Entered,
    Left,
    Confirmed,
    Cancelled,
    /// The event had no effect.
    Ignored,
}

/// Cursor, scroll window and submenu stack of one menu invocation.
pub struct MenuModel<'a> {
    current: &'a Menu<'a>,
    parents: Vec<(&'a Menu<'a>, usize), MENU_MAX_DEPTH>,
    cursor: usize,
    top: usize,
    confirmed: bool,
}

impl<'a> MenuModel<'a> {
    pub fn new(root: &'a Menu<'a>) -> Self {
        Self {
            current: root,
            parents: Vec::new(),
            cursor: 0,
            top: 0,
            confirmed: false,
        }
    }

    pub fn menu(&self) -> &'a Menu<'a> {
        self.current
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Clear the confirmation so the model can take another selection.
    /// Cursor, scroll window and submenu stack are kept.
    pub fn rearm(&mut self) {
        self.confirmed = false;
    }

    /// Entries currently in the scroll window, with their absolute index.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &'a MenuEntry<'a>)> {
        self.current
            .entries
            .iter()
            .enumerate()
            .skip(self.top)
            .take(MENU_VISIBLE_ROWS)
    }

    pub fn apply(&mut self, event: NavEvent) -> MenuStep {
        let count = self.current.len();
        let step = match event {
            NavEvent::Up => self.move_to(select_prev(self.cursor)),
            NavEvent::Down => self.move_to(select_next(self.cursor, count)),
            NavEvent::Select => match self.current.entries.get(self.cursor) {
                None => MenuStep::Ignored,
                Some(entry) => match entry.submenu() {
                    Some(sub) if sub.is_empty() => MenuStep::Ignored,
                    Some(sub) => match self.parents.push((self.current, self.cursor)) {
                        Ok(()) => {
                            self.current = sub;
                            self.cursor = 0;
                            self.top = 0;
                            MenuStep::Entered
                        }
                        Err(_) => MenuStep::Ignored,
                    },
                    None => {
                        self.confirmed = true;
                        MenuStep::Confirmed
                    }
                },
            },
            NavEvent::Back => match self.parents.pop() {
                Some((parent, cursor)) => {
                    self.current = parent;
                    self.cursor = cursor;
                    self.top = scroll_window(0, cursor, MENU_VISIBLE_ROWS);
                    MenuStep::Left
                }
                None => MenuStep::Cancelled,
            },
        };
        trace!("Menu: {} -> {} (cursor {})", event, step, self.cursor);
        step
    }

    fn move_to(&mut self, cursor: usize) -> MenuStep {
        if cursor == self.cursor {
            return MenuStep::Ignored;
        }
        self.cursor = cursor;
        self.top = scroll_window(self.top, cursor, MENU_VISIBLE_ROWS);
        MenuStep::Moved
    }
}
