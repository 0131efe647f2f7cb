//! Implements the table of function pages and functions a device supports.

use std::fmt::{self, Debug};

use tracing::debug;

use crate::{
    context::{ConfigError, ProtocolContext},
    page::{FunctionPage, PAGE_COUNT, SUPPORTED_PAGES, page_index},
    transport::HidTransport,
};

/// Represents a set of function IDs, stored as a 256 bit bitmap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FunctionSet([u64; 4]);

impl FunctionSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self([0; 4])
    }

    /// Adds a function to the set.
    ///
    /// Returns whether the function was newly added.
    pub fn insert(&mut self, function: u8) -> bool {
        let (word, bit) = Self::position(function);
        let added = self.0[word] & bit == 0;
        self.0[word] |= bit;
        added
    }

    /// Checks whether the set contains a function.
    pub fn contains(&self, function: u8) -> bool {
        let (word, bit) = Self::position(function);
        self.0[word] & bit != 0
    }

    /// The amount of functions in the set.
    pub fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Checks whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    /// Iterates over the functions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|&function| self.contains(function))
    }

    fn position(function: u8) -> (usize, u64) {
        ((function >> 6) as usize, 1u64 << (function & 0x3f))
    }
}

impl FromIterator<u8> for FunctionSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for function in iter {
            set.insert(function);
        }
        set
    }
}

impl Debug for FunctionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Records which functions are supported on each page of
/// [`SUPPORTED_PAGES`].
///
/// The table is built once at startup and only read afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CapabilityTable {
    /// The supported functions, indexed like [`SUPPORTED_PAGES`].
    functions: [FunctionSet; PAGE_COUNT],
}

impl CapabilityTable {
    /// Creates a table without any supported function.
    pub const fn new() -> Self {
        Self {
            functions: [FunctionSet::new(); PAGE_COUNT],
        }
    }

    /// Adds functions to a page.
    ///
    /// Returns [`ConfigError::UndeclaredPage`] if the page is not one of
    /// [`SUPPORTED_PAGES`].
    pub fn with_page(
        mut self,
        page: FunctionPage,
        functions: impl IntoIterator<Item = u8>,
    ) -> Result<Self, ConfigError> {
        let index = page_index(page.into()).ok_or(ConfigError::UndeclaredPage(page))?;
        for function in functions {
            self.functions[index].insert(function);
        }

        debug!(?page, functions = ?self.functions[index], "configured function page");
        Ok(self)
    }

    /// Checks whether a function on a page is supported.
    ///
    /// An unknown page and an unknown function within a known page are both
    /// unsupported.
    pub fn is_supported(&self, page: u8, function: u8) -> bool {
        self.functions(page).is_some_and(|set| set.contains(function))
    }

    /// Looks up the supported functions of a page.
    ///
    /// Returns [`None`] if the page is not one of [`SUPPORTED_PAGES`].
    pub fn functions(&self, page: u8) -> Option<&FunctionSet> {
        page_index(page).map(|index| &self.functions[index])
    }

    /// Iterates over every supported (page, function) pair.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        SUPPORTED_PAGES
            .iter()
            .zip(self.functions.iter())
            .flat_map(|(&page, set)| set.iter().map(move |function| (page.into(), function)))
    }
}

/// Checks whether the device described by `ctx` supports a function.
pub fn is_supported<T: HidTransport>(ctx: &ProtocolContext<T>, page: u8, function: u8) -> bool {
    ctx.capabilities().is_supported(page, function)
}
