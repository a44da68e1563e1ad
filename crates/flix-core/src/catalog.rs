//! # Catalog
//!
//! The sorted inventory of rentable titles and their availability counters.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog                                         │
//! │                                                                         │
//! │  items (owned, by ItemId)          order (OrderedSequence<ItemId>)      │
//! │  ┌────┬─────────────────────┐      ┌──────────────────────────┐         │
//! │  │ #0 │ 1  Gravity          │      │ 0 → #1  Frozen           │         │
//! │  │ #1 │ 1  Frozen           │      │ 1 → #0  Gravity          │         │
//! │  │ #2 │ 0  Spectre          │      │ 2 → #2  Spectre          │         │
//! │  └────┴─────────────────────┘      └──────────────────────────┘         │
//! │                                                                         │
//! │  Positions (what the UI shows) resolve through `order`.                 │
//! │  ItemIds (what account queues hold) never move.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Titles compare case-sensitively with a leading `"The "` ignored, so
//! `"The Amazing Spider-man 2"` files under A. Entries with equal keys keep
//! load order and duplicates are never merged.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::sequence::OrderedSequence;
use crate::types::{render_listing, CatalogEntryView, ItemId};
use crate::UNAVAILABLE_SUFFIX;

/// Leading article skipped when ordering titles.
const LEADING_ARTICLE: &str = "The ";

// =============================================================================
// Catalog Item
// =============================================================================

/// One rentable title with its available-copy counter.
///
/// The counter may be negative when the catalog was loaded with more copies
/// out than in stock. It changes only through checkout and return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    title: String,
    available_copies: i64,
}

impl CatalogItem {
    /// Creates an item from a title and a starting count.
    pub fn new(title: impl Into<String>, available_copies: i64) -> Self {
        CatalogItem {
            title: title.into(),
            available_copies,
        }
    }

    /// Parses a raw `<signed-integer><whitespace><title>` line.
    ///
    /// ## Example
    /// ```rust
    /// use flix_core::CatalogItem;
    ///
    /// let item = CatalogItem::parse_line("5 10 Angry Men").unwrap();
    /// assert_eq!(item.title(), "10 Angry Men");
    /// assert_eq!(item.available_copies(), 5);
    ///
    /// assert!(CatalogItem::parse_line("10Angry Men").is_none());
    /// assert!(CatalogItem::parse_line("The Godfather: Part 2").is_none());
    /// ```
    pub fn parse_line(line: &str) -> Option<Self> {
        let (count, rest) = line.trim().split_once(char::is_whitespace)?;
        let available_copies = count.parse::<i64>().ok()?;
        let title = rest.trim();
        if title.is_empty() {
            return None;
        }
        Some(CatalogItem::new(title, available_copies))
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn available_copies(&self) -> i64 {
        self.available_copies
    }

    /// True when at least one copy can be checked out.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Title with the unavailability suffix when no copy is in.
    pub fn display_name(&self) -> String {
        if self.is_available() {
            self.title.clone()
        } else {
            format!("{}{}", self.title, UNAVAILABLE_SUFFIX)
        }
    }

    /// Ordering key: the title without a leading article.
    pub fn sort_key(&self) -> &str {
        self.title
            .strip_prefix(LEADING_ARTICLE)
            .unwrap_or(&self.title)
    }

    /// Compares two items by [`sort_key`](Self::sort_key).
    pub fn compare_by_title(&self, other: &CatalogItem) -> Ordering {
        self.sort_key().cmp(other.sort_key())
    }

    pub(crate) fn check_out(&mut self) {
        self.available_copies -= 1;
    }

    pub(crate) fn check_in(&mut self) {
        self.available_copies += 1;
    }

    pub fn view(&self) -> CatalogEntryView {
        CatalogEntryView {
            title: self.title.clone(),
            available_copies: self.available_copies,
            display_name: self.display_name(),
        }
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The sorted catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    order: OrderedSequence<ItemId>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from raw lines.
    ///
    /// Blank lines are skipped. Any other line that does not parse fails the
    /// whole load and nothing is returned.
    ///
    /// ## Example
    /// ```rust
    /// use flix_core::Catalog;
    ///
    /// let catalog = Catalog::load(["1 Gravity", "", "0 Frozen"]).unwrap();
    /// assert_eq!(catalog.listing().unwrap(), "Frozen (currently unavailable)\nGravity\n");
    ///
    /// assert!(Catalog::load(["1 Gravity", "Spectre"]).is_err());
    /// ```
    pub fn load<I, S>(lines: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let item =
                CatalogItem::parse_line(line).ok_or_else(|| CoreError::MalformedCatalogEntry {
                    line_number: index + 1,
                    line: line.to_string(),
                })?;
            parsed.push(item);
        }

        let mut catalog = Catalog::new();
        for item in parsed {
            catalog.sorted_insert(item);
        }
        Ok(catalog)
    }

    /// Inserts `item` before the first entry whose title sorts after it.
    ///
    /// Returns the id the item will be known by.
    pub fn sorted_insert(&mut self, item: CatalogItem) -> ItemId {
        let id = ItemId(self.items.len());
        self.items.push(item);

        let items = &self.items;
        self.order
            .insert_sorted_by(id, |a, b| items[a.0].compare_by_title(&items[b.0]));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The item at display `position`.
    pub fn at(&self, position: usize) -> CoreResult<&CatalogItem> {
        let id = self.id_at(position)?;
        Ok(&self.items[id.0])
    }

    /// The stable id of the item at display `position`.
    pub fn id_at(&self, position: usize) -> CoreResult<ItemId> {
        self.order.get(position).copied()
    }

    /// Looks up an item by id.
    pub fn item(&self, id: ItemId) -> CoreResult<&CatalogItem> {
        self.items
            .get(id.0)
            .ok_or_else(|| ValidationError::UnknownItem(id.0).into())
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> CoreResult<&mut CatalogItem> {
        self.items
            .get_mut(id.0)
            .ok_or_else(|| ValidationError::UnknownItem(id.0).into())
    }

    /// Title of an id, or an empty string for an unknown id.
    pub(crate) fn title_of(&self, id: ItemId) -> &str {
        self.items.get(id.0).map(CatalogItem::title).unwrap_or("")
    }

    /// Display position of the first item titled exactly `title`.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.order.position(|id| self.items[id.0].title == title)
    }

    /// Items in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &CatalogItem)> + '_ {
        self.order.iter().map(move |id| (*id, &self.items[id.0]))
    }

    /// Display listing, `None` when the catalog is empty.
    pub fn listing(&self) -> Option<String> {
        render_listing(self.iter().map(|(_, item)| item.display_name()))
    }

    /// Serializable views in display order.
    pub fn entries(&self) -> Vec<CatalogEntryView> {
        self.iter().map(|(_, item)| item.view()).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SHORT_CATALOG: [&str; 5] = [
        "1 Frozen",
        "1 Gravity",
        "1 How to Train Your Dragon 2",
        "0 Spectre",
        "0 Warcraft",
    ];

    #[test]
    fn test_parse_line() {
        let item = CatalogItem::parse_line("1 Movie Name").unwrap();
        assert_eq!(item.title(), "Movie Name");
        assert!(item.is_available());

        let item = CatalogItem::parse_line("-1 Name").unwrap();
        assert_eq!(item.available_copies(), -1);
        assert!(!item.is_available());

        let item = CatalogItem::parse_line("1  The Hunger Games: Mockingjay, Part 1").unwrap();
        assert_eq!(item.title(), "The Hunger Games: Mockingjay, Part 1");

        assert!(CatalogItem::parse_line("").is_none());
        assert!(CatalogItem::parse_line("Title").is_none());
        assert!(CatalogItem::parse_line("10Angry Men").is_none());
        assert!(CatalogItem::parse_line("3").is_none());
        assert!(CatalogItem::parse_line("3   ").is_none());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(CatalogItem::new("Movie Name", 1).display_name(), "Movie Name");
        assert_eq!(
            CatalogItem::new("Name", 0).display_name(),
            "Name (currently unavailable)"
        );
    }

    #[test]
    fn test_compare_by_title() {
        let am = CatalogItem::new("American Sniper", 1);
        let am2 = CatalogItem::new("American Sniper", 2);
        let ab = CatalogItem::new("About Time", 1);
        let gone = CatalogItem::new("Gone Girl", 1);
        let hunger = CatalogItem::new("The Hunger Games: Mockingjay, Part 1", 1);
        let selma = CatalogItem::new("Selma", 2);

        assert_eq!(am.compare_by_title(&am2), Ordering::Equal);
        assert_eq!(am.compare_by_title(&ab), Ordering::Greater);
        assert_eq!(ab.compare_by_title(&am), Ordering::Less);
        assert_eq!(gone.compare_by_title(&ab), Ordering::Greater);
        assert_eq!(hunger.compare_by_title(&selma), Ordering::Less);
    }

    #[test]
    fn test_check_out_and_in() {
        let mut item = CatalogItem::new("Frozen", 1);
        item.check_out();
        assert!(!item.is_available());
        item.check_in();
        assert_eq!(item.available_copies(), 1);
    }

    #[test]
    fn test_short_catalog_listing() {
        let catalog = Catalog::load(SHORT_CATALOG).unwrap();
        assert_eq!(
            catalog.listing().unwrap(),
            "Frozen\nGravity\nHow to Train Your Dragon 2\nSpectre (currently unavailable)\nWarcraft (currently unavailable)\n"
        );
    }

    #[test]
    fn test_load_sorts_with_article_ignored() {
        let catalog = Catalog::load([
            "2 The Amazing Spider-man 2",
            "1 Aloha",
            "4 About Schmidt",
            "1 300: Rise of an Empire",
            "3 12 Years a Slave",
            "1 Avatar",
        ])
        .unwrap();

        let titles: Vec<&str> = catalog.iter().map(|(_, item)| item.title()).collect();
        assert_eq!(
            titles,
            vec![
                "12 Years a Slave",
                "300: Rise of an Empire",
                "About Schmidt",
                "Aloha",
                "The Amazing Spider-man 2",
                "Avatar",
            ]
        );
    }

    #[test]
    fn test_sorted_invariant_after_inserts() {
        let mut catalog = Catalog::new();
        for title in ["Warcraft", "gravity", "Frozen", "The Zoo", "Alpha", "Frozen"] {
            catalog.sorted_insert(CatalogItem::new(title, 1));
        }
        let keys: Vec<&str> = catalog.iter().map(|(_, item)| item.sort_key()).collect();
        assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_duplicates_keep_load_order() {
        let catalog = Catalog::load(["1 Frozen", "0 Frozen"]).unwrap();
        assert_eq!(catalog.at(0).unwrap().available_copies(), 1);
        assert_eq!(catalog.at(1).unwrap().available_copies(), 0);
        assert_ne!(catalog.id_at(0).unwrap(), catalog.id_at(1).unwrap());
    }

    #[test]
    fn test_malformed_line_fails_whole_load() {
        let err = Catalog::load(["1 Frozen", "Gravity", "0 Spectre"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedCatalogEntry);
        assert_eq!(
            err,
            CoreError::MalformedCatalogEntry {
                line_number: 2,
                line: "Gravity".to_string(),
            }
        );
    }

    #[test]
    fn test_at_out_of_range() {
        let catalog = Catalog::load(SHORT_CATALOG).unwrap();
        assert_eq!(catalog.at(0).unwrap().title(), "Frozen");
        assert_eq!(catalog.at(5).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_empty_catalog_listing_is_sentinel() {
        let catalog = Catalog::load(Vec::<String>::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.listing(), None);
    }

    #[test]
    fn test_unknown_item_is_invalid_argument() {
        let catalog = Catalog::load(SHORT_CATALOG).unwrap();
        assert_eq!(
            catalog.item(ItemId(99)).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_entries_view() {
        let catalog = Catalog::load(["0 Spectre"]).unwrap();
        let entries = catalog.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Spectre (currently unavailable)");
    }
}
