//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    books::{BookId, BookRef},
    decode::{Decoded, decode_entries},
};

/// An ordered list of books the user intends to purchase.
///
/// Each book id appears at most once. Serializes as a bare JSON array so the
/// stored blob stays compatible with existing device caches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<BookRef>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored cart, resetting to empty when the bytes are not a JSON
    /// array.
    ///
    /// Unreadable entries are skipped one by one and the rest are kept.
    /// Entries sharing an id with an earlier entry are dropped.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Decoded<Self> {
        let Decoded {
            value,
            recovered,
            skipped,
        } = decode_entries::<BookRef>(bytes);

        let mut cart = Cart::new();

        for item in value {
            if !cart.contains(&item.id) {
                cart.items.push(item);
            }
        }

        Decoded {
            value: cart,
            recovered,
            skipped,
        }
    }

    /// Encode the cart for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Append a book unless its id is already present.
    ///
    /// A newly inserted entry always has a quantity of one. Returns `false`
    /// and leaves the cart untouched if the book was already in it.
    pub fn insert(&mut self, mut book: BookRef) -> bool {
        if self.contains(&book.id) {
            return false;
        }

        book.quantity = 1;
        self.items.push(book);

        true
    }

    /// Remove every entry with the given id. Returns whether anything changed.
    pub fn remove(&mut self, id: &BookId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| &item.id != id);

        self.items.len() != before
    }

    /// Whether a book with the given id is in the cart.
    #[must_use]
    pub fn contains(&self, id: &BookId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &BookId) -> Option<&BookRef> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of `price * quantity` over all entries.
    ///
    /// Missing or malformed prices count as zero. The sum saturates at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(BookRef::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Number of distinct books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BookRef> {
        self.items.iter()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[BookRef] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a BookRef;
    type IntoIter = std::slice::Iter<'a, BookRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
