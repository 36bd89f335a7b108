//! Favorites

use serde::{Deserialize, Serialize};

use crate::{
    books::BookId,
    decode::{Decoded, decode_entries},
};

/// Book ids the user has marked as favorite, in the order they were marked.
///
/// Un-marking an id remembers where it was, so marking it again straight
/// away puts it back in the same place. That memory is not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<BookId>,

    #[serde(skip)]
    last_removed: Option<(BookId, usize)>,
}

impl PartialEq for Favorites {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for Favorites {}

impl Favorites {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored set, resetting to empty when the bytes are not a JSON
    /// array. Entries that are not ids are skipped.
    ///
    /// Repeated ids keep their first position.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Decoded<Self> {
        let Decoded {
            value,
            recovered,
            skipped,
        } = decode_entries::<BookId>(bytes);

        Decoded {
            value: value.into_iter().collect(),
            recovered,
            skipped,
        }
    }

    /// Encode the set for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Flip the favorite status of `id`, returning the new status.
    ///
    /// Toggling the same id twice in a row restores the original set and
    /// order: a re-marked id returns to the slot it was just removed from,
    /// any other newly marked id is appended.
    pub fn toggle(&mut self, id: BookId) -> bool {
        if let Some(position) = self.ids.iter().position(|existing| *existing == id) {
            self.ids.remove(position);
            self.last_removed = Some((id, position));

            return false;
        }

        let position = match self.last_removed.take() {
            Some((removed, position)) if removed == id => position.min(self.ids.len()),
            _ => self.ids.len(),
        };

        self.ids.insert(position, id);

        true
    }

    /// Whether `id` is marked as favorite.
    #[must_use]
    pub fn contains(&self, id: &BookId) -> bool {
        self.ids.contains(id)
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate ids in display order.
    pub fn iter(&self) -> impl Iterator<Item = &BookId> {
        self.ids.iter()
    }

    /// Ids in display order.
    #[must_use]
    pub fn ids(&self) -> &[BookId] {
        &self.ids
    }
}

impl FromIterator<BookId> for Favorites {
    fn from_iter<I: IntoIterator<Item = BookId>>(iter: I) -> Self {
        let mut favorites = Favorites::new();

        for id in iter {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }

        favorites
    }
}
