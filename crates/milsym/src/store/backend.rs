use super::document::FavoriteRecord;
use crate::error::Result;

/// Raw persistence of the favorites document.
///
/// The backend stores records as given; it never interprets attribute keys.
pub trait FavoritesBackend {
    /// Load every stored record in document order.
    /// A store that has never been written yields an empty list.
    fn load_favorites(&self) -> Result<Vec<FavoriteRecord>>;

    /// Replace the stored document with `records`.
    /// MUST be atomic: a failed save leaves the previous document intact.
    fn save_favorites(&self, records: &[FavoriteRecord]) -> Result<()>;
}
