//! Photo carousel for the listing detail view

use crate::feed::NO_IMAGE_PHOTO;
use crate::models::Property;

/// Cursor over a listing's photos for the detail view. Moving past either
/// end wraps around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoCarousel {
    photos: Vec<String>,
    index: usize,
}

impl PhotoCarousel {
    pub fn new(photos: Vec<String>) -> Self {
        let photos = if photos.is_empty() {
            vec![NO_IMAGE_PHOTO.to_string()]
        } else {
            photos
        };
        Self { photos, index: 0 }
    }

    pub fn for_property(property: &Property) -> Self {
        Self::new(property.photos.clone())
    }

    pub fn current(&self) -> &str {
        &self.photos[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn next(&mut self) -> &str {
        self.index = (self.index + 1) % self.photos.len();
        self.current()
    }

    pub fn previous(&mut self) -> &str {
        self.index = (self.index + self.photos.len() - 1) % self.photos.len();
        self.current()
    }

    /// Select a thumbnail; out-of-range indexes are ignored
    pub fn select(&mut self, index: usize) -> &str {
        if index < self.photos.len() {
            self.index = index;
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut carousel = PhotoCarousel::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(carousel.previous(), "c");
        assert_eq!(carousel.next(), "a");
        assert_eq!(carousel.next(), "b");
        assert_eq!(carousel.select(9), "b");
        assert_eq!(carousel.select(2), "c");
        assert_eq!(carousel.next(), "a");
    }

    #[test]
    fn test_empty_gallery_shows_placeholder() {
        let mut carousel = PhotoCarousel::new(Vec::new());
        assert_eq!(carousel.len(), 1);
        assert_eq!(carousel.next(), NO_IMAGE_PHOTO);
    }
}
