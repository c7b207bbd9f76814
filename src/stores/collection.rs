//! Id-keyed operations over insertion-ordered collections

use crate::error::{Result, StoreError};
use crate::models::Identified;

/// Append `item`, rejecting an id that is already present
pub fn insert<T: Identified>(items: &mut Vec<T>, item: T, entity: &'static str) -> Result<()> {
    if items.iter().any(|existing| existing.id() == item.id()) {
        return Err(StoreError::duplicate(entity, item.id()));
    }
    items.push(item);
    Ok(())
}

/// Replace the element with the same id, keeping its position
pub fn replace<T: Identified>(items: &mut [T], item: T, entity: &'static str) -> Result<()> {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            Ok(())
        }
        None => Err(StoreError::not_found(entity, item.id())),
    }
}

/// Remove the element with `id`. Returns whether one was removed.
pub fn remove<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    match items.iter().position(|existing| existing.id() == id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

pub fn find<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SmtVideo;

    fn video(id: &str, title: &str) -> SmtVideo {
        SmtVideo {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            video_url: String::new(),
            thumbnail_url: String::new(),
        }
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut items = vec![video("a", "First")];
        let err = insert(&mut items, video("a", "Second"), "video").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { entity: "video", .. }));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut items = vec![video("a", "A"), video("b", "B"), video("c", "C")];
        replace(&mut items, video("b", "B2"), "video").unwrap();
        let titles: Vec<&str> = items.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B2", "C"]);

        assert!(replace(&mut items, video("z", "Z"), "video").is_err());
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut items = vec![video("a", "A"), video("b", "B")];
        assert!(remove(&mut items, "a"));
        assert!(!remove(&mut items, "a"));
        assert_eq!(items.len(), 1);
        assert!(find(&items, "b").is_some());
    }
}
