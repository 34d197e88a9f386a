//! Operations on an in-memory entry collection
//!
//! Callers load the collection once, mutate it here, and hand it back to
//! the store to save. Name uniqueness (case-insensitive) and id assignment
//! are enforced here, not by the store's validation.

use thiserror::Error;

use crate::entry::Entry;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EntryError {
    #[error("Name is required")]
    EmptyName,

    #[error("Secret is required")]
    EmptySecret,

    #[error("An entry named '{0}' already exists")]
    DuplicateName(String),

    #[error("Entry not found: {0}")]
    NotFound(i64),

    #[error("No ids left above {0}")]
    IdExhausted(i64),
}

/// User-supplied fields for a new or edited entry
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub name: String,
    pub secret: String,
    pub description: String,
}

impl EntryDraft {
    pub fn new(name: &str, secret: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            secret: secret.to_string(),
            description: description.to_string(),
        }
    }

    fn check(&self) -> Result<(), EntryError> {
        if self.name.trim().is_empty() {
            return Err(EntryError::EmptyName);
        }
        if self.secret.is_empty() {
            return Err(EntryError::EmptySecret);
        }
        Ok(())
    }
}

/// Where a moved entry lands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// Id for the next new entry: max existing id + 1, or 1 when empty
pub fn next_id(entries: &[Entry]) -> Result<i64, EntryError> {
    match entries.iter().map(|e| e.id).max() {
        Some(max) => max
            .max(0)
            .checked_add(1)
            .ok_or(EntryError::IdExhausted(max)),
        None => Ok(1),
    }
}

/// Find an entry by case-insensitive name
pub fn find_by_name<'a>(entries: &'a [Entry], name: &str) -> Option<&'a Entry> {
    entries.iter().find(|e| e.has_name(name))
}

fn position(entries: &[Entry], id: i64) -> Result<usize, EntryError> {
    entries
        .iter()
        .position(|e| e.id == id)
        .ok_or(EntryError::NotFound(id))
}

/// `except` is the index of the entry being edited
fn ensure_unique(entries: &[Entry], name: &str, except: Option<usize>) -> Result<(), EntryError> {
    let taken = entries
        .iter()
        .enumerate()
        .any(|(i, e)| e.has_name(name) && Some(i) != except);

    if taken {
        return Err(EntryError::DuplicateName(name.trim().to_string()));
    }
    Ok(())
}

/// Append a new entry with a fresh id
pub fn add_entry(entries: &mut Vec<Entry>, draft: &EntryDraft) -> Result<Entry, EntryError> {
    draft.check()?;
    ensure_unique(entries, &draft.name, None)?;

    let entry = Entry::new(
        next_id(entries)?,
        &draft.name,
        &draft.secret,
        &draft.description,
    );
    entries.push(entry.clone());
    Ok(entry)
}

/// Replace the fields of an existing entry, keeping its id and position
pub fn update_entry(
    entries: &mut [Entry],
    id: i64,
    draft: &EntryDraft,
) -> Result<Entry, EntryError> {
    let index = position(entries, id)?;
    draft.check()?;
    ensure_unique(entries, &draft.name, Some(index))?;

    let updated = Entry::new(id, &draft.name, &draft.secret, &draft.description);
    entries[index] = updated.clone();
    Ok(updated)
}

/// Remove an entry and return it
pub fn remove_entry(entries: &mut Vec<Entry>, id: i64) -> Result<Entry, EntryError> {
    let index = position(entries, id)?;
    Ok(entries.remove(index))
}

/// Move `dragged_id` directly above or below `target_id`
pub fn move_entry(
    entries: &mut Vec<Entry>,
    dragged_id: i64,
    target_id: i64,
    placement: Placement,
) -> Result<(), EntryError> {
    let from = position(entries, dragged_id)?;
    position(entries, target_id)?;

    if dragged_id == target_id {
        return Ok(());
    }

    let dragged = entries.remove(from);
    // target index shifts once the dragged entry is out of the list
    let target = position(entries, target_id)?;
    let to = match placement {
        Placement::Above => target,
        Placement::Below => target + 1,
    };
    entries.insert(to, dragged);
    Ok(())
}

/// Append incoming entries whose names are not taken yet, with fresh ids.
///
/// Returns how many were added.
pub fn merge_entries(entries: &mut Vec<Entry>, incoming: &[Entry]) -> usize {
    let mut added = 0;
    for entry in incoming {
        let draft = EntryDraft::new(&entry.name, &entry.secret, &entry.description);
        if add_entry(entries, &draft).is_ok() {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_entries;
    use serde_json::json;

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new(1, "alpha", "a", ""),
            Entry::new(2, "beta", "b", ""),
            Entry::new(5, "gamma", "c", ""),
            Entry::new(3, "delta", "d", ""),
        ]
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]), Ok(1));
        assert_eq!(next_id(&sample()), Ok(6));
    }

    #[test]
    fn test_add_after_largest_id_fails_cleanly() {
        let mut entries = validate_entries(&json!([
            {"id": i64::MAX, "name": "a", "secret": "s"}
        ]));
        assert_eq!(entries.len(), 1);

        assert_eq!(
            add_entry(&mut entries, &EntryDraft::new("b", "s", "")),
            Err(EntryError::IdExhausted(i64::MAX))
        );
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_update_checks_names_of_entries_sharing_its_id() {
        let mut entries = vec![
            Entry::new(1, "first", "a", ""),
            Entry::new(1, "second", "b", ""),
        ];

        assert_eq!(
            update_entry(&mut entries, 1, &EntryDraft::new("SECOND", "x", "")),
            Err(EntryError::DuplicateName("SECOND".to_string()))
        );
        assert_eq!(entries[0].name, "first");

        // renaming to its own name in another case is fine
        let updated = update_entry(&mut entries, 1, &EntryDraft::new("First", "x", "")).unwrap();
        assert_eq!(updated.name, "First");
    }

    #[test]
    fn test_add_assigns_id_and_trims() {
        let mut entries = sample();
        let entry = add_entry(&mut entries, &EntryDraft::new(" epsilon ", " pw ", " note ")).unwrap();

        assert_eq!(entry.id, 6);
        assert_eq!(entry.name, "epsilon");
        assert_eq!(entry.secret, " pw ");
        assert_eq!(entry.description, "note");
        assert_eq!(entries.last(), Some(&entry));
    }

    #[test]
    fn test_add_rejects() {
        let mut entries = sample();

        assert_eq!(
            add_entry(&mut entries, &EntryDraft::new("  ", "pw", "")),
            Err(EntryError::EmptyName)
        );
        assert_eq!(
            add_entry(&mut entries, &EntryDraft::new("x", "", "")),
            Err(EntryError::EmptySecret)
        );
        assert_eq!(
            add_entry(&mut entries, &EntryDraft::new(" BETA ", "pw", "")),
            Err(EntryError::DuplicateName("BETA".to_string()))
        );
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let mut entries = sample();

        let updated = update_entry(&mut entries, 2, &EntryDraft::new("Beta", "new", "d")).unwrap();
        assert_eq!(updated.id, 2);
        assert_eq!(entries[1], updated);

        assert_eq!(
            update_entry(&mut entries, 2, &EntryDraft::new("alpha", "x", "")),
            Err(EntryError::DuplicateName("alpha".to_string()))
        );
        assert_eq!(
            update_entry(&mut entries, 99, &EntryDraft::new("z", "x", "")),
            Err(EntryError::NotFound(99))
        );
    }

    #[test]
    fn test_remove() {
        let mut entries = sample();
        let removed = remove_entry(&mut entries, 5).unwrap();

        assert_eq!(removed.name, "gamma");
        assert_eq!(names(&entries), vec!["alpha", "beta", "delta"]);
        assert_eq!(remove_entry(&mut entries, 5), Err(EntryError::NotFound(5)));
    }

    #[test]
    fn test_move_down() {
        let mut entries = sample();
        move_entry(&mut entries, 1, 5, Placement::Above).unwrap();
        assert_eq!(names(&entries), vec!["beta", "alpha", "gamma", "delta"]);

        let mut entries = sample();
        move_entry(&mut entries, 1, 5, Placement::Below).unwrap();
        assert_eq!(names(&entries), vec!["beta", "gamma", "alpha", "delta"]);
    }

    #[test]
    fn test_move_up() {
        let mut entries = sample();
        move_entry(&mut entries, 3, 2, Placement::Above).unwrap();
        assert_eq!(names(&entries), vec!["alpha", "delta", "beta", "gamma"]);

        let mut entries = sample();
        move_entry(&mut entries, 3, 1, Placement::Below).unwrap();
        assert_eq!(names(&entries), vec!["alpha", "delta", "beta", "gamma"]);
    }

    #[test]
    fn test_move_onto_self_and_unknown() {
        let mut entries = sample();
        move_entry(&mut entries, 2, 2, Placement::Below).unwrap();
        assert_eq!(entries, sample());

        assert_eq!(
            move_entry(&mut entries, 2, 42, Placement::Above),
            Err(EntryError::NotFound(42))
        );
        assert_eq!(entries, sample());
    }

    #[test]
    fn test_merge_skips_taken_names() {
        let mut entries = sample();
        let incoming = vec![
            Entry::new(1, "ALPHA", "other", ""),
            Entry::new(1, "zeta", "z", "imported"),
            Entry::new(2, "zeta", "again", ""),
        ];

        assert_eq!(merge_entries(&mut entries, &incoming), 1);
        let zeta = find_by_name(&entries, "Zeta").unwrap();
        assert_eq!(zeta.id, 6);
        assert_eq!(zeta.description, "imported");
    }
}
