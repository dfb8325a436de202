use super::*;
use crate::entity::model::{Entity, EntityKind, TextEntity, Visual};
use crate::render::surface::TextStyle;

fn text(content: &str) -> Entity {
    Entity {
        id: None,
        visual: Visual::default(),
        kind: EntityKind::Text(TextEntity {
            content: content.to_owned(),
            style: TextStyle::default(),
        }),
    }
}

#[test]
fn removed_handles_go_stale_and_slots_are_reused() {
    let mut arena = EntityArena::new();
    let a = arena.insert(text("a"));
    assert!(arena.contains(a));

    assert!(arena.remove(a).is_some());
    assert!(!arena.contains(a));
    assert!(arena.get(a).is_none());

    let b = arena.insert(text("b"));
    assert_eq!(b.index(), a.index());
    assert_ne!(b, a);
    assert!(arena.get(a).is_none());
    assert!(arena.get(b).is_some());
}

#[test]
fn clear_invalidates_everything() {
    let mut arena = EntityArena::new();
    let handles: Vec<_> = (0..4).map(|i| arena.insert(text(&i.to_string()))).collect();
    assert_eq!(arena.len(), 4);

    arena.clear();
    assert!(arena.is_empty());
    assert!(handles.iter().all(|h| !arena.contains(*h)));
    assert!(arena.remove(handles[0]).is_none());
}
