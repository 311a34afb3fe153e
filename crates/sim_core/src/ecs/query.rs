//! Query system for component access
//!
//! A query names a set of component types as a tuple, e.g.
//! `world.query::<(Position, Velocity)>()`, and yields a snapshot of every
//! alive entity holding all of them. Single-type queries use a one-element
//! tuple: `world.query::<(Position,)>()`.

use std::any::TypeId;

use super::component::component_name;
use super::storage::ErasedStorage;
use super::{Component, Entity};

/// A tuple of component types that can be queried together
pub trait ComponentSet: 'static {
    /// Type ids of every member, in declaration order
    fn type_ids() -> Vec<TypeId>;

    /// Short names of every member, for diagnostics
    fn names() -> Vec<&'static str>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$name>()),+]
            }

            fn names() -> Vec<&'static str> {
                vec![$(component_name::<$name>()),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

/// Intersect the owner sets of `storages`
///
/// Iteration starts from the smallest storage, so the cost is bounded by the
/// least populated component type. Output follows that storage's dense order.
pub(crate) fn intersect(mut storages: Vec<&dyn ErasedStorage>) -> Vec<Entity> {
    // Stable sort: equal sizes keep declaration order, so results are reproducible
    storages.sort_by_key(|storage| storage.len());

    let Some((smallest, rest)) = storages.split_first() else {
        return Vec::new();
    };

    smallest
        .entities()
        .iter()
        .copied()
        .filter(|&entity| rest.iter().all(|storage| storage.contains(entity)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {}

    struct Tag;
    impl Component for Tag {}

    #[test]
    fn test_type_ids_follow_declaration_order() {
        let ids = <(Position, Tag)>::type_ids();
        assert_eq!(ids, vec![TypeId::of::<Position>(), TypeId::of::<Tag>()]);
        assert_eq!(<(Position, Tag)>::names(), vec!["Position", "Tag"]);
    }

    #[test]
    fn test_intersect_of_nothing_is_empty() {
        assert!(intersect(Vec::new()).is_empty());
    }
}
