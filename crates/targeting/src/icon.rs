use crate::hit::HitResult;
use serde::Serialize;
use sightline_core::RegistryKey;
use sightline_world::WorldView;

/// Icon shown next to the current target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IconElement {
    /// Item rendered as the icon.
    Item(RegistryKey),
    /// The target has no renderable representation.
    Empty,
}

impl IconElement {
    /// True for [`IconElement::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, IconElement::Empty)
    }
}

/// Derive the icon for `hit`.
///
/// Blocks use their item form, entities their configured icon. Stale entity
/// handles and misses yield [`IconElement::Empty`].
pub fn icon_for<W>(hit: &HitResult, world: &W) -> IconElement
where
    W: WorldView + ?Sized,
{
    let key = match hit {
        HitResult::Miss => None,
        HitResult::Block { state, .. } => world.descriptor(*state).item.clone(),
        HitResult::Entity { entity, .. } => world
            .entity(*entity)
            .filter(|e| !e.removed)
            .and_then(|e| e.icon.clone()),
    };
    key.map_or(IconElement::Empty, IconElement::Item)
}
