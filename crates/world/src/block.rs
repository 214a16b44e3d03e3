use glam::DVec3;
use sightline_core::RegistryKey;
use sightline_physics::Aabb;

/// Block identifier referencing the registry.
pub type BlockId = u16;
/// Block state metadata bits.
pub type BlockState = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;
/// ID for stone.
pub const BLOCK_STONE: BlockId = 1;
/// ID for water (level encoded in state).
pub const BLOCK_WATER: BlockId = 2;
/// ID for lava (level encoded in state).
pub const BLOCK_LAVA: BlockId = 3;
/// ID for the barrier marker: full outline, never rendered.
pub const BLOCK_BARRIER: BlockId = 4;
/// ID for the light marker: outline only while markers are revealed.
pub const BLOCK_LIGHT: BlockId = 5;
/// ID for a bottom slab.
pub const BLOCK_SLAB: BlockId = 6;
/// ID for glass.
pub const BLOCK_GLASS: BlockId = 7;
/// ID for tall grass (small outline, no item form).
pub const BLOCK_TALL_GRASS: BlockId = 8;

/// State bit marking a block as sharing its cell with a water source.
pub const STATE_WATERLOGGED: BlockState = 0x20;

/// Per-cell data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Voxel {
    /// Block type.
    pub id: BlockId,
    /// Block state bits (fluid level in the low nibble for fluid blocks).
    pub state: BlockState,
}

impl Voxel {
    /// Plain block with no state bits.
    pub const fn block(id: BlockId) -> Self {
        Self { id, state: 0 }
    }

    /// The same block sharing its cell with a water source.
    pub const fn waterlogged(self) -> Self {
        Self {
            id: self.id,
            state: self.state | STATE_WATERLOGGED,
        }
    }

    /// True for the empty cell.
    #[inline]
    pub fn is_air(&self) -> bool {
        self.id == BLOCK_AIR
    }

    /// True when a water source shares the cell.
    #[inline]
    pub fn is_waterlogged(&self) -> bool {
        self.state & STATE_WATERLOGGED != 0
    }
}

/// Flags on the shape query, derived from whoever is looking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeContext {
    /// Marker blocks expose their outline (e.g. the observer holds the marker item).
    pub reveal_markers: bool,
}

/// Outline geometry of a block within its unit cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockShape {
    /// No outline (air, fluid blocks).
    Empty,
    /// Whole cell.
    Full,
    /// Sub-box in cell-local coordinates (0..1 per axis).
    Partial(Aabb),
    /// Whole cell, but only while markers are revealed.
    Marker,
}

impl BlockShape {
    /// Local-space outline under `ctx`, or `None` when the shape is empty.
    pub fn outline(&self, ctx: ShapeContext) -> Option<Aabb> {
        let unit = Aabb::new(DVec3::ZERO, DVec3::ONE);
        match self {
            BlockShape::Empty => None,
            BlockShape::Full => Some(unit),
            BlockShape::Partial(local) => Some(*local),
            BlockShape::Marker => ctx.reveal_markers.then_some(unit),
        }
    }
}

/// Block metadata.
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
    /// Registry key (e.g. `sl:stone`).
    pub key: RegistryKey,
    /// Outline shape used for ray clipping.
    pub shape: BlockShape,
    /// Structural marker that is not meant to be seen (barrier, light).
    pub marker: bool,
    /// Item form shown as the target icon; `None` when there is none.
    pub item: Option<RegistryKey>,
}

impl BlockDescriptor {
    /// Descriptor whose item form shares the block key.
    pub fn simple(path: &'static str, shape: BlockShape) -> Self {
        let key = RegistryKey::builtin(path);
        Self {
            item: Some(key.clone()),
            key,
            shape,
            marker: false,
        }
    }

    /// Drop the item form.
    pub fn without_item(mut self) -> Self {
        self.item = None;
        self
    }

    /// Flag as a structural marker.
    pub fn as_marker(mut self) -> Self {
        self.marker = true;
        self
    }

    /// What the observer can actually see of the block.
    ///
    /// Markers are drawn only while revealed, whatever their outline.
    pub fn visible_shape(&self, ctx: ShapeContext) -> Option<Aabb> {
        if self.marker && !ctx.reveal_markers {
            return None;
        }
        self.shape.outline(ctx)
    }
}

/// Block descriptors indexed by [`BlockId`].
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    descriptors: Vec<BlockDescriptor>,
}

impl BlockRegistry {
    /// Build a registry; index 0 must be air.
    pub fn new(descriptors: Vec<BlockDescriptor>) -> Self {
        debug_assert!(
            descriptors
                .first()
                .is_some_and(|d| d.shape == BlockShape::Empty),
            "block 0 must be an empty shape"
        );
        Self { descriptors }
    }

    /// Descriptor for `id`; unknown ids resolve to air.
    pub fn get(&self, id: BlockId) -> &BlockDescriptor {
        self.descriptors
            .get(id as usize)
            .unwrap_or(&self.descriptors[BLOCK_AIR as usize])
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let slab = Aabb::new(DVec3::ZERO, DVec3::new(1.0, 0.5, 1.0));
        let grass = Aabb::new(DVec3::new(0.1, 0.0, 0.1), DVec3::new(0.9, 0.8, 0.9));
        Self::new(vec![
            BlockDescriptor::simple("air", BlockShape::Empty).without_item(),
            BlockDescriptor::simple("stone", BlockShape::Full),
            BlockDescriptor::simple("water", BlockShape::Empty),
            BlockDescriptor::simple("lava", BlockShape::Empty),
            BlockDescriptor::simple("barrier", BlockShape::Full).as_marker(),
            BlockDescriptor::simple("light", BlockShape::Marker).as_marker(),
            BlockDescriptor::simple("slab", BlockShape::Partial(slab)),
            BlockDescriptor::simple("glass", BlockShape::Full),
            BlockDescriptor::simple("tall_grass", BlockShape::Partial(grass)).without_item(),
        ])
    }
}
