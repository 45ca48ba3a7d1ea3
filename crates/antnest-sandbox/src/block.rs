/// Contents of one cell of the sandbox terrain.
///
/// The set is closed: every rule that depends on what a cell holds matches on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum BlockKind {
    /// Empty space.
    #[default]
    Air,
    /// Plain ground. Diggable.
    Stone,
    /// Food. Eaten when stood on.
    Mulch,
    /// Doubles health decay while stood on.
    Acidic,
    /// World boundary. Never diggable.
    Container,
    /// Built by the queen; each one counts toward fitness. Never diggable.
    Nest,
}

impl BlockKind {
    /// Returns `true` if an ant can stand on top of this block.
    #[must_use]
    pub fn is_solid(self) -> bool {
        match self {
            BlockKind::Air => false,
            BlockKind::Stone
            | BlockKind::Mulch
            | BlockKind::Acidic
            | BlockKind::Container
            | BlockKind::Nest => true,
        }
    }

    /// Returns `true` if the queen may dig this block away.
    #[must_use]
    pub fn is_diggable(self) -> bool {
        match self {
            BlockKind::Air | BlockKind::Container | BlockKind::Nest => false,
            BlockKind::Stone | BlockKind::Mulch | BlockKind::Acidic => true,
        }
    }
}
