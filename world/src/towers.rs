//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use adaptive_defence_core::{CellCoord, TowerId, TowerSnapshot, TowerView};

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, CellCoord>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a tower on `cell` and returns the identifier allocated to it.
    pub(crate) fn insert(&mut self, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, cell);
        id
    }

    /// Reports whether a tower already occupies `cell`.
    pub(crate) fn is_occupied(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|occupied| *occupied == cell)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Captures the towers in placement order.
    pub(crate) fn view(&self) -> TowerView {
        TowerView::from_snapshots(
            self.entries
                .iter()
                .map(|(id, cell)| TowerSnapshot {
                    id: *id,
                    cell: *cell,
                })
                .collect(),
        )
    }
}
