use tiller_core::ConnId;

/// A point-to-point pairing: at most two connection slots. Rooms are
/// created whole on the first claim and destroyed whole on the first
/// disconnect, so a slot never vacates individually.
#[derive(Debug)]
pub struct Room {
    slots: [Option<ConnId>; 2],
}

impl Room {
    pub fn new(first: ConnId) -> Self {
        Self {
            slots: [Some(first), None],
        }
    }

    /// Takes the second slot. Returns false if the room is full.
    pub fn claim(&mut self, conn_id: ConnId) -> bool {
        if self.slots[1].is_some() {
            return false;
        }
        self.slots[1] = Some(conn_id);
        true
    }

    pub fn contains(&self, conn_id: ConnId) -> bool {
        self.slots.iter().any(|slot| *slot == Some(conn_id))
    }

    /// Occupied slots other than `conn_id` — the relay targets.
    pub fn others(&self, conn_id: ConnId) -> impl Iterator<Item = ConnId> + '_ {
        self.slots
            .iter()
            .filter_map(move |slot| slot.filter(|occupant| *occupant != conn_id))
    }
}
