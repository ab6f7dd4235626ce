/// Raster/vector images drawn on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icon {
    HomePlayer,
    OpponentPlayer,
    Ball,
    Cone,
}

impl Icon {
    pub const ALL: [Icon; 4] = [Icon::HomePlayer, Icon::OpponentPlayer, Icon::Ball, Icon::Cone];

    /// Candidate URLs, most preferred first.
    pub fn sources(self) -> &'static [&'static str] {
        match self {
            Icon::HomePlayer => &["assets/player-home.svg"],
            Icon::OpponentPlayer => &["assets/player-opponent.svg"],
            // Prefer the PNG when it is shipped.
            Icon::Ball => &["assets/soccer-ball.png", "assets/soccer-ball.svg"],
            Icon::Cone => &["assets/cone.svg"],
        }
    }

    fn index(self) -> usize {
        match self {
            Icon::HomePlayer => 0,
            Icon::OpponentPlayer => 1,
            Icon::Ball => 2,
            Icon::Cone => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Every source failed; the renderer draws a plain shape instead.
    Failed,
}

#[derive(Clone, Debug)]
pub struct IconSlot {
    icon: Icon,
    attempt: usize,
    state: LoadState,
}

impl IconSlot {
    pub fn new(icon: Icon) -> Self {
        IconSlot {
            icon,
            attempt: 0,
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn current_source(&self) -> Option<&'static str> {
        self.icon.sources().get(self.attempt).copied()
    }

    pub fn mark_ready(&mut self) {
        self.state = LoadState::Ready;
    }

    /// Advances to the next source. Returns the URL to try next, or `None`
    /// once the chain is exhausted.
    pub fn mark_failed(&mut self) -> Option<&'static str> {
        self.attempt += 1;
        let next = self.current_source();
        if next.is_none() {
            log::warn!("no usable image for {:?}; drawing fallback shape", self.icon);
            self.state = LoadState::Failed;
        }
        next
    }
}

/// Load progress of every board icon.
#[derive(Clone, Debug)]
pub struct IconSet {
    slots: [IconSlot; 4],
}

impl Default for IconSet {
    fn default() -> Self {
        IconSet {
            slots: Icon::ALL.map(IconSlot::new),
        }
    }
}

impl IconSet {
    pub fn slot(&self, icon: Icon) -> &IconSlot {
        &self.slots[icon.index()]
    }

    pub fn slot_mut(&mut self, icon: Icon) -> &mut IconSlot {
        &mut self.slots[icon.index()]
    }

    pub fn is_ready(&self, icon: Icon) -> bool {
        self.slot(icon).state() == LoadState::Ready
    }
}
