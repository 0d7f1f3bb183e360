use std::collections::VecDeque;

use marquee_catalog_client::MediaType;

/// Ordered list of import phases, consumed front to back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportChain {
    phases: VecDeque<MediaType>,
    current: Option<MediaType>,
}

impl ImportChain {
    /// One-phase chain
    pub fn single(media_type: MediaType) -> Self {
        Self::from_phases([media_type])
    }

    /// Combined import: movies, then series
    pub fn all() -> Self {
        Self::from_phases([MediaType::Movie, MediaType::Series])
    }

    pub fn from_phases(phases: impl IntoIterator<Item = MediaType>) -> Self {
        Self {
            phases: phases.into_iter().collect(),
            current: None,
        }
    }

    /// Move to the next phase and return it
    pub fn advance(&mut self) -> Option<MediaType> {
        self.current = self.phases.pop_front();
        self.current
    }

    pub fn current(&self) -> Option<MediaType> {
        self.current
    }

    /// Phases not started yet
    pub fn remaining(&self) -> impl Iterator<Item = MediaType> + '_ {
        self.phases.iter().copied()
    }

    /// Drop every phase that has not started
    pub fn abandon(&mut self) {
        self.phases.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.phases.is_empty()
    }
}
