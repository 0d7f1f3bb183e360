use serde::{Deserialize, Serialize};

/// Reference to an episode the player can switch to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
}

impl EpisodeRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            season: None,
            number: None,
        }
    }

    pub fn with_position(mut self, season: u32, number: u32) -> Self {
        self.season = Some(season);
        self.number = Some(number);
        self
    }

    /// Display label, e.g. `S01E02 - Pilot`
    pub fn label(&self) -> String {
        match (self.season, self.number) {
            (Some(season), Some(number)) => {
                format!("S{:02}E{:02} - {}", season, number, self.title)
            }
            (None, Some(number)) => format!("E{:02} - {}", number, self.title),
            _ => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let episode = EpisodeRef::new("e2", "The Return").with_position(1, 2);
        assert_eq!(episode.label(), "S01E02 - The Return");
        assert_eq!(EpisodeRef::new("x", "Special").label(), "Special");
    }
}
