/// Template matching data types

/// Best placement of the template within one capture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate {
    /// X coordinate of the top-left corner in the capture
    pub x: u32,
    /// Y coordinate of the top-left corner in the capture
    pub y: u32,
    /// Normalized correlation coefficient (-1.0..=1.0)
    pub score: f32,
}

/// Outcome of a single capture-match-click tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Whether the best score cleared the threshold (and a click was issued)
    pub found: bool,
    /// Click point in screen coordinates, present only when `found`
    pub location: Option<(u32, u32)>,
    /// The candidate the decision was based on
    pub candidate: MatchCandidate,
}

impl MatchCandidate {
    pub fn new(x: u32, y: u32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Whether this candidate passes the threshold gate
    pub fn clears(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

impl MatchResult {
    pub fn matched(candidate: MatchCandidate, click_point: (u32, u32)) -> Self {
        Self {
            found: true,
            location: Some(click_point),
            candidate,
        }
    }

    pub fn missed(candidate: MatchCandidate) -> Self {
        Self {
            found: false,
            location: None,
            candidate,
        }
    }

    /// One-line description for logs and the status display
    pub fn summary(&self) -> String {
        match self.location {
            Some((x, y)) => format!(
                "Match found, clicked at ({}, {}) - score {:.3}",
                x, y, self.candidate.score
            ),
            None => format!("No match (best score {:.3})", self.candidate.score),
        }
    }
}
