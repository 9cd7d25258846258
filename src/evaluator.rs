/// Verdict bracket for a measured reaction time. Bounds are exclusive on the
/// upper end: 199 ms is ultra-fast, 200 ms is great.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    UltraFast,
    Great,
    Good,
    RoomToImprove,
}

impl Rating {
    pub fn for_time(reaction_ms: u64) -> Self {
        match reaction_ms {
            0..=199 => Rating::UltraFast,
            200..=299 => Rating::Great,
            300..=499 => Rating::Good,
            _ => Rating::RoomToImprove,
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Rating::UltraFast => "ultra-fast",
            Rating::Great => "great",
            Rating::Good => "good",
            Rating::RoomToImprove => "room to improve",
        }
    }
}

const NEW_RECORD_NOTICE: &str = "new record!";

/// Pure verdict text for the result panel. No side effects, no randomness.
pub fn evaluate(reaction_ms: u64, is_new_record: bool) -> String {
    let rating = Rating::for_time(reaction_ms);
    if is_new_record {
        format!("{} ({})", rating.phrase(), NEW_RECORD_NOTICE)
    } else {
        rating.phrase().to_string()
    }
}
