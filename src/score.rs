//! Sustainability grading and session-to-session trend
//!
//! The grade maps total joules onto a discrete A+..E scale through fixed
//! half-open thresholds. The trend compares the current total against the
//! previous measurement held in a `SessionState` that the caller owns and
//! passes in; there is no ambient global, and concurrent sessions get
//! independent state.

/// Discrete sustainability rating, worst to best.
///
/// Declared in ascending order so the derived `Ord` ranks better grades
/// higher (`Grade::APlus > Grade::E`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    E,
    D,
    C,
    B,
    A,
    APlus,
}

impl Grade {
    /// Display label for the grade
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a total energy figure to its grade.
///
/// Half-open thresholds, evaluated in order, first match wins:
/// `< 0.1 → A+`, `< 0.5 → A`, `< 2.0 → B`, `< 5.0 → C`, `< 10.0 → D`,
/// otherwise `E`.
pub fn grade(total_joules: f64) -> Grade {
    if total_joules < 0.1 {
        Grade::APlus
    } else if total_joules < 0.5 {
        Grade::A
    } else if total_joules < 2.0 {
        Grade::B
    } else if total_joules < 5.0 {
        Grade::C
    } else if total_joules < 10.0 {
        Grade::D
    } else {
        Grade::E
    }
}

/// Per-session store for the previous measurement.
///
/// Holds at most one previous total. Every new measurement both consumes
/// and overwrites it, so only consecutive runs compare. Cleared on
/// explicit reset; nothing persists across process restarts.
#[derive(Debug, Default)]
pub struct SessionState {
    previous_total_joules: Option<f64>,
}

impl SessionState {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored previous total, if any
    pub fn previous_total_joules(&self) -> Option<f64> {
        self.previous_total_joules
    }

    /// Record a measurement and return the percent change against the
    /// previous one.
    ///
    /// `((previous - current) / previous) * 100`: positive means the
    /// energy went down, negative means it went up. Returns `None` when
    /// no previous total exists or the previous total was zero (the
    /// relative change is undefined). The previous value is overwritten
    /// unconditionally, including on the very first measurement.
    pub fn record(&mut self, current_total_joules: f64) -> Option<f64> {
        let delta = match self.previous_total_joules {
            Some(previous) if previous != 0.0 => {
                Some(((previous - current_total_joules) / previous) * 100.0)
            }
            _ => None,
        };
        self.previous_total_joules = Some(current_total_joules);
        delta
    }

    /// Forget the previous measurement
    pub fn clear(&mut self) {
        self.previous_total_joules = None;
    }
}
