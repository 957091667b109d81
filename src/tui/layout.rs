//! Width classes for the shell.
//!
//! Render code asks for a class instead of comparing raw column counts.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// Below 60 columns
    Compact,
    /// 60 to 99 columns
    Normal,
    /// 100 columns and up, room for the backend URL
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    pub fn at_least(self, min: Breakpoint) -> bool {
        self >= min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_switch_at_60_and_100() {
        assert_eq!(Breakpoint::from_width(0), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(59), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(99), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(100), Breakpoint::Wide);
        assert_eq!(Breakpoint::from_width(u16::MAX), Breakpoint::Wide);
    }

    #[test]
    fn at_least_is_inclusive() {
        assert!(Breakpoint::Normal.at_least(Breakpoint::Compact));
        assert!(Breakpoint::Normal.at_least(Breakpoint::Normal));
        assert!(!Breakpoint::Normal.at_least(Breakpoint::Wide));
    }
}
