use rand::Rng;

use super::window::{wrap_comic_number, FIRST_COMIC, LAST_COMIC};
use crate::error::PagerError;

/// How many comics are shown per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayCount {
    #[default]
    Three,
    Five,
}

impl DisplayCount {
    pub const ALL: [DisplayCount; 2] = [DisplayCount::Three, DisplayCount::Five];

    pub fn value(self) -> usize {
        match self {
            DisplayCount::Three => 3,
            DisplayCount::Five => 5,
        }
    }

    pub fn from_value(value: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|count| count.value() == value)
    }

    pub fn cycle(self) -> Self {
        match self {
            DisplayCount::Three => DisplayCount::Five,
            DisplayCount::Five => DisplayCount::Three,
        }
    }
}

/// What is currently being looked at: the comic in the middle of the page,
/// how many comics surround it, and whatever was typed into the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub center: i64,
    pub count: DisplayCount,
    pub search_text: String,
}

impl Session {
    pub fn new(center: i64, count: DisplayCount) -> Self {
        Self {
            center,
            count,
            search_text: String::new(),
        }
    }

    pub fn prev(&mut self) {
        self.search_text.clear();
        self.center = wrap_comic_number(self.center - self.count.value() as i64);
    }

    pub fn next(&mut self) {
        self.search_text.clear();
        self.center = wrap_comic_number(self.center + self.count.value() as i64);
    }

    pub fn random<R: Rng>(&mut self, rng: &mut R) {
        self.search_text.clear();
        self.center = rng.gen_range(FIRST_COMIC..=LAST_COMIC);
    }

    /// Jumps to the comic typed into the search box. Leaves the session
    /// untouched when the text is not a comic number.
    pub fn search(&mut self) -> Result<(), PagerError> {
        let center = parse_comic_number(&self.search_text)?;
        self.center = center;
        Ok(())
    }

    pub fn set_display_count(&mut self, count: DisplayCount) {
        self.search_text.clear();
        self.count = count;
    }
}

pub fn parse_comic_number(text: &str) -> Result<i64, PagerError> {
    match text.trim().parse::<i64>() {
        Ok(n) if (FIRST_COMIC..=LAST_COMIC).contains(&n) => Ok(n),
        _ => Err(PagerError::InvalidComicNumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_next_and_prev_move_by_count() {
        let mut session = Session::new(100, DisplayCount::Three);
        session.next();
        assert_eq!(session.center, 103);

        session.set_display_count(DisplayCount::Five);
        session.prev();
        session.prev();
        assert_eq!(session.center, 93);
    }

    #[test]
    fn test_navigation_wraps_around() {
        let mut session = Session::new(2, DisplayCount::Three);
        session.prev();
        assert_eq!(session.center, 2474);

        let mut session = Session::new(2474, DisplayCount::Five);
        session.next();
        assert_eq!(session.center, 4);
    }

    #[test]
    fn test_navigation_clears_search_text() {
        let mut session = Session::new(2, DisplayCount::Three);

        session.search_text = "42".to_string();
        session.next();
        assert!(session.search_text.is_empty());

        session.search_text = "42".to_string();
        session.prev();
        assert!(session.search_text.is_empty());

        session.search_text = "42".to_string();
        session.random(&mut StdRng::seed_from_u64(1));
        assert!(session.search_text.is_empty());

        session.search_text = "42".to_string();
        session.set_display_count(DisplayCount::Five);
        assert!(session.search_text.is_empty());
    }

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(2475);
        let mut session = Session::new(2, DisplayCount::Three);
        for _ in 0..1000 {
            session.random(&mut rng);
            assert!((FIRST_COMIC..=LAST_COMIC).contains(&session.center));
        }
    }

    #[test]
    fn test_search_sets_center() {
        let mut session = Session::new(2, DisplayCount::Three);
        session.search_text = " 2475 ".to_string();

        session.search().unwrap();
        assert_eq!(session.center, 2475);
        assert_eq!(session.search_text, " 2475 ");
    }

    #[test]
    fn test_invalid_search_leaves_session_alone() {
        for text in ["", "abc", "0", "2476", "-5", "12.5"] {
            let mut session = Session::new(7, DisplayCount::Five);
            session.search_text = text.to_string();

            let result = session.search();
            assert!(
                matches!(result, Err(PagerError::InvalidComicNumber(ref t)) if t == text),
                "{text:?} was accepted"
            );
            assert_eq!(session.center, 7);
            assert_eq!(session.count, DisplayCount::Five);
        }
    }

    #[test]
    fn test_display_count_values() {
        assert_eq!(DisplayCount::Three.value(), 3);
        assert_eq!(DisplayCount::Five.value(), 5);
        assert_eq!(DisplayCount::from_value(5), Some(DisplayCount::Five));
        assert_eq!(DisplayCount::from_value(4), None);
        assert_eq!(DisplayCount::Three.cycle(), DisplayCount::Five);
        assert_eq!(DisplayCount::Five.cycle(), DisplayCount::Three);
    }
}
