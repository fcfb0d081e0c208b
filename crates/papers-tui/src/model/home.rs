use papers_core::{Course, CourseIndex, LoadState};

/// State for the Home screen: the course index and its search box.
#[derive(Debug, Default)]
pub struct HomeState {
    pub courses: LoadState<CourseIndex>,
    /// Id of the latest course-index request; older results are dropped.
    pub request_id: u64,
    pub query: String,
    /// Highlighted row within the current matches.
    pub cursor: usize,
    /// A refetch is in flight while the loaded index stays usable.
    pub refreshing: bool,
}

impl HomeState {
    /// Search input is ignored until the index has loaded.
    pub fn accepts_input(&self) -> bool {
        self.courses.is_loaded()
    }

    pub fn matches(&self) -> Vec<&Course> {
        match_with(&self.courses, &self.query)
    }

    /// Course that Enter would open: the highlighted match, or the first.
    pub fn selected(&self) -> Option<&Course> {
        selected_with(&self.courses, &self.query, self.cursor)
    }

    pub fn push_char(&mut self, c: char) {
        if self.accepts_input() {
            self.query.push(c);
            self.cursor = 0;
        }
    }

    pub fn backspace(&mut self) {
        if self.accepts_input() {
            self.query.pop();
            self.cursor = 0;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step(self.cursor, delta, self.matches().len());
    }
}

/// Search the course index the same way from every entry point.
pub fn match_with<'a>(courses: &'a LoadState<CourseIndex>, query: &str) -> Vec<&'a Course> {
    courses
        .loaded()
        .map(|index| index.search(query))
        .unwrap_or_default()
}

pub fn selected_with<'a>(
    courses: &'a LoadState<CourseIndex>,
    query: &str,
    cursor: usize,
) -> Option<&'a Course> {
    let matches = match_with(courses, query);
    matches
        .get(cursor)
        .or_else(|| matches.first())
        .copied()
}

/// Move a cursor by `delta` inside `0..len`, saturating at both ends.
pub fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}
