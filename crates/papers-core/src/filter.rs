//! Multi-facet filtering and per-value counts.
//!
//! Facets combine with AND; the selected values inside one facet combine with
//! OR. A facet with nothing selected places no constraint on the catalog.
//! Nothing in here mutates the catalog: every call recomputes from the full
//! snapshot and the current selection.

use std::collections::BTreeSet;

use crate::Paper;
use crate::facet::Facet;

/// Selected values per facet, stored normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    exam_type: BTreeSet<String>,
    semester: BTreeSet<String>,
    slot: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::ExamType => &self.exam_type,
            Facet::Semester => &self.semester,
            Facet::Slot => &self.slot,
        }
    }

    fn values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::ExamType => &mut self.exam_type,
            Facet::Semester => &mut self.semester,
            Facet::Slot => &mut self.slot,
        }
    }

    /// Flip a value's membership; returns whether it is now selected.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        let value = facet.normalize(value);
        let set = self.values_mut(facet);
        if set.remove(&value) {
            false
        } else {
            set.insert(value);
            true
        }
    }

    /// Add a value (no-op when already selected).
    pub fn select(&mut self, facet: Facet, value: &str) {
        let value = facet.normalize(value);
        self.values_mut(facet).insert(value);
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).contains(&facet.normalize(value))
    }

    pub fn clear(&mut self) {
        for facet in Facet::ALL {
            self.values_mut(facet).clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|&f| self.values(f).is_empty())
    }

    /// Copy of this selection with `facet` left unconstrained.
    pub fn without(&self, facet: Facet) -> FilterSelection {
        let mut other = self.clone();
        other.values_mut(facet).clear();
        other
    }

    /// Whether `paper` passes every facet with a non-empty selection.
    pub fn matches(&self, paper: &Paper) -> bool {
        Facet::ALL.iter().all(|&facet| {
            let selected = self.values(facet);
            selected.is_empty() || selected.contains(&facet.value_of(paper))
        })
    }
}

/// Papers passing `selection`, in catalog order.
pub fn filter<'a>(papers: &'a [Paper], selection: &FilterSelection) -> Vec<&'a Paper> {
    papers.iter().filter(|p| selection.matches(p)).collect()
}

/// Catalog positions of the papers passing `selection`, in catalog order.
pub fn filtered_indices(papers: &[Paper], selection: &FilterSelection) -> Vec<usize> {
    papers
        .iter()
        .enumerate()
        .filter(|(_, p)| selection.matches(p))
        .map(|(i, _)| i)
        .collect()
}

/// Counts for one facet, in candidate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts {
    pub facet: Option<Facet>,
    pub entries: Vec<(String, usize)>,
}

impl FacetCounts {
    pub fn get(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// For each candidate of `facet`, the number of papers carrying that value
/// which also pass every *other* facet's selection. The facet's own selection
/// is ignored, so each chip shows what it would contribute.
pub fn count_by_facet_value(
    papers: &[Paper],
    selection: &FilterSelection,
    facet: Facet,
    candidates: &[&str],
) -> FacetCounts {
    let others = selection.without(facet);
    count_against(papers, &others, facet, candidates)
}

/// Counting kernel: `others` must already exclude `facet`.
fn count_against(
    papers: &[Paper],
    others: &FilterSelection,
    facet: Facet,
    candidates: &[&str],
) -> FacetCounts {
    let mut entries: Vec<(String, usize)> = candidates
        .iter()
        .map(|c| (facet.normalize(c), 0))
        .collect();

    for paper in papers.iter().filter(|p| others.matches(p)) {
        let value = facet.value_of(paper);
        if let Some(entry) = entries.iter_mut().find(|(c, _)| *c == value) {
            entry.1 += 1;
        }
    }

    FacetCounts {
        facet: Some(facet),
        entries,
    }
}

/// Counts for every facet against its fixed candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllFacetCounts {
    pub exam_type: FacetCounts,
    pub semester: FacetCounts,
    pub slot: FacetCounts,
}

impl AllFacetCounts {
    pub fn for_facet(&self, facet: Facet) -> &FacetCounts {
        match facet {
            Facet::ExamType => &self.exam_type,
            Facet::Semester => &self.semester,
            Facet::Slot => &self.slot,
        }
    }

    pub fn get(&self, facet: Facet, value: &str) -> usize {
        self.for_facet(facet).get(&facet.normalize(value))
    }
}

pub fn facet_counts(papers: &[Paper], selection: &FilterSelection) -> AllFacetCounts {
    let count = |facet: Facet| count_by_facet_value(papers, selection, facet, facet.candidates());
    AllFacetCounts {
        exam_type: count(Facet::ExamType),
        semester: count(Facet::Semester),
        slot: count(Facet::Slot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(filename: &str, exam_type: &str, slot: &str, semester: &str) -> Paper {
        Paper {
            filename: filename.into(),
            course_title: None,
            course_code: None,
            slot: slot.into(),
            exam_type: exam_type.into(),
            semester_name: semester.into(),
        }
    }

    fn catalog() -> Vec<Paper> {
        vec![
            paper("a.pdf", "CAT1", "A1", "2024"),
            paper("b.pdf", "FAT", "B2", "2024"),
            paper("c.pdf", "cat2", "a1", "2025"),
            paper("d.pdf", "fat", "C1", "2023"),
            paper("e.pdf", "Cat1", "b2", "2025"),
            paper("f.pdf", "midterm", "z9", "Fallsem"),
        ]
    }

    fn names(papers: &[&Paper]) -> Vec<String> {
        papers.iter().map(|p| p.filename.clone()).collect()
    }

    #[test]
    fn empty_selection_keeps_everything_in_order() {
        let c = catalog();
        let out = filter(&c, &FilterSelection::new());
        assert_eq!(out.len(), c.len());
        assert_eq!(names(&out)[0], "a.pdf");
        assert_eq!(names(&out)[5], "f.pdf");
    }

    #[test]
    fn worked_example_from_two_paper_catalog() {
        let c = vec![
            paper("a.pdf", "CAT1", "A1", "2024"),
            paper("b.pdf", "FAT", "B2", "2024"),
        ];
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::ExamType, "cat1");

        assert_eq!(names(&filter(&c, &sel)), vec!["a.pdf"]);
        let counts = count_by_facet_value(&c, &sel, Facet::ExamType, &["cat1", "cat2", "fat"]);
        assert_eq!(counts.get("fat"), 1);
        assert_eq!(counts.get("cat1"), 1);
        assert_eq!(counts.get("cat2"), 0);
    }

    #[test]
    fn or_within_facet_and_across_facets() {
        let c = catalog();
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::ExamType, "cat1");
        sel.toggle(Facet::ExamType, "fat");
        assert_eq!(
            names(&filter(&c, &sel)),
            vec!["a.pdf", "b.pdf", "d.pdf", "e.pdf"]
        );

        sel.toggle(Facet::Semester, "2024");
        assert_eq!(names(&filter(&c, &sel)), vec!["a.pdf", "b.pdf"]);

        sel.toggle(Facet::Slot, "B2");
        assert_eq!(names(&filter(&c, &sel)), vec!["b.pdf"]);
    }

    #[test]
    fn semester_is_not_case_folded() {
        let c = catalog();
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::Semester, "fallsem");
        assert!(filter(&c, &sel).is_empty());
        sel.clear();
        sel.toggle(Facet::Semester, "Fallsem");
        assert_eq!(names(&filter(&c, &sel)), vec!["f.pdf"]);
    }

    #[test]
    fn filter_is_idempotent_and_a_subset() {
        let c = catalog();
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::Slot, "a1");
        let once: Vec<Paper> = filter(&c, &sel).into_iter().cloned().collect();
        let twice: Vec<Paper> = filter(&once, &sel).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert!(once.iter().all(|p| c.contains(p)));
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let mut sel = FilterSelection::new();
        assert!(sel.toggle(Facet::Slot, "A1"));
        assert!(sel.is_selected(Facet::Slot, "a1"));
        assert!(!sel.toggle(Facet::Slot, "a1"));
        assert_eq!(sel, FilterSelection::new());
        assert!(sel.is_empty());
    }

    #[test]
    fn counts_equal_filter_with_facet_replaced() {
        let c = catalog();
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::ExamType, "cat1");
        sel.toggle(Facet::Semester, "2025");

        for facet in Facet::ALL {
            let counts = count_by_facet_value(&c, &sel, facet, facet.candidates());
            for candidate in facet.candidates() {
                let mut replaced = sel.without(facet);
                replaced.toggle(facet, candidate);
                assert_eq!(
                    counts.get(&facet.normalize(candidate)),
                    filter(&c, &replaced).len(),
                    "{:?}={}",
                    facet,
                    candidate
                );
            }
        }
    }

    #[test]
    fn unconstrained_counts_are_raw_counts_and_skip_unknown_values() {
        let c = catalog();
        let all = facet_counts(&c, &FilterSelection::new());
        assert_eq!(all.get(Facet::ExamType, "cat1"), 2);
        assert_eq!(all.get(Facet::ExamType, "fat"), 2);
        assert_eq!(all.get(Facet::ExamType, "cat2"), 1);
        assert_eq!(all.get(Facet::Semester, "2024"), 2);
        assert_eq!(all.get(Facet::Slot, "A1"), 2);
        // "midterm" / "z9" / "Fallsem" are outside the candidate lists.
        let total: usize = all.exam_type.entries.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 5);
        assert_eq!(all.semester.entries.len(), 5);
    }

    #[test]
    fn own_selection_does_not_constrain_own_counts() {
        let c = catalog();
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::Slot, "c1");
        let counts = facet_counts(&c, &sel);
        assert_eq!(counts.get(Facet::Slot, "a1"), 2);
        assert_eq!(counts.get(Facet::Slot, "c1"), 1);
        // Other facets are constrained by the slot selection.
        assert_eq!(counts.get(Facet::ExamType, "fat"), 1);
        assert_eq!(counts.get(Facet::ExamType, "cat1"), 0);
    }

    #[test]
    fn empty_catalog_counts_are_zero() {
        let all = facet_counts(&[], &FilterSelection::new());
        for facet in Facet::ALL {
            assert!(all.for_facet(facet).entries.iter().all(|(_, n)| *n == 0));
            assert_eq!(all.for_facet(facet).entries.len(), facet.candidates().len());
        }
    }

    #[test]
    fn filtered_indices_match_filter() {
        let c = catalog();
        let mut sel = FilterSelection::new();
        sel.toggle(Facet::Slot, "b2");
        assert_eq!(filtered_indices(&c, &sel), vec![1, 4]);
    }
}
