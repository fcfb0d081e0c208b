use std::io::Write;

use owo_colors::OwoColorize;
use papers_core::{AllFacetCounts, Course, Facet, FilterSelection, Paper, format_year};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print course search results, one per line.
pub fn print_courses(
    w: &mut dyn Write,
    courses: &[&Course],
    query: Option<&str>,
    color: ColorMode,
) -> std::io::Result<()> {
    if courses.is_empty() {
        match query {
            Some(q) => writeln!(w, "No courses match \"{}\"", q)?,
            None => writeln!(w, "No courses available")?,
        }
        return Ok(());
    }

    for course in courses {
        let code = course.course_code.as_deref().unwrap_or("");
        let count = format!(
            "{} paper{}",
            course.paper_count,
            if course.paper_count == 1 { "" } else { "s" }
        );
        if color.enabled() {
            writeln!(
                w,
                "{:<10} {}  {}",
                code.cyan(),
                course.course_title.bold(),
                count.dimmed()
            )?;
        } else {
            writeln!(w, "{:<10} {}  {}", code, course.course_title, count)?;
        }
    }
    Ok(())
}

/// Print the filtered paper table. `is_done` marks papers already worked.
pub fn print_papers(
    w: &mut dyn Write,
    papers: &[&Paper],
    total: usize,
    is_done: impl Fn(&str) -> bool,
    color: ColorMode,
) -> std::io::Result<()> {
    if total == 0 {
        writeln!(w, "No papers uploaded yet")?;
        return Ok(());
    }
    if papers.is_empty() {
        writeln!(w, "No papers match the selected filters ({} total)", total)?;
        return Ok(());
    }

    for paper in papers {
        let done = is_done(&paper.filename);
        let marker = if done { "\u{2713}" } else { " " };
        let exam = Facet::ExamType.display_value(&paper.exam_type);
        let year = format_year(&paper.semester_name);
        let slot = paper.slot.to_uppercase();
        let code = paper.code_label();

        if color.enabled() {
            let line = format!(
                "{:<10} {:<6} {:<8} {:<4} {}",
                code, exam, year, slot, paper.filename
            );
            if done {
                writeln!(w, "{} {}", marker.green(), line.dimmed())?;
            } else {
                writeln!(w, "{} {}", marker, line)?;
            }
        } else {
            writeln!(
                w,
                "{} {:<10} {:<6} {:<8} {:<4} {}",
                marker, code, exam, year, slot, paper.filename
            )?;
        }
    }

    writeln!(w)?;
    let shown = format!("{} of {} papers shown", papers.len(), total);
    if color.enabled() {
        writeln!(w, "{}", shown.dimmed())?;
    } else {
        writeln!(w, "{}", shown)?;
    }
    Ok(())
}

/// Print per-facet chip counts. Selected chips are bracketed.
pub fn print_counts(
    w: &mut dyn Write,
    counts: &AllFacetCounts,
    selection: &FilterSelection,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    for facet in Facet::ALL {
        let chips: Vec<String> = facet
            .candidates()
            .iter()
            .map(|value| {
                let chip = format!("{} ({})", facet.display_value(value), counts.get(facet, value));
                let selected = selection.is_selected(facet, value);
                match (selected, color.enabled()) {
                    (true, true) => format!("[{}]", chip).green().to_string(),
                    (true, false) => format!("[{}]", chip),
                    (false, _) => chip,
                }
            })
            .collect();

        let label = format!("{}:", facet.label());
        if color.enabled() {
            writeln!(w, "{:<10} {}", label.bold(), chips.join("  "))?;
        } else {
            writeln!(w, "{:<10} {}", label, chips.join("  "))?;
        }
    }
    Ok(())
}

/// Print the done-set in the order papers were marked.
pub fn print_done_list(w: &mut dyn Write, done: &[String], color: ColorMode) -> std::io::Result<()> {
    if done.is_empty() {
        writeln!(w, "No papers marked done")?;
        return Ok(());
    }
    for filename in done {
        if color.enabled() {
            writeln!(w, "{} {}", "\u{2713}".green(), filename)?;
        } else {
            writeln!(w, "\u{2713} {}", filename)?;
        }
    }
    Ok(())
}

/// Print a one-line success message.
pub fn print_success(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", message.green())
    } else {
        writeln!(w, "{}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: ColorMode = ColorMode(false);

    fn paper(filename: &str, exam_type: &str, year: &str, slot: &str, code: Option<&str>) -> Paper {
        Paper {
            filename: filename.into(),
            course_title: Some("Operating Systems".into()),
            course_code: code.map(Into::into),
            slot: slot.into(),
            exam_type: exam_type.into(),
            semester_name: year.into(),
        }
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn courses_list_titles_and_counts() {
        let courses = [
            Course {
                course_title: "Operating Systems".into(),
                course_code: Some("BCSE303L".into()),
                paper_count: 1,
            },
            Course {
                course_title: "Compiler Design".into(),
                course_code: None,
                paper_count: 4,
            },
        ];
        let refs: Vec<&Course> = courses.iter().collect();
        let out = render(|w| print_courses(w, &refs, None, PLAIN));
        assert!(out.contains("BCSE303L"));
        assert!(out.contains("Operating Systems  1 paper\n"));
        assert!(out.contains("Compiler Design  4 papers"));
    }

    #[test]
    fn no_course_match_names_query() {
        let out = render(|w| print_courses(w, &[], Some("zzz"), PLAIN));
        assert_eq!(out, "No courses match \"zzz\"\n");
    }

    #[test]
    fn papers_show_done_marker_and_placeholder_code() {
        let a = paper("a.pdf", "cat1", "2024", "a1", Some("BCSE303L"));
        let b = paper("b.pdf", "fat", "2023", "b2", None);
        let out = render(|w| print_papers(w, &[&a, &b], 2, |f| f == "b.pdf", PLAIN));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("  BCSE303L"));
        assert!(lines[0].contains("CAT 1"));
        assert!(lines[0].contains("2024-25"));
        assert!(lines[0].contains("A1"));
        assert!(lines[1].starts_with("\u{2713} \u{2014}"));
        assert!(out.contains("2 of 2 papers shown"));
    }

    #[test]
    fn empty_catalog_and_empty_filter_result_differ() {
        let out = render(|w| print_papers(w, &[], 0, |_| false, PLAIN));
        assert_eq!(out, "No papers uploaded yet\n");
        let out = render(|w| print_papers(w, &[], 3, |_| false, PLAIN));
        assert_eq!(out, "No papers match the selected filters (3 total)\n");
    }

    #[test]
    fn counts_bracket_selected_chips() {
        let papers = vec![
            paper("a.pdf", "CAT1", "2024", "A1", None),
            paper("b.pdf", "fat", "2024", "b2", None),
        ];
        let mut selection = FilterSelection::new();
        selection.select(Facet::ExamType, "cat1");
        let counts = papers_core::facet_counts(&papers, &selection);
        let out = render(|w| print_counts(w, &counts, &selection, PLAIN));
        assert!(out.contains("[CAT 1 (1)]"));
        assert!(out.contains("FAT (1)"));
        assert!(out.contains("2024-25 (1)"));
        assert!(out.contains("B2 (0)"));
    }

    #[test]
    fn done_list_preserves_order() {
        let done = vec!["z.pdf".to_string(), "a.pdf".to_string()];
        let out = render(|w| print_done_list(w, &done, PLAIN));
        assert_eq!(out, "\u{2713} z.pdf\n\u{2713} a.pdf\n");
        let out = render(|w| print_done_list(w, &[], PLAIN));
        assert_eq!(out, "No papers marked done\n");
    }
}
