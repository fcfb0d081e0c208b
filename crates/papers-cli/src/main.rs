use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use papers_core::config_file::{self, LOG_ENV, Overrides};
use papers_core::filter::filter;
use papers_core::{
    CatalogScope, Config, CourseIndex, DoneSet, ExamType, Facet, FileStore, FilterSelection,
    HttpPapersService, PaperCatalog, Term, UploadForm, facet_counts,
};

mod output;

use output::ColorMode;

/// Browse, download and upload previous-year exam papers
#[derive(Parser, Debug)]
#[command(name = "papers", version, about, long_about = None)]
struct Cli {
    /// Papers service base URL (overrides everything else)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Use a papers service running on localhost:8080
    #[arg(long, global = true)]
    local: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the course index by title or code
    Courses {
        /// Case-insensitive substring of a course title or code
        query: Option<String>,

        /// List every course instead of the first matches
        #[arg(long)]
        all: bool,
    },

    /// List papers, optionally scoped to one course and filtered by facet
    Papers {
        /// Course title; omit for all papers
        #[arg(long)]
        course: Option<String>,

        /// Exam type chip (cat1, cat2, fat); repeatable
        #[arg(long)]
        exam_type: Vec<String>,

        /// Year chip (e.g. 2024); repeatable
        #[arg(long)]
        year: Vec<String>,

        /// Slot chip (e.g. a1); repeatable
        #[arg(long)]
        slot: Vec<String>,

        /// Also print per-chip counts
        #[arg(long)]
        counts: bool,
    },

    /// Inspect or change the set of papers marked done
    Done {
        #[command(subcommand)]
        action: DoneAction,
    },

    /// Save a stored paper to disk
    Download {
        /// Stored filename, as listed by `papers papers`
        filename: String,

        /// Directory to write into (defaults to the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a paper
    Upload {
        #[arg(long)]
        course_title: String,

        /// Path of the file to upload
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value = "")]
        course_code: String,

        #[arg(long, default_value = "")]
        year: String,

        /// Fallsem, Wintersem or Summersem
        #[arg(long)]
        semester: Option<Term>,

        /// CAT1, CAT2 or FAT
        #[arg(long)]
        exam_type: Option<ExamType>,

        #[arg(long, default_value = "")]
        slot: String,
    },
}

#[derive(Subcommand, Debug)]
enum DoneAction {
    /// Flip a paper's done mark
    Toggle { filename: String },
    /// Print every paper marked done
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Resolve config: CLI flags > env vars > config file > defaults
    let config = config_file::resolve(
        &config_file::load_config(),
        &Overrides {
            base_url: cli.base_url.clone(),
            local: cli.local,
        },
    );
    tracing::debug!(base_url = %config.base_url, "resolved configuration");

    let color = ColorMode(!cli.no_color);

    match cli.command {
        Command::Courses { query, all } => courses(&config, query, all, color).await,
        Command::Papers {
            course,
            exam_type,
            year,
            slot,
            counts,
        } => {
            let mut selection = FilterSelection::new();
            for (facet, values) in [
                (Facet::ExamType, &exam_type),
                (Facet::Semester, &year),
                (Facet::Slot, &slot),
            ] {
                for value in values {
                    selection.select(facet, value);
                }
            }
            papers(&config, course, selection, counts, color).await
        }
        Command::Done { action } => done(&config, action, color),
        Command::Download { filename, output } => download(&config, &filename, output, color).await,
        Command::Upload {
            course_title,
            file,
            course_code,
            year,
            semester,
            exam_type,
            slot,
        } => {
            let form = UploadForm {
                course_title,
                course_code,
                year,
                semester_name: semester,
                exam_type,
                slot,
                file: Some(file),
            };
            upload(&config, &form, color).await
        }
    }
}

async fn courses(
    config: &Config,
    query: Option<String>,
    all: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let service = HttpPapersService::from_config(config)?;
    let index = CourseIndex::load(&service).await?;

    let mut stdout = std::io::stdout();
    if all {
        let courses: Vec<_> = index.courses.iter().collect();
        output::print_courses(&mut stdout, &courses, None, color)?;
    } else {
        let query = query.unwrap_or_default();
        let matches = index.search(&query);
        let label = (!query.is_empty()).then_some(query.as_str());
        output::print_courses(&mut stdout, &matches, label, color)?;
    }
    Ok(())
}

async fn papers(
    config: &Config,
    course: Option<String>,
    selection: FilterSelection,
    show_counts: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let service = HttpPapersService::from_config(config)?;
    let scope = CatalogScope::from_param(course.as_deref());
    let catalog = PaperCatalog::load(&service, scope).await?;
    let done = DoneSet::new(FileStore::new(&config.data_dir)).snapshot();

    let mut stdout = std::io::stdout();
    let header = format!("{} ({})", catalog.scope.title(), catalog.subtitle());
    if color.enabled() {
        use owo_colors::OwoColorize;
        writeln!(stdout, "{}\n", header.bold())?;
    } else {
        writeln!(stdout, "{}\n", header)?;
    }

    let visible = filter(&catalog.papers, &selection);
    output::print_papers(
        &mut stdout,
        &visible,
        catalog.papers.len(),
        |filename| done.contains(filename),
        color,
    )?;

    if show_counts {
        let counts = facet_counts(&catalog.papers, &selection);
        output::print_counts(&mut stdout, &counts, &selection, color)?;
    }
    Ok(())
}

fn done(config: &Config, action: DoneAction, color: ColorMode) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    let mut done = DoneSet::new(FileStore::new(&config.data_dir));
    let mut stdout = std::io::stdout();

    match action {
        DoneAction::Toggle { filename } => {
            let now_done = done.toggle(&filename)?;
            let message = if now_done {
                format!("Marked {} done", filename)
            } else {
                format!("Unmarked {}", filename)
            };
            output::print_success(&mut stdout, &message, color)?;
        }
        DoneAction::List => {
            output::print_done_list(&mut stdout, &done.list(), color)?;
        }
    }
    Ok(())
}

async fn download(
    config: &Config,
    filename: &str,
    output_dir: Option<PathBuf>,
    color: ColorMode,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use papers_core::PapersService;

    let service = HttpPapersService::from_config(config)?;
    let dest_dir = output_dir.unwrap_or_else(|| config.download_dir.clone());
    std::fs::create_dir_all(&dest_dir)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Downloading {}...", filename));
    spinner.enable_steady_tick(Duration::from_millis(120));

    match service.download(filename, &dest_dir).await {
        Ok(path) => {
            spinner.finish_and_clear();
            output::print_success(
                &mut std::io::stdout(),
                &format!("Saved {} in {:.0?}", path.display(), spinner.elapsed()),
                color,
            )?;
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            anyhow::bail!("Download of {} failed: {}", filename, e)
        }
    }
}

async fn upload(config: &Config, form: &UploadForm, color: ColorMode) -> anyhow::Result<()> {
    let service = HttpPapersService::from_config(config)?;
    let receipt = papers_core::upload::submit(&service, form).await?;
    output::print_success(&mut std::io::stdout(), &receipt.message, color)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn papers_filters_are_repeatable() {
        let cli = Cli::try_parse_from([
            "papers",
            "papers",
            "--course",
            "Operating Systems",
            "--exam-type",
            "cat1",
            "--exam-type",
            "fat",
            "--slot",
            "A1",
            "--counts",
        ])
        .unwrap();
        match cli.command {
            Command::Papers {
                course,
                exam_type,
                slot,
                year,
                counts,
            } => {
                assert_eq!(course.as_deref(), Some("Operating Systems"));
                assert_eq!(exam_type, vec!["cat1", "fat"]);
                assert_eq!(slot, vec!["A1"]);
                assert!(year.is_empty());
                assert!(counts);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["papers", "courses", "os", "--local", "--no-color"]).unwrap();
        assert!(cli.local);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Command::Courses { query: Some(ref q), all: false } if q == "os"));
    }

    #[test]
    fn upload_parses_enums_case_insensitively() {
        let cli = Cli::try_parse_from([
            "papers",
            "upload",
            "--course-title",
            "Operating Systems",
            "--file",
            "os.pdf",
            "--semester",
            "wintersem",
            "--exam-type",
            "cat2",
        ])
        .unwrap();
        match cli.command {
            Command::Upload {
                semester,
                exam_type,
                course_code,
                ..
            } => {
                assert_eq!(semester, Some(Term::Wintersem));
                assert_eq!(exam_type, Some(ExamType::Cat2));
                assert_eq!(course_code, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn upload_rejects_unknown_exam_type() {
        let result = Cli::try_parse_from([
            "papers",
            "upload",
            "--course-title",
            "OS",
            "--file",
            "os.pdf",
            "--exam-type",
            "midterm",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn upload_requires_title_and_file() {
        assert!(Cli::try_parse_from(["papers", "upload", "--file", "os.pdf"]).is_err());
        assert!(Cli::try_parse_from(["papers", "upload", "--course-title", "OS"]).is_err());
    }

    #[test]
    fn done_subcommands_parse() {
        let cli = Cli::try_parse_from(["papers", "done", "toggle", "a.pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Done { action: DoneAction::Toggle { ref filename } } if filename == "a.pdf"
        ));
        let cli = Cli::try_parse_from(["papers", "done", "list"]).unwrap();
        assert!(matches!(cli.command, Command::Done { action: DoneAction::List }));
    }
}
