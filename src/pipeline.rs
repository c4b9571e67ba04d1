// src/pipeline.rs
use crate::config::ProgramConfig;
use crate::exams::{matcher, SharedExamDirectory};
use crate::extractors::{extract_program, NormalizedPage};
use crate::fetch::PageSource;
use crate::models::{PageContext, ProgramRecord, Status};
use crate::validation;

/// Values shared by every program of a run.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub campus: String,
    pub admission_year: u32,
}

/// Records that were parsed, in configuration order, plus the slugs that could not be fetched.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<ProgramRecord>,
    pub download_failed: Vec<String>,
}

/// Processes programs one by one in configuration order.
///
/// A page that cannot be fetched is recorded in `download_failed` and skipped. Every
/// parsed record is passed to `on_record` together with its raw payload as soon as it is
/// validated, so a caller that stops early still has everything processed so far.
pub async fn run_batch<S, F>(
    source: &S,
    directory: &SharedExamDirectory,
    programs: &[ProgramConfig],
    settings: &BatchSettings,
    mut on_record: F,
) -> BatchOutcome
where
    S: PageSource,
    F: FnMut(&str, &[u8], &ProgramRecord),
{
    let mut outcome = BatchOutcome::default();

    for (index, config) in programs.iter().enumerate() {
        let slug = display_slug(config, index);
        tracing::info!("[{}/{}] {}", index + 1, programs.len(), slug);

        let Some(payload) = source.fetch(&config.url).await else {
            tracing::warn!("DOWNLOAD_FAILED: {} ({})", slug, config.url);
            outcome.download_failed.push(slug);
            continue;
        };

        let context = PageContext {
            campus: settings.campus.clone(),
            admission_year: settings.admission_year,
            retrieved_at: chrono::Utc::now().to_rfc3339(),
        };
        let record = process_page(source, directory, &payload, config, &context).await;

        match record.status() {
            Status::Failed => tracing::warn!("{}: failed {:?}", slug, record.errors()),
            status => tracing::info!(
                "{}: {:?}, budget places: {:?}",
                slug,
                status,
                record.program().budget_places
            ),
        }

        on_record(&slug, &payload, &record);
        outcome.records.push(record);
    }

    outcome
}

async fn process_page<S: PageSource>(
    source: &S,
    directory: &SharedExamDirectory,
    payload: &[u8],
    config: &ProgramConfig,
    context: &PageContext,
) -> ProgramRecord {
    // The parsed DOM is dropped before any await point
    let mut program = {
        let page = NormalizedPage::from_bytes(payload);
        extract_program(&page, config, context)
    };

    if program.exams.is_empty() {
        let exams = directory.get_or_build(source).await;
        if matcher::fill_missing_exams(&mut program, exams) {
            tracing::debug!("Exams for '{}' taken from the exam directory", program.name);
        }
    }

    validation::finalize(program)
}

/// Configured slug, or `p<index>` when the configuration has none.
fn display_slug(config: &ProgramConfig, index: usize) -> String {
    if config.slug.is_empty() {
        format!("p{}", index)
    } else {
        config.slug.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticPages;

    const DIRECTORY_URL: &str = "https://example.org/minkrit";

    const DIRECTORY_PAGE: &str = r#"
        <table></table>
        <table>
          <tr><th>h</th></tr><tr><th>h</th></tr>
          <tr><td>1</td><td>Социология</td><td>Обществознание</td><td>ЕГЭ</td><td>65</td></tr>
          <tr><td>История</td><td>ЕГЭ</td><td>60</td></tr>
        </table>
    "#;

    fn settings() -> BatchSettings {
        BatchSettings { campus: "perm".to_string(), admission_year: 2025 }
    }

    fn program(slug: &str, name: &str, url: &str) -> ProgramConfig {
        ProgramConfig {
            slug: slug.to_string(),
            name: name.to_string(),
            faculty: "Факультет".to_string(),
            url: url.to_string(),
            ..ProgramConfig::default()
        }
    }

    fn page(extra: &str) -> String {
        format!(
            "<html><body><h1>Программа</h1><p>4 года, очная форма, 20 бюджетных мест</p>{}</body></html>",
            extra
        )
    }

    #[test]
    fn test_batch_records_failures_and_builds_directory_once() {
        let source = StaticPages::default()
            .with(DIRECTORY_URL, DIRECTORY_PAGE)
            .with("https://example.org/soc", &page(""))
            .with("https://example.org/soc-2", &page(""))
            .with("https://example.org/math", &page("<p>Математика (минимальный балл: 70)</p>"));
        let directory = SharedExamDirectory::new(DIRECTORY_URL);
        let programs = vec![
            program("soc", "Социология", "https://example.org/soc"),
            program("", "Пропавшая", "https://example.org/missing"),
            program("math", "Математика", "https://example.org/math"),
            program("soc-2", "Социология и общество", "https://example.org/soc-2"),
        ];

        let mut seen: Vec<String> = Vec::new();
        let outcome = tokio_test::block_on(run_batch(&source, &directory, &programs, &settings(), |slug, raw, _| {
            assert!(!raw.is_empty());
            seen.push(slug.to_string());
        }));

        assert_eq!(outcome.download_failed, vec!["p1"]);
        assert_eq!(seen, vec!["soc", "math", "soc-2"]);
        assert_eq!(outcome.records.len(), 3);

        let soc = &outcome.records[0];
        assert_eq!(soc.program().exams.len(), 2);
        assert_eq!(soc.program().campus, "perm");
        assert_eq!(soc.status(), Status::Partial, "no description on the page");

        let math = &outcome.records[1];
        assert_eq!(math.program().exams[0].subject, "Математика");
        assert_eq!(outcome.records[2].program().exams[0].subject, "Обществознание");

        // four program fetches plus a single directory fetch
        assert_eq!(source.calls(), 5);
    }

    #[test]
    fn test_empty_batch() {
        let source = StaticPages::default();
        let directory = SharedExamDirectory::new(DIRECTORY_URL);
        let outcome = tokio_test::block_on(run_batch(&source, &directory, &[], &settings(), |_, _, _| {}));

        assert!(outcome.records.is_empty());
        assert!(outcome.download_failed.is_empty());
        assert!(!directory.is_built());
    }
}
