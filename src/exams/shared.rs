// src/exams/shared.rs
use tokio::sync::OnceCell;

use super::directory::ExamDirectory;
use crate::fetch::PageSource;
use crate::utils::error::ExamDirectoryError;

/// The run-wide exam directory. It is built on first use, exactly once even with
/// concurrent callers, and never rebuilt: a failed build leaves an empty directory
/// for the rest of the run.
pub struct SharedExamDirectory {
    source_url: String,
    cell: OnceCell<ExamDirectory>,
}

impl SharedExamDirectory {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            cell: OnceCell::new(),
        }
    }

    /// A directory that is already built; the source is never consulted.
    pub fn preloaded(directory: ExamDirectory) -> Self {
        Self {
            source_url: String::new(),
            cell: OnceCell::new_with(Some(directory)),
        }
    }

    pub fn is_built(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the directory, building it from `source` if this is the first call.
    pub async fn get_or_build<S: PageSource>(&self, source: &S) -> &ExamDirectory {
        self.cell
            .get_or_init(|| async {
                match build(source, &self.source_url).await {
                    Ok(directory) => {
                        tracing::info!("Exam directory loaded: {} programs", directory.len());
                        directory
                    }
                    Err(e) => {
                        tracing::warn!("Exam directory unavailable, continuing without it: {}", e);
                        ExamDirectory::empty()
                    }
                }
            })
            .await
    }
}

async fn build<S: PageSource>(source: &S, url: &str) -> Result<ExamDirectory, ExamDirectoryError> {
    let payload = source
        .fetch(url)
        .await
        .ok_or_else(|| ExamDirectoryError::NoContent(url.to_string()))?;
    ExamDirectory::from_html(&String::from_utf8_lossy(&payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticPages;

    const SOURCE: &str = "https://example.org/minkrit";

    const REFERENCE_PAGE: &str = r#"
        <table></table>
        <table>
          <tr><th>h</th></tr><tr><th>h</th></tr>
          <tr><td>1</td><td>Физика</td><td>Физика</td><td>ЕГЭ</td><td>60</td></tr>
        </table>
    "#;

    #[test]
    fn test_built_once() {
        let source = StaticPages::default().with(SOURCE, REFERENCE_PAGE);
        let shared = SharedExamDirectory::new(SOURCE);
        assert!(!shared.is_built());

        tokio_test::block_on(async {
            assert_eq!(shared.get_or_build(&source).await.len(), 1);
            assert_eq!(shared.get_or_build(&source).await.len(), 1);
        });

        assert!(shared.is_built());
        assert_eq!(source.calls(), 1);
    }

    /// Yields to the scheduler before answering, so concurrent callers overlap.
    struct SlowPages(StaticPages);

    impl PageSource for SlowPages {
        async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
            tokio::task::yield_now().await;
            self.0.fetch(url).await
        }
    }

    #[test]
    fn test_concurrent_callers_build_once() {
        let source = SlowPages(StaticPages::default().with(SOURCE, REFERENCE_PAGE));
        let shared = SharedExamDirectory::new(SOURCE);

        let (first, second) = tokio_test::block_on(async {
            tokio::join!(shared.get_or_build(&source), shared.get_or_build(&source))
        });

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(source.0.calls(), 1);
    }

    #[test]
    fn test_failed_build_stays_empty() {
        let missing = StaticPages::default();
        let shared = SharedExamDirectory::new(SOURCE);

        tokio_test::block_on(async {
            assert!(shared.get_or_build(&missing).await.is_empty());
            // Even with the page available now, the failed build is not retried
            let available = StaticPages::default().with(SOURCE, REFERENCE_PAGE);
            assert!(shared.get_or_build(&available).await.is_empty());
            assert_eq!(available.calls(), 0);
        });

        assert_eq!(missing.calls(), 1);
    }

    #[test]
    fn test_preloaded_never_fetches() {
        let source = StaticPages::default();
        let shared = SharedExamDirectory::preloaded(ExamDirectory::empty());

        tokio_test::block_on(async {
            shared.get_or_build(&source).await;
        });
        assert_eq!(source.calls(), 0);
    }
}
