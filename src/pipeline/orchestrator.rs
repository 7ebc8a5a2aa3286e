// file: src/pipeline/orchestrator.rs
// description: upload validation, ordered page extraction, classification and tree building
// reference: orchestrates asynchronous ingestion workflow

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::extractor::{SourceDocument, TextExtractor};
use crate::models::{RawFragment, SectionTree};
use crate::parser::{FragmentClassifier, SectionGrouper};
use crate::pipeline::builder::TreeBuilder;
use crate::pipeline::progress::{IngestionStats, ProgressTracker};
use crate::store::ThesisStore;
use crate::utils::Validator;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Outcome of one successful ingestion run.
#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub run_id: Uuid,
    pub source_name: String,
    pub source_sha256: String,
    pub tree: SectionTree,
    pub stats: IngestionStats,
}

pub struct IngestionPipeline<E: TextExtractor> {
    config: Config,
    extractor: Arc<E>,
    classifier: FragmentClassifier,
    builder: TreeBuilder,
    progress: Option<Arc<ProgressTracker>>,
}

impl<E: TextExtractor> IngestionPipeline<E> {
    pub fn new(config: Config, extractor: E) -> Result<Self> {
        config.validate()?;
        let classifier = FragmentClassifier::new(&config.headings)?;
        let builder = TreeBuilder::new(config.sections.clone());

        Ok(Self {
            config,
            extractor: Arc::new(extractor),
            classifier,
            builder,
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: Arc<ProgressTracker>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Validates the selection (exactly one file) and ingests it.
    pub async fn ingest_selection(&self, files: Vec<SourceDocument>) -> Result<IngestionReport> {
        let source = Validator::validate_selection(&files)?.clone();
        self.ingest(source).await
    }

    pub async fn ingest(&self, source: SourceDocument) -> Result<IngestionReport> {
        self.ingest_until(source, std::future::pending()).await
    }

    /// Ingests `source`, abandoning the run when `cancel` resolves or the
    /// configured timeout elapses. Partial results are discarded either way.
    pub async fn ingest_until<F>(
        &self,
        source: SourceDocument,
        cancel: F,
    ) -> Result<IngestionReport>
    where
        F: Future<Output = ()>,
    {
        Validator::validate_upload(&source, self.config.ingestion.max_file_size_bytes())?;

        let run = self.run(Arc::new(source));
        let bounded = async {
            match self.config.ingestion.timeout() {
                Some(limit) => match tokio::time::timeout(limit, run).await {
                    Ok(result) => result,
                    Err(_) => Err(PipelineError::TimedOut(limit)),
                },
                None => run.await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel => Err(PipelineError::Cancelled),
            result = bounded => result,
        };

        if let Err(e) = &result {
            error!("Ingestion failed: {}", e);
            if let Some(progress) = &self.progress {
                progress.abandon("Ingestion failed");
            }
        }
        result
    }

    /// Ingests and, only on success, swaps the result into `store`.
    pub async fn ingest_into(
        &self,
        store: &ThesisStore,
        files: Vec<SourceDocument>,
    ) -> Result<IngestionReport> {
        let report = self.ingest_selection(files).await?;
        store.replace(report.tree.clone());
        Ok(report)
    }

    async fn run(&self, source: Arc<SourceDocument>) -> Result<IngestionReport> {
        let run_id = Uuid::new_v4();
        info!(
            "Starting ingestion {} of {} ({} bytes) with {} extractor",
            run_id,
            source.name,
            source.size(),
            self.extractor.name()
        );

        let page_count = self.page_count(source.clone()).await?;
        info!("Document has {} page(s)", page_count);
        if let Some(progress) = &self.progress {
            progress.set_total_pages(page_count);
            progress.add_bytes_processed(source.size());
        }

        let pages = self.extract_pages(source.clone(), page_count).await?;
        let (tree, mut stats) = self.assemble(pages);

        if let Some(progress) = &self.progress {
            progress.set_sections_built(stats.sections_built);
            progress.finish();
            stats.duration_ms = progress.get_stats().duration_ms;
        }
        stats.total_bytes_processed = source.size();

        if tree.is_empty() {
            warn!("No usable text found in {}, produced an empty document", source.name);
        }

        info!(
            "Ingestion {} complete: {} pages, {} sections",
            run_id, stats.pages_extracted, stats.sections_built
        );

        Ok(IngestionReport {
            run_id,
            source_name: source.name.clone(),
            source_sha256: source.sha256(),
            tree,
            stats,
        })
    }

    async fn page_count(&self, source: Arc<SourceDocument>) -> Result<usize> {
        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || extractor.page_count(&source))
            .await
            .map_err(|e| PipelineError::Extraction(format!("page count task failed: {}", e)))?
    }

    /// Pages are extracted concurrently but yielded in page order.
    async fn extract_pages(
        &self,
        source: Arc<SourceDocument>,
        page_count: usize,
    ) -> Result<Vec<Vec<RawFragment>>> {
        let parallel = self.config.ingestion.parallel_pages.max(1);

        let tasks = (0..page_count).map(|page_index| {
            let extractor = self.extractor.clone();
            let source = source.clone();
            let progress = self.progress.clone();

            async move {
                let fragments =
                    tokio::task::spawn_blocking(move || extractor.extract_page(&source, page_index))
                        .await
                        .map_err(|e| {
                            PipelineError::Extraction(format!(
                                "page {} task failed: {}",
                                page_index + 1,
                                e
                            ))
                        })??;

                debug!("Extracted {} fragments from page {}", fragments.len(), page_index + 1);
                if let Some(progress) = &progress {
                    progress.inc_pages_extracted();
                }
                Ok::<_, PipelineError>(fragments)
            }
        });

        stream::iter(tasks).buffered(parallel).try_collect().await
    }

    /// Sequential: nesting depends on fragment order.
    fn assemble(&self, pages: Vec<Vec<RawFragment>>) -> (SectionTree, IngestionStats) {
        let mut stats = IngestionStats::new();
        let mut grouper = SectionGrouper::new(self.config.sections.fallback_title.clone());

        stats.pages_extracted = pages.len();
        for fragment in pages.iter().flatten() {
            stats.fragments_read += 1;
            match self.classifier.classify(fragment) {
                Some(classified) => grouper.push(classified),
                None => stats.fragments_skipped += 1,
            }
        }

        if let Some(progress) = &self.progress {
            progress.add_fragments(stats.fragments_read, stats.fragments_skipped);
        }

        let flat = grouper.finish();
        stats.sections_built = flat.len();
        (self.builder.build(flat), stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelStrategy;
    use crate::error::RejectReason;
    use crate::extractor::{FragmentDump, FragmentDumpExtractor};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticExtractor {
        pages: Vec<Vec<RawFragment>>,
        fail_page: Option<usize>,
        slow_page: Option<(usize, Duration)>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticExtractor {
        fn new(pages: Vec<Vec<RawFragment>>) -> Self {
            Self {
                pages,
                fail_page: None,
                slow_page: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl TextExtractor for StaticExtractor {
        fn name(&self) -> &str {
            "static"
        }

        fn page_count(&self, _source: &SourceDocument) -> Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.len())
        }

        fn extract_page(
            &self,
            _source: &SourceDocument,
            page_index: usize,
        ) -> Result<Vec<RawFragment>> {
            if let Some((slow, delay)) = self.slow_page
                && slow == page_index
            {
                std::thread::sleep(delay);
            }
            if self.fail_page == Some(page_index) {
                return Err(PipelineError::Extraction("corrupt content stream".to_string()));
            }
            Ok(self.pages[page_index].clone())
        }
    }

    fn frag(text: &str, size: f32, font: &str) -> RawFragment {
        RawFragment::new(text, size, Some(font))
    }

    fn pdf() -> SourceDocument {
        SourceDocument::new("thesis.pdf", Some("application/pdf"), b"%PDF-1.7".to_vec())
    }

    fn pipeline(pages: Vec<Vec<RawFragment>>) -> IngestionPipeline<StaticExtractor> {
        IngestionPipeline::new(Config::default_config(), StaticExtractor::new(pages)).unwrap()
    }

    fn summary(tree: &SectionTree) -> Vec<(usize, String, String)> {
        tree.outline()
            .iter()
            .map(|e| (e.depth, e.section.title.clone(), e.section.content.clone()))
            .collect()
    }

    fn row(depth: usize, title: &str, content: &str) -> (usize, String, String) {
        (depth, title.to_string(), content.to_string())
    }

    #[tokio::test]
    async fn test_two_top_level_sections() {
        let report = pipeline(vec![vec![
            frag("Title A", 20.0, "Bold"),
            frag("body one", 10.0, "Arial"),
            frag("Title B", 20.0, "Bold"),
            frag("body two", 10.0, "Arial"),
        ]])
        .ingest(pdf())
        .await
        .unwrap();

        assert_eq!(
            summary(&report.tree),
            vec![row(0, "Title A", "body one"), row(0, "Title B", "body two")]
        );
        assert_eq!(report.stats.sections_built, 2);
    }

    #[tokio::test]
    async fn test_nesting_with_size_bands() {
        let mut config = Config::default_config();
        config.headings.level_strategy = LevelStrategy::SizeBands {
            bands: vec![18.0, 13.0],
        };
        let pages = vec![vec![
            frag("Chapter", 20.0, "Bold"),
            frag("Section", 14.0, "Bold"),
            frag("text", 10.0, "Arial"),
        ]];
        let pipeline = IngestionPipeline::new(config, StaticExtractor::new(pages)).unwrap();

        let report = pipeline.ingest(pdf()).await.unwrap();
        assert_eq!(
            summary(&report.tree),
            vec![row(0, "Chapter", ""), row(1, "Section", "text")]
        );
    }

    #[tokio::test]
    async fn test_default_formula_keeps_large_headings_as_siblings() {
        let report = pipeline(vec![vec![
            frag("Chapter", 20.0, "Bold"),
            frag("Section", 14.0, "Bold"),
            frag("text", 10.0, "Arial"),
        ]])
        .ingest(pdf())
        .await
        .unwrap();

        assert_eq!(
            summary(&report.tree),
            vec![row(0, "Chapter", ""), row(0, "Section", "text")]
        );
    }

    #[tokio::test]
    async fn test_leading_body_becomes_introduction() {
        let report = pipeline(vec![vec![frag("stray text", 10.0, "Arial")]])
            .ingest(pdf())
            .await
            .unwrap();

        assert_eq!(summary(&report.tree), vec![row(0, "Introduction", "stray text")]);
    }

    #[tokio::test]
    async fn test_leading_body_is_not_lost() {
        let leading = ["  first\tline ", "second", "", "  third  part"];
        let mut page: Vec<RawFragment> = leading.iter().map(|t| frag(t, 9.0, "Times")).collect();
        page.push(frag("Heading", 16.0, "Times"));

        let report = pipeline(vec![page]).ingest(pdf()).await.unwrap();
        let intro = &report.tree.roots()[0];

        assert_eq!(intro.title, "Introduction");
        for text in leading {
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            assert!(intro.content.contains(&normalized));
        }
        assert_eq!(report.stats.fragments_skipped, 1);
    }

    #[tokio::test]
    async fn test_empty_document_is_not_an_error() {
        let report = pipeline(vec![vec![frag("   ", 10.0, "Arial")], vec![]])
            .ingest(pdf())
            .await
            .unwrap();

        assert!(report.tree.is_empty());
        assert_eq!(report.stats.pages_extracted, 2);
    }

    #[tokio::test]
    async fn test_pages_are_reassembled_in_order() {
        let mut extractor = StaticExtractor::new(vec![
            vec![frag("One", 20.0, "Bold"), frag("first", 10.0, "Arial")],
            vec![frag("second", 10.0, "Arial")],
            vec![frag("Two", 20.0, "Bold"), frag("third", 10.0, "Arial")],
        ]);
        extractor.slow_page = Some((0, Duration::from_millis(50)));
        let pipeline = IngestionPipeline::new(Config::default_config(), extractor).unwrap();

        let report = pipeline.ingest(pdf()).await.unwrap();
        assert_eq!(
            summary(&report.tree),
            vec![row(0, "One", "first second"), row(0, "Two", "third")]
        );
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let pages = vec![
            (0..40)
                .map(|i| frag(&format!("H{}", i), [20.0, 7.0, 5.0][i % 3], "Bold"))
                .collect(),
        ];
        let report = pipeline(pages).ingest(pdf()).await.unwrap();

        assert_eq!(report.tree.len(), 40);
        assert!(report.tree.duplicate_id().is_none());
    }

    #[tokio::test]
    async fn test_extraction_failure_is_atomic() {
        let store = ThesisStore::empty();
        let previous = pipeline(vec![vec![frag("Previous", 20.0, "Bold")]])
            .ingest_into(&store, vec![pdf()])
            .await
            .unwrap();
        assert_eq!(previous.tree.len(), 1);

        let mut extractor = StaticExtractor::new(vec![
            vec![frag("Kept", 20.0, "Bold")],
            vec![frag("never", 10.0, "Arial")],
        ]);
        extractor.fail_page = Some(1);
        let failing = IngestionPipeline::new(Config::default_config(), extractor).unwrap();

        let err = failing.ingest_into(&store, vec![pdf()]).await.unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
        assert!(err.to_string().starts_with("Failed to process PDF."));
        assert_eq!(store.current().roots()[0].title, "Previous");
    }

    #[tokio::test]
    async fn test_input_rejections_happen_before_extraction() {
        let extractor = StaticExtractor::new(vec![]);
        let calls = extractor.calls.clone();
        let mut config = Config::default_config();
        config.ingestion.max_file_size_mb = 1;
        let pipeline = IngestionPipeline::new(config, extractor).unwrap();

        let oversized = SourceDocument::new("big.pdf", None, vec![0u8; 1024 * 1024 + 1]);
        let err = pipeline.ingest(oversized).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InputRejected(RejectReason::TooLarge { .. })
        ));

        let docx = SourceDocument::new("thesis.docx", None, vec![1]);
        assert!(pipeline.ingest(docx).await.unwrap_err().is_input_rejection());

        let err = pipeline.ingest_selection(vec![]).await.unwrap_err();
        assert!(matches!(err, PipelineError::InputRejected(RejectReason::NoFile)));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancellation_discards_run() {
        let mut extractor = StaticExtractor::new(vec![vec![frag("Slow", 20.0, "Bold")]]);
        extractor.slow_page = Some((0, Duration::from_millis(200)));
        let pipeline = IngestionPipeline::new(Config::default_config(), extractor).unwrap();

        let err = pipeline
            .ingest_until(pdf(), tokio::time::sleep(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
    }

    #[tokio::test]
    async fn test_timeout_discards_run() {
        let mut extractor = StaticExtractor::new(vec![vec![frag("Slow", 20.0, "Bold")]]);
        extractor.slow_page = Some((0, Duration::from_millis(300)));
        let mut config = Config::default_config();
        config.ingestion.timeout_ms = 50;
        let pipeline = IngestionPipeline::new(config, extractor).unwrap();

        let err = pipeline.ingest(pdf()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::TimedOut(limit) if limit == Duration::from_millis(50)
        ));
    }

    #[tokio::test]
    async fn test_progress_is_reported() {
        let progress = Arc::new(ProgressTracker::hidden());
        let report = pipeline(vec![
            vec![frag("A", 20.0, "Bold"), frag(" ", 10.0, "Arial")],
            vec![frag("b", 10.0, "Arial")],
        ])
        .with_progress(progress.clone())
        .ingest(pdf())
        .await
        .unwrap();

        let stats = progress.get_stats();
        assert_eq!(stats.pages_extracted, 2);
        assert_eq!(stats.fragments_read, 3);
        assert_eq!(stats.fragments_skipped, 1);
        assert_eq!(stats.sections_built, 1);
        assert_eq!(report.stats.sections_built, 1);
    }

    #[test]
    fn test_fragment_dump_ingestion_from_sync_code() {
        let source = pdf();
        let dump = FragmentDump {
            source_sha256: Some(source.sha256()),
            pages: vec![vec![frag("stray text", 10.0, "Arial")]],
        };
        let pipeline = IngestionPipeline::new(
            Config::default_config(),
            FragmentDumpExtractor::new(dump).unwrap(),
        )
        .unwrap();
        let store = ThesisStore::seeded().unwrap();

        let report = tokio_test::block_on(pipeline.ingest_into(&store, vec![source])).unwrap();

        assert_eq!(summary(&report.tree), vec![row(0, "Introduction", "stray text")]);
        assert_eq!(store.current().len(), 1);
        assert_eq!(report.source_sha256.len(), 64);
    }
}
