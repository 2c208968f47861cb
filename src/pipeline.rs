use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::extract::Extractor;
use crate::fetch::PageFetch;
use crate::paginate::Paginator;
use crate::sink::CsvSink;

pub struct ScrapeOutcome {
    pub records: usize,
    pub pages: usize,
}

/// Shared scrape driver: paginator → extractor → sink, one page at a
/// time. Both strategies run through here; only the fetcher and
/// extractor differ.
pub async fn run_scrape<F, E>(
    fetcher: F,
    extractor: E,
    sink: &mut CsvSink,
    max_records: usize,
    max_pages: usize,
) -> Result<ScrapeOutcome>
where
    F: PageFetch,
    E: Extractor,
{
    let mut paginator = Paginator::new(fetcher, max_records, max_pages);

    let pb = ProgressBar::new(max_records as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} records")?
            .progress_chars("=> "),
    );

    while let Some(raw) = paginator.next_page().await {
        let records = extractor.extract(&raw);
        let take = records.len().min(paginator.remaining());
        paginator.note_items(records.len());
        sink.append(records.into_iter().take(take));
        pb.inc(take as u64);
    }
    pb.finish_and_clear();

    let written = match sink.flush() {
        Ok(n) => n,
        Err(e) => {
            warn!("Flush failed with {} records collected", sink.len());
            return Err(e.into());
        }
    };
    info!(
        "Scrape complete: {} records over {} pages",
        written,
        paginator.pages_fetched()
    );
    Ok(ScrapeOutcome {
        records: written,
        pages: paginator.pages_fetched(),
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::extract::api::ApiExtractor;
    use crate::fetch::{PageCursor, RawResponse};
    use std::path::PathBuf;

    struct FakeApi {
        pages: Vec<String>,
    }

    impl PageFetch for FakeApi {
        async fn fetch(&self, cursor: &PageCursor) -> Result<RawResponse, PipelineError> {
            match self.pages.get(cursor.index) {
                Some(body) => Ok(RawResponse {
                    status: 200,
                    body: body.clone(),
                }),
                None => Err(PipelineError::Transport("connection reset".into())),
            }
        }
    }

    fn api_page(brands: &[&str]) -> String {
        let items: Vec<String> = brands
            .iter()
            .map(|b| {
                format!(
                    r#"{{"attributes":{{"make_name":"{b}","model_name":"M","price":10000,
                        "manufactured_year":2020,"mileage":{{"gte":"0","lte":"5000"}}}}}}"#
                )
            })
            .collect();
        format!(r#"{{"data":[{}]}}"#, items.join(","))
    }

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mudah_pipeline_{}_{}.csv", name, std::process::id()))
    }

    #[tokio::test]
    async fn drives_pages_until_empty_and_flushes() {
        let fetcher = FakeApi {
            pages: vec![
                api_page(&["Perodua", "Proton"]),
                api_page(&["Honda"]),
                api_page(&[]),
            ],
        };
        let path = temp_csv("empty_end");
        let mut sink = CsvSink::new(&path);
        let outcome = run_scrape(fetcher, ApiExtractor, &mut sink, 100, 50)
            .await
            .unwrap();
        assert_eq!(outcome.records, 3);
        assert_eq!(outcome.pages, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 3);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn record_cap_truncates_mid_page() {
        let fetcher = FakeApi {
            pages: (0..10).map(|_| api_page(&["A", "B", "C"])).collect(),
        };
        let path = temp_csv("cap");
        let mut sink = CsvSink::new(&path);
        let outcome = run_scrape(fetcher, ApiExtractor, &mut sink, 5, 50)
            .await
            .unwrap();
        assert_eq!(outcome.records, 5);
        assert_eq!(outcome.pages, 2);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn transport_failure_keeps_partial_results() {
        let fetcher = FakeApi {
            pages: vec![api_page(&["Perodua"])],
        };
        let path = temp_csv("partial");
        let mut sink = CsvSink::new(&path);
        // 2nd fetch fails; the one collected record is still flushed
        let outcome = run_scrape(fetcher, ApiExtractor, &mut sink, 100, 50)
            .await
            .unwrap();
        assert_eq!(outcome.records, 1);
        std::fs::remove_file(&path).ok();
    }
}
