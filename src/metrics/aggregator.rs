//! @ai:module:intent Walk a results directory and fold job metrics into sequences
//! @ai:module:layer application
//! @ai:module:public_api Aggregator, AggregatorTrait, AnalysisRun, LoadFailure, FileDiscovery, FileCheck
//! @ai:module:stateless true

use crate::config::DiscoveryConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::metrics::extractor::extract;
use crate::metrics::types::{AggregatedMetrics, MetricName};
use crate::results::{ResultLoader, ResultLoaderTrait};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent A file or job skipped during aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    /// Set when a single job was rejected and the rest of the file was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_index: Option<usize>,
    pub kind: ErrorKind,
    pub message: String,
}

impl LoadFailure {
    fn from_error(path: &Path, job_index: Option<usize>, error: &Error) -> Self {
        Self {
            path: path.to_path_buf(),
            job_index,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// @ai:intent Outcome of one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub results_dir: PathBuf,
    pub metrics: AggregatedMetrics,
    pub files_discovered: usize,
    pub files_loaded: usize,
    pub jobs_processed: usize,
    pub failures: Vec<LoadFailure>,
}

/// @ai:intent Trait for metric aggregation over a results directory
pub trait AggregatorTrait: Send + Sync {
    /// @ai:intent Aggregate every matching result file under a directory
    fn aggregate(&self, results_dir: &Path) -> Result<AnalysisRun>;
}

/// @ai:intent Result files found in a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiscovery {
    pub files: Vec<PathBuf>,
    /// Matching entries that could not be opened (e.g. dangling symlinks).
    pub unreadable: Vec<LoadFailure>,
}

/// @ai:intent Load status of one result file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub path: PathBuf,
    pub jobs: usize,
    pub failures: Vec<LoadFailure>,
}

impl FileCheck {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Contribution of a single file, merged in file order.
struct FileOutcome {
    metrics: AggregatedMetrics,
    loaded: bool,
    jobs: usize,
    failures: Vec<LoadFailure>,
}

/// @ai:intent Loads, extracts and merges metrics from result files
pub struct Aggregator<L: ResultLoaderTrait = ResultLoader> {
    loader: L,
    discovery: DiscoveryConfig,
    tracked: Vec<MetricName>,
}

impl Aggregator<ResultLoader> {
    /// @ai:intent Create an aggregator backed by the filesystem loader
    /// @ai:effects pure
    pub fn new(discovery: DiscoveryConfig, tracked: &[MetricName]) -> Self {
        Self::with_loader(ResultLoader::new(), discovery, tracked)
    }
}

impl<L: ResultLoaderTrait> Aggregator<L> {
    /// @ai:intent Create an aggregator with a custom loader
    /// @ai:effects pure
    pub fn with_loader(loader: L, discovery: DiscoveryConfig, tracked: &[MetricName]) -> Self {
        Self {
            loader,
            discovery,
            tracked: tracked.to_vec(),
        }
    }

    /// @ai:intent Find result files in deterministic order
    /// @ai:pre results_dir is an existing directory
    /// @ai:post matching entries that cannot be read are returned as failures, not dropped
    /// @ai:effects fs:read
    pub fn discover_files(&self, results_dir: &Path) -> Result<FileDiscovery> {
        let metadata = std::fs::metadata(results_dir).map_err(|source| Error::NotFound {
            path: results_dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotFound {
                path: results_dir.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let include = self.discovery.include_regex()?;
        let max_depth = if self.discovery.recursive { usize::MAX } else { 1 };
        let mut discovery = FileDiscovery::default();

        let walker = WalkDir::new(results_dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_result_file(entry.path(), &include) {
                        discovery.files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    let path = match e.path() {
                        Some(path) if self.is_result_file(path, &include) => path.to_path_buf(),
                        _ => {
                            tracing::warn!(
                                "Skipping unreadable entry in {}: {}",
                                results_dir.display(),
                                e
                            );
                            continue;
                        }
                    };

                    let message = e.to_string();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other(message));
                    let error = Error::NotFound {
                        path: path.clone(),
                        source,
                    };
                    tracing::warn!("Skipping result file {}: {}", path.display(), error);
                    discovery
                        .unreadable
                        .push(LoadFailure::from_error(&path, None, &error));
                }
            }
        }

        Ok(discovery)
    }

    /// @ai:intent Whether a path follows the result file naming convention
    /// @ai:effects pure
    fn is_result_file(&self, path: &Path, include: &Option<Regex>) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };
        let extension_matches = path
            .extension()
            .map(|ext| ext == self.discovery.normalized_extension())
            .unwrap_or(false);

        extension_matches
            && !name.starts_with('.')
            && include.as_ref().map(|re| re.is_match(&name)).unwrap_or(true)
    }

    /// @ai:intent Load and extract every matching file without aggregating
    /// @ai:post one FileCheck per discovered file, in discovery order
    /// @ai:effects fs:read
    pub fn check(&self, results_dir: &Path) -> Result<Vec<FileCheck>> {
        let discovery = self.discover_files(results_dir)?;

        let mut checks: Vec<FileCheck> = discovery
            .unreadable
            .into_iter()
            .map(|failure| FileCheck {
                path: failure.path.clone(),
                jobs: 0,
                failures: vec![failure],
            })
            .collect();

        checks.extend(discovery.files.iter().map(|path| {
            let outcome = self.ingest_file(path);
            FileCheck {
                path: path.clone(),
                jobs: outcome.jobs,
                failures: outcome.failures,
            }
        }));

        Ok(checks)
    }

    /// @ai:intent Load one file and extract every job it holds
    /// @ai:effects fs:read
    fn ingest_file(&self, path: &Path) -> FileOutcome {
        let mut outcome = FileOutcome {
            metrics: AggregatedMetrics::new(&self.tracked),
            loaded: false,
            jobs: 0,
            failures: Vec::new(),
        };

        let document = match self.loader.load(path) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Skipping result file {}: {}", path.display(), e);
                outcome.failures.push(LoadFailure::from_error(path, None, &e));
                return outcome;
            }
        };
        outcome.loaded = true;

        for (index, job) in document.jobs.iter().enumerate() {
            match extract(job) {
                Ok(set) => {
                    outcome.metrics.push(&set);
                    outcome.jobs += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping job {} in {}: {}", index, path.display(), e);
                    outcome
                        .failures
                        .push(LoadFailure::from_error(path, Some(index), &e));
                }
            }
        }

        outcome
    }
}

impl<L: ResultLoaderTrait> AggregatorTrait for Aggregator<L> {
    /// @ai:intent Aggregate metrics from every matching file
    /// @ai:post sequences follow file order, then job order within a file
    /// @ai:effects fs:read
    fn aggregate(&self, results_dir: &Path) -> Result<AnalysisRun> {
        let FileDiscovery { files, unreadable } = self.discover_files(results_dir)?;
        tracing::info!(
            "Found {} result files in {}",
            files.len() + unreadable.len(),
            results_dir.display()
        );

        let outcomes: Vec<FileOutcome> = if self.discovery.parallel {
            files.par_iter().map(|path| self.ingest_file(path)).collect()
        } else {
            files.iter().map(|path| self.ingest_file(path)).collect()
        };

        let mut run = AnalysisRun {
            results_dir: results_dir.to_path_buf(),
            metrics: AggregatedMetrics::new(&self.tracked),
            files_discovered: files.len() + unreadable.len(),
            files_loaded: 0,
            jobs_processed: 0,
            failures: unreadable,
        };

        for outcome in outcomes {
            if outcome.loaded {
                run.files_loaded += 1;
            }
            run.jobs_processed += outcome.jobs;
            run.metrics.extend(outcome.metrics);
            run.failures.extend(outcome.failures);
        }

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultDocument;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn job(bw: f64, iops: f64) -> String {
        format!(r#"{{"read": {{"bw": {}, "iops": {}}}}}"#, bw, iops)
    }

    fn aggregator(discovery: DiscoveryConfig) -> Aggregator {
        Aggregator::new(discovery, &MetricName::DEFAULT_TRACKED)
    }

    #[test]
    fn test_aggregates_files_then_jobs_in_order() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            "b.json",
            &format!(r#"{{"jobs": [{}, {}]}}"#, job(3.0, 30.0), job(4.0, 40.0)),
        );
        write_file(temp.path(), "a.json", &format!(r#"{{"jobs": [{}]}}"#, job(1.0, 10.0)));

        let run = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();

        assert_eq!(run.files_discovered, 2);
        assert_eq!(run.files_loaded, 2);
        assert_eq!(run.jobs_processed, 3);
        assert_eq!(run.metrics.get(MetricName::ReadBw).unwrap(), &[1.0, 3.0, 4.0]);
        assert_eq!(run.metrics.get(MetricName::WriteIops).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ignores_other_extensions_and_hidden_files() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "run.json", &format!(r#"{{"jobs": [{}]}}"#, job(1.0, 1.0)));
        write_file(temp.path(), "notes.txt", "not a result");
        write_file(temp.path(), ".partial.json", "{");

        let run = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();
        assert_eq!(run.files_discovered, 1);
        assert!(run.failures.is_empty());
    }

    #[test]
    fn test_empty_directory_yields_empty_sequences() {
        let temp = TempDir::new().unwrap();
        let run = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();

        assert_eq!(run.metrics.names(), MetricName::DEFAULT_TRACKED.to_vec());
        assert!(run.metrics.iter().all(|(_, values)| values.is_empty()));
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = aggregator(DiscoveryConfig::default())
            .aggregate(&temp.path().join("nope"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_corrupt_file_is_recorded_and_skipped() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "good.json", &format!(r#"{{"jobs": [{}]}}"#, job(5.0, 1.0)));
        write_file(temp.path(), "bad.json", "{\"jobs\": [");

        let run = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();

        assert_eq!(run.files_loaded, 1);
        assert_eq!(run.metrics.get(MetricName::ReadBw).unwrap(), &[5.0]);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].path, temp.path().join("bad.json"));
        assert_eq!(run.failures[0].kind, ErrorKind::MalformedInput);
        assert_eq!(run.failures[0].job_index, None);
    }

    #[test]
    fn test_invalid_job_skipped_within_file() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            "mixed.json",
            &format!(r#"{{"jobs": [{}, 42, {}]}}"#, job(1.0, 1.0), job(2.0, 2.0)),
        );

        let run = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();

        assert_eq!(run.jobs_processed, 2);
        assert_eq!(run.metrics.get(MetricName::ReadBw).unwrap(), &[1.0, 2.0]);
        assert_eq!(run.failures[0].job_index, Some(1));
        assert_eq!(run.failures[0].kind, ErrorKind::InvalidRecord);
    }

    #[test]
    fn test_recursive_and_include_pattern() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "4k-a.json", &format!(r#"{{"jobs": [{}]}}"#, job(1.0, 1.0)));
        write_file(temp.path(), "1m-a.json", &format!(r#"{{"jobs": [{}]}}"#, job(9.0, 9.0)));
        write_file(temp.path(), "nested/4k-b.json", &format!(r#"{{"jobs": [{}]}}"#, job(2.0, 2.0)));

        let flat = aggregator(DiscoveryConfig {
            include_pattern: Some("^4k-".to_string()),
            ..Default::default()
        })
        .aggregate(temp.path())
        .unwrap();
        assert_eq!(flat.metrics.get(MetricName::ReadBw).unwrap(), &[1.0]);

        let deep = aggregator(DiscoveryConfig {
            include_pattern: Some("^4k-".to_string()),
            recursive: true,
            ..Default::default()
        })
        .aggregate(temp.path())
        .unwrap();
        assert_eq!(deep.files_discovered, 2);
        assert_eq!(deep.jobs_processed, 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let temp = TempDir::new().unwrap();
        for i in 0..16 {
            write_file(
                temp.path(),
                &format!("run-{:02}.json", i),
                &format!(r#"{{"jobs": [{}, {}]}}"#, job(i as f64, 1.0), job(i as f64 * 10.0, 2.0)),
            );
        }
        write_file(temp.path(), "run-99.json", "garbage");

        let sequential = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();
        let parallel = aggregator(DiscoveryConfig {
            parallel: true,
            ..Default::default()
        })
        .aggregate(temp.path())
        .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_recorded() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "good.json", &format!(r#"{{"jobs": [{}]}}"#, job(5.0, 1.0)));
        std::os::unix::fs::symlink(temp.path().join("gone.json"), temp.path().join("dangling.json"))
            .unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.txt"), temp.path().join("other.txt"))
            .unwrap();

        let run = aggregator(DiscoveryConfig::default())
            .aggregate(temp.path())
            .unwrap();

        assert_eq!(run.files_discovered, 2);
        assert_eq!(run.files_loaded, 1);
        assert_eq!(run.metrics.get(MetricName::ReadBw).unwrap(), &[5.0]);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].path, temp.path().join("dangling.json"));
        assert_eq!(run.failures[0].kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_check_reports_bad_job_in_loadable_file() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a-good.json", &format!(r#"{{"jobs": [{}]}}"#, job(1.0, 1.0)));
        write_file(
            temp.path(),
            "b-mixed.json",
            &format!(r#"{{"jobs": [{}, "oops"]}}"#, job(2.0, 2.0)),
        );
        write_file(temp.path(), "c-broken.json", "{");

        let checks = aggregator(DiscoveryConfig::default())
            .check(temp.path())
            .unwrap();

        assert_eq!(checks.len(), 3);
        assert!(checks[0].is_ok());
        assert_eq!(checks[0].jobs, 1);

        assert!(!checks[1].is_ok());
        assert_eq!(checks[1].jobs, 1);
        assert_eq!(checks[1].failures[0].job_index, Some(1));
        assert_eq!(checks[1].failures[0].kind, ErrorKind::InvalidRecord);

        assert!(!checks[2].is_ok());
        assert_eq!(checks[2].failures[0].kind, ErrorKind::MalformedInput);
    }

    struct MapLoader(HashMap<PathBuf, ResultDocument>);

    impl ResultLoaderTrait for MapLoader {
        fn load(&self, path: &Path) -> Result<ResultDocument> {
            self.0.get(path).cloned().ok_or_else(|| Error::MalformedInput {
                path: path.to_path_buf(),
                message: "no fixture".to_string(),
            })
        }
    }

    #[test]
    fn test_custom_loader_is_used() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fixture.json");
        write_file(temp.path(), "fixture.json", "");

        let document = ResultDocument {
            fio_version: None,
            jobs: vec![serde_json::json!({ "write": { "iops": 7 } })],
        };
        let loader = MapLoader(HashMap::from([(path, document)]));

        let run = Aggregator::with_loader(loader, DiscoveryConfig::default(), &[MetricName::WriteIops])
            .aggregate(temp.path())
            .unwrap();
        assert_eq!(run.metrics.get(MetricName::WriteIops).unwrap(), &[7.0]);
    }
}
